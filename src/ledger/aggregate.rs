//! Turns the entry list into the per-day series behind the trend and balance charts.

use crate::ledger::filter_by_year;
use crate::model::{Entry, EntryType};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The daily series for one year.
///
/// `income` and `expense` only contain the days that had at least one entry of that type. The
/// `balance` series has one point for every day with at least one entry, starting from
/// `opening_balance`.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct YearSeries {
    pub year: i32,
    pub opening_balance: i64,
    pub income: Vec<(NaiveDate, u64)>,
    pub expense: Vec<(NaiveDate, u64)>,
    pub balance: Vec<(NaiveDate, i64)>,
}

impl YearSeries {
    /// The balance after the last entry of the year, or the opening balance for an empty year.
    pub fn closing_balance(&self) -> i64 {
        self.balance
            .last()
            .map(|(_, balance)| *balance)
            .unwrap_or(self.opening_balance)
    }

    pub fn is_empty(&self) -> bool {
        self.balance.is_empty()
    }

    /// Saturates at `u64::MAX`.
    pub fn total_income(&self) -> u64 {
        total(&self.income)
    }

    /// Saturates at `u64::MAX`.
    pub fn total_expense(&self) -> u64 {
        total(&self.expense)
    }
}

fn total(points: &[(NaiveDate, u64)]) -> u64 {
    points
        .iter()
        .fold(0u64, |acc, (_, v)| acc.saturating_add(*v))
}

#[derive(Debug, Default, Clone, Copy)]
struct DayTotals {
    income: Option<u64>,
    expense: Option<u64>,
}

impl DayTotals {
    fn add(&mut self, entry: &Entry) {
        let slot = match entry.kind() {
            EntryType::Income => &mut self.income,
            EntryType::Expense => &mut self.expense,
        };
        *slot = Some(slot.unwrap_or(0).saturating_add(entry.amount().value()));
    }

    fn net(&self) -> i64 {
        signed(self.income.unwrap_or(0)).saturating_sub(signed(self.expense.unwrap_or(0)))
    }
}

fn signed(v: u64) -> i64 {
    i64::try_from(v).unwrap_or(i64::MAX)
}

/// The net of every entry dated before `year`: income adds, expense subtracts.
pub fn opening_balance(entries: &[Entry], year: i32) -> i64 {
    entries
        .iter()
        .filter(|e| e.year() < year)
        .fold(0i64, |acc, e| acc.saturating_add(e.kind().apply(e.amount())))
}

/// Computes the daily income, expense and running balance series of `year`.
///
/// The whole entry list is needed, not only the year's entries, because the balance carries
/// forward everything recorded before the year began.
pub fn aggregate(entries: &[Entry], year: i32) -> YearSeries {
    let mut days: BTreeMap<NaiveDate, DayTotals> = BTreeMap::new();
    for entry in filter_by_year(entries, year) {
        days.entry(entry.date()).or_default().add(entry);
    }

    let opening_balance = opening_balance(entries, year);
    let mut running = opening_balance;
    let mut income = Vec::new();
    let mut expense = Vec::new();
    let mut balance = Vec::with_capacity(days.len());
    for (day, totals) in &days {
        if let Some(v) = totals.income {
            income.push((*day, v));
        }
        if let Some(v) = totals.expense {
            expense.push((*day, v));
        }
        running = running.saturating_add(totals.net());
        balance.push((*day, running));
    }

    YearSeries {
        year,
        opening_balance,
        income,
        expense,
        balance,
    }
}
