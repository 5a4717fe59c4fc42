//! Plain-text views of the ledger for the terminal.

use crate::ledger::{FormFields, FormState, Selection, YearSeries};
use crate::model::{Entry, DATE_FORMAT};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fmt::Write;

/// The entries of one year as a table. The selected row is marked with `>`.
pub(crate) fn table(year: i32, view: &[&Entry], selection: Selection) -> String {
    if view.is_empty() {
        return format!("No entries in {year}.");
    }
    let mut out = String::new();
    let _ = writeln!(out, "   {:>4}  {:<10}  {:<7}  {:>12}", "#", "date", "type", "amount");
    for (index, entry) in view.iter().enumerate() {
        let marker = if selection.index() == Some(index) {
            '>'
        } else {
            ' '
        };
        let _ = writeln!(
            out,
            "{marker}  {index:>4}  {}  {:<7}  {:>12}",
            entry.date().format(DATE_FORMAT),
            entry.kind().to_string(),
            entry.amount()
        );
    }
    out.truncate(out.trim_end().len());
    out
}

/// The daily income, expense and balance of a year, one line per day with entries.
pub(crate) fn series(series: &YearSeries) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}: opening balance {}, closing balance {}, income {}, expense {}",
        series.year,
        series.opening_balance,
        series.closing_balance(),
        series.total_income(),
        series.total_expense()
    );
    if series.is_empty() {
        let _ = write!(out, "No entries in {}.", series.year);
        return out;
    }

    let income: BTreeMap<NaiveDate, u64> = series.income.iter().copied().collect();
    let expense: BTreeMap<NaiveDate, u64> = series.expense.iter().copied().collect();
    let _ = writeln!(
        out,
        "{:<10}  {:>12}  {:>12}  {:>12}",
        "date", "income", "expense", "balance"
    );
    for (day, balance) in &series.balance {
        let _ = writeln!(
            out,
            "{}  {:>12}  {:>12}  {:>12}",
            day.format(DATE_FORMAT),
            cell(income.get(day)),
            cell(expense.get(day)),
            balance
        );
    }
    out.truncate(out.trim_end().len());
    out
}

fn cell(value: Option<&u64>) -> String {
    value.map(u64::to_string).unwrap_or_default()
}

/// The open form, or nothing when it is closed.
pub(crate) fn form(state: &FormState, fields: &FormFields) -> Option<String> {
    let title = match state {
        FormState::Idle => return None,
        FormState::Creating => "New entry".to_string(),
        FormState::Editing(id) => format!("Editing entry {id}"),
    };
    Some(format!(
        "{title}\n  date:   {}\n  type:   {}\n  amount: {}",
        fields.date, fields.kind, fields.amount
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{aggregate, filter_by_year, EntryStore};
    use crate::model::{Amount, Draft, EntryType};

    fn store() -> EntryStore {
        let mut store = EntryStore::default();
        for (date, kind, amount) in [
            ("2024-01-10", EntryType::Expense, 300),
            ("2024-01-05", EntryType::Income, 1000),
        ] {
            store.add(Draft::new(
                NaiveDate::parse_from_str(date, DATE_FORMAT).unwrap(),
                kind,
                Amount::new(amount).unwrap(),
            ));
        }
        store
    }

    #[test]
    fn test_table_marks_selection() {
        let store = store();
        let view = filter_by_year(store.all(), 2024);
        let mut selection = Selection::new();
        selection.select(1, view.len());
        let text = table(2024, &view, selection);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with(' '));
        assert!(lines[1].contains("2024-01-05"));
        assert!(lines[2].starts_with('>'));
        assert!(lines[2].contains("expense"));
        assert!(lines[2].ends_with("300"));
    }

    #[test]
    fn test_table_empty_year() {
        assert_eq!(table(2030, &[], Selection::new()), "No entries in 2030.");
    }

    #[test]
    fn test_series_text() {
        let text = series(&aggregate(store().all(), 2024));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "2024: opening balance 0, closing balance 700, income 1000, expense 300"
        );
        assert_eq!(lines.len(), 4);
        assert!(lines[2].starts_with("2024-01-05"));
        assert!(lines[2].ends_with("1000"));
        assert!(lines[3].ends_with("700"));
    }

    #[test]
    fn test_series_with_huge_amounts() {
        let mut store = EntryStore::default();
        for day in 1..=3 {
            store.add(Draft::new(
                NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
                EntryType::Income,
                Amount::MAX,
            ));
        }
        let text = series(&aggregate(store.all(), 2024));
        assert!(text.starts_with(&format!(
            "2024: opening balance 0, closing balance {}, income {}",
            i64::MAX,
            u64::MAX
        )));
    }

    #[test]
    fn test_series_empty_year() {
        let text = series(&aggregate(store().all(), 2025));
        assert!(text.starts_with("2025: opening balance 700, closing balance 700"));
        assert!(text.ends_with("No entries in 2025."));
    }

    #[test]
    fn test_form_closed() {
        assert_eq!(form(&FormState::Idle, &FormFields::default()), None);
    }
}
