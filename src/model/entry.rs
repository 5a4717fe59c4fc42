use crate::model::{Amount, AmountError, RawAmount};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// The date format used at every boundary: `YYYY-MM-DD`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Identifies an entry within a running session. Ids are assigned locally when entries are loaded
/// or created, they are never persisted and never reused.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct EntryId(String);

impl EntryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for EntryId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Produces unique entry ids. Injected into the store so that id assignment is deterministic in
/// tests.
pub trait IdGenerator: Send {
    fn next_id(&mut self) -> EntryId;
}

/// Hands out `e1`, `e2`, ... in order.
#[derive(Debug, Default, Clone)]
pub struct SequentialIds {
    last: u64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> EntryId {
        self.last += 1;
        EntryId(format!("e{}", self.last))
    }
}

/// Hands out random v4 UUIDs.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&mut self) -> EntryId {
        EntryId(Uuid::new_v4().to_string())
    }
}

/// Whether an entry adds money to or removes money from the balance.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    Income,
    Expense,
}

serde_plain::derive_display_from_serialize!(EntryType);

impl FromStr for EntryType {
    type Err = String;

    /// Case-insensitive, so that `Income`, `income` and `INCOME` are all accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(EntryType::Income),
            "expense" => Ok(EntryType::Expense),
            other => Err(format!(
                "'{other}' is not an entry type, expected 'income' or 'expense'"
            )),
        }
    }
}

impl EntryType {
    /// The signed contribution of `amount` to a balance.
    pub fn apply(self, amount: Amount) -> i64 {
        match self {
            EntryType::Income => amount.signed(),
            EntryType::Expense => -amount.signed(),
        }
    }
}

/// The editable content of an entry: everything except its id.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Draft {
    pub date: NaiveDate,
    pub kind: EntryType,
    pub amount: Amount,
}

impl Draft {
    pub fn new(date: NaiveDate, kind: EntryType, amount: Amount) -> Self {
        Self { date, kind, amount }
    }
}

/// A single ledger record.
///
/// An entry read from storage keeps the row it was read from, so that it is written back exactly
/// as it was until one of its values changes.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Entry {
    id: EntryId,
    date: NaiveDate,
    kind: EntryType,
    amount: Amount,
    loaded: Option<RawEntry>,
}

impl Entry {
    pub(crate) fn new(id: EntryId, draft: Draft) -> Self {
        Self {
            id,
            date: draft.date,
            kind: draft.kind,
            amount: draft.amount,
            loaded: None,
        }
    }

    pub(crate) fn from_row(id: EntryId, draft: Draft, row: RawEntry) -> Self {
        Self {
            loaded: Some(row),
            ..Self::new(id, draft)
        }
    }

    pub fn id(&self) -> &EntryId {
        &self.id
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    pub fn kind(&self) -> EntryType {
        self.kind
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn draft(&self) -> Draft {
        Draft::new(self.date, self.kind, self.amount)
    }

    pub(crate) fn apply(&mut self, patch: &Patch) {
        let before = self.draft();
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if self.draft() != before {
            self.loaded = None;
        }
    }

    /// The row written to storage: the loaded row when nothing has changed, otherwise the values
    /// in their canonical spelling.
    pub fn to_raw(&self) -> RawEntry {
        match &self.loaded {
            Some(row) => row.clone(),
            None => RawEntry::new(
                self.date.format(DATE_FORMAT).to_string(),
                self.kind.to_string(),
                self.amount.into(),
            ),
        }
    }

    /// The typed form reported by the commands.
    pub fn to_saved(&self) -> SavedEntry {
        SavedEntry {
            date: self.date.format(DATE_FORMAT).to_string(),
            kind: self.kind,
            amount: self.amount,
        }
    }
}

/// A partial change to an entry. `None` fields are left alone.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub struct Patch {
    pub date: Option<NaiveDate>,
    pub kind: Option<EntryType>,
    pub amount: Option<Amount>,
}

impl From<Draft> for Patch {
    fn from(draft: Draft) -> Self {
        Self {
            date: Some(draft.date),
            kind: Some(draft.kind),
            amount: Some(draft.amount),
        }
    }
}

/// An entry in the storage layer's shape, both loaded and saved. Fields are kept loose here and
/// validated by `RawEntry::parse`.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct RawEntry {
    pub date: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: RawAmount,
}

impl RawEntry {
    pub fn new(date: impl Into<String>, kind: impl Into<String>, amount: RawAmount) -> Self {
        Self {
            date: date.into(),
            kind: kind.into(),
            amount,
        }
    }

    /// Validates the loose fields.
    pub fn parse(&self) -> Result<Draft, RawEntryError> {
        let date = parse_date(&self.date).map_err(RawEntryError::Date)?;
        let kind = EntryType::from_str(&self.kind).map_err(RawEntryError::Type)?;
        let amount = self.amount.to_amount().map_err(RawEntryError::Amount)?;
        Ok(Draft::new(date, kind, amount))
    }
}

/// A stored row that could not be turned into an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawEntryError {
    Date(String),
    Type(String),
    Amount(AmountError),
}

impl Display for RawEntryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RawEntryError::Date(s) => write!(f, "invalid date: {s}"),
            RawEntryError::Type(s) => write!(f, "invalid type: {s}"),
            RawEntryError::Amount(e) => write!(f, "invalid amount: {e}"),
        }
    }
}

impl std::error::Error for RawEntryError {}

/// An entry with validated values and a canonical date, as reported by the commands.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct SavedEntry {
    pub date: String,
    #[serde(rename = "type")]
    pub kind: EntryType,
    pub amount: Amount,
}

/// Parses an ISO `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    let trimmed = s.trim();
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map_err(|e| format!("'{trimmed}' is not a YYYY-MM-DD date: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_type_from_str() {
        assert_eq!(EntryType::from_str("Income").unwrap(), EntryType::Income);
        assert_eq!(EntryType::from_str("expense").unwrap(), EntryType::Expense);
        assert_eq!(EntryType::from_str(" EXPENSE ").unwrap(), EntryType::Expense);
        assert!(EntryType::from_str("transfer").is_err());
    }

    #[test]
    fn test_entry_type_display() {
        assert_eq!(EntryType::Income.to_string(), "income");
        assert_eq!(EntryType::Expense.to_string(), "expense");
    }

    #[test]
    fn test_entry_type_apply() {
        let amount = Amount::new(40).unwrap();
        assert_eq!(EntryType::Income.apply(amount), 40);
        assert_eq!(EntryType::Expense.apply(amount), -40);
    }

    #[test]
    fn test_sequential_ids() {
        let mut ids = SequentialIds::new();
        assert_eq!(ids.next_id(), EntryId::new("e1"));
        assert_eq!(ids.next_id(), EntryId::new("e2"));
    }

    #[test]
    fn test_uuid_ids_are_unique() {
        let mut ids = UuidIds;
        assert_ne!(ids.next_id(), ids.next_id());
    }

    #[test]
    fn test_raw_entry_parse() {
        let json = r#"{"date": "2024-01-05", "type": "income", "amount": "1000"}"#;
        let raw: RawEntry = serde_json::from_str(json).unwrap();
        let draft = raw.parse().unwrap();
        assert_eq!(draft.date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert_eq!(draft.kind, EntryType::Income);
        assert_eq!(draft.amount.value(), 1000);
    }

    #[test]
    fn test_raw_entry_parse_errors() {
        let bad_date = RawEntry::new("2024/01/05", "income", RawAmount::Unsigned(1));
        assert!(matches!(bad_date.parse(), Err(RawEntryError::Date(_))));

        let bad_type = RawEntry::new("2024-01-05", "gift", RawAmount::Unsigned(1));
        assert!(matches!(bad_type.parse(), Err(RawEntryError::Type(_))));

        let bad_amount = RawEntry::new("2024-01-05", "income", RawAmount::Text("".into()));
        assert!(matches!(bad_amount.parse(), Err(RawEntryError::Amount(_))));
    }

    #[test]
    fn test_saved_entry_json() {
        let entry = Entry::new(
            EntryId::new("x"),
            Draft::new(
                NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
                EntryType::Expense,
                Amount::new(300).unwrap(),
            ),
        );
        let json = serde_json::to_string(&entry.to_saved()).unwrap();
        assert_eq!(json, r#"{"date":"2024-01-10","type":"expense","amount":300}"#);
    }

    #[test]
    fn test_patch_leaves_missing_fields() {
        let mut entry = Entry::new(
            EntryId::new("x"),
            Draft::new(
                NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
                EntryType::Expense,
                Amount::new(300).unwrap(),
            ),
        );
        entry.apply(&Patch {
            amount: Amount::new(5),
            ..Default::default()
        });
        assert_eq!(entry.amount().value(), 5);
        assert_eq!(entry.kind(), EntryType::Expense);
        assert_eq!(entry.id(), &EntryId::new("x"));
    }

    #[test]
    fn test_loaded_row_is_written_back_until_changed() {
        let row = RawEntry::new(" 2024-1-5", "Income", RawAmount::Text("1000.0".into()));
        let mut entry = Entry::from_row(EntryId::new("x"), row.parse().unwrap(), row.clone());
        assert_eq!(entry.to_raw(), row);

        entry.apply(&Patch {
            kind: Some(EntryType::Income),
            ..Default::default()
        });
        assert_eq!(entry.to_raw(), row);

        entry.apply(&Patch {
            amount: Amount::new(7),
            ..Default::default()
        });
        assert_eq!(
            entry.to_raw(),
            RawEntry::new("2024-01-05", "income", RawAmount::Unsigned(7))
        );
    }
}
