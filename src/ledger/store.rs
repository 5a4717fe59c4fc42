//! The authoritative, date-ordered collection of entries.

use crate::model::{Draft, Entry, EntryId, IdGenerator, Patch, RawEntry, SequentialIds};
use crate::Result;
use anyhow::Context;
use std::fmt::{Debug, Formatter};

/// Holds every entry of the ledger, sorted ascending by date. Entries that share a date keep the
/// order in which they were added.
pub struct EntryStore {
    entries: Vec<Entry>,
    ids: Box<dyn IdGenerator>,
}

impl Debug for EntryStore {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntryStore")
            .field("entries", &self.entries)
            .finish_non_exhaustive()
    }
}

impl Default for EntryStore {
    fn default() -> Self {
        Self::new(Box::new(SequentialIds::new()))
    }
}

impl EntryStore {
    /// Creates an empty store that takes its ids from `ids`.
    pub fn new(ids: Box<dyn IdGenerator>) -> Self {
        Self {
            entries: Vec::new(),
            ids,
        }
    }

    /// Builds a store from rows returned by the storage layer, assigning each a fresh id.
    ///
    /// # Errors
    /// Returns an error naming the first row that cannot be parsed.
    pub fn from_raw<'a>(
        rows: impl IntoIterator<Item = &'a RawEntry>,
        ids: Box<dyn IdGenerator>,
    ) -> Result<Self> {
        let mut store = Self::new(ids);
        for (ix, row) in rows.into_iter().enumerate() {
            let draft = row
                .parse()
                .with_context(|| format!("Stored entry {} is invalid", ix + 1))?;
            let id = store.ids.next_id();
            store.entries.push(Entry::from_row(id, draft, row.clone()));
        }
        store.sort();
        Ok(store)
    }

    /// The entries in the shape the storage layer saves. Rows that were loaded and not changed
    /// since come back exactly as they were read.
    pub fn to_raw(&self) -> Vec<RawEntry> {
        self.entries.iter().map(Entry::to_raw).collect()
    }

    /// Inserts a new entry with a fresh id and returns that id.
    pub fn add(&mut self, draft: Draft) -> EntryId {
        let id = self.ids.next_id();
        self.entries.push(Entry::new(id.clone(), draft));
        self.sort();
        id
    }

    /// Applies `patch` to the entry with `id`. Returns `None` when no such entry exists, in which
    /// case nothing changes.
    pub fn update(&mut self, id: &EntryId, patch: impl Into<Patch>) -> Option<&Entry> {
        let patch = patch.into();
        let entry = self.entries.iter_mut().find(|e| e.id() == id)?;
        entry.apply(&patch);
        self.sort();
        self.get(id)
    }

    /// Removes and returns the entry with `id`, if present.
    pub fn remove(&mut self, id: &EntryId) -> Option<Entry> {
        let ix = self.entries.iter().position(|e| e.id() == id)?;
        Some(self.entries.remove(ix))
    }

    pub fn get(&self, id: &EntryId) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id() == id)
    }

    pub fn all(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn sort(&mut self) {
        // `sort_by_key` is stable, so same-day entries keep their relative order.
        self.entries.sort_by_key(Entry::date);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Amount, EntryType, RawAmount};
    use chrono::NaiveDate;
    use std::collections::HashSet;

    fn draft(y: i32, m: u32, d: u32, kind: EntryType, amount: u64) -> Draft {
        Draft::new(
            NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            kind,
            Amount::new(amount).unwrap(),
        )
    }

    fn is_sorted(store: &EntryStore) -> bool {
        store.all().windows(2).all(|w| w[0].date() <= w[1].date())
    }

    #[test]
    fn test_add_keeps_date_order() {
        let mut store = EntryStore::default();
        store.add(draft(2024, 3, 1, EntryType::Income, 10));
        store.add(draft(2024, 1, 1, EntryType::Expense, 20));
        assert!(is_sorted(&store));
        store.add(draft(2023, 12, 31, EntryType::Income, 30));
        assert!(is_sorted(&store));
        assert_eq!(store.all()[0].amount().value(), 30);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_same_day_keeps_insertion_order() {
        let mut store = EntryStore::default();
        let a = store.add(draft(2024, 5, 5, EntryType::Income, 1));
        let b = store.add(draft(2024, 5, 5, EntryType::Expense, 2));
        store.add(draft(2024, 1, 1, EntryType::Income, 3));
        let c = store.add(draft(2024, 5, 5, EntryType::Income, 4));
        let same_day: Vec<&EntryId> = store.all()[1..].iter().map(Entry::id).collect();
        assert_eq!(same_day, vec![&a, &b, &c]);
    }

    #[test]
    fn test_update_resorts() {
        let mut store = EntryStore::default();
        let first = store.add(draft(2024, 1, 1, EntryType::Income, 10));
        store.add(draft(2024, 2, 1, EntryType::Income, 20));
        let updated = store
            .update(
                &first,
                Patch {
                    date: NaiveDate::from_ymd_opt(2024, 3, 1),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.amount().value(), 10);
        assert!(is_sorted(&store));
        assert_eq!(store.all()[1].id(), &first);
    }

    #[test]
    fn test_update_missing_id_changes_nothing() {
        let mut store = EntryStore::default();
        store.add(draft(2024, 1, 1, EntryType::Income, 10));
        let before: Vec<Entry> = store.all().to_vec();
        let result = store.update(
            &EntryId::new("nope"),
            draft(2020, 1, 1, EntryType::Expense, 1),
        );
        assert!(result.is_none());
        assert_eq!(store.all(), before.as_slice());
    }

    #[test]
    fn test_remove() {
        let mut store = EntryStore::default();
        let id = store.add(draft(2024, 1, 1, EntryType::Income, 10));
        assert!(store.remove(&EntryId::new("nope")).is_none());
        let removed = store.remove(&id).unwrap();
        assert_eq!(removed.id(), &id);
        assert!(store.is_empty());
        assert!(store.remove(&id).is_none());
    }

    #[test]
    fn test_ids_unique_and_not_reused() {
        let mut store = EntryStore::default();
        let a = store.add(draft(2024, 1, 1, EntryType::Income, 1));
        store.remove(&a);
        let b = store.add(draft(2024, 1, 1, EntryType::Income, 1));
        let c = store.add(draft(2024, 1, 2, EntryType::Income, 1));
        assert_ne!(a, b);
        let ids: HashSet<&EntryId> = store.all().iter().map(Entry::id).collect();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&b) && ids.contains(&c));
    }

    #[test]
    fn test_from_raw_round_trip() {
        let rows = vec![
            RawEntry::new("2024-01-05", "Income", RawAmount::Unsigned(1000)),
            RawEntry::new("2024-1-7 ", "EXPENSE", RawAmount::Text(" 25 ".into())),
            RawEntry::new("2024-01-10", "expense", RawAmount::Float(300.5)),
        ];
        let store = EntryStore::from_raw(&rows, Box::new(SequentialIds::new())).unwrap();
        assert_eq!(store.to_raw(), rows);
    }

    #[test]
    fn test_edited_row_is_written_canonically() {
        let rows = vec![
            RawEntry::new("2024-01-05", "Income", RawAmount::Unsigned(1000)),
            RawEntry::new("2024-1-7", "EXPENSE", RawAmount::Text("25".into())),
        ];
        let mut store = EntryStore::from_raw(&rows, Box::new(SequentialIds::new())).unwrap();
        let id = store.all()[1].id().clone();
        store.update(
            &id,
            Patch {
                amount: Amount::new(30),
                ..Default::default()
            },
        );
        assert_eq!(
            store.to_raw(),
            vec![
                rows[0].clone(),
                RawEntry::new("2024-01-07", "expense", RawAmount::Unsigned(30)),
            ]
        );
    }

    #[test]
    fn test_from_raw_sorts() {
        let rows = vec![
            RawEntry::new("2024-02-01", "income", RawAmount::Unsigned(1)),
            RawEntry::new("2023-02-01", "income", RawAmount::Unsigned(2)),
        ];
        let store = EntryStore::from_raw(&rows, Box::new(SequentialIds::new())).unwrap();
        assert!(is_sorted(&store));
    }

    #[test]
    fn test_from_raw_rejects_bad_row() {
        let rows = vec![
            RawEntry::new("2024-02-01", "income", RawAmount::Unsigned(1)),
            RawEntry::new("2024-02-02", "income", RawAmount::Text("-4".into())),
        ];
        let err = EntryStore::from_raw(&rows, Box::new(SequentialIds::new())).unwrap_err();
        assert!(err.to_string().contains("Stored entry 2"));
    }
}
