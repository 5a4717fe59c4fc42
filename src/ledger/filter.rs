//! Narrows the entry list to one calendar year and lists the years that have entries.

use crate::model::Entry;
use std::collections::BTreeSet;

/// Returns the entries dated in `year`, in the order they appear in `entries`.
pub fn filter_by_year<'a, I>(entries: I, year: i32) -> Vec<&'a Entry>
where
    I: IntoIterator<Item = &'a Entry>,
{
    entries.into_iter().filter(|e| e.year() == year).collect()
}

/// The distinct years that have at least one entry, ascending.
pub fn years<'a, I>(entries: I) -> Vec<i32>
where
    I: IntoIterator<Item = &'a Entry>,
{
    entries
        .into_iter()
        .map(Entry::year)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::EntryStore;
    use crate::model::{Amount, Draft, EntryType};
    use chrono::NaiveDate;

    fn store() -> EntryStore {
        let mut store = EntryStore::default();
        for (y, m, d) in [(2023, 12, 31), (2024, 1, 5), (2024, 6, 1), (2025, 1, 1), (2024, 12, 31)] {
            store.add(Draft::new(
                NaiveDate::from_ymd_opt(y, m, d).unwrap(),
                EntryType::Income,
                Amount::new(1).unwrap(),
            ));
        }
        store
    }

    #[test]
    fn test_filter_by_year() {
        let store = store();
        let view = filter_by_year(store.all(), 2024);
        let dates: Vec<String> = view.iter().map(|e| e.date().to_string()).collect();
        assert_eq!(dates, vec!["2024-01-05", "2024-06-01", "2024-12-31"]);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let store = store();
        let once = filter_by_year(store.all(), 2024);
        let twice = filter_by_year(once.iter().copied(), 2024);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_filter_missing_year() {
        let store = store();
        assert!(filter_by_year(store.all(), 1999).is_empty());
    }

    #[test]
    fn test_years() {
        let store = store();
        assert_eq!(years(store.all()), vec![2023, 2024, 2025]);
        assert!(years(EntryStore::default().all()).is_empty());
    }
}
