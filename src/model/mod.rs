//! Types that represent the ledger data model, such as `Entry` and `Amount`.
mod amount;
mod entry;

pub use amount::{Amount, AmountError, RawAmount};
pub use entry::{
    parse_date, Draft, Entry, EntryId, EntryType, IdGenerator, Patch, RawEntry, RawEntryError,
    SavedEntry, SequentialIds, UuidIds, DATE_FORMAT,
};
