//! The in-memory ledger: the entry store and the views derived from it.
mod aggregate;
mod filter;
mod form;
mod selection;
mod store;

pub use aggregate::{aggregate, opening_balance, YearSeries};
pub use filter::{filter_by_year, years};
pub use form::{Form, FormField, FormFields, FormState, Submitted};
pub use selection::{Direction, Selection};
pub use store::EntryStore;
