//! The application state: one struct that owns the ledger and everything the user is looking at.
//!
//! Every user action goes through `App::dispatch`, which runs to completion before the next
//! action is handled. After each action the selection is re-anchored against the freshly derived
//! filtered view, so that it can never point past the end of the view.

use crate::api::Persistence;
use crate::error::LedgerError;
use crate::ledger::{
    aggregate, filter_by_year, years, Direction, EntryStore, Form, FormField, Selection,
    Submitted, YearSeries,
};
use crate::model::{Entry, EntryId};
use chrono::{Datelike, Local, NaiveDate};
use tracing::{debug, trace};

/// A user action.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Action {
    /// Open the form for a new entry.
    Add,
    /// Open the form on the selected entry.
    Edit,
    /// Remove the selected entry.
    Delete,
    /// Close the form without changes.
    Cancel,
    /// Apply the form.
    Submit,
    /// Change one input of the open form.
    SetField(FormField, String),
    /// Move the selection one row.
    Move(Direction),
    /// Show another year.
    SetYear(i32),
}

/// What an action did, for reporting back to the user.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Outcome {
    FormOpened,
    FormClosed,
    FieldSet,
    Created(EntryId),
    Updated(EntryId),
    Deleted(Entry),
    Selected(Option<usize>),
    YearChanged(i32),
}

/// The single owner of all mutable application state.
#[derive(Debug)]
pub struct App {
    store: EntryStore,
    year: i32,
    selection: Selection,
    form: Form,
    dirty: bool,
    today: fn() -> NaiveDate,
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

impl App {
    /// Creates the application state around a loaded `store`, showing `year`.
    pub fn new(store: EntryStore, year: i32) -> Self {
        Self {
            store,
            year,
            selection: Selection::new(),
            form: Form::new(),
            dirty: false,
            today: local_today,
        }
    }

    /// Replaces the clock used to pre-fill the date of new entries.
    pub fn with_today(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// The current calendar year.
    pub fn current_year() -> i32 {
        local_today().year()
    }

    pub fn store(&self) -> &EntryStore {
        &self.store
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    /// True when the store has changes that have not been saved.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// The entries of the year being viewed.
    pub fn view(&self) -> Vec<&Entry> {
        filter_by_year(self.store.all(), self.year)
    }

    /// The daily series of the year being viewed.
    pub fn series(&self) -> YearSeries {
        aggregate(self.store.all(), self.year)
    }

    /// The years that have entries.
    pub fn years(&self) -> Vec<i32> {
        years(self.store.all())
    }

    /// The selected entry, if the selection resolves in the current view.
    pub fn selected(&self) -> Option<&Entry> {
        self.selection.resolve(&self.view()).copied()
    }

    /// Whether edit and delete are currently available.
    pub fn has_selection(&self) -> bool {
        self.selected().is_some()
    }

    /// Selects row `index` of the current view, clamped to the view.
    pub fn select(&mut self, index: usize) {
        let len = self.view().len();
        self.selection.select(index, len);
    }

    /// Handles one user action.
    ///
    /// # Errors
    /// Returns a `LedgerError` when the action cannot be carried out. The state is left as it was
    /// before the action, except that a `NotFound` on submit closes the form.
    pub fn dispatch(&mut self, action: Action) -> Result<Outcome, LedgerError> {
        trace!("dispatch {action:?}");
        let result = self.handle(action);
        self.reclamp();
        if let Err(e) = &result {
            debug!("Action failed: {e}");
        }
        result
    }

    fn handle(&mut self, action: Action) -> Result<Outcome, LedgerError> {
        match action {
            Action::Add => {
                self.form.begin_create((self.today)());
                Ok(Outcome::FormOpened)
            }
            Action::Edit => {
                let entry = self.selected().ok_or(LedgerError::NothingSelected)?.clone();
                self.form.begin_edit(&entry)?;
                Ok(Outcome::FormOpened)
            }
            Action::Delete => {
                let id = self
                    .selected()
                    .ok_or(LedgerError::NothingSelected)?
                    .id()
                    .clone();
                self.delete(&id)
            }
            Action::Cancel => {
                self.form.cancel();
                Ok(Outcome::FormClosed)
            }
            Action::Submit => {
                let submitted = self.form.submit(&mut self.store)?;
                self.dirty = true;
                Ok(match submitted {
                    Submitted::Created(id) => Outcome::Created(id),
                    Submitted::Updated(id) => Outcome::Updated(id),
                })
            }
            Action::SetField(field, value) => {
                self.form.set_field(field, value)?;
                Ok(Outcome::FieldSet)
            }
            Action::Move(direction) => {
                let len = self.view().len();
                self.selection.move_by(direction, len);
                Ok(Outcome::Selected(self.selection.index()))
            }
            Action::SetYear(year) => {
                if year != self.year {
                    // Row indices of one year mean nothing in another.
                    self.selection.clear();
                    self.year = year;
                }
                Ok(Outcome::YearChanged(year))
            }
        }
    }

    /// Removes the entry with `id`.
    ///
    /// # Errors
    /// `NotFound` when there is no such entry.
    pub fn delete(&mut self, id: &EntryId) -> Result<Outcome, LedgerError> {
        let removed = self
            .store
            .remove(id)
            .ok_or_else(|| LedgerError::NotFound(id.clone()))?;
        self.dirty = true;
        self.reclamp();
        Ok(Outcome::Deleted(removed))
    }

    /// Writes the whole store through `persistence`. On failure nothing in memory changes and the
    /// unsaved changes remain.
    pub async fn save(
        &mut self,
        persistence: &Persistence,
        password: &str,
    ) -> Result<String, LedgerError> {
        let entries = self.store.to_raw();
        let message = persistence.save_data(&entries, password).await?;
        self.dirty = false;
        Ok(message)
    }

    fn reclamp(&mut self) {
        let len = self.view().len();
        self.selection.reclamp(len);
    }
}
