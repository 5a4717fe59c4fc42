//! The add/edit form and the state machine that decides what a submission does.

use crate::error::LedgerError;
use crate::ledger::EntryStore;
use crate::model::{parse_date, Amount, Draft, Entry, EntryId, EntryType, DATE_FORMAT};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;

/// What the form is currently doing.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub enum FormState {
    #[default]
    Idle,
    Creating,
    Editing(EntryId),
}

/// One of the three inputs on the form.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    Date,
    Type,
    Amount,
}

serde_plain::derive_display_from_serialize!(FormField);
serde_plain::derive_fromstr_from_deserialize!(FormField);

/// The raw text of the form inputs.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct FormFields {
    pub date: String,
    pub kind: String,
    pub amount: String,
}

impl FormFields {
    fn from_entry(entry: &Entry) -> Self {
        Self {
            date: entry.date().format(DATE_FORMAT).to_string(),
            kind: entry.kind().to_string(),
            amount: entry.amount().to_string(),
        }
    }

    fn get_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Date => &mut self.date,
            FormField::Type => &mut self.kind,
            FormField::Amount => &mut self.amount,
        }
    }

    /// Checks that every field is filled in and parses them.
    fn validate(&self) -> Result<Draft, LedgerError> {
        let missing: Vec<&str> = [
            ("date", &self.date),
            ("type", &self.kind),
            ("amount", &self.amount),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();
        if !missing.is_empty() {
            return Err(LedgerError::Validation(format!(
                "please fill in every field (missing: {})",
                missing.join(", ")
            )));
        }

        let date = parse_date(&self.date).map_err(LedgerError::Validation)?;
        let kind = EntryType::from_str(&self.kind).map_err(LedgerError::Validation)?;
        let amount =
            Amount::from_str(&self.amount).map_err(|e| LedgerError::Validation(e.to_string()))?;
        Ok(Draft::new(date, kind, amount))
    }
}

/// The result of a successful submission.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Submitted {
    Created(EntryId),
    Updated(EntryId),
}

impl Submitted {
    pub fn id(&self) -> &EntryId {
        match self {
            Submitted::Created(id) | Submitted::Updated(id) => id,
        }
    }
}

/// The input form. Starts `Idle`; `begin_create` and `begin_edit` open it, `cancel` and a
/// successful `submit` close it again.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct Form {
    state: FormState,
    fields: FormFields,
}

impl Form {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    pub fn is_open(&self) -> bool {
        self.state != FormState::Idle
    }

    /// Opens an empty form for a new entry with the date set to `today`. Any edit in progress is
    /// dropped.
    pub fn begin_create(&mut self, today: NaiveDate) {
        self.state = FormState::Creating;
        self.fields = FormFields {
            date: today.format(DATE_FORMAT).to_string(),
            ..FormFields::default()
        };
    }

    /// Opens the form on `entry`, pre-filled with its values.
    ///
    /// # Errors
    /// `FormOpen` when the form is not idle. The open form keeps its target and inputs.
    pub fn begin_edit(&mut self, entry: &Entry) -> Result<(), LedgerError> {
        if self.is_open() {
            return Err(LedgerError::FormOpen);
        }
        self.state = FormState::Editing(entry.id().clone());
        self.fields = FormFields::from_entry(entry);
        Ok(())
    }

    /// Closes the form and clears it.
    pub fn cancel(&mut self) {
        self.reset();
    }

    /// Replaces the text of one input.
    pub fn set_field(
        &mut self,
        field: FormField,
        value: impl Into<String>,
    ) -> Result<(), LedgerError> {
        if !self.is_open() {
            return Err(LedgerError::FormClosed);
        }
        *self.fields.get_mut(field) = value.into();
        Ok(())
    }

    /// Validates the inputs and applies them to `store`: a new entry when creating, an update of
    /// the target when editing. On success the form is cleared and closed.
    ///
    /// # Errors
    /// - `FormClosed` when the form is idle.
    /// - `Validation` when a field is missing or malformed. The form stays open and the store is
    ///   untouched.
    /// - `NotFound` when the edited entry has been removed in the meantime. The form is closed.
    pub fn submit(&mut self, store: &mut EntryStore) -> Result<Submitted, LedgerError> {
        if !self.is_open() {
            return Err(LedgerError::FormClosed);
        }
        let draft = self.fields.validate()?;
        let target = match &self.state {
            FormState::Idle => return Err(LedgerError::FormClosed),
            FormState::Creating => None,
            FormState::Editing(id) => Some(id.clone()),
        };
        let submitted = match target {
            None => Submitted::Created(store.add(draft)),
            Some(id) => {
                if store.update(&id, draft).is_none() {
                    debug!("Entry {id} vanished before its edit was submitted");
                    self.reset();
                    return Err(LedgerError::NotFound(id));
                }
                Submitted::Updated(id)
            }
        };
        self.reset();
        Ok(submitted)
    }

    fn reset(&mut self) {
        self.state = FormState::Idle;
        self.fields = FormFields::default();
    }
}
