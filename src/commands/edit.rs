use crate::api::{PasswordSource, Persistence};
use crate::app::{Action, Outcome};
use crate::args::{AddArgs, DeleteArgs, EditArgs, Target};
use crate::commands::{Book, Out};
use crate::ledger::FormField;
use crate::model::{EntryId, SavedEntry};
use crate::{Config, Result};
use anyhow::{bail, Context};
use tracing::debug;

/// Records a new entry and saves the ledger. The date defaults to today.
pub async fn add(
    config: &Config,
    persistence: &Persistence,
    passwords: &mut dyn PasswordSource,
    args: &AddArgs,
) -> Result<Out<SavedEntry>> {
    let mut book = Book::open(config, persistence, passwords, None).await?;
    let app = &mut book.app;
    app.dispatch(Action::Add)?;
    if let Some(date) = args.date() {
        app.dispatch(Action::SetField(FormField::Date, date.to_string()))?;
    }
    app.dispatch(Action::SetField(FormField::Type, args.kind().to_string()))?;
    app.dispatch(Action::SetField(FormField::Amount, args.amount().to_string()))?;
    let id = match app.dispatch(Action::Submit)? {
        Outcome::Created(id) => id,
        other => bail!("Unexpected outcome when adding an entry: {other:?}"),
    };
    finish(&mut book, &id).await
}

/// Changes the fields given in `args` of one entry and saves the ledger.
pub async fn edit(
    config: &Config,
    persistence: &Persistence,
    passwords: &mut dyn PasswordSource,
    args: &EditArgs,
) -> Result<Out<SavedEntry>> {
    let mut book = Book::open(config, persistence, passwords, args.target().year()).await?;
    select(&mut book, args.target())?;
    let app = &mut book.app;
    app.dispatch(Action::Edit)?;
    let changes = [
        (FormField::Date, args.date()),
        (FormField::Type, args.kind()),
        (FormField::Amount, args.amount()),
    ];
    for (field, value) in changes {
        if let Some(value) = value {
            app.dispatch(Action::SetField(field, value.to_string()))?;
        }
    }
    let id = match app.dispatch(Action::Submit)? {
        Outcome::Updated(id) => id,
        other => bail!("Unexpected outcome when editing an entry: {other:?}"),
    };
    finish(&mut book, &id).await
}

/// Removes one entry and saves the ledger.
pub async fn delete(
    config: &Config,
    persistence: &Persistence,
    passwords: &mut dyn PasswordSource,
    args: &DeleteArgs,
) -> Result<Out<SavedEntry>> {
    let mut book = Book::open(config, persistence, passwords, args.target().year()).await?;
    select(&mut book, args.target())?;
    let removed = match book.app.dispatch(Action::Delete)? {
        Outcome::Deleted(entry) => entry,
        other => bail!("Unexpected outcome when deleting an entry: {other:?}"),
    };
    let message = book.save().await?;
    Ok(Out::new(
        format!(
            "Deleted {} of {} on {}. {message}",
            removed.kind(),
            removed.amount(),
            removed.date()
        ),
        removed.to_saved(),
    ))
}

/// Selects the row named by `target`, failing if the year has no such row.
fn select(book: &mut Book<'_>, target: &Target) -> Result<()> {
    let len = book.app.view().len();
    if target.index() >= len {
        bail!(
            "There is no entry {} in {}, it has {len} entries",
            target.index(),
            book.app.year()
        );
    }
    book.app.select(target.index());
    debug!("Selected {:?}", book.app.selected());
    Ok(())
}

async fn finish(book: &mut Book<'_>, id: &EntryId) -> Result<Out<SavedEntry>> {
    let saved = book
        .app
        .store()
        .get(id)
        .map(|entry| entry.to_saved())
        .with_context(|| format!("Entry {id} is missing after the change"))?;
    let message = book.save().await?;
    Ok(Out::new(
        format!(
            "Recorded {} of {} on {}. {message}",
            saved.kind, saved.amount, saved.date
        ),
        saved,
    ))
}
