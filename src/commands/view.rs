use crate::api::{PasswordSource, Persistence};
use crate::args::YearArgs;
use crate::commands::{Book, Out};
use crate::ledger::YearSeries;
use crate::model::SavedEntry;
use crate::{render, Config, Result};

/// Prints the entries of a year as a table. The structured output is the same entries in the
/// shape they are stored.
pub async fn list(
    config: &Config,
    persistence: &Persistence,
    passwords: &mut dyn PasswordSource,
    args: &YearArgs,
) -> Result<Out<Vec<SavedEntry>>> {
    let book = Book::open(config, persistence, passwords, args.year()).await?;
    let app = &book.app;
    let view = app.view();
    let table = render::table(app.year(), &view, app.selection());
    let saved = view.iter().map(|entry| entry.to_saved()).collect();
    Ok(Out::new(table, saved))
}

/// Prints the daily income, expense and running balance of a year.
pub async fn chart(
    config: &Config,
    persistence: &Persistence,
    passwords: &mut dyn PasswordSource,
    args: &YearArgs,
) -> Result<Out<YearSeries>> {
    let book = Book::open(config, persistence, passwords, args.year()).await?;
    let series = book.app.series();
    Ok(Out::new(render::series(&series), series))
}
