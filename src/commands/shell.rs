//! The interactive shell: reads one command per line and drives the application state with it.

use crate::api::{PasswordSource, Persistence};
use crate::app::{Action, App, Outcome};
use crate::args::YearArgs;
use crate::commands::{Book, LineSource, Out};
use crate::ledger::{Direction, FormField};
use crate::{render, Config, Result};
use anyhow::Context;
use std::io::Write;
use std::str::FromStr;
use tracing::{debug, trace};

const HELP: &str = "\
Commands:
  add                 open the form for a new entry
  edit                open the form on the selected entry
  delete              remove the selected entry
  date <YYYY-MM-DD>   set the date on the open form
  type <income|expense>
                      set the type on the open form
  amount <N>          set the amount on the open form
  submit              apply the form
  cancel              close the form without changes
  up, k / down, j     move the selection
  year <Y>            show another year
  next-year, prev-year
  list                show the entries of the year
  chart               show the daily income, expense and balance of the year
  save                write the ledger to storage
  help                show this text
  quit                leave the shell";

/// One line of shell input.
#[derive(Debug, Clone, Eq, PartialEq)]
enum Line {
    Empty,
    Act(Action),
    NextYear,
    PrevYear,
    List,
    Chart,
    Save,
    Help,
    Quit,
}

impl FromStr for Line {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        let (command, rest) = s.split_once(char::is_whitespace).unwrap_or((s, ""));
        let rest = rest.trim();
        let line = match command.to_lowercase().as_str() {
            "" => Line::Empty,
            "add" => Line::Act(Action::Add),
            "edit" => Line::Act(Action::Edit),
            "delete" => Line::Act(Action::Delete),
            "cancel" => Line::Act(Action::Cancel),
            "submit" => Line::Act(Action::Submit),
            "up" | "k" => Line::Act(Action::Move(Direction::Up)),
            "down" | "j" => Line::Act(Action::Move(Direction::Down)),
            field @ ("date" | "type" | "amount") => {
                let field = FormField::from_str(field).map_err(|e| e.to_string())?;
                Line::Act(Action::SetField(field, rest.to_string()))
            }
            "year" => {
                let year = rest
                    .parse()
                    .map_err(|_| format!("'{rest}' is not a year"))?;
                Line::Act(Action::SetYear(year))
            }
            "next-year" => Line::NextYear,
            "prev-year" => Line::PrevYear,
            "list" | "ls" => Line::List,
            "chart" => Line::Chart,
            "save" => Line::Save,
            "help" | "?" => Line::Help,
            "quit" | "exit" | "q" => Line::Quit,
            other => return Err(format!("Unknown command '{other}', type 'help' for help")),
        };
        Ok(line)
    }
}

/// Opens the ledger and runs the shell until `quit` or the end of `lines`.
///
/// Errors from individual commands are printed and the shell carries on. Quitting with unsaved
/// changes needs a second `quit`.
pub async fn shell<W: Write>(
    config: &Config,
    persistence: &Persistence,
    passwords: &mut dyn PasswordSource,
    args: &YearArgs,
    lines: &mut dyn LineSource,
    mut output: W,
) -> Result<Out<()>> {
    let mut book = Book::open(config, persistence, passwords, args.year()).await?;
    let mut quit_warned = false;
    say(
        &mut output,
        &render::table(book.app.year(), &book.app.view(), book.app.selection()),
    )?;
    loop {
        let Some(text) = lines.read_line(&format!("{}> ", book.app.year()))? else {
            debug!("End of shell input");
            break;
        };
        let line = match Line::from_str(&text) {
            Ok(line) => line,
            Err(e) => {
                say(&mut output, &e)?;
                continue;
            }
        };
        trace!("Shell line: {line:?}");
        if line != Line::Quit {
            quit_warned = false;
        }
        match line {
            Line::Empty => {}
            Line::Act(action) => act(&mut book.app, action, &mut output)?,
            Line::NextYear => match book.app.year().checked_add(1) {
                Some(year) => act(&mut book.app, Action::SetYear(year), &mut output)?,
                None => say(&mut output, "There is no year after this one")?,
            },
            Line::PrevYear => match book.app.year().checked_sub(1) {
                Some(year) => act(&mut book.app, Action::SetYear(year), &mut output)?,
                None => say(&mut output, "There is no year before this one")?,
            },
            Line::List => say(
                &mut output,
                &render::table(book.app.year(), &book.app.view(), book.app.selection()),
            )?,
            Line::Chart => say(&mut output, &render::series(&book.app.series()))?,
            Line::Save => match book.save().await {
                Ok(message) => say(&mut output, &message)?,
                Err(e) => say(&mut output, &format!("{e:#}"))?,
            },
            Line::Help => say(&mut output, HELP)?,
            Line::Quit => {
                if book.app.is_dirty() && !quit_warned {
                    quit_warned = true;
                    say(
                        &mut output,
                        "There are unsaved changes. Type 'save' to keep them or 'quit' again to \
                        discard them.",
                    )?;
                } else {
                    break;
                }
            }
        }
    }
    let unsaved = if book.app.is_dirty() {
        " Unsaved changes were discarded."
    } else {
        ""
    };
    Ok(format!("Closed the ledger of {} entries.{unsaved}", book.app.store().len()).into())
}

/// Dispatches `action` and prints what happened.
fn act<W: Write>(app: &mut App, action: Action, output: &mut W) -> Result<()> {
    let outcome = match app.dispatch(action) {
        Ok(outcome) => outcome,
        Err(e) => {
            say(output, &e.to_string())?;
            return Ok(());
        }
    };
    match outcome {
        Outcome::FormOpened | Outcome::FieldSet => {
            if let Some(form) = render::form(app.form().state(), app.form().fields()) {
                say(output, &form)?;
            }
        }
        Outcome::FormClosed => say(output, "Form closed.")?,
        Outcome::Created(_)
        | Outcome::Updated(_)
        | Outcome::Deleted(_)
        | Outcome::Selected(_)
        | Outcome::YearChanged(_) => {
            say(
                output,
                &render::table(app.year(), &app.view(), app.selection()),
            )?;
        }
    }
    Ok(())
}

fn say<W: Write>(output: &mut W, text: &str) -> Result<()> {
    writeln!(output, "{text}").context("Unable to write to the terminal")?;
    output.flush().context("Unable to write to the terminal")
}
