//! These structs provide the CLI interface for the budget-book CLI.

use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// budget-book: a password-protected personal ledger of income and expenses.
///
/// Entries are dated income or expense amounts. They can be listed by year, charted as daily
/// income, expense and running balance, and edited one at a time or from an interactive shell.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the home directory and its config file, and choose a password.
    ///
    /// This is the first command you should run. By default the home directory is
    /// $HOME/budget-book, pass --home or set BUDGET_BOOK_HOME to put it somewhere else.
    Init,
    /// Print the entries of a year.
    List(YearArgs),
    /// Print the daily income, expense and running balance of a year.
    Chart(YearArgs),
    /// Record a new entry and save.
    Add(AddArgs),
    /// Change an entry and save. Only the given fields change.
    Edit(EditArgs),
    /// Remove an entry and save.
    Delete(DeleteArgs),
    /// Work with the ledger interactively. Type 'help' at the prompt for the commands.
    Shell(YearArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where the ledger and its configuration are held. Defaults to ~/budget-book
    #[arg(long, env = "BUDGET_BOOK_HOME", default_value_t = default_home())]
    home: DisplayPath,

    /// The ledger password. You will be prompted for it when it is not given.
    #[arg(long, env = "BUDGET_BOOK_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

impl Common {
    pub fn new(log_level: LevelFilter, home: PathBuf, password: Option<String>) -> Self {
        Self {
            log_level,
            home: home.into(),
            password,
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn home(&self) -> &DisplayPath {
        &self.home
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }
}

/// Args for commands that look at one year.
#[derive(Debug, Parser, Clone, Default)]
pub struct YearArgs {
    /// The year to show. Defaults to `default_year` from the config, or the current year.
    #[arg(long)]
    year: Option<i32>,
}

impl YearArgs {
    pub fn new(year: Option<i32>) -> Self {
        Self { year }
    }

    pub fn year(&self) -> Option<i32> {
        self.year
    }
}

/// Args for the `budget-book add` command.
#[derive(Debug, Parser, Clone)]
pub struct AddArgs {
    /// The date of the entry, YYYY-MM-DD. Defaults to today.
    #[arg(long)]
    date: Option<String>,

    /// Either 'income' or 'expense'.
    #[arg(long = "type")]
    kind: String,

    /// A whole, non-negative amount.
    #[arg(long)]
    amount: String,
}

impl AddArgs {
    pub fn new(date: Option<String>, kind: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            date,
            kind: kind.into(),
            amount: amount.into(),
        }
    }

    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }
}

/// Args for the `budget-book edit` command.
#[derive(Debug, Parser, Clone)]
pub struct EditArgs {
    #[clap(flatten)]
    target: Target,

    /// The new date, YYYY-MM-DD.
    #[arg(long)]
    date: Option<String>,

    /// The new type, 'income' or 'expense'.
    #[arg(long = "type")]
    kind: Option<String>,

    /// The new amount.
    #[arg(long)]
    amount: Option<String>,
}

impl EditArgs {
    pub fn new(
        target: Target,
        date: Option<String>,
        kind: Option<String>,
        amount: Option<String>,
    ) -> Self {
        Self {
            target,
            date,
            kind,
            amount,
        }
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    pub fn amount(&self) -> Option<&str> {
        self.amount.as_deref()
    }
}

/// Args for the `budget-book delete` command.
#[derive(Debug, Parser, Clone)]
pub struct DeleteArgs {
    #[clap(flatten)]
    target: Target,
}

impl DeleteArgs {
    pub fn new(target: Target) -> Self {
        Self { target }
    }

    pub fn target(&self) -> &Target {
        &self.target
    }
}

/// Names one row of a year's list, as printed by `budget-book list`.
#[derive(Debug, Parser, Clone)]
pub struct Target {
    #[clap(flatten)]
    year: YearArgs,

    /// The row number shown in the first column of `budget-book list`, starting at 0.
    #[arg(long)]
    index: usize,
}

impl Target {
    pub fn new(year: Option<i32>, index: usize) -> Self {
        Self {
            year: YearArgs::new(year),
            index,
        }
    }

    pub fn year(&self) -> Option<i32> {
        self.year.year()
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

fn default_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("budget-book"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --home or BUDGET_BOOK_HOME instead of relying on the default \
                home directory. If you continue using the program right now, you may have \
                problems!",
            );
            PathBuf::from("budget-book")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn new(path: PathBuf) -> Self {
        Self(path)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_edit() {
        let args = Args::try_parse_from([
            "budget-book",
            "--home",
            "/tmp/bb",
            "edit",
            "--year",
            "2024",
            "--index",
            "2",
            "--type",
            "Expense",
        ])
        .unwrap();
        assert_eq!(args.common().home().path(), Path::new("/tmp/bb"));
        let Command::Edit(edit) = args.command() else {
            panic!("expected edit, got {:?}", args.command());
        };
        assert_eq!(edit.target().year(), Some(2024));
        assert_eq!(edit.target().index(), 2);
        assert_eq!(edit.kind(), Some("Expense"));
        assert_eq!(edit.date(), None);
    }

    #[test]
    fn test_parse_add_requires_amount() {
        assert!(Args::try_parse_from(["budget-book", "add", "--type", "income"]).is_err());
        let args = Args::try_parse_from([
            "budget-book",
            "--log-level",
            "debug",
            "add",
            "--type",
            "income",
            "--amount",
            "1000",
        ])
        .unwrap();
        assert_eq!(args.common().log_level(), LevelFilter::DEBUG);
        assert!(matches!(args.command(), Command::Add(add) if add.date().is_none()));
    }
}
