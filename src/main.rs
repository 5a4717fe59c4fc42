use budget_book::api::{gateway, FixedPassword, PasswordSource, Persistence};
use budget_book::args::{Args, Command};
use budget_book::commands::{self, LineEditor, PasswordPrompt};
use budget_book::{Config, Mode, Result};
use clap::Parser;
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().home().path();

    // This allows for running the program without touching the password and data files. When
    // BUDGET_BOOK_IN_TEST_MODE is set and non-zero in length, then the mode will be
    // Mode::Testing, otherwise it will be Mode::Files.
    let mode = Mode::from_env();

    let password = args.common().password();

    if let Command::Init = args.command() {
        commands::init(home, mode, password_source(password).as_mut())
            .await?
            .print();
        return Ok(());
    }

    let config = Config::load(home).await?;
    let persistence = Persistence::new(gateway(&config, mode));

    // Route to appropriate command handler
    let _: () = match args.command() {
        Command::Init => unreachable!("init is handled before the config is loaded"),
        Command::List(list_args) => {
            let mut passwords = password_source(password);
            commands::list(&config, &persistence, passwords.as_mut(), list_args)
                .await?
                .print()
        }
        Command::Chart(chart_args) => {
            let mut passwords = password_source(password);
            commands::chart(&config, &persistence, passwords.as_mut(), chart_args)
                .await?
                .print()
        }
        Command::Add(add_args) => {
            let mut passwords = password_source(password);
            commands::add(&config, &persistence, passwords.as_mut(), add_args)
                .await?
                .print()
        }
        Command::Edit(edit_args) => {
            let mut passwords = password_source(password);
            commands::edit(&config, &persistence, passwords.as_mut(), edit_args)
                .await?
                .print()
        }
        Command::Delete(delete_args) => {
            let mut passwords = password_source(password);
            commands::delete(&config, &persistence, passwords.as_mut(), delete_args)
                .await?
                .print()
        }
        Command::Shell(shell_args) => {
            let mut passwords = password_source(password);
            let mut lines = LineEditor::new()?;
            commands::shell(
                &config,
                &persistence,
                passwords.as_mut(),
                shell_args,
                &mut lines,
                std::io::stdout(),
            )
            .await?
            .print()
        }
    };
    Ok(())
}

/// Uses `--password` when it was given, otherwise asks on the terminal without echo.
fn password_source(password: Option<&str>) -> Box<dyn PasswordSource> {
    match password {
        Some(password) => Box::new(FixedPassword::new(password)),
        None => Box::new(PasswordPrompt::new()),
    }
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only.
            EnvFilter::new(format!(
                "{}={},{}={}",
                env!("CARGO_CRATE_NAME"),
                level,
                env!("CARGO_BIN_NAME"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
