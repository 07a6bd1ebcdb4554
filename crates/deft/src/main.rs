use clap::Parser;
use std::process::ExitCode;
use tracing::warn;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod dispatch;
mod output;

use cli::{Cli, Commands};
use commands::config::{load_config, Config};
use commands::{CommandContext, CommandError};
use deft_core::filter::FilterError;
use deft_core::form::FormError;
use dispatch::{AsyncCommand, AsyncDispatch, LocalCommand, LocalDispatch};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                eprintln!("{:#}", error_json(&e));
            } else {
                eprintln!("Error: {e}");
                if let (CommandError::Filter(err), Some(filter)) = (&e, filter_arg(&cli)) {
                    eprintln!("{}", filter_pointer(filter, err));
                }
            }
            error_exit_code(&e)
        }
    }
}

/// Log level when `RUST_LOG` is unset.
fn default_level(cli: &Cli) -> &'static str {
    if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    }
}

/// Logs go to stderr so stdout stays clean for tables and JSON.
fn init_tracing(cli: &Cli) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level(cli)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(!cli.no_color)
        .init();
}

async fn run(cli: &Cli) -> commands::Result<()> {
    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            warn!("ignoring unreadable config: {e}");
            Config::default()
        }
    };
    let ctx = CommandContext::new(cli, &config);

    if let Some(dispatch) = AsyncDispatch::from_cli(cli) {
        return dispatch.execute(&ctx).await;
    }
    if let Some(dispatch) = LocalDispatch::try_from_cli(cli) {
        return dispatch.execute(&ctx);
    }
    Ok(())
}

/// The filter expression given on the command line, if any.
fn filter_arg(cli: &Cli) -> Option<&str> {
    match &cli.command {
        Some(Commands::Show {
            filter: Some(filter),
            ..
        }) => Some(filter),
        _ => None,
    }
}

/// Echoes a filter expression with a caret under the offending character.
fn filter_pointer(filter: &str, err: &FilterError) -> String {
    let column = filter
        .get(..err.position())
        .map_or(0, |head| head.chars().count());
    format!("  {filter}\n  {}^", " ".repeat(column))
}

/// Error object for `--json` output. Filter errors carry their byte offset.
fn error_json(e: &CommandError) -> serde_json::Value {
    let mut error = serde_json::json!({
        "code": error_code(e),
        "message": e.to_string(),
    });
    if let CommandError::Filter(err) = e {
        error["position"] = err.position().into();
    }
    serde_json::json!({ "error": error })
}

/// Returns the error code string for JSON output.
fn error_code(e: &CommandError) -> &'static str {
    match e {
        CommandError::Filter(_) => "FILTER_ERROR",
        CommandError::Recipe(_) => "RECIPE_ERROR",
        CommandError::DataSource(_) => "DATABASE_ERROR",
        CommandError::Form(FormError::RecordNotFound { .. }) => "NOT_FOUND",
        CommandError::Form(_) => "FORM_ERROR",
        CommandError::Config(_) => "CONFIG_ERROR",
        CommandError::Io(_) => "IO_ERROR",
        CommandError::Json(_) => "JSON_ERROR",
    }
}

/// Returns the exit code for an error.
fn error_exit_code(e: &CommandError) -> ExitCode {
    match e {
        CommandError::Filter(_) => ExitCode::from(1),
        CommandError::DataSource(_) => ExitCode::from(2),
        CommandError::Io(_) => ExitCode::from(3),
        CommandError::Form(FormError::RecordNotFound { .. }) => ExitCode::from(4),
        CommandError::Recipe(_) => ExitCode::from(5),
        CommandError::Config(_) => ExitCode::from(5),
        CommandError::Form(_) => ExitCode::from(6),
        CommandError::Json(_) => ExitCode::from(1),
    }
}
