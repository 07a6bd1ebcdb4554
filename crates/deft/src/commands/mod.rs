//! Command implementations for the deft CLI.
//!
//! This module contains the actual command handlers that are invoked by the CLI.

pub mod completions;
pub mod config;
pub mod create;
pub mod edit;
pub mod show;
pub mod views;

mod draft;
#[cfg(test)]
mod tests_support;

use std::env;
use std::path::PathBuf;

use deft_core::recipe::RecipeMap;

use crate::cli::Cli;
use config::Config;

/// Error type for command execution.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Filter parsing error.
    #[error("filter expression error: {0}")]
    Filter(#[from] deft_core::filter::FilterError),

    /// Recipe discovery or spec error.
    #[error("{0}")]
    Recipe(#[from] deft_core::recipe::RecipeError),

    /// Database error.
    #[error("database error: {0}")]
    DataSource(#[from] deft_core::datasource::DataSourceError),

    /// Form or draft error.
    #[error("{0}")]
    Form(#[from] deft_core::form::FormError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for command execution.
pub type Result<T> = std::result::Result<T, CommandError>;

/// Context for command execution, containing common dependencies.
pub struct CommandContext {
    /// Whether to output JSON.
    pub json_output: bool,
    /// Whether to use colors.
    pub use_colors: bool,
    /// Whether to be quiet (errors only).
    pub quiet: bool,
    /// Whether to be verbose.
    pub verbose: bool,
    /// Recipe directory given on the command line, the environment or the
    /// config file.
    pub recipe: Option<PathBuf>,
    /// Editor command from the config file.
    pub editor: Option<String>,
}

impl CommandContext {
    /// Creates a new command context from CLI arguments and the loaded config.
    pub fn new(cli: &Cli, config: &Config) -> Self {
        let color_allowed = env::var_os("NO_COLOR").is_none() && config.output.color != Some(false);
        Self {
            json_output: cli.json,
            use_colors: !cli.no_color && color_allowed,
            quiet: cli.quiet,
            verbose: cli.verbose,
            recipe: cli.recipe.clone().or_else(|| config.recipe.clone()),
            editor: config.editor.clone(),
        }
    }

    /// Discovers and indexes the recipe directory.
    pub fn recipes(&self) -> Result<RecipeMap> {
        Ok(RecipeMap::discover(self.recipe.as_deref())?)
    }
}
