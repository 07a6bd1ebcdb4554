//! CLI argument parsing using clap derive macros.
//!
//! This module defines the command-line interface for the deft CLI.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// deft - View and edit database records described by YAML recipes
#[derive(Parser, Debug)]
#[command(name = "deft")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbose output (show debug information)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output JSON instead of tables
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Recipe directory (default: ./deft-config, ~/.deft/config, /etc/deft/config)
    #[arg(long, global = true, env = "DEFT_RECIPE")]
    pub recipe: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the records of a view
    #[command(alias = "s")]
    Show {
        /// View label (e.g., "tickets.open")
        label: String,

        /// Use the view's detail query and print one record per table
        #[arg(short, long)]
        detail: bool,

        /// Filter expression (e.g., "status = open AND NOT owner ~ bot")
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// Edit a record through a form
    #[command(alias = "e")]
    Edit {
        /// Form label
        label: String,

        /// Primary key of the record
        #[arg(long)]
        pk: String,

        /// Set values without opening the editor (key:value, repeatable)
        #[arg(long, num_args = 1.., action = clap::ArgAction::Append)]
        values: Vec<String>,
    },

    /// Create a record through a form
    #[command(alias = "c")]
    Create {
        /// Form label
        label: String,

        /// Set values without opening the editor (key:value, repeatable)
        #[arg(long, num_args = 1.., action = clap::ArgAction::Append)]
        values: Vec<String>,
    },

    /// List available views
    #[command(alias = "views")]
    ListViews,

    /// View or edit configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Open config in $EDITOR
    Edit,

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,

        /// Configuration value
        value: String,
    },

    /// Print config file path
    Path,
}

/// Supported shells for completions
#[derive(ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from(["deft", "--verbose", "list-views"]);
        assert!(cli.verbose);
        assert!(!cli.quiet);
        assert!(!cli.json);

        let cli = Cli::parse_from(["deft", "--quiet", "-j", "list-views"]);
        assert!(!cli.verbose);
        assert!(cli.quiet);
        assert!(cli.json);
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["deft", "-v", "-q", "list-views"]).is_err());
    }

    #[test]
    fn test_recipe_flag() {
        let cli = Cli::parse_from(["deft", "--recipe", "/srv/recipes", "list-views"]);
        assert_eq!(cli.recipe, Some(PathBuf::from("/srv/recipes")));
    }

    #[test]
    fn test_show_with_filter() {
        let cli = Cli::parse_from(["deft", "show", "tickets.open", "-f", "status = open", "--detail"]);
        if let Some(Commands::Show {
            label,
            detail,
            filter,
        }) = cli.command
        {
            assert_eq!(label, "tickets.open");
            assert!(detail);
            assert_eq!(filter, Some("status = open".to_string()));
        } else {
            panic!("Expected Show command");
        }
    }

    #[test]
    fn test_edit_requires_pk() {
        assert!(Cli::try_parse_from(["deft", "edit", "ticket"]).is_err());

        let cli = Cli::parse_from(["deft", "edit", "ticket", "--pk", "42"]);
        if let Some(Commands::Edit { label, pk, values }) = cli.command {
            assert_eq!(label, "ticket");
            assert_eq!(pk, "42");
            assert!(values.is_empty());
        } else {
            panic!("Expected Edit command");
        }
    }

    #[test]
    fn test_create_with_values() {
        let cli = Cli::parse_from([
            "deft",
            "create",
            "ticket",
            "--values",
            "subject:Jam",
            "meta.team:ops",
            "--values",
            "owner:ada",
        ]);
        if let Some(Commands::Create { label, values }) = cli.command {
            assert_eq!(label, "ticket");
            assert_eq!(values, vec!["subject:Jam", "meta.team:ops", "owner:ada"]);
        } else {
            panic!("Expected Create command");
        }
    }

    #[test]
    fn test_aliases() {
        let cli = Cli::parse_from(["deft", "views"]);
        assert!(matches!(cli.command, Some(Commands::ListViews)));

        let cli = Cli::parse_from(["deft", "s", "tickets"]);
        assert!(matches!(cli.command, Some(Commands::Show { .. })));

        let cli = Cli::parse_from(["deft", "e", "ticket", "--pk", "1"]);
        assert!(matches!(cli.command, Some(Commands::Edit { .. })));

        let cli = Cli::parse_from(["deft", "c", "ticket"]);
        assert!(matches!(cli.command, Some(Commands::Create { .. })));
    }

    #[test]
    fn test_config_subcommands() {
        let cli = Cli::parse_from(["deft", "config", "set", "output.color", "false"]);
        if let Some(Commands::Config {
            command: Some(ConfigCommands::Set { key, value }),
        }) = cli.command
        {
            assert_eq!(key, "output.color");
            assert_eq!(value, "false");
        } else {
            panic!("Expected Config Set command");
        }
    }

    #[test]
    fn test_completions() {
        let cli = Cli::parse_from(["deft", "completions", "zsh"]);
        if let Some(Commands::Completions { shell }) = cli.command {
            assert!(matches!(shell, Shell::Zsh));
        } else {
            panic!("Expected Completions command");
        }
    }
}
