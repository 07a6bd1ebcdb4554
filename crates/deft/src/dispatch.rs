//! Command dispatch module for routing CLI commands to their handlers.
//!
//! Local commands (config, completions) run synchronously and never read a
//! recipe directory. Async commands either talk to a database through a
//! recipe or, for `config edit`, wait on the user's editor.

use crate::cli::{Cli, Commands, ConfigCommands, Shell};
use crate::commands::{self, CommandContext, CommandError, Result};

/// Trait for commands that only touch local configuration.
pub trait LocalCommand {
    fn execute(&self, ctx: &CommandContext) -> Result<()>;
}

/// Trait for commands that await I/O.
#[allow(async_fn_in_trait)]
pub trait AsyncCommand {
    async fn execute(&self, ctx: &CommandContext) -> Result<()>;
}

/// Commands that run synchronously without a recipe directory.
pub enum LocalDispatch<'a> {
    ConfigShow,
    ConfigSet { key: &'a str, value: &'a str },
    ConfigPath,
    Completions(&'a Shell),
    Help,
}

impl<'a> LocalDispatch<'a> {
    /// Returns None for commands handled by [`AsyncDispatch`].
    pub fn try_from_cli(cli: &'a Cli) -> Option<Self> {
        match &cli.command {
            Some(Commands::Config { command }) => match command {
                Some(ConfigCommands::Show) | None => Some(Self::ConfigShow),
                Some(ConfigCommands::Set { key, value }) => Some(Self::ConfigSet { key, value }),
                Some(ConfigCommands::Path) => Some(Self::ConfigPath),
                Some(ConfigCommands::Edit) => None,
            },
            Some(Commands::Completions { shell }) => Some(Self::Completions(shell)),
            None => Some(Self::Help),
            _ => None,
        }
    }
}

impl LocalCommand for LocalDispatch<'_> {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        match self {
            Self::ConfigShow => commands::config::execute_show(ctx),
            Self::ConfigSet { key, value } => {
                let opts = commands::config::ConfigSetOptions {
                    key: key.to_string(),
                    value: value.to_string(),
                };
                commands::config::execute_set(ctx, &opts)
            }
            Self::ConfigPath => commands::config::execute_path(ctx),
            Self::Completions(shell) => {
                commands::completions::execute(shell).map_err(CommandError::Io)
            }
            Self::Help => {
                if !ctx.quiet {
                    println!("deft - view and edit database records");
                    println!("Use --help for usage information");
                }
                Ok(())
            }
        }
    }
}

/// Commands that await a database or the user's editor.
pub enum AsyncDispatch<'a> {
    Show {
        label: &'a str,
        detail: bool,
        filter: &'a Option<String>,
    },
    Edit {
        label: &'a str,
        pk: &'a str,
        values: &'a [String],
    },
    Create {
        label: &'a str,
        values: &'a [String],
    },
    ListViews,
    ConfigEdit,
}

impl<'a> AsyncDispatch<'a> {
    pub fn from_cli(cli: &'a Cli) -> Option<Self> {
        match &cli.command {
            Some(Commands::Show {
                label,
                detail,
                filter,
            }) => Some(Self::Show {
                label,
                detail: *detail,
                filter,
            }),
            Some(Commands::Edit { label, pk, values }) => Some(Self::Edit { label, pk, values }),
            Some(Commands::Create { label, values }) => Some(Self::Create { label, values }),
            Some(Commands::ListViews) => Some(Self::ListViews),
            Some(Commands::Config {
                command: Some(ConfigCommands::Edit),
            }) => Some(Self::ConfigEdit),
            _ => None,
        }
    }
}

impl AsyncCommand for AsyncDispatch<'_> {
    async fn execute(&self, ctx: &CommandContext) -> Result<()> {
        match self {
            Self::Show {
                label,
                detail,
                filter,
            } => {
                let opts = commands::show::ShowOptions {
                    label: label.to_string(),
                    detail: *detail,
                    filter: (*filter).clone(),
                };
                commands::show::execute(ctx, &opts).await
            }
            Self::Edit { label, pk, values } => {
                let opts = commands::edit::EditOptions {
                    label: label.to_string(),
                    pk: pk.to_string(),
                    values: values.to_vec(),
                };
                commands::edit::execute(ctx, &opts).await
            }
            Self::Create { label, values } => {
                let opts = commands::create::CreateOptions {
                    label: label.to_string(),
                    values: values.to_vec(),
                };
                commands::create::execute(ctx, &opts).await
            }
            Self::ListViews => commands::views::execute(ctx),
            Self::ConfigEdit => commands::config::execute_edit(ctx).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_local_commands() {
        let cli = Cli::parse_from(["deft", "config", "path"]);
        assert!(matches!(
            LocalDispatch::try_from_cli(&cli),
            Some(LocalDispatch::ConfigPath)
        ));

        let cli = Cli::parse_from(["deft", "config"]);
        assert!(matches!(
            LocalDispatch::try_from_cli(&cli),
            Some(LocalDispatch::ConfigShow)
        ));

        let cli = Cli::parse_from(["deft", "config", "set", "output.color", "false"]);
        assert!(matches!(
            LocalDispatch::try_from_cli(&cli),
            Some(LocalDispatch::ConfigSet {
                key: "output.color",
                value: "false"
            })
        ));

        let cli = Cli::parse_from(["deft", "completions", "bash"]);
        assert!(matches!(
            LocalDispatch::try_from_cli(&cli),
            Some(LocalDispatch::Completions(Shell::Bash))
        ));

        let cli = Cli::parse_from(["deft"]);
        assert!(matches!(
            LocalDispatch::try_from_cli(&cli),
            Some(LocalDispatch::Help)
        ));

        let cli = Cli::parse_from(["deft", "show", "tickets"]);
        assert!(LocalDispatch::try_from_cli(&cli).is_none());
    }

    #[test]
    fn test_async_commands() {
        let cli = Cli::parse_from(["deft", "show", "tickets", "-f", "a = 1"]);
        match AsyncDispatch::from_cli(&cli) {
            Some(AsyncDispatch::Show {
                label,
                detail,
                filter,
            }) => {
                assert_eq!(label, "tickets");
                assert!(!detail);
                assert_eq!(filter.as_deref(), Some("a = 1"));
            }
            _ => panic!("Expected Show dispatch"),
        }

        let cli = Cli::parse_from(["deft", "edit", "ticket", "--pk", "7", "--values", "a:1"]);
        assert!(matches!(
            AsyncDispatch::from_cli(&cli),
            Some(AsyncDispatch::Edit { pk: "7", .. })
        ));

        let cli = Cli::parse_from(["deft", "config", "show"]);
        assert!(AsyncDispatch::from_cli(&cli).is_none());
    }

    #[test]
    fn test_every_config_command_has_one_route() {
        for args in [
            vec!["deft", "config"],
            vec!["deft", "config", "show"],
            vec!["deft", "config", "edit"],
            vec!["deft", "config", "set", "k", "v"],
            vec!["deft", "config", "path"],
        ] {
            let cli = Cli::parse_from(args.iter().copied());
            let local = LocalDispatch::try_from_cli(&cli).is_some();
            let deferred = AsyncDispatch::from_cli(&cli).is_some();
            assert!(local != deferred, "{args:?} routed local={local} async={deferred}");
        }

        let cli = Cli::parse_from(["deft", "config", "edit"]);
        assert!(matches!(
            AsyncDispatch::from_cli(&cli),
            Some(AsyncDispatch::ConfigEdit)
        ));
    }
}
