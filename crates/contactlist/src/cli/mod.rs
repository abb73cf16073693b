//! Command-line interface for contactlist.
//!
//! This module provides the CLI structure for the `contacts` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AddCommand, CallCommand, ConfigCommand, DeleteCommand, ListCommand, OutputFormat,
    ShowCommand, StatusCommand,
};

/// contacts - Your contacts, sorted by name
///
/// List and search contacts, add new ones, delete with confirmation,
/// and start a call.
#[derive(Debug, Parser)]
#[command(name = "contacts")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List contacts, optionally filtered by name
    List(ListCommand),

    /// Add a contact
    Add(AddCommand),

    /// Show one contact
    Show(ShowCommand),

    /// Delete a contact
    Delete(DeleteCommand),

    /// Call a contact
    Call(CallCommand),

    /// Show storage status
    Status(StatusCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        crate::logging::Verbosity::from_flags(self.quiet, self.verbose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact::ContactId;
    use crate::logging::Verbosity;
    use clap::CommandFactory;

    fn status_cli(verbose: u8, quiet: bool) -> Cli {
        Cli {
            config: None,
            verbose,
            quiet,
            command: Command::Status(StatusCommand { json: false }),
        }
    }

    #[test]
    fn test_cli_name() {
        assert_eq!(Cli::command().get_name(), "contacts");
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity() {
        assert_eq!(status_cli(0, true).verbosity(), Verbosity::Quiet);
        assert_eq!(status_cli(0, false).verbosity(), Verbosity::Normal);
        assert_eq!(status_cli(1, false).verbosity(), Verbosity::Verbose);
        assert_eq!(status_cli(3, false).verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_parse_list_defaults() {
        let cli = Cli::try_parse_from(["contacts", "list"]).unwrap();
        match cli.command {
            Command::List(cmd) => {
                assert_eq!(cmd.search, "");
                assert_eq!(cmd.format, OutputFormat::Plain);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_list_search() {
        let cli = Cli::try_parse_from(["contacts", "list", "--search", "an", "-f", "json"]).unwrap();
        match cli.command {
            Command::List(cmd) => {
                assert_eq!(cmd.search, "an");
                assert_eq!(cmd.format, OutputFormat::Json);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_add() {
        let cli = Cli::try_parse_from([
            "contacts", "add", "--name", "Anna", "--second-name", "Petrova", "--number", "111",
        ])
        .unwrap();
        match cli.command {
            Command::Add(cmd) => {
                assert_eq!(cmd.name, "Anna");
                assert_eq!(cmd.second_name, "Petrova");
                assert_eq!(cmd.number, "111");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_add_requires_number() {
        assert!(Cli::try_parse_from(["contacts", "add", "--name", "Anna"]).is_err());
    }

    #[test]
    fn test_parse_delete() {
        let cli = Cli::try_parse_from(["contacts", "delete", "4", "--yes"]).unwrap();
        match cli.command {
            Command::Delete(cmd) => {
                assert_eq!(cmd.id, ContactId::new(4));
                assert!(cmd.yes);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_delete_rejects_bad_id() {
        assert!(Cli::try_parse_from(["contacts", "delete", "bob"]).is_err());
    }

    #[test]
    fn test_parse_call_dry_run() {
        let cli = Cli::try_parse_from(["contacts", "call", "2", "--dry-run"]).unwrap();
        assert!(matches!(cli.command, Command::Call(CallCommand { dry_run: true, .. })));
    }

    #[test]
    fn test_parse_with_config() {
        let cli = Cli::try_parse_from(["contacts", "-c", "/custom/config.toml", "status"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_parse_with_verbose() {
        let cli = Cli::try_parse_from(["contacts", "-v", "status"]).unwrap();
        assert_eq!(cli.verbose, 1);
    }
}
