//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::contact::{ContactDraft, ContactId};

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Only show contacts whose name contains this text
    #[arg(short, long, default_value = "")]
    pub search: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Add command arguments.
#[derive(Debug, Args)]
pub struct AddCommand {
    /// Contact name (used for sorting and grouping)
    #[arg(short, long)]
    pub name: String,

    /// Second name
    #[arg(short, long, default_value = "")]
    pub second_name: String,

    /// Phone number, stored as given
    #[arg(short = 'p', long)]
    pub number: String,
}

impl From<AddCommand> for ContactDraft {
    fn from(cmd: AddCommand) -> Self {
        Self {
            name: cmd.name,
            second_name: cmd.second_name,
            number: cmd.number,
        }
    }
}

/// Show command arguments.
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Contact id
    pub id: ContactId,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Delete command arguments.
#[derive(Debug, Args)]
pub struct DeleteCommand {
    /// Contact id
    pub id: ContactId,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Call command arguments.
#[derive(Debug, Args)]
pub struct CallCommand {
    /// Contact id
    pub id: ContactId,

    /// Print the call address instead of handing it to the system
    #[arg(long)]
    pub dry_run: bool,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Grouped by name
    #[default]
    Plain,
    /// One row per contact
    Table,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Plain);
    }

    #[test]
    fn test_add_command_into_draft() {
        let cmd = AddCommand {
            name: "Anna".to_string(),
            second_name: "Petrova".to_string(),
            number: "111".to_string(),
        };
        let draft = ContactDraft::from(cmd);
        assert_eq!(draft, ContactDraft::new("Anna", "Petrova", "111"));
    }

    #[test]
    fn test_list_command_debug() {
        let cmd = ListCommand {
            search: "an".to_string(),
            format: OutputFormat::Table,
        };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("search"));
        assert!(debug_str.contains("Table"));
    }

    #[test]
    fn test_config_command_debug() {
        let cmd = ConfigCommand::Show { json: false };
        assert!(format!("{cmd:?}").contains("Show"));
    }
}
