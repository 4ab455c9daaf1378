//! Folder management CLI commands.

use clap::{Args, Subcommand};

use assethub_core::config::AppConfig;
use assethub_core::result::AppResult;
use assethub_core::types::NodeId;

use crate::output::{self, OutputFormat};

/// Arguments for folder commands
#[derive(Debug, Args)]
pub struct FolderArgs {
    /// Folder subcommand
    #[command(subcommand)]
    pub command: FolderCommand,
}

/// Folder subcommands
#[derive(Debug, Subcommand)]
pub enum FolderCommand {
    /// Create a new folder
    Create {
        /// Folder name
        #[arg(short, long)]
        name: String,
        /// Parent folder ID (omit for root)
        #[arg(short, long)]
        parent: Option<NodeId>,
    },
    /// Rename a folder
    Rename {
        /// Folder ID
        #[arg(long)]
        id: NodeId,
        /// New name
        #[arg(short, long)]
        name: String,
    },
    /// Expand or collapse a folder
    Toggle {
        /// Folder ID
        #[arg(long)]
        id: NodeId,
    },
}

/// Execute folder commands
pub fn execute(args: &FolderArgs, config: &AppConfig, format: OutputFormat) -> AppResult<()> {
    let mut manager = super::open_manager(config)?;

    match &args.command {
        FolderCommand::Create { name, parent } => {
            let parent = parent.clone().unwrap_or_else(NodeId::root);
            let commit = manager.create_folder_in(&parent, name)?;
            super::report_commit(&commit);
            match format {
                OutputFormat::Table => output::print_success(&format!(
                    "Folder '{}' created (id: {})",
                    name.trim(),
                    commit.value
                )),
                OutputFormat::Json => output::print_json(
                    &serde_json::json!({ "id": commit.value, "parent_id": parent }),
                    "{}",
                ),
            }
        }
        FolderCommand::Rename { id, name } => {
            let commit = manager.rename_folder(id, name)?;
            super::report_commit(&commit);
            output::print_success(&format!("Folder {id} renamed to '{}'", name.trim()));
        }
        FolderCommand::Toggle { id } => {
            let commit = manager.toggle_folder(id)?;
            super::report_commit(&commit);
            let state = if commit.value { "expanded" } else { "collapsed" };
            output::print_success(&format!("Folder {id} {state}"));
        }
    }

    Ok(())
}
