//! CLI command definitions and dispatch.

pub mod config;
pub mod folder;
pub mod nav;
pub mod select;
pub mod tree;
pub mod upload;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use assethub_core::config::AppConfig;
use assethub_core::result::AppResult;
use assethub_service::{AssetManager, Commit};
use assethub_store::StoreManager;

use crate::output::{self, OutputFormat};

/// AssetHub: organize images into folders for insertion into documents
#[derive(Debug, Parser)]
#[command(name = "assethub", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/assethub.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Work on a named workspace tree instead of the configured key
    #[arg(short, long, global = true)]
    pub workspace: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the whole folder tree
    Tree(tree::TreeArgs),
    /// List the contents of a folder
    Ls(tree::LsArgs),
    /// Folder management
    Folder(folder::FolderArgs),
    /// Upload image files into a folder
    Upload(upload::UploadArgs),
    /// Pick an asset and print its data reference
    Select(select::SelectArgs),
    /// Resolve a folder path from the root
    Nav(nav::NavArgs),
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        match &self.command {
            Commands::Tree(args) => tree::execute_tree(args, config, self.format),
            Commands::Ls(args) => tree::execute_ls(args, config, self.format),
            Commands::Folder(args) => folder::execute(args, config, self.format),
            Commands::Upload(args) => upload::execute(args, config, self.format).await,
            Commands::Select(args) => select::execute(args, config, self.format),
            Commands::Nav(args) => nav::execute(args, config, self.format),
            Commands::Config(args) => config::execute(args, config, self.format),
        }
    }
}

/// Helper: open the configured store and load the tree from it
pub fn open_manager(config: &AppConfig) -> AppResult<AssetManager> {
    let store = StoreManager::new(&config.store)?;
    let manager = AssetManager::open(Arc::new(store), config);
    if let assethub_entity::LoadStatus::Corrupt(reason) = manager.load_status() {
        output::print_warning(&format!(
            "Stored tree could not be read ({reason}); starting from an empty tree"
        ));
    }
    Ok(manager)
}

/// Helper: surface a failed write without failing the command
pub fn report_commit<T>(commit: &Commit<T>) {
    if let Some(e) = &commit.persist_error {
        output::print_warning(&format!("Change applied but not saved: {e}"));
    }
}
