//! Configuration management CLI commands.

use clap::{Args, Subcommand};

use assethub_core::config::AppConfig;
use assethub_core::error::AppError;
use assethub_core::result::AppResult;
use assethub_core::traits::store::PersistenceAdapter;
use assethub_store::StoreManager;

use crate::output::{self, OutputFormat};

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,
    /// Check that the configured store is usable
    Check,
}

/// Execute config commands
pub fn execute(args: &ConfigArgs, config: &AppConfig, format: OutputFormat) -> AppResult<()> {
    match &args.command {
        ConfigCommand::Show => output::print_item(config, format),
        ConfigCommand::Check => {
            let store = StoreManager::new(&config.store)?;
            if !store.health_check()? {
                return Err(AppError::persistence(format!(
                    "Store backend '{}' is not usable",
                    store.backend()
                )));
            }
            output::print_success(&format!("Store backend '{}' is ready", store.backend()));
            output::print_kv("Key", &config.store.key);
            output::print_kv(
                "Duplicate folder names",
                &format!("{:?}", config.tree.duplicate_folder_names),
            );
            output::print_kv("Legacy keys", &config.store.legacy_keys.join(", "));
            output::print_kv("Selection", &format!("{:?}", config.tree.selection));
            output::print_kv("Max folder depth", &config.tree.max_depth.to_string());
            output::print_kv(
                "Max upload size",
                &format!("{} bytes", config.upload.max_file_size_bytes),
            );
        }
    }

    Ok(())
}
