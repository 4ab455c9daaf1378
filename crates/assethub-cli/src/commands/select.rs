//! Asset selection CLI command.

use clap::Args;

use assethub_core::config::AppConfig;
use assethub_core::result::AppResult;
use assethub_core::types::NodeId;

use crate::output::{self, OutputFormat};

/// Arguments for the select command
#[derive(Debug, Args)]
pub struct SelectArgs {
    /// Asset ID
    #[arg(long)]
    pub asset: NodeId,
}

/// Print the data reference of the chosen asset
pub fn execute(args: &SelectArgs, config: &AppConfig, format: OutputFormat) -> AppResult<()> {
    let manager = super::open_manager(config)?;
    manager.select_asset(&args.asset, |asset| match format {
        OutputFormat::Table => println!("{}", asset.data),
        OutputFormat::Json => output::print_json(asset, "{}"),
    })
}
