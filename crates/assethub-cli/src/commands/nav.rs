//! Path navigation CLI command.

use clap::Args;

use assethub_core::config::AppConfig;
use assethub_core::result::AppResult;
use assethub_core::types::NodeId;

use crate::output::{self, OutputFormat};

/// Arguments for the nav command
#[derive(Debug, Args)]
pub struct NavArgs {
    /// Folder IDs from the root, outermost first
    pub path: Vec<NodeId>,
}

/// Resolve a path and list the folder it lands on
pub fn execute(args: &NavArgs, config: &AppConfig, format: OutputFormat) -> AppResult<()> {
    let mut manager = super::open_manager(config)?;
    let outcome = manager.navigate(&args.path)?;

    if outcome.truncated {
        output::print_warning(&format!(
            "Path resolved only {} of {} segments",
            outcome.resolved.len(),
            args.path.len()
        ));
    }

    let crumbs: Vec<&str> = manager
        .breadcrumbs()
        .iter()
        .map(|f| f.name.as_str())
        .collect();
    if format == OutputFormat::Table {
        output::print_kv("Location", &crumbs.join(" / "));
    }
    super::tree::print_folder(manager.current_folder(), format);
    Ok(())
}
