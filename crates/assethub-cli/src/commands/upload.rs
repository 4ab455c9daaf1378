//! Upload CLI command.

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use tabled::Tabled;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use assethub_core::config::AppConfig;
use assethub_core::result::AppResult;
use assethub_core::types::NodeId;
use assethub_service::{Ingestor, PathSource};

use crate::output::{self, OutputFormat};

/// Arguments for the upload command
#[derive(Debug, Args)]
pub struct UploadArgs {
    /// Target folder ID
    #[arg(long, default_value = "root")]
    pub folder: NodeId,
    /// Files to upload
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

/// Uploaded asset display row
#[derive(Debug, Serialize, Tabled)]
struct UploadRow {
    /// Asset ID
    id: String,
    /// Name
    name: String,
}

/// Execute the upload command
pub async fn execute(args: &UploadArgs, config: &AppConfig, format: OutputFormat) -> AppResult<()> {
    let mut manager = super::open_manager(config)?;

    let files = PathSource::new(&args.files, config.upload.max_concurrent_reads)
        .read_all()
        .await?;
    let ingestor = Ingestor::new(config.upload.clone());

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling upload");
            trigger.cancel();
        }
    });

    let result = manager.upload(&ingestor, &args.folder, files, cancel).await;
    watcher.abort();
    let commit = result?;
    super::report_commit(&commit);

    let rows: Vec<UploadRow> = commit
        .value
        .iter()
        .filter_map(|id| manager.tree().find_asset(id))
        .map(|asset| UploadRow {
            id: asset.id.to_string(),
            name: asset.name.clone(),
        })
        .collect();
    output::print_list(&rows, format);
    Ok(())
}
