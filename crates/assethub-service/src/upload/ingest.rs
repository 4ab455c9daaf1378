//! Batch ingestion of uploaded files.
//!
//! A batch is all-or-nothing: every file is validated up front, then all
//! files are encoded concurrently and the results are only returned once
//! every encode has finished. Any failure, or cancellation of the batch,
//! discards the finished encodes and yields an error.

use std::sync::Arc;

use futures::future::try_join_all;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use assethub_core::config::UploadConfig;
use assethub_core::error::AppError;
use assethub_core::result::AppResult;

use super::encoder::{AssetEncoder, DEFAULT_MIME, DataUriEncoder, mime_from_name};
use super::source::UploadFile;
use crate::folder::ops::NewAsset;

/// Validates and encodes upload batches.
#[derive(Debug, Clone)]
pub struct Ingestor {
    config: UploadConfig,
    encoder: Arc<dyn AssetEncoder>,
}

impl Ingestor {
    /// Creates an ingestor using the data URI encoder.
    pub fn new(config: UploadConfig) -> Self {
        Self::with_encoder(config, Arc::new(DataUriEncoder))
    }

    /// Creates an ingestor with a custom encoder.
    pub fn with_encoder(config: UploadConfig, encoder: Arc<dyn AssetEncoder>) -> Self {
        Self { config, encoder }
    }

    /// The limits this ingestor enforces.
    pub fn config(&self) -> &UploadConfig {
        &self.config
    }

    /// Checks a single file against the configured limits.
    pub fn validate(&self, file: &UploadFile) -> AppResult<()> {
        if file.name.trim().is_empty() {
            return Err(AppError::validation("Upload file name cannot be empty"));
        }

        if file.size() > self.config.max_file_size_bytes {
            return Err(AppError::upload(format!(
                "'{}' is {} bytes, exceeding the limit of {} bytes",
                file.name,
                file.size(),
                self.config.max_file_size_bytes
            )));
        }

        let prefix = self.config.allowed_mime_prefix.as_str();
        if !prefix.is_empty() {
            let mime = mime_from_name(&file.name).unwrap_or(DEFAULT_MIME);
            if !mime.starts_with(prefix) {
                return Err(AppError::upload(format!(
                    "'{}' has type {mime}, expected {prefix}*",
                    file.name
                )));
            }
        }

        Ok(())
    }

    /// Encodes a whole batch, preserving input order.
    #[instrument(skip(self, files, cancel), fields(files = files.len()))]
    pub async fn ingest(
        &self,
        files: Vec<UploadFile>,
        cancel: CancellationToken,
    ) -> AppResult<Vec<NewAsset>> {
        if files.is_empty() {
            return Err(AppError::validation("Upload batch is empty"));
        }
        for file in &files {
            self.validate(file)?;
        }
        if cancel.is_cancelled() {
            return Err(AppError::cancelled("Upload cancelled before start"));
        }

        let sem = Arc::new(Semaphore::new(self.config.max_concurrent_reads.max(1)));
        let tasks = files.iter().map(|file| {
            let s = sem.clone();
            let encoder = Arc::clone(&self.encoder);
            async move {
                let _permit = s
                    .acquire()
                    .await
                    .map_err(|_| AppError::internal("Upload semaphore closed"))?;
                let data = encoder.encode(file).await?;
                debug!(name = %file.name, "Encoded upload file");
                Ok::<_, AppError>(NewAsset::new(file.name.trim(), data))
            }
        });

        let assets = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                warn!("Upload cancelled, discarding pending reads");
                return Err(AppError::cancelled("Upload cancelled"));
            }
            result = try_join_all(tasks) => result,
        };

        match assets {
            Ok(assets) => {
                info!(count = assets.len(), "Upload batch encoded");
                Ok(assets)
            }
            Err(e) => {
                warn!(error = %e, "Upload batch failed, nothing will be added");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assethub_core::error::ErrorKind;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Debug)]
    struct FailOn(&'static str);

    #[async_trait]
    impl AssetEncoder for FailOn {
        async fn encode(&self, file: &UploadFile) -> AppResult<String> {
            if file.name == self.0 {
                return Err(AppError::upload(format!("cannot read {}", file.name)));
            }
            Ok(format!("ref:{}", file.name))
        }
    }

    #[derive(Debug, Default)]
    struct Tracking {
        active: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl AssetEncoder for Tracking {
        async fn encode(&self, file: &UploadFile) -> AppResult<String> {
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            self.active.fetch_sub(1, Ordering::SeqCst);
            Ok(format!("ref:{}", file.name))
        }
    }

    #[derive(Debug)]
    struct Never;

    #[async_trait]
    impl AssetEncoder for Never {
        async fn encode(&self, _file: &UploadFile) -> AppResult<String> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(String::new())
        }
    }

    fn files(names: &[&str]) -> Vec<UploadFile> {
        names
            .iter()
            .map(|n| UploadFile::new(*n, &b"data"[..]))
            .collect()
    }

    #[tokio::test]
    async fn test_ingest_preserves_order() {
        let ingestor = Ingestor::new(UploadConfig::default());
        let assets = ingestor
            .ingest(files(&["a.png", "b.gif"]), CancellationToken::new())
            .await
            .unwrap();
        let names: Vec<_> = assets.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["a.png", "b.gif"]);
        assert!(assets[1].data.starts_with("data:image/gif;base64,"));
    }

    #[tokio::test]
    async fn test_one_failure_fails_batch() {
        let ingestor =
            Ingestor::with_encoder(UploadConfig::default(), Arc::new(FailOn("b.png")));
        let err = ingestor
            .ingest(files(&["a.png", "b.png", "c.png"]), CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Upload);
    }

    #[tokio::test]
    async fn test_validation_rejects_before_encoding() {
        let ingestor = Ingestor::new(UploadConfig::default());
        let err = ingestor
            .ingest(files(&["a.png", "notes.txt"]), CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Upload);

        let err = ingestor
            .ingest(Vec::new(), CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[test]
    fn test_size_limit() {
        let config = UploadConfig {
            max_file_size_bytes: 3,
            ..Default::default()
        };
        let ingestor = Ingestor::new(config);
        assert!(ingestor.validate(&UploadFile::new("a.png", &b"abc"[..])).is_ok());
        let err = ingestor
            .validate(&UploadFile::new("a.png", &b"abcd"[..]))
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Upload);
    }

    #[test]
    fn test_empty_prefix_accepts_anything() {
        let config = UploadConfig {
            allowed_mime_prefix: String::new(),
            ..Default::default()
        };
        let ingestor = Ingestor::new(config);
        assert!(ingestor.validate(&UploadFile::new("README", &b"x"[..])).is_ok());
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        let config = UploadConfig {
            max_concurrent_reads: 2,
            ..Default::default()
        };
        let encoder = Arc::new(Tracking::default());
        let ingestor = Ingestor::with_encoder(config, encoder.clone());
        let assets = ingestor
            .ingest(
                files(&["1.png", "2.png", "3.png", "4.png", "5.png", "6.png"]),
                CancellationToken::new(),
            )
            .await
            .unwrap();
        assert_eq!(assets.len(), 6);
        assert!(encoder.peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn test_cancel_before_start() {
        let ingestor = Ingestor::new(UploadConfig::default());
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = ingestor.ingest(files(&["a.png"]), cancel).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Cancelled);
    }

    #[tokio::test]
    async fn test_cancel_discards_pending_reads() {
        let ingestor = Ingestor::with_encoder(UploadConfig::default(), Arc::new(Never));
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let err = ingestor
            .ingest(files(&["a.png", "b.png"]), cancel)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Cancelled);
    }
}
