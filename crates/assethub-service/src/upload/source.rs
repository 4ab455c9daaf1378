//! Upload sources.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use futures::future::try_join_all;
use tokio::sync::Semaphore;
use tracing::debug;

use assethub_core::error::{AppError, ErrorKind};
use assethub_core::result::AppResult;

/// A single file handed to the manager by an upload source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    /// Original file name, used as the asset name.
    pub name: String,
    /// Raw file content.
    pub bytes: Bytes,
}

impl UploadFile {
    /// Creates an upload file from a name and its content.
    pub fn new(name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Size of the content in bytes.
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Reads upload files from the local filesystem.
#[derive(Debug, Clone)]
pub struct PathSource {
    paths: Vec<PathBuf>,
    max_concurrent_reads: usize,
}

impl PathSource {
    /// Creates a source over the given paths.
    pub fn new(paths: impl IntoIterator<Item = impl Into<PathBuf>>, max_concurrent_reads: usize) -> Self {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
            max_concurrent_reads: max_concurrent_reads.max(1),
        }
    }

    /// Reads every file concurrently. Fails as a whole if any read fails.
    pub async fn read_all(&self) -> AppResult<Vec<UploadFile>> {
        let sem = Arc::new(Semaphore::new(self.max_concurrent_reads));

        let tasks = self.paths.iter().map(|path| {
            let s = sem.clone();
            async move {
                let _permit = s
                    .acquire()
                    .await
                    .map_err(|_| AppError::internal("Read semaphore closed"))?;
                read_one(path).await
            }
        });

        try_join_all(tasks).await
    }
}

async fn read_one(path: &Path) -> AppResult<UploadFile> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| AppError::upload(format!("Invalid file name: {}", path.display())))?
        .to_string();

    let bytes = tokio::fs::read(path).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Upload,
            format!("Failed to read {}", path.display()),
            e,
        )
    })?;

    debug!(path = %path.display(), bytes = bytes.len(), "Read upload file");
    Ok(UploadFile::new(name, bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_all_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.png");
        let b = dir.path().join("b.png");
        tokio::fs::write(&a, b"aaa").await.unwrap();
        tokio::fs::write(&b, b"bb").await.unwrap();

        let files = PathSource::new([&b, &a], 2).read_all().await.unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].name, "b.png");
        assert_eq!(files[0].size(), 2);
        assert_eq!(files[1].name, "a.png");
        assert_eq!(files[1].bytes, Bytes::from_static(b"aaa"));
    }

    #[tokio::test]
    async fn test_missing_file_fails_batch() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.png");
        tokio::fs::write(&a, b"aaa").await.unwrap();

        let err = PathSource::new([a, dir.path().join("missing.png")], 4)
            .read_all()
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Upload);
    }
}
