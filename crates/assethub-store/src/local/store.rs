//! Local directory persistence adapter.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use assethub_core::error::{AppError, ErrorKind};
use assethub_core::result::AppResult;
use assethub_core::traits::store::PersistenceAdapter;

/// Stores each key as a JSON file under a root directory.
///
/// Writes go to a temporary sibling file which is then renamed over the
/// target, so a crash mid-write never leaves a truncated blob behind.
#[derive(Debug, Clone)]
pub struct LocalStore {
    /// Directory holding one file per key.
    root: PathBuf,
}

impl LocalStore {
    /// Create a store rooted at the given path, creating the directory if needed.
    pub fn new(root_path: &str) -> AppResult<Self> {
        let root = PathBuf::from(root_path);
        fs::create_dir_all(&root).map_err(|e| {
            AppError::with_source(
                ErrorKind::Persistence,
                format!("Failed to create store root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root })
    }

    /// The directory this store writes to.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a key to the file that holds it.
    fn resolve(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", file_stem(key)))
    }
}

impl PersistenceAdapter for LocalStore {
    fn backend(&self) -> &str {
        "local"
    }

    fn get(&self, key: &str) -> AppResult<Option<String>> {
        let path = self.resolve(key);
        match fs::read_to_string(&path) {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Persistence,
                format!("Failed to read {}", path.display()),
                e,
            )),
        }
    }

    fn set(&self, key: &str, blob: &str) -> AppResult<()> {
        let path = self.resolve(key);
        let tmp = path.with_extension("json.tmp");

        let write = || -> std::io::Result<()> {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(blob.as_bytes())?;
            file.sync_all()?;
            fs::rename(&tmp, &path)
        };

        write().map_err(|e| {
            let _ = fs::remove_file(&tmp);
            AppError::with_source(
                ErrorKind::Persistence,
                format!("Failed to write {}", path.display()),
                e,
            )
        })?;

        debug!(path = %path.display(), bytes = blob.len(), "Wrote blob");
        Ok(())
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        let path = self.resolve(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Persistence,
                format!("Failed to remove {}", path.display()),
                e,
            )),
        }
    }

    fn health_check(&self) -> AppResult<bool> {
        Ok(self.root.exists() && self.root.is_dir())
    }
}

/// Map a key onto a file name: anything outside `[A-Za-z0-9_-]` becomes `_`.
fn file_stem(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
