//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section, and every section falls back to defaults when absent.

pub mod logging;
pub mod store;
pub mod tree;
pub mod upload;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use self::logging::LoggingConfig;
pub use self::store::{LocalStoreConfig, MemoryStoreConfig, StoreConfig};
pub use self::tree::{DuplicateNamePolicy, SelectionMode, TreeConfig};
pub use self::upload::UploadConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration file and `ASSETHUB__*` environment variables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Persistence adapter settings.
    #[serde(default)]
    pub store: StoreConfig,
    /// Tree policy and selection settings.
    #[serde(default)]
    pub tree: TreeConfig,
    /// Upload ingestion settings.
    #[serde(default)]
    pub upload: UploadConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    ///
    /// The file is optional; environment variables prefixed with
    /// `ASSETHUB` (nested with `__`) override values from the file.
    pub fn load(path: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("ASSETHUB")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        debug!(
            path,
            provider = %config.store.provider,
            key = %config.store.key,
            max_depth = config.tree.max_depth,
            "Configuration loaded"
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = AppConfig::load("does/not/exist.toml").expect("defaults");
        assert_eq!(config.store.provider, "local");
        assert_eq!(config.store.key, "assethub:tree");
        assert_eq!(config.tree.duplicate_folder_names, DuplicateNamePolicy::Allow);
        assert_eq!(config.tree.selection, SelectionMode::Id);
        assert_eq!(config.tree.max_depth, 32);
        assert_eq!(config.store.legacy_keys, vec!["assetManagerTree", "assetManager"]);
        assert_eq!(config.upload.max_concurrent_reads, 8);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("assethub.toml");
        std::fs::write(
            &path,
            r#"
[store]
provider = "memory"
key = "editor:assets"
legacy_keys = ["oldTree"]

[store.memory]
max_bytes = 1024

[tree]
duplicate_folder_names = "reject"
selection = "path"
max_depth = 10

[upload]
allowed_mime_prefix = ""
"#,
        )
        .expect("write");

        let config = AppConfig::load(path.to_str().expect("utf8 path")).expect("load");
        assert_eq!(config.store.provider, "memory");
        assert_eq!(config.store.key, "editor:assets");
        assert_eq!(config.store.memory.max_bytes, Some(1024));
        assert_eq!(config.tree.duplicate_folder_names, DuplicateNamePolicy::Reject);
        assert_eq!(config.tree.selection, SelectionMode::Path);
        assert_eq!(config.tree.max_depth, 10);
        assert_eq!(config.store.legacy_keys, vec!["oldTree"]);
        assert_eq!(config.upload.allowed_mime_prefix, "");
        assert_eq!(config.upload.max_file_size_bytes, 10_485_760);
    }
}
