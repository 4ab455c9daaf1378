//! Store manager that dispatches to the configured persistence adapter.

use std::sync::Arc;

use tracing::info;

use assethub_core::config::store::StoreConfig;
use assethub_core::error::AppError;
use assethub_core::result::AppResult;
use assethub_core::traits::store::PersistenceAdapter;

/// Store manager that wraps the configured persistence adapter.
///
/// The adapter is selected at construction time based on configuration.
#[derive(Debug, Clone)]
pub struct StoreManager {
    /// The inner adapter.
    inner: Arc<dyn PersistenceAdapter>,
}

impl StoreManager {
    /// Create a new store manager from configuration.
    pub fn new(config: &StoreConfig) -> AppResult<Self> {
        let inner: Arc<dyn PersistenceAdapter> = match config.provider.as_str() {
            #[cfg(feature = "local")]
            "local" => {
                info!(root = %config.local.root_path, "Initializing local store");
                Arc::new(crate::local::LocalStore::new(&config.local.root_path)?)
            }
            #[cfg(feature = "memory")]
            "memory" => {
                info!("Initializing in-memory store");
                Arc::new(crate::memory::MemoryStore::from_config(&config.memory))
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown store provider: '{other}'. Supported: memory, local"
                )));
            }
        };

        Ok(Self { inner })
    }

    /// Create a store manager from an existing adapter (for testing).
    pub fn from_adapter(adapter: Arc<dyn PersistenceAdapter>) -> Self {
        Self { inner: adapter }
    }

    /// Shared handle to the inner adapter.
    pub fn adapter(&self) -> Arc<dyn PersistenceAdapter> {
        Arc::clone(&self.inner)
    }
}

impl PersistenceAdapter for StoreManager {
    fn backend(&self) -> &str {
        self.inner.backend()
    }

    fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, blob: &str) -> AppResult<()> {
        self.inner.set(key, blob)
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        self.inner.remove(key)
    }

    fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assethub_core::error::ErrorKind;

    #[test]
    fn test_memory_provider() {
        let config = StoreConfig {
            provider: "memory".to_string(),
            ..Default::default()
        };
        let manager = StoreManager::new(&config).unwrap();
        assert_eq!(manager.backend(), "memory");
        manager.set("k", "v").unwrap();
        assert_eq!(manager.adapter().get("k").unwrap(), Some("v".to_string()));
    }

    #[test]
    fn test_local_provider() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = StoreConfig::default();
        config.local.root_path = dir.path().join("store").to_string_lossy().into_owned();
        let manager = StoreManager::new(&config).unwrap();
        assert_eq!(manager.backend(), "local");
        assert!(manager.health_check().unwrap());
    }

    #[test]
    fn test_default_key_matches_builder() {
        assert_eq!(StoreConfig::default().key, crate::keys::tree());
    }

    #[test]
    fn test_unknown_provider() {
        let config = StoreConfig {
            provider: "redis".to_string(),
            ..Default::default()
        };
        let err = StoreManager::new(&config).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }
}
