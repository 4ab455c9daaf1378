//! Shared fixtures for manager integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;

use assethub_core::config::AppConfig;
use assethub_core::error::AppError;
use assethub_core::result::AppResult;
use assethub_service::{AssetEncoder, AssetManager, UploadFile};
use assethub_store::memory::MemoryStore;

/// A manager over an in-memory store, plus a handle to inspect the store.
pub struct TestApp {
    pub manager: AssetManager,
    pub store: MemoryStore,
    pub config: AppConfig,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_store(MemoryStore::new(), AppConfig::default())
    }

    pub fn with_config(config: AppConfig) -> Self {
        Self::with_store(MemoryStore::new(), config)
    }

    pub fn with_store(store: MemoryStore, config: AppConfig) -> Self {
        let manager = AssetManager::open(Arc::new(store.clone()), &config);
        Self {
            manager,
            store,
            config,
        }
    }

    /// Open a second manager over the same store, as after a restart.
    pub fn reopen(&self) -> AssetManager {
        AssetManager::open(Arc::new(self.store.clone()), &self.config)
    }

    /// The blob currently persisted for the tree.
    pub fn blob(&self) -> Option<String> {
        use assethub_core::traits::store::PersistenceAdapter;
        self.store
            .get(&self.config.store.key)
            .expect("memory store read")
    }
}

/// Encoder that refuses one file by name and echoes the rest.
#[derive(Debug)]
pub struct FailOn(pub &'static str);

#[async_trait]
impl AssetEncoder for FailOn {
    async fn encode(&self, file: &UploadFile) -> AppResult<String> {
        if file.name == self.0 {
            return Err(AppError::upload(format!("cannot read {}", file.name)));
        }
        Ok(format!("ref:{}", file.name))
    }
}

pub fn png(name: &str) -> UploadFile {
    UploadFile::new(name, b"\x89PNG".to_vec())
}
