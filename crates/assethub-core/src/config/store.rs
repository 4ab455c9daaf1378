//! Persistence adapter configuration.

use serde::{Deserialize, Serialize};

/// Top-level store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Store provider type: `"memory"` or `"local"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Storage slot the tree blob is written under.
    #[serde(default = "default_key")]
    pub key: String,
    /// Older slots read, in order, when `key` holds nothing.
    #[serde(default = "default_legacy_keys")]
    pub legacy_keys: Vec<String>,
    /// Local directory store configuration.
    #[serde(default)]
    pub local: LocalStoreConfig,
    /// In-memory store configuration.
    #[serde(default)]
    pub memory: MemoryStoreConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            key: default_key(),
            legacy_keys: default_legacy_keys(),
            local: LocalStoreConfig::default(),
            memory: MemoryStoreConfig::default(),
        }
    }
}

/// Local directory store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalStoreConfig {
    /// Directory holding one file per key.
    #[serde(default = "default_root_path")]
    pub root_path: String,
}

impl Default for LocalStoreConfig {
    fn default() -> Self {
        Self {
            root_path: default_root_path(),
        }
    }
}

/// In-memory store configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryStoreConfig {
    /// Total bytes the store may hold across all keys (unbounded if unset).
    #[serde(default)]
    pub max_bytes: Option<u64>,
}

fn default_provider() -> String {
    "local".to_string()
}

fn default_key() -> String {
    "assethub:tree".to_string()
}

fn default_legacy_keys() -> Vec<String> {
    vec!["assetManagerTree".to_string(), "assetManager".to_string()]
}

fn default_root_path() -> String {
    "./data/store".to_string()
}
