//! Upload ingestion configuration.

use serde::{Deserialize, Serialize};

/// Limits applied to every file in an upload batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Maximum size of a single file in bytes (default 10 MB).
    #[serde(default = "default_max_file_size")]
    pub max_file_size_bytes: u64,
    /// Maximum number of files read or encoded at once.
    #[serde(default = "default_max_concurrent_reads")]
    pub max_concurrent_reads: usize,
    /// Required MIME prefix; empty accepts every type.
    #[serde(default = "default_allowed_mime_prefix")]
    pub allowed_mime_prefix: String,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size_bytes: default_max_file_size(),
            max_concurrent_reads: default_max_concurrent_reads(),
            allowed_mime_prefix: default_allowed_mime_prefix(),
        }
    }
}

fn default_max_file_size() -> u64 {
    10_485_760 // 10 MB
}

fn default_max_concurrent_reads() -> usize {
    8
}

fn default_allowed_mime_prefix() -> String {
    "image/".to_string()
}
