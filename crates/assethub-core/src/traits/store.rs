//! Persistence adapter trait for pluggable key-value blob stores.

use crate::result::AppResult;

/// Synchronous key-value blob store the asset tree is persisted to.
///
/// Blobs are opaque strings (serialized JSON). Implementations must map
/// every medium failure (quota exceeded, unreadable file, unavailable
/// backend) into an [`ErrorKind::Persistence`](crate::error::ErrorKind)
/// error rather than panicking.
pub trait PersistenceAdapter: Send + Sync + std::fmt::Debug + 'static {
    /// Return the backend name (e.g., "memory", "local").
    fn backend(&self) -> &str;

    /// Get a blob by key. Returns `None` if nothing is stored under the key.
    fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Store a blob under a key, replacing any previous value.
    fn set(&self, key: &str, blob: &str) -> AppResult<()>;

    /// Remove a key. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> AppResult<()>;

    /// Check that the backend is usable.
    fn health_check(&self) -> AppResult<bool>;
}
