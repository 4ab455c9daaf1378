//! Identifier type for nodes in the asset tree.
//!
//! Ids are opaque strings. Fresh ids are random UUIDs rendered in their
//! simple form; the root folder always carries the reserved id `root`.
//! Arbitrary strings are accepted on deserialization so that trees written
//! by older versions (timestamp-based ids) still load.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The id reserved for the root folder.
pub const ROOT_ID: &str = "root";

/// Unique identifier for a folder or asset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Generate a fresh, collision-free identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// The reserved root identifier.
    pub fn root() -> Self {
        Self(ROOT_ID.to_string())
    }

    /// Whether this is the reserved root identifier.
    pub fn is_root(&self) -> bool {
        self.0 == ROOT_ID
    }

    /// Borrow the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for NodeId {
    type Err = crate::error::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(crate::error::AppError::validation("Node id cannot be empty"));
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
