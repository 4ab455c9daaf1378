//! Asset tree domain events.

use serde::{Deserialize, Serialize};

use crate::error::ErrorKind;
use crate::types::NodeId;

/// Events related to asset tree changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TreeEvent {
    /// A folder was created.
    FolderCreated {
        /// The new folder ID.
        folder_id: NodeId,
        /// The folder it was created in.
        parent_id: NodeId,
        /// The folder name.
        name: String,
    },
    /// A folder was renamed.
    FolderRenamed {
        /// The folder ID.
        folder_id: NodeId,
        /// The name after the rename.
        name: String,
    },
    /// A folder was expanded or collapsed.
    FolderToggled {
        /// The folder ID.
        folder_id: NodeId,
        /// The expansion state after the toggle.
        expanded: bool,
    },
    /// A batch of assets was added to a folder.
    AssetsAdded {
        /// The folder the assets were added to.
        folder_id: NodeId,
        /// The new asset IDs in insertion order.
        asset_ids: Vec<NodeId>,
    },
    /// The user picked an asset for insertion.
    AssetSelected {
        /// The asset ID.
        asset_id: NodeId,
    },
    /// Writing the tree to the store failed; the in-memory tree stays authoritative.
    PersistenceFailed {
        /// Reason code of the failure.
        kind: ErrorKind,
        /// Human-readable failure message.
        message: String,
    },
}
