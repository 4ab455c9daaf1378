//! Forgiving path resolution.

use tracing::debug;

use assethub_core::types::NodeId;
use assethub_entity::node::{AssetTree, Folder};

/// Result of resolving a folder path from the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation<'a> {
    /// The deepest folder that resolved.
    pub folder: &'a Folder,
    /// Ids of the folders entered below the root, in order.
    pub resolved: Vec<NodeId>,
    /// Whether some trailing segments did not resolve and were dropped.
    pub truncated: bool,
}

/// Resolves `path` segment by segment, starting at the root.
///
/// Each segment must name a direct child folder of the previous one. A
/// leading `root` segment is accepted and skipped. Resolution stops at the
/// first segment that does not resolve; the deepest resolved folder is
/// returned with `truncated` set instead of failing.
pub fn navigate<'a>(tree: &'a AssetTree, path: &[NodeId]) -> Navigation<'a> {
    let segments = match path.split_first() {
        Some((first, rest)) if first.is_root() => rest,
        _ => path,
    };

    let mut folder = tree.root();
    let mut resolved = Vec::with_capacity(segments.len());
    for segment in segments {
        match folder.child_folder(segment) {
            Some(child) => {
                folder = child;
                resolved.push(child.id.clone());
            }
            None => {
                debug!(segment = %segment, depth = resolved.len(), "Path truncated");
                return Navigation {
                    folder,
                    resolved,
                    truncated: true,
                };
            }
        }
    }

    Navigation {
        folder,
        resolved,
        truncated: false,
    }
}
