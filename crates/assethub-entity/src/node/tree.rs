//! The asset tree value: lookup, copy-on-write rewriting, and persistence format.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use assethub_core::error::AppError;
use assethub_core::result::AppResult;
use assethub_core::types::NodeId;

use super::legacy;
use super::model::{Asset, Folder, Node, NodeRef};

/// Version tag written into every persisted blob.
pub const BLOB_VERSION: u32 = 1;

/// Deepest folder nesting a loadable tree may have (root is depth 0).
///
/// Every folder level adds two JSON nesting levels, and the blob parser
/// refuses input nested deeper than 128.
pub const MAX_FOLDER_DEPTH: usize = 60;

/// How [`AssetTree::load`] obtained its tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// The blob was in the current format.
    Restored,
    /// The blob was in a legacy format and has been converted.
    Migrated,
    /// Nothing was stored; the default tree was used.
    Missing,
    /// The blob could not be used; the default tree was used.
    Corrupt(String),
}

impl LoadStatus {
    /// Whether the default tree was substituted for the stored one.
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Missing | Self::Corrupt(_))
    }
}

/// On-disk envelope around the root folder.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedTree {
    version: u32,
    root: Folder,
}

/// An immutable tree of folders and assets.
///
/// Cloning is cheap: the root is reference counted and so is every child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetTree {
    root: Arc<Folder>,
}

impl Default for AssetTree {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetTree {
    /// Create the default tree: an empty root folder.
    pub fn new() -> Self {
        Self {
            root: Arc::new(Folder::root()),
        }
    }

    /// Build a tree from a root folder, validating every invariant.
    pub fn from_root(root: Folder) -> AppResult<Self> {
        validate(&root)?;
        Ok(Self {
            root: Arc::new(root),
        })
    }

    /// The root folder.
    pub fn root(&self) -> &Folder {
        &self.root
    }

    /// Shared handle to the root folder.
    pub fn root_arc(&self) -> &Arc<Folder> {
        &self.root
    }

    /// Depth-first lookup of any node, children visited in insertion order.
    pub fn find_node(&self, id: &NodeId) -> Option<NodeRef<'_>> {
        self.locate(id).map(|(_, node)| node)
    }

    /// Find a folder by id.
    pub fn find_folder(&self, id: &NodeId) -> Option<&Folder> {
        self.find_node(id).and_then(|node| node.as_folder())
    }

    /// Find an asset by id.
    pub fn find_asset(&self, id: &NodeId) -> Option<&Asset> {
        self.find_node(id).and_then(|node| node.as_asset())
    }

    /// Find the folder that directly contains `id`. The root has no parent.
    pub fn find_parent(&self, id: &NodeId) -> Option<&Folder> {
        self.locate(id)
            .and_then(|(ancestors, _)| ancestors.last().copied())
    }

    /// Ids from the root down to and including `id`.
    pub fn ancestry(&self, id: &NodeId) -> Option<Vec<NodeId>> {
        self.locate(id).map(|(ancestors, node)| {
            ancestors
                .iter()
                .map(|folder| folder.id.clone())
                .chain(std::iter::once(node.id().clone()))
                .collect()
        })
    }

    /// Nesting depth of `id`; the root is at depth 0.
    pub fn depth(&self, id: &NodeId) -> Option<usize> {
        self.locate(id).map(|(ancestors, _)| ancestors.len())
    }

    /// Folders from the root down to and including the folder `id`.
    pub fn breadcrumbs(&self, id: &NodeId) -> Option<Vec<&Folder>> {
        let (mut ancestors, node) = self.locate(id)?;
        ancestors.push(node.as_folder()?);
        Some(ancestors)
    }

    /// Every node id in depth-first order, root first.
    pub fn ids(&self) -> Vec<NodeId> {
        fn walk(folder: &Folder, out: &mut Vec<NodeId>) {
            out.push(folder.id.clone());
            for child in &folder.children {
                match child.as_ref() {
                    Node::Folder(sub) => walk(sub, out),
                    Node::Asset(asset) => out.push(asset.id.clone()),
                }
            }
        }

        let mut out = Vec::new();
        walk(&self.root, &mut out);
        out
    }

    /// Total number of nodes including the root.
    pub fn node_count(&self) -> usize {
        self.ids().len()
    }

    /// Produce a new tree in which the folder `id` is replaced by `edit(folder)`.
    ///
    /// Only folders on the root-to-target path are copied; every other
    /// subtree is shared with `self`. The edit must keep the folder id.
    pub fn rewrite_folder<F>(&self, id: &NodeId, edit: F) -> AppResult<AssetTree>
    where
        F: FnOnce(&Folder) -> AppResult<Folder>,
    {
        let path = self
            .ancestry(id)
            .ok_or_else(|| AppError::not_found(format!("Folder '{id}' not found")))?;

        let new_root = rewrite(&self.root, &path[1..], id, edit)?;
        Ok(AssetTree {
            root: Arc::new(new_root),
        })
    }

    /// Serialize the tree into a persistable blob.
    pub fn serialize(&self) -> AppResult<String> {
        let envelope = PersistedTreeRef {
            version: BLOB_VERSION,
            root: &self.root,
        };
        Ok(serde_json::to_string(&envelope)?)
    }

    /// Deserialize a persisted blob.
    ///
    /// Never fails: a missing, unreadable, or invalid blob yields the
    /// default tree together with a status explaining the fallback.
    pub fn load(blob: Option<&str>) -> (AssetTree, LoadStatus) {
        let Some(blob) = blob else {
            debug!("No persisted tree, starting from default");
            return (AssetTree::new(), LoadStatus::Missing);
        };

        match parse(blob) {
            Ok((tree, status)) => (tree, status),
            Err(e) => {
                warn!(error = %e, "Persisted tree unusable, starting from default");
                (AssetTree::new(), LoadStatus::Corrupt(e.message))
            }
        }
    }
}

#[derive(Serialize)]
struct PersistedTreeRef<'a> {
    version: u32,
    root: &'a Folder,
}

impl AssetTree {
    fn locate(&self, id: &NodeId) -> Option<(Vec<&Folder>, NodeRef<'_>)> {
        if &self.root.id == id {
            return Some((Vec::new(), NodeRef::Folder(&self.root)));
        }
        let mut trail = Vec::new();
        let found = locate_in(&self.root, id, &mut trail)?;
        Some((trail, found))
    }
}

fn locate_in<'a>(
    folder: &'a Folder,
    id: &NodeId,
    trail: &mut Vec<&'a Folder>,
) -> Option<NodeRef<'a>> {
    trail.push(folder);
    for child in &folder.children {
        if child.id() == id {
            return Some(NodeRef::from(child.as_ref()));
        }
        if let Node::Folder(sub) = child.as_ref() {
            if let Some(found) = locate_in(sub, id, trail) {
                return Some(found);
            }
        }
    }
    trail.pop();
    None
}

fn rewrite<F>(folder: &Folder, path: &[NodeId], target: &NodeId, edit: F) -> AppResult<Folder>
where
    F: FnOnce(&Folder) -> AppResult<Folder>,
{
    let Some((next, rest)) = path.split_first() else {
        return edit(folder);
    };

    let index = folder
        .children
        .iter()
        .position(|child| child.id() == next)
        .ok_or_else(|| AppError::not_found(format!("Folder '{target}' not found")))?;
    let child = folder.children[index]
        .as_folder()
        .ok_or_else(|| AppError::not_found(format!("'{target}' is not a folder")))?;

    let replaced = rewrite(child, rest, target, edit)?;
    let mut copy = folder.clone();
    copy.children[index] = Arc::new(Node::Folder(replaced));
    Ok(copy)
}

fn parse(blob: &str) -> AppResult<(AssetTree, LoadStatus)> {
    let value: serde_json::Value = serde_json::from_str(blob)?;

    let (root, status) = if value.get("version").is_some() {
        let envelope: PersistedTree = serde_json::from_value(value)?;
        if envelope.version != BLOB_VERSION {
            return Err(AppError::serialization(format!(
                "Unsupported tree version {}",
                envelope.version
            )));
        }
        (envelope.root, LoadStatus::Restored)
    } else {
        let root = legacy::migrate(value)?;
        debug!("Migrated legacy tree blob");
        (root, LoadStatus::Migrated)
    };

    Ok((AssetTree::from_root(root)?, status))
}

/// Check the structural invariants of a tree rooted at `root`.
pub fn validate(root: &Folder) -> AppResult<()> {
    if !root.is_root() {
        return Err(AppError::validation(format!(
            "Root folder must have id 'root', found '{}'",
            root.id
        )));
    }

    fn walk<'a>(folder: &'a Folder, seen: &mut HashSet<&'a NodeId>) -> AppResult<()> {
        for child in &folder.children {
            if child.name().trim().is_empty() {
                return Err(AppError::validation(format!(
                    "Node '{}' has an empty name",
                    child.id()
                )));
            }
            if !seen.insert(child.id()) {
                return Err(AppError::validation(format!(
                    "Duplicate node id '{}'",
                    child.id()
                )));
            }
            if let Node::Folder(sub) = child.as_ref() {
                walk(sub, seen)?;
            }
        }
        Ok(())
    }

    let mut seen = HashSet::new();
    seen.insert(&root.id);
    walk(root, &mut seen)
}
