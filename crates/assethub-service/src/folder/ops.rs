//! Pure tree mutations.
//!
//! Every function takes the current tree by reference and returns either a
//! new tree or an error. The input tree is never modified, so an `Err` is an
//! observable no-op: the caller simply keeps the tree it already has.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use assethub_core::config::tree::DuplicateNamePolicy;
use assethub_core::error::AppError;
use assethub_core::result::AppResult;
use assethub_core::types::NodeId;
use assethub_entity::node::{Asset, AssetTree, Folder, MAX_FOLDER_DEPTH, Node};

/// An asset whose data reference has already been materialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAsset {
    /// File name shown in the asset grid.
    pub name: String,
    /// Embeddable data reference.
    pub data: String,
}

impl NewAsset {
    /// Creates a new asset request.
    pub fn new(name: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }
}

/// Trim a user-supplied name, rejecting blank input.
fn clean_name(name: &str, what: &str) -> AppResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(format!("{what} name cannot be empty")));
    }
    Ok(trimmed.to_string())
}

/// Fails when a folder created under `parent_id` would sit deeper than
/// `max_depth`.
pub fn check_folder_depth(
    tree: &AssetTree,
    parent_id: &NodeId,
    max_depth: usize,
) -> AppResult<()> {
    let depth = tree
        .depth(parent_id)
        .ok_or_else(|| AppError::not_found(format!("Folder '{parent_id}' not found")))?
        + 1;
    if depth > max_depth {
        return Err(AppError::validation(format!(
            "Folder depth {depth} exceeds the limit of {max_depth}"
        )));
    }
    Ok(())
}

/// Appends a new, collapsed, empty folder to `parent_id`.
///
/// Returns the new tree and the id assigned to the folder. The result never
/// nests deeper than [`MAX_FOLDER_DEPTH`], so it always reloads.
pub fn add_folder(
    tree: &AssetTree,
    parent_id: &NodeId,
    name: &str,
) -> AppResult<(AssetTree, NodeId)> {
    let name = clean_name(name, "Folder")?;
    check_folder_depth(tree, parent_id, MAX_FOLDER_DEPTH)?;
    let folder = Folder::new(name);
    let id = folder.id.clone();

    let updated = tree.rewrite_folder(parent_id, |parent| {
        let mut parent = parent.clone();
        parent.children.push(Arc::new(Node::Folder(folder)));
        Ok(parent)
    })?;

    debug!(folder_id = %id, parent_id = %parent_id, "Folder added");
    Ok((updated, id))
}

/// Appends a batch of assets to `folder_id`, preserving the supplied order.
///
/// The batch is validated as a whole: one bad entry rejects every entry.
pub fn add_assets(
    tree: &AssetTree,
    folder_id: &NodeId,
    assets: Vec<NewAsset>,
) -> AppResult<(AssetTree, Vec<NodeId>)> {
    if assets.is_empty() {
        return Err(AppError::validation("No assets supplied"));
    }

    let mut nodes = Vec::with_capacity(assets.len());
    for asset in assets {
        let name = clean_name(&asset.name, "Asset")?;
        if asset.data.trim().is_empty() {
            return Err(AppError::validation(format!(
                "Asset '{name}' has no data reference"
            )));
        }
        nodes.push(Asset::new(name, asset.data));
    }
    let ids: Vec<NodeId> = nodes.iter().map(|asset| asset.id.clone()).collect();

    let updated = tree.rewrite_folder(folder_id, |folder| {
        let mut folder = folder.clone();
        folder
            .children
            .extend(nodes.into_iter().map(|asset| Arc::new(Node::Asset(asset))));
        Ok(folder)
    })?;

    debug!(folder_id = %folder_id, count = ids.len(), "Assets added");
    Ok((updated, ids))
}

/// Flips the `expanded` flag of one folder.
pub fn toggle_expansion(tree: &AssetTree, folder_id: &NodeId) -> AppResult<AssetTree> {
    tree.rewrite_folder(folder_id, |folder| {
        Ok(Folder {
            expanded: !folder.expanded,
            ..folder.clone()
        })
    })
}

/// Replaces a folder's name, keeping its id, children, and expansion.
pub fn rename_folder(tree: &AssetTree, folder_id: &NodeId, new_name: &str) -> AppResult<AssetTree> {
    let name = clean_name(new_name, "Folder")?;
    tree.rewrite_folder(folder_id, |folder| {
        Ok(Folder {
            name,
            ..folder.clone()
        })
    })
}

/// Enforces the sibling folder name policy.
///
/// `except` excludes the folder being renamed from the comparison.
pub fn check_folder_name(
    tree: &AssetTree,
    parent_id: &NodeId,
    name: &str,
    except: Option<&NodeId>,
    policy: DuplicateNamePolicy,
) -> AppResult<()> {
    if policy == DuplicateNamePolicy::Allow {
        return Ok(());
    }

    let parent = tree
        .find_folder(parent_id)
        .ok_or_else(|| AppError::not_found(format!("Folder '{parent_id}' not found")))?;
    let name = name.trim();
    let clash = parent
        .subfolders()
        .filter(|sibling| Some(&sibling.id) != except)
        .any(|sibling| sibling.name == name);

    if clash {
        return Err(AppError::duplicate_name(format!(
            "A folder named '{name}' already exists here"
        )));
    }
    Ok(())
}
