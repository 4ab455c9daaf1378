//! Selection by breadcrumb path.

use assethub_core::error::AppError;
use assethub_core::result::AppResult;
use assethub_core::types::NodeId;
use assethub_entity::node::{AssetTree, Folder};

use super::SelectionController;
use crate::folder::navigate::navigate;

/// Remembers the folder ids entered below the root, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSelection {
    root: NodeId,
    path: Vec<NodeId>,
}

impl Default for PathSelection {
    fn default() -> Self {
        Self::new()
    }
}

impl PathSelection {
    /// Start at the root folder.
    pub fn new() -> Self {
        Self {
            root: NodeId::root(),
            path: Vec::new(),
        }
    }

    /// The breadcrumb ids below the root.
    pub fn path(&self) -> &[NodeId] {
        &self.path
    }
}

impl SelectionController for PathSelection {
    fn current_id(&self) -> &NodeId {
        self.path.last().unwrap_or(&self.root)
    }

    fn current_folder<'a>(&self, tree: &'a AssetTree) -> &'a Folder {
        navigate(tree, &self.path).folder
    }

    fn enter(&mut self, tree: &AssetTree, child_id: &NodeId) -> AppResult<()> {
        let nav = navigate(tree, &self.path);
        if nav.folder.child_folder(child_id).is_none() {
            return Err(AppError::not_found(format!(
                "Folder '{child_id}' is not a child of '{}'",
                nav.folder.id
            )));
        }
        let mut path = nav.resolved;
        path.push(child_id.clone());
        self.path = path;
        Ok(())
    }

    fn up(&mut self, tree: &AssetTree) -> bool {
        self.rebase(tree);
        self.path.pop().is_some()
    }

    fn select(&mut self, tree: &AssetTree, folder_id: &NodeId) -> AppResult<()> {
        if tree.find_folder(folder_id).is_none() {
            return Err(AppError::not_found(format!("Folder '{folder_id}' not found")));
        }
        let ancestry = tree
            .ancestry(folder_id)
            .ok_or_else(|| AppError::not_found(format!("Folder '{folder_id}' not found")))?;
        self.path = ancestry.into_iter().skip(1).collect();
        Ok(())
    }

    fn rebase(&mut self, tree: &AssetTree) {
        let nav = navigate(tree, &self.path);
        if nav.truncated {
            self.path = nav.resolved;
        }
    }
}
