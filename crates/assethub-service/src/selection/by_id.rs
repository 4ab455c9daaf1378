//! Selection by a single folder id.

use tracing::debug;

use assethub_core::error::AppError;
use assethub_core::result::AppResult;
use assethub_core::types::NodeId;
use assethub_entity::node::{AssetTree, Folder};

use super::SelectionController;

/// Remembers the current folder by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdSelection {
    current: NodeId,
}

impl Default for IdSelection {
    fn default() -> Self {
        Self::new()
    }
}

impl IdSelection {
    /// Start at the root folder.
    pub fn new() -> Self {
        Self {
            current: NodeId::root(),
        }
    }
}

impl SelectionController for IdSelection {
    fn current_id(&self) -> &NodeId {
        &self.current
    }

    fn current_folder<'a>(&self, tree: &'a AssetTree) -> &'a Folder {
        tree.find_folder(&self.current).unwrap_or_else(|| tree.root())
    }

    fn enter(&mut self, tree: &AssetTree, child_id: &NodeId) -> AppResult<()> {
        let current = self.current_folder(tree);
        let child = current.child_folder(child_id).ok_or_else(|| {
            AppError::not_found(format!(
                "Folder '{child_id}' is not a child of '{}'",
                current.id
            ))
        })?;
        self.current = child.id.clone();
        Ok(())
    }

    fn up(&mut self, tree: &AssetTree) -> bool {
        let current = self.current_folder(tree);
        match tree.find_parent(&current.id) {
            Some(parent) => {
                self.current = parent.id.clone();
                true
            }
            None => {
                self.current = current.id.clone();
                false
            }
        }
    }

    fn select(&mut self, tree: &AssetTree, folder_id: &NodeId) -> AppResult<()> {
        let folder = tree
            .find_folder(folder_id)
            .ok_or_else(|| AppError::not_found(format!("Folder '{folder_id}' not found")))?;
        self.current = folder.id.clone();
        Ok(())
    }

    fn rebase(&mut self, tree: &AssetTree) {
        if tree.find_folder(&self.current).is_none() {
            debug!(folder_id = %self.current, "Selected folder vanished, falling back to root");
            self.current = tree.root().id.clone();
        }
    }
}
