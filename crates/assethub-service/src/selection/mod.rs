//! Tracking which folder the user is looking at.
//!
//! Two controllers implement the same contract. [`IdSelection`] remembers
//! a single folder id and is robust to renames and moves of ancestors.
//! [`PathSelection`] remembers breadcrumbs from the root, also by id.
//! Both re-resolve against whatever tree they are handed, because a folder
//! borrowed from an older tree version is stale after any mutation.

pub mod by_id;
pub mod by_path;

use assethub_core::config::tree::SelectionMode;
use assethub_core::result::AppResult;
use assethub_core::types::NodeId;
use assethub_entity::node::{AssetTree, Folder};

pub use by_id::IdSelection;
pub use by_path::PathSelection;

/// The selection contract shared by both controllers.
pub trait SelectionController: Send + Sync + std::fmt::Debug {
    /// Id of the folder currently selected, as last recorded.
    fn current_id(&self) -> &NodeId;

    /// The current folder resolved against `tree`, falling back toward the root.
    fn current_folder<'a>(&self, tree: &'a AssetTree) -> &'a Folder;

    /// Move into a direct child folder of the current folder.
    fn enter(&mut self, tree: &AssetTree, child_id: &NodeId) -> AppResult<()>;

    /// Move to the parent folder. Returns `false` when already at the root.
    fn up(&mut self, tree: &AssetTree) -> bool;

    /// Jump to any folder in the tree.
    fn select(&mut self, tree: &AssetTree, folder_id: &NodeId) -> AppResult<()>;

    /// Re-resolve the stored selection after the tree was replaced.
    fn rebase(&mut self, tree: &AssetTree);

    /// Folders from the root down to the current folder.
    fn breadcrumbs<'a>(&self, tree: &'a AssetTree) -> Vec<&'a Folder> {
        let current = self.current_folder(tree);
        tree.breadcrumbs(&current.id)
            .unwrap_or_else(|| vec![tree.root()])
    }
}

/// Build the controller configured for `mode`, positioned at the root.
pub fn from_mode(mode: SelectionMode) -> Box<dyn SelectionController> {
    match mode {
        SelectionMode::Id => Box::new(IdSelection::new()),
        SelectionMode::Path => Box::new(PathSelection::new()),
    }
}
