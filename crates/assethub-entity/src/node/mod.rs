//! Folder and asset nodes, and the tree that contains them.

pub mod legacy;
pub mod model;
pub mod tree;

pub use model::{Asset, Folder, Node, NodeRef};
pub use tree::{AssetTree, LoadStatus, MAX_FOLDER_DEPTH};
