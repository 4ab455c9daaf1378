//! # assethub-entity
//!
//! The asset tree data model. A tree is rooted at a single [`Folder`]
//! with the reserved id `root`; every other node is either a folder or
//! an image [`Asset`]. Trees are immutable values: mutations build a new
//! tree that shares every untouched subtree with the previous one.

pub mod node;

pub use node::{Asset, AssetTree, Folder, LoadStatus, MAX_FOLDER_DEPTH, Node, NodeRef};
