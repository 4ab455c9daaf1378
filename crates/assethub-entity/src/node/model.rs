//! Node entity models.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use assethub_core::types::NodeId;

/// A folder in the asset hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    /// Unique folder identifier.
    pub id: NodeId,
    /// Display name.
    pub name: String,
    /// Whether the folder is expanded in the sidebar. UI state only.
    #[serde(default)]
    pub expanded: bool,
    /// Child nodes in insertion order.
    #[serde(default)]
    pub children: Vec<Arc<Node>>,
}

impl Folder {
    /// Create an empty, collapsed folder with a fresh id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: NodeId::generate(),
            name: name.into(),
            expanded: false,
            children: Vec::new(),
        }
    }

    /// Create the empty root folder.
    pub fn root() -> Self {
        Self {
            id: NodeId::root(),
            name: "Root".to_string(),
            expanded: false,
            children: Vec::new(),
        }
    }

    /// Check if this is the root folder.
    pub fn is_root(&self) -> bool {
        self.id.is_root()
    }

    /// Direct child folders, in insertion order.
    pub fn subfolders(&self) -> impl Iterator<Item = &Folder> {
        self.children.iter().filter_map(|child| child.as_folder())
    }

    /// Direct child assets, in insertion order.
    pub fn assets(&self) -> impl Iterator<Item = &Asset> {
        self.children.iter().filter_map(|child| child.as_asset())
    }

    /// Whether the folder has at least one child folder.
    pub fn has_subfolders(&self) -> bool {
        self.subfolders().next().is_some()
    }

    /// Find a direct child by id.
    pub fn child(&self, id: &NodeId) -> Option<&Node> {
        self.children
            .iter()
            .map(Arc::as_ref)
            .find(|child| child.id() == id)
    }

    /// Find a direct child folder by id.
    pub fn child_folder(&self, id: &NodeId) -> Option<&Folder> {
        self.child(id).and_then(Node::as_folder)
    }
}

/// An uploaded image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    /// Unique asset identifier.
    pub id: NodeId,
    /// Original file name.
    pub name: String,
    /// Embeddable reference (data URI or URL) the editor renders.
    pub data: String,
}

impl Asset {
    /// Create an asset with a fresh id.
    pub fn new(name: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            id: NodeId::generate(),
            name: name.into(),
            data: data.into(),
        }
    }
}

/// A tree node, tagged by kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    /// A folder.
    Folder(Folder),
    /// An image asset.
    Asset(Asset),
}

impl Node {
    /// The node id.
    pub fn id(&self) -> &NodeId {
        match self {
            Self::Folder(folder) => &folder.id,
            Self::Asset(asset) => &asset.id,
        }
    }

    /// The node display name.
    pub fn name(&self) -> &str {
        match self {
            Self::Folder(folder) => &folder.name,
            Self::Asset(asset) => &asset.name,
        }
    }

    /// Borrow as a folder.
    pub fn as_folder(&self) -> Option<&Folder> {
        match self {
            Self::Folder(folder) => Some(folder),
            Self::Asset(_) => None,
        }
    }

    /// Borrow as an asset.
    pub fn as_asset(&self) -> Option<&Asset> {
        match self {
            Self::Asset(asset) => Some(asset),
            Self::Folder(_) => None,
        }
    }

    /// Whether the node is a folder.
    pub fn is_folder(&self) -> bool {
        matches!(self, Self::Folder(_))
    }
}

impl From<Folder> for Node {
    fn from(folder: Folder) -> Self {
        Self::Folder(folder)
    }
}

impl From<Asset> for Node {
    fn from(asset: Asset) -> Self {
        Self::Asset(asset)
    }
}

/// A borrowed view of any node, including the root folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRef<'a> {
    /// A folder.
    Folder(&'a Folder),
    /// An asset.
    Asset(&'a Asset),
}

impl<'a> NodeRef<'a> {
    /// The node id.
    pub fn id(&self) -> &'a NodeId {
        match self {
            Self::Folder(folder) => &folder.id,
            Self::Asset(asset) => &asset.id,
        }
    }

    /// Borrow as a folder.
    pub fn as_folder(&self) -> Option<&'a Folder> {
        match self {
            Self::Folder(folder) => Some(folder),
            Self::Asset(_) => None,
        }
    }

    /// Borrow as an asset.
    pub fn as_asset(&self) -> Option<&'a Asset> {
        match self {
            Self::Asset(asset) => Some(asset),
            Self::Folder(_) => None,
        }
    }
}

impl<'a> From<&'a Node> for NodeRef<'a> {
    fn from(node: &'a Node) -> Self {
        match node {
            Node::Folder(folder) => Self::Folder(folder),
            Node::Asset(asset) => Self::Asset(asset),
        }
    }
}
