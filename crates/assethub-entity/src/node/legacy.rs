//! Conversion of blobs written by earlier versions of the asset manager.
//!
//! Two shapes exist in the wild:
//!
//! - **Untagged**: folders are `{id, name, children, isExpanded?}` and
//!   assets `{id, name, url}`. A node is a folder iff it has `children`.
//! - **Name-keyed**: `{name, folders, images}` with no ids at all and
//!   images stored as bare data URIs.
//!
//! Both are converted into tagged [`Folder`] trees rooted at id `root`.
//! Untagged ids are kept unless blank, reserved or already taken.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;

use assethub_core::error::AppError;
use assethub_core::result::AppResult;
use assethub_core::types::NodeId;
use assethub_core::types::id::ROOT_ID;

use super::model::{Asset, Folder, Node};

#[derive(Debug, Deserialize)]
struct UntaggedFolder {
    id: String,
    name: String,
    children: Vec<UntaggedNode>,
    #[serde(default, rename = "isExpanded")]
    is_expanded: bool,
}

#[derive(Debug, Deserialize)]
struct UntaggedAsset {
    id: String,
    name: String,
    url: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum UntaggedNode {
    Folder(UntaggedFolder),
    Asset(UntaggedAsset),
}

#[derive(Debug, Deserialize)]
struct NamedFolder {
    name: String,
    folders: Vec<NamedFolder>,
    images: Vec<String>,
}

/// Convert a legacy blob into a root folder.
pub fn migrate(value: serde_json::Value) -> AppResult<Folder> {
    if value.get("children").is_some() {
        let legacy: UntaggedFolder = serde_json::from_value(value)?;
        let mut seen = HashSet::from([ROOT_ID.to_string()]);
        return Ok(Folder {
            id: NodeId::root(),
            name: legacy.name,
            expanded: legacy.is_expanded,
            children: untagged_children(legacy.children, &mut seen),
        });
    }

    if value.get("folders").is_some() && value.get("images").is_some() {
        let legacy: NamedFolder = serde_json::from_value(value)?;
        let mut root = from_named(legacy);
        root.id = NodeId::root();
        return Ok(root);
    }

    Err(AppError::serialization("Unrecognized tree blob format"))
}

fn untagged_children(
    children: Vec<UntaggedNode>,
    seen: &mut HashSet<String>,
) -> Vec<Arc<Node>> {
    children
        .into_iter()
        .map(|child| {
            Arc::new(match child {
                UntaggedNode::Folder(sub) => Node::Folder(Folder {
                    id: fresh_id(sub.id, seen),
                    name: sub.name,
                    expanded: sub.is_expanded,
                    children: untagged_children(sub.children, seen),
                }),
                UntaggedNode::Asset(asset) => Node::Asset(Asset {
                    id: fresh_id(asset.id, seen),
                    name: asset.name,
                    data: asset.url,
                }),
            })
        })
        .collect()
}

/// Keeps `raw` on first sight, otherwise hands out a generated id.
fn fresh_id(raw: String, seen: &mut HashSet<String>) -> NodeId {
    if !raw.trim().is_empty() && seen.insert(raw.clone()) {
        return NodeId::from(raw);
    }
    let id = NodeId::generate();
    debug!(legacy_id = %raw, id = %id, "Re-identified legacy node");
    seen.insert(id.to_string());
    id
}

fn from_named(folder: NamedFolder) -> Folder {
    let mut migrated = Folder::new(folder.name);
    for sub in folder.folders {
        migrated
            .children
            .push(Arc::new(Node::Folder(from_named(sub))));
    }
    for (index, data) in folder.images.into_iter().enumerate() {
        let asset = Asset::new(format!("image-{}", index + 1), data);
        migrated.children.push(Arc::new(Node::Asset(asset)));
    }
    migrated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::tree::{AssetTree, LoadStatus};

    #[test]
    fn test_untagged_blob_keeps_ids_and_expansion() {
        let blob = r#"{"id":"root","name":"Root","children":[
            {"id":"1712000000000","name":"Vacation","isExpanded":true,"children":[
                {"id":"1712000000001-a.png","name":"a.png","url":"data:image/png;base64,AAAA"}
            ]}
        ]}"#;
        let (tree, status) = AssetTree::load(Some(blob));
        assert_eq!(status, LoadStatus::Migrated);

        let vacation = tree
            .find_folder(&NodeId::from("1712000000000"))
            .expect("folder");
        assert!(vacation.expanded);
        let asset = tree
            .find_asset(&NodeId::from("1712000000001-a.png"))
            .expect("asset");
        assert_eq!(asset.data, "data:image/png;base64,AAAA");
    }

    #[test]
    fn test_untagged_blob_with_colliding_ids_is_migrated() {
        let blob = r#"{"id":"root","name":"Root","children":[
            {"id":"root","name":"Shadow","children":[
                {"id":"1712000000001-a.png","name":"a.png","url":"data:a"},
                {"id":"1712000000001-a.png","name":"a.png","url":"data:b"}
            ]},
            {"id":"","name":"blank.png","url":"data:c"}
        ]}"#;
        let (tree, status) = AssetTree::load(Some(blob));
        assert_eq!(status, LoadStatus::Migrated);
        assert_eq!(tree.node_count(), 5);

        let ids = tree.ids();
        let unique: HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());

        let first = tree
            .find_asset(&NodeId::from("1712000000001-a.png"))
            .expect("first asset keeps its id");
        assert_eq!(first.data, "data:a");
        let shadow = tree.root().subfolders().next().expect("shadow");
        assert_eq!(shadow.name, "Shadow");
        assert!(!shadow.is_root());
    }

    #[test]
    fn test_named_blob_gets_fresh_ids() {
        let blob = r#"{"name":"root","folders":[
            {"name":"Trip","folders":[],"images":["data:image/png;base64,AAAA","data:image/png;base64,BBBB"]}
        ],"images":[]}"#;
        let (tree, status) = AssetTree::load(Some(blob));
        assert_eq!(status, LoadStatus::Migrated);
        assert!(tree.root().is_root());

        let trip = tree.root().subfolders().next().expect("trip");
        assert_eq!(trip.name, "Trip");
        let names: Vec<_> = trip.assets().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["image-1", "image-2"]);
        assert_eq!(tree.node_count(), 4);
    }

    #[test]
    fn test_unknown_shape_is_rejected() {
        let err = migrate(serde_json::json!({"name": "root"})).unwrap_err();
        assert_eq!(err.kind, assethub_core::error::ErrorKind::Serialization);
    }
}
