//! Tree display CLI commands.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use assethub_core::config::AppConfig;
use assethub_core::error::AppError;
use assethub_core::result::AppResult;
use assethub_core::types::NodeId;
use assethub_entity::{Folder, Node};

use crate::output::{self, OutputFormat};

/// Arguments for the tree command
#[derive(Debug, Args)]
pub struct TreeArgs {
    /// Hide the contents of collapsed folders
    #[arg(long)]
    pub expanded_only: bool,
}

/// Arguments for the ls command
#[derive(Debug, Args)]
pub struct LsArgs {
    /// Folder ID (defaults to the root)
    #[arg(long)]
    pub folder: Option<NodeId>,
}

/// One child of a folder
#[derive(Debug, Serialize, Tabled)]
pub struct NodeRow {
    /// Node ID
    id: String,
    /// Folder or asset
    kind: &'static str,
    /// Name
    name: String,
    /// Child count for folders, data size for assets
    detail: String,
}

impl From<&Node> for NodeRow {
    fn from(node: &Node) -> Self {
        match node {
            Node::Folder(folder) => Self {
                id: folder.id.to_string(),
                kind: "folder",
                name: folder.name.clone(),
                detail: format!("{} items", folder.children.len()),
            },
            Node::Asset(asset) => Self {
                id: asset.id.to_string(),
                kind: "asset",
                name: asset.name.clone(),
                detail: format!("{} bytes", asset.data.len()),
            },
        }
    }
}

/// Print the tree
pub fn execute_tree(args: &TreeArgs, config: &AppConfig, format: OutputFormat) -> AppResult<()> {
    let manager = super::open_manager(config)?;
    let root = manager.tree().root();

    match format {
        OutputFormat::Table => print!("{}", render(root, args.expanded_only)),
        OutputFormat::Json => output::print_json(root, "{}"),
    }
    Ok(())
}

/// List one folder
pub fn execute_ls(args: &LsArgs, config: &AppConfig, format: OutputFormat) -> AppResult<()> {
    let manager = super::open_manager(config)?;
    let folder_id = args.folder.clone().unwrap_or_else(NodeId::root);
    let folder = manager
        .tree()
        .find_folder(&folder_id)
        .ok_or_else(|| AppError::not_found(format!("Folder '{folder_id}' not found")))?;

    print_folder(folder, format);
    Ok(())
}

/// Print the children of a folder in the selected format
pub fn print_folder(folder: &Folder, format: OutputFormat) {
    let rows: Vec<NodeRow> = folder
        .children
        .iter()
        .map(|child| NodeRow::from(child.as_ref()))
        .collect();
    output::print_list(&rows, format);
}

/// Draw a folder and its descendants with box-drawing guides.
pub fn render(root: &Folder, expanded_only: bool) -> String {
    let mut out = format!("{}/ [{}]\n", root.name, root.id);
    render_children(root, "", expanded_only, &mut out);
    out
}

fn render_children(folder: &Folder, prefix: &str, expanded_only: bool, out: &mut String) {
    let count = folder.children.len();
    for (index, child) in folder.children.iter().enumerate() {
        let last = index + 1 == count;
        let branch = if last { "└── " } else { "├── " };
        match child.as_ref() {
            Node::Folder(sub) => {
                let marker = if sub.expanded { "▾" } else { "▸" };
                out.push_str(&format!("{prefix}{branch}{marker} {}/ [{}]\n", sub.name, sub.id));
                if sub.expanded || !expanded_only {
                    let nested = format!("{prefix}{}", if last { "    " } else { "│   " });
                    render_children(sub, &nested, expanded_only, out);
                }
            }
            Node::Asset(asset) => {
                out.push_str(&format!("{prefix}{branch}{} [{}]\n", asset.name, asset.id));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use assethub_entity::Asset;

    fn sample() -> Folder {
        let mut photos = Folder::new("Photos");
        photos.id = NodeId::from("f1");
        let mut asset = Asset::new("a.png", "ref");
        asset.id = NodeId::from("a1");
        photos.children.push(Arc::new(Node::Asset(asset)));

        let mut docs = Folder::new("Docs");
        docs.id = NodeId::from("f2");
        docs.expanded = true;

        let mut root = Folder::root();
        root.children.push(Arc::new(Node::Folder(photos)));
        root.children.push(Arc::new(Node::Folder(docs)));
        root
    }

    #[test]
    fn test_render_full_tree() {
        let expected = "\
Root/ [root]
├── ▸ Photos/ [f1]
│   └── a.png [a1]
└── ▾ Docs/ [f2]
";
        assert_eq!(render(&sample(), false), expected);
    }

    #[test]
    fn test_render_hides_collapsed_contents() {
        let rendered = render(&sample(), true);
        assert!(!rendered.contains("a.png"));
        assert!(rendered.contains("Docs/"));
    }

    #[test]
    fn test_node_row() {
        let root = sample();
        let row = NodeRow::from(root.children[0].as_ref());
        assert_eq!(row.kind, "folder");
        assert_eq!(row.detail, "1 items");
    }
}
