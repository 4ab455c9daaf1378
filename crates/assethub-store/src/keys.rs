//! Storage key builders for every AssetHub slot.
//!
//! Centralising key construction prevents typos and makes it easy
//! to find every key the application uses.

/// Prefix applied to all AssetHub storage keys.
const PREFIX: &str = "assethub";

/// Default slot holding the serialized asset tree.
pub fn tree() -> String {
    format!("{PREFIX}:tree")
}

/// Slot holding the asset tree of a named workspace.
pub fn workspace_tree(workspace: &str) -> String {
    format!("{PREFIX}:tree:{}", workspace.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_key() {
        assert_eq!(tree(), "assethub:tree");
    }

    #[test]
    fn test_workspace_tree_key() {
        assert_eq!(workspace_tree("Blog"), "assethub:tree:blog");
    }
}
