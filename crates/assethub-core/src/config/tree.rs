//! Tree policy configuration.

use serde::{Deserialize, Serialize};

/// Whether sibling folders may share a name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateNamePolicy {
    /// Any number of sibling folders may share a name.
    #[default]
    Allow,
    /// Creating or renaming into a sibling's name is rejected.
    Reject,
}

/// Which selection controller tracks the folder being viewed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    /// Track a single current folder id.
    #[default]
    Id,
    /// Track a breadcrumb path of folder ids from the root.
    Path,
}

/// Tree behaviour configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Sibling folder name policy.
    #[serde(default)]
    pub duplicate_folder_names: DuplicateNamePolicy,
    /// Selection controller variant.
    #[serde(default)]
    pub selection: SelectionMode,
    /// Deepest folder nesting a user may create (root is depth 0).
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            duplicate_folder_names: DuplicateNamePolicy::default(),
            selection: SelectionMode::default(),
            max_depth: default_max_depth(),
        }
    }
}

fn default_max_depth() -> usize {
    32
}
