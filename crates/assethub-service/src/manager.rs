//! The asset manager: owns the current tree and drives every mutation.
//!
//! Every accepted mutation follows the same sequence: the new tree replaces
//! the old one, the selection is re-resolved against it, the tree is written
//! to the store, and an event is broadcast. A rejected mutation returns
//! `Err` and touches none of these. A failed write does not roll the tree
//! back; it is returned in the [`Commit`] and broadcast as
//! [`TreeEvent::PersistenceFailed`].

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use assethub_core::config::AppConfig;
use assethub_core::config::tree::DuplicateNamePolicy;
use assethub_core::error::AppError;
use assethub_core::events::{DomainEvent, TreeEvent};
use assethub_core::result::AppResult;
use assethub_core::traits::store::PersistenceAdapter;
use assethub_core::types::NodeId;
use assethub_entity::node::{Asset, AssetTree, Folder, LoadStatus, MAX_FOLDER_DEPTH};

use crate::folder::navigate::navigate;
use crate::folder::ops::{self, NewAsset};
use crate::selection::{self, SelectionController};
use crate::upload::{Ingestor, UploadFile};

/// Capacity of the event channel before slow subscribers start lagging.
const EVENT_CAPACITY: usize = 64;

/// Outcome of an accepted mutation.
#[derive(Debug)]
pub struct Commit<T> {
    /// What the mutation produced (new ids, the new expansion state, ...).
    pub value: T,
    /// Set when the tree could not be written to the store.
    pub persist_error: Option<AppError>,
}

impl<T> Commit<T> {
    /// Whether the new tree reached the store.
    pub fn is_persisted(&self) -> bool {
        self.persist_error.is_none()
    }

    /// Discard the persistence outcome.
    pub fn into_value(self) -> T {
        self.value
    }
}

/// Result of resolving a folder path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigateOutcome {
    /// The folder that is now selected.
    pub folder_id: NodeId,
    /// Ids of the folders entered below the root.
    pub resolved: Vec<NodeId>,
    /// Whether trailing segments were dropped.
    pub truncated: bool,
}

/// Owns the asset tree, its selection, and its persistence.
pub struct AssetManager {
    tree: AssetTree,
    store: Arc<dyn PersistenceAdapter>,
    key: String,
    selection: Box<dyn SelectionController>,
    names: DuplicateNamePolicy,
    max_depth: usize,
    events: broadcast::Sender<DomainEvent>,
    load_status: LoadStatus,
}

impl std::fmt::Debug for AssetManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetManager")
            .field("backend", &self.store.backend())
            .field("key", &self.key)
            .field("nodes", &self.tree.node_count())
            .field("selection", &self.selection)
            .finish()
    }
}

impl AssetManager {
    /// Load the tree from `store` and prepare the manager.
    ///
    /// Never fails: an unreadable store or an unusable blob yields the
    /// default tree. When the configured key is empty the legacy keys are
    /// read in order, and the first blob found is adopted. A missing,
    /// migrated or adopted blob is written back under the configured key
    /// right away; a corrupt one is left in place until the first accepted
    /// mutation. Legacy slots are never modified.
    pub fn open(store: Arc<dyn PersistenceAdapter>, config: &AppConfig) -> Self {
        let key = config.store.key.clone();

        let mut adopted = false;
        let (tree, load_status) = match read_blob(store.as_ref(), &key, &config.store.legacy_keys) {
            Ok(Some((source, blob))) => {
                adopted = source != key;
                if adopted {
                    info!(legacy_key = %source, key = %key, "Adopting tree from legacy key");
                }
                AssetTree::load(Some(&blob))
            }
            Ok(None) => AssetTree::load(None),
            Err(e) => {
                warn!(error = %e, key = %key, "Failed to read persisted tree, using default");
                (AssetTree::new(), LoadStatus::Corrupt(e.message))
            }
        };

        info!(
            backend = store.backend(),
            key = %key,
            nodes = tree.node_count(),
            status = ?load_status,
            "Asset tree loaded"
        );

        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let manager = Self {
            tree,
            store,
            key,
            selection: selection::from_mode(config.tree.selection),
            names: config.tree.duplicate_folder_names,
            max_depth: config.tree.max_depth.min(MAX_FOLDER_DEPTH),
            events,
            load_status,
        };

        let write_back = match manager.load_status {
            LoadStatus::Missing | LoadStatus::Migrated => true,
            LoadStatus::Restored => adopted,
            LoadStatus::Corrupt(_) => false,
        };
        if write_back {
            if let Err(e) = manager.persist() {
                warn!(error = %e, "Initial tree write failed");
            }
        }

        manager
    }

    /// The current tree snapshot.
    pub fn tree(&self) -> &AssetTree {
        &self.tree
    }

    /// How the tree was obtained at startup.
    pub fn load_status(&self) -> &LoadStatus {
        &self.load_status
    }

    /// The storage key the tree is written under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The folder currently selected.
    pub fn current_folder(&self) -> &Folder {
        self.selection.current_folder(&self.tree)
    }

    /// Folders from the root down to the current folder.
    pub fn breadcrumbs(&self) -> Vec<&Folder> {
        self.selection.breadcrumbs(&self.tree)
    }

    /// Receive events for every accepted mutation from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.events.subscribe()
    }

    /// Create a folder inside the current folder.
    pub fn create_folder(&mut self, name: &str) -> AppResult<Commit<NodeId>> {
        let parent_id = self.current_folder().id.clone();
        self.create_folder_in(&parent_id, name)
    }

    /// Create a folder inside `parent_id`.
    #[instrument(skip(self))]
    pub fn create_folder_in(&mut self, parent_id: &NodeId, name: &str) -> AppResult<Commit<NodeId>> {
        ops::check_folder_name(&self.tree, parent_id, name, None, self.names)?;
        ops::check_folder_depth(&self.tree, parent_id, self.max_depth)?;
        let (tree, folder_id) = ops::add_folder(&self.tree, parent_id, name)?;

        info!(folder_id = %folder_id, "Folder created");
        let event = TreeEvent::FolderCreated {
            folder_id: folder_id.clone(),
            parent_id: parent_id.clone(),
            name: name.trim().to_string(),
        };
        Ok(self.commit(tree, folder_id, event))
    }

    /// Rename a folder.
    #[instrument(skip(self))]
    pub fn rename_folder(&mut self, folder_id: &NodeId, name: &str) -> AppResult<Commit<()>> {
        if let Some(parent) = self.tree.find_parent(folder_id) {
            let parent_id = parent.id.clone();
            ops::check_folder_name(&self.tree, &parent_id, name, Some(folder_id), self.names)?;
        }
        let tree = ops::rename_folder(&self.tree, folder_id, name)?;

        info!("Folder renamed");
        let event = TreeEvent::FolderRenamed {
            folder_id: folder_id.clone(),
            name: name.trim().to_string(),
        };
        Ok(self.commit(tree, (), event))
    }

    /// Flip a folder's expansion flag. Returns the new state.
    pub fn toggle_folder(&mut self, folder_id: &NodeId) -> AppResult<Commit<bool>> {
        let tree = ops::toggle_expansion(&self.tree, folder_id)?;
        let expanded = tree
            .find_folder(folder_id)
            .map(|f| f.expanded)
            .ok_or_else(|| AppError::internal(format!("Folder '{folder_id}' lost in toggle")))?;

        debug!(folder_id = %folder_id, expanded, "Folder toggled");
        let event = TreeEvent::FolderToggled {
            folder_id: folder_id.clone(),
            expanded,
        };
        Ok(self.commit(tree, expanded, event))
    }

    /// Append already-encoded assets to a folder as one batch.
    #[instrument(skip(self, assets), fields(count = assets.len()))]
    pub fn add_assets(
        &mut self,
        folder_id: &NodeId,
        assets: Vec<NewAsset>,
    ) -> AppResult<Commit<Vec<NodeId>>> {
        let (tree, asset_ids) = ops::add_assets(&self.tree, folder_id, assets)?;

        info!(count = asset_ids.len(), "Assets added");
        let event = TreeEvent::AssetsAdded {
            folder_id: folder_id.clone(),
            asset_ids: asset_ids.clone(),
        };
        Ok(self.commit(tree, asset_ids, event))
    }

    /// Encode an upload batch and add it to `folder_id` in one mutation.
    ///
    /// Nothing is added unless every file encodes successfully.
    pub async fn upload(
        &mut self,
        ingestor: &Ingestor,
        folder_id: &NodeId,
        files: Vec<UploadFile>,
        cancel: CancellationToken,
    ) -> AppResult<Commit<Vec<NodeId>>> {
        if self.tree.find_folder(folder_id).is_none() {
            return Err(AppError::not_found(format!("Folder '{folder_id}' not found")));
        }

        let assets = ingestor.ingest(files, cancel).await?;
        self.add_assets(folder_id, assets)
    }

    /// Move into a direct child folder of the current folder.
    pub fn enter(&mut self, child_id: &NodeId) -> AppResult<()> {
        self.selection.enter(&self.tree, child_id)
    }

    /// Move to the parent folder. Returns `false` at the root.
    pub fn up(&mut self) -> bool {
        self.selection.up(&self.tree)
    }

    /// Select any folder in the tree.
    pub fn select_folder(&mut self, folder_id: &NodeId) -> AppResult<()> {
        self.selection.select(&self.tree, folder_id)
    }

    /// Resolve a folder path from the root and select the deepest match.
    pub fn navigate(&mut self, path: &[NodeId]) -> AppResult<NavigateOutcome> {
        let nav = navigate(&self.tree, path);
        let outcome = NavigateOutcome {
            folder_id: nav.folder.id.clone(),
            resolved: nav.resolved,
            truncated: nav.truncated,
        };
        self.selection.select(&self.tree, &outcome.folder_id)?;
        Ok(outcome)
    }

    /// Hand an asset to the caller, typically for insertion into a document.
    pub fn select_asset<F>(&self, asset_id: &NodeId, on_select: F) -> AppResult<()>
    where
        F: FnOnce(&Asset),
    {
        let asset = self
            .tree
            .find_asset(asset_id)
            .ok_or_else(|| AppError::not_found(format!("Asset '{asset_id}' not found")))?;

        on_select(asset);
        self.emit(TreeEvent::AssetSelected {
            asset_id: asset_id.clone(),
        });
        Ok(())
    }

    fn commit<T>(&mut self, tree: AssetTree, value: T, event: TreeEvent) -> Commit<T> {
        self.tree = tree;
        self.selection.rebase(&self.tree);

        let persist_error = self.persist().err();
        self.emit(event);
        if let Some(e) = &persist_error {
            warn!(error = %e, "Tree change kept in memory only");
            self.emit(TreeEvent::PersistenceFailed {
                kind: e.kind,
                message: e.message.clone(),
            });
        }

        Commit {
            value,
            persist_error,
        }
    }

    fn persist(&self) -> AppResult<()> {
        let blob = self.tree.serialize()?;
        self.store.set(&self.key, &blob)?;
        debug!(key = %self.key, bytes = blob.len(), "Tree persisted");
        Ok(())
    }

    fn emit(&self, payload: TreeEvent) {
        // No subscribers is fine.
        let _ = self.events.send(DomainEvent::new(payload));
    }
}

/// Returns the first blob found under `key`, then under each legacy key.
fn read_blob(
    store: &dyn PersistenceAdapter,
    key: &str,
    legacy_keys: &[String],
) -> AppResult<Option<(String, String)>> {
    if let Some(blob) = store.get(key)? {
        return Ok(Some((key.to_string(), blob)));
    }
    for legacy in legacy_keys.iter().filter(|legacy| legacy.as_str() != key) {
        match store.get(legacy) {
            Ok(Some(blob)) => return Ok(Some((legacy.clone(), blob))),
            Ok(None) => {}
            Err(e) => debug!(error = %e, legacy_key = %legacy, "Skipping unreadable legacy key"),
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assethub_core::config::tree::SelectionMode;
    use assethub_core::error::ErrorKind;
    use assethub_store::memory::MemoryStore;

    fn open_memory() -> (AssetManager, MemoryStore) {
        let store = MemoryStore::new();
        let manager = AssetManager::open(Arc::new(store.clone()), &AppConfig::default());
        (manager, store)
    }

    #[test]
    fn test_open_missing_writes_default() {
        let (manager, store) = open_memory();
        assert_eq!(manager.load_status(), &LoadStatus::Missing);
        assert!(store.get(manager.key()).unwrap().is_some());
        assert!(manager.current_folder().is_root());
    }

    #[test]
    fn test_open_corrupt_does_not_overwrite() {
        let store = MemoryStore::new();
        let key = AppConfig::default().store.key;
        store.set(&key, "{not json").unwrap();

        let manager = AssetManager::open(Arc::new(store.clone()), &AppConfig::default());
        assert!(manager.load_status().is_fallback());
        assert_eq!(store.get(&key).unwrap().as_deref(), Some("{not json"));
    }

    #[test]
    fn test_default_depth_limit() {
        let (mut manager, _) = open_memory();
        let mut parent = NodeId::root();
        for level in 0..32 {
            parent = manager
                .create_folder_in(&parent, &format!("level-{level}"))
                .unwrap()
                .into_value();
        }
        let err = manager.create_folder_in(&parent, "level-32").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[test]
    fn test_depth_limit_is_capped() {
        let mut config = AppConfig::default();
        config.tree.max_depth = 1_000;
        let manager = AssetManager::open(Arc::new(MemoryStore::new()), &config);
        assert_eq!(manager.max_depth, MAX_FOLDER_DEPTH);
    }

    #[test]
    fn test_legacy_key_is_adopted() {
        let store = MemoryStore::new();
        let legacy = r#"{"id":"root","name":"Root","children":[
            {"id":"f1","name":"Trip","isExpanded":true,"children":[]}
        ]}"#;
        store.set("assetManager", legacy).unwrap();

        let manager = AssetManager::open(Arc::new(store.clone()), &AppConfig::default());
        assert_eq!(manager.load_status(), &LoadStatus::Migrated);
        assert!(manager.tree().find_folder(&NodeId::from("f1")).is_some());

        let written = store.get(manager.key()).unwrap().unwrap();
        let (reloaded, status) = AssetTree::load(Some(&written));
        assert_eq!(status, LoadStatus::Restored);
        assert_eq!(&reloaded, manager.tree());
        assert_eq!(store.get("assetManager").unwrap().as_deref(), Some(legacy));
    }

    #[test]
    fn test_configured_key_wins_over_legacy() {
        let store = MemoryStore::new();
        let key = AppConfig::default().store.key;
        let (current, _) = ops::add_folder(&AssetTree::new(), &NodeId::root(), "Current").unwrap();
        store.set(&key, &current.serialize().unwrap()).unwrap();
        store
            .set("assetManagerTree", r#"{"name":"Old","folders":[],"images":[]}"#)
            .unwrap();

        let manager = AssetManager::open(Arc::new(store), &AppConfig::default());
        assert_eq!(manager.load_status(), &LoadStatus::Restored);
        assert_eq!(manager.tree(), &current);
    }

    #[test]
    fn test_rejected_mutation_emits_nothing() {
        let (mut manager, _) = open_memory();
        let mut events = manager.subscribe();

        let err = manager.create_folder("   ").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        let err = manager.toggle_folder(&NodeId::from("nope")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_events_follow_mutations() {
        let (mut manager, _) = open_memory();
        let mut events = manager.subscribe();

        let folder_id = manager.create_folder("Vacation").unwrap().into_value();
        let expanded = manager.toggle_folder(&folder_id).unwrap().into_value();
        assert!(expanded);

        match events.try_recv().unwrap().payload {
            TreeEvent::FolderCreated { folder_id: id, name, .. } => {
                assert_eq!(id, folder_id);
                assert_eq!(name, "Vacation");
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert_eq!(
            events.try_recv().unwrap().payload,
            TreeEvent::FolderToggled {
                folder_id,
                expanded: true
            }
        );
    }

    #[test]
    fn test_reject_duplicate_names_when_configured() {
        let mut config = AppConfig::default();
        config.tree.duplicate_folder_names = DuplicateNamePolicy::Reject;
        let mut manager = AssetManager::open(Arc::new(MemoryStore::new()), &config);

        let first = manager.create_folder("Trip").unwrap().into_value();
        let err = manager.create_folder(" Trip ").unwrap_err();
        assert_eq!(err.kind, ErrorKind::DuplicateName);

        let second = manager.create_folder("Other").unwrap().into_value();
        let err = manager.rename_folder(&second, "Trip").unwrap_err();
        assert_eq!(err.kind, ErrorKind::DuplicateName);
        manager.rename_folder(&first, "Trip").unwrap();
        assert_eq!(manager.tree().root().children.len(), 2);
    }

    #[test]
    fn test_allow_duplicate_names_by_default() {
        let (mut manager, _) = open_memory();
        manager.create_folder("Trip").unwrap();
        manager.create_folder("Trip").unwrap();
        assert_eq!(manager.tree().root().subfolders().count(), 2);
    }

    #[test]
    fn test_select_asset_invokes_callback() {
        let (mut manager, _) = open_memory();
        let ids = manager
            .add_assets(&NodeId::root(), vec![NewAsset::new("a.png", "ref1")])
            .unwrap()
            .into_value();

        let mut picked = None;
        manager
            .select_asset(&ids[0], |asset| picked = Some(asset.data.clone()))
            .unwrap();
        assert_eq!(picked.as_deref(), Some("ref1"));

        let err = manager
            .select_asset(&NodeId::root(), |_| panic!("root is not an asset"))
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[test]
    fn test_navigate_truncates() {
        let mut config = AppConfig::default();
        config.tree.selection = SelectionMode::Path;
        let mut manager = AssetManager::open(Arc::new(MemoryStore::new()), &config);

        let a = manager.create_folder("A").unwrap().into_value();
        manager.enter(&a).unwrap();
        let b = manager.create_folder("B").unwrap().into_value();

        let outcome = manager
            .navigate(&[a.clone(), NodeId::from("gone"), b.clone()])
            .unwrap();
        assert!(outcome.truncated);
        assert_eq!(outcome.folder_id, a);
        assert_eq!(manager.current_folder().id, a);

        let outcome = manager.navigate(&[NodeId::root(), a.clone(), b.clone()]).unwrap();
        assert!(!outcome.truncated);
        let crumbs: Vec<_> = manager.breadcrumbs().iter().map(|f| f.id.clone()).collect();
        assert_eq!(crumbs, vec![NodeId::root(), a, b]);
    }
}
