//! # assethub-service
//!
//! Behaviour on top of the asset tree model: pure tree operations, the
//! selection controllers, upload ingestion, and the [`AssetManager`] that
//! ties them to a persistence adapter.
//!
//! The manager receives its store at construction as an
//! `Arc<dyn PersistenceAdapter>`; nothing in this crate reaches for
//! ambient storage.

pub mod folder;
pub mod manager;
pub mod selection;
pub mod upload;

pub use folder::{NewAsset, Navigation, navigate};
pub use manager::{AssetManager, Commit, NavigateOutcome};
pub use selection::{IdSelection, PathSelection, SelectionController};
pub use upload::{AssetEncoder, DataUriEncoder, Ingestor, PathSource, UploadFile};
