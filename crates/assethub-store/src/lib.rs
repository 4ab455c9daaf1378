//! # assethub-store
//!
//! [`PersistenceAdapter`](assethub_core::traits::PersistenceAdapter)
//! implementations for AssetHub. Supports two modes:
//!
//! - **memory**: In-process map using [dashmap](https://crates.io/crates/dashmap),
//!   with an optional byte quota
//! - **local**: One file per key under a root directory
//!
//! The adapter is selected at runtime based on configuration.

pub mod keys;
#[cfg(feature = "local")]
pub mod local;
#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;

pub use provider::StoreManager;
