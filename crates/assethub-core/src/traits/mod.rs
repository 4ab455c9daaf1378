//! Core traits defined in `assethub-core` and implemented by other crates.

pub mod store;

pub use store::PersistenceAdapter;
