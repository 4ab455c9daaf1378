//! In-memory persistence adapter.

pub mod store;

pub use store::MemoryStore;
