//! Local directory persistence adapter.

pub mod store;

pub use store::LocalStore;
