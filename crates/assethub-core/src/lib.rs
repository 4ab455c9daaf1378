//! # assethub-core
//!
//! Core crate for AssetHub. Contains the persistence adapter trait,
//! configuration schemas, node identifiers, domain events, and the
//! unified error system.
//!
//! This crate has **no** internal dependencies on other AssetHub crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
