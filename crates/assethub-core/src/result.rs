//! Convenience result type alias for AssetHub.

use crate::error::AppError;

/// A specialized `Result` type for AssetHub operations.
///
/// Tree operations use the `Err` arm as their observable no-op: the
/// caller keeps the previous tree and can inspect the [`AppError::kind`].
pub type AppResult<T> = Result<T, AppError>;
