//! Convenience result type alias for Abyss.

use crate::error::AppError;

/// A specialized `Result` type for Abyss operations.
pub type AppResult<T> = Result<T, AppError>;
