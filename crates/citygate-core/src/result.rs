//! Convenience result type alias for CityGate.

use crate::error::AppError;

/// A specialized `Result` type for CityGate operations.
pub type AppResult<T> = Result<T, AppError>;
