//! Result alias for API handlers

use super::error::AppError;

/// Result type returned by all API handlers
pub type AppResult<T> = Result<T, AppError>;
