//! Shared utilities: errors, logging, time and the validation boundary

pub mod error;
pub mod logger;
pub mod result;
pub mod time;
pub mod validation;

pub use error::{AppError, AppResponse, ok, ok_with_message};
pub use result::AppResult;
pub use validation::FieldErrors;
