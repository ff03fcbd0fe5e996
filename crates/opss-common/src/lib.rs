//! opss-common: Shared types and errors used across all OPSS crates.

pub mod error;
pub mod entities;

// Re-export commonly used types
pub use entities::{Category, EdgeDetails, StandardRecord, HIGHLIGHT_COLOR};
pub use error::{ApiError, ApiResult};
