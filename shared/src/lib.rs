//! Shared types for the Univ platform
//!
//! Error codes, error types, the API response envelope and the pure billing
//! domain rules used by univ-cloud and its tests.

pub mod billing;
pub mod error;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
