//! Utility module
//!
//! Shared error types and helpers

pub mod error;

pub use error::{codes, GenError, GenResult};
