//! Services module
//!
//! The fallback executor and its defensive helpers

pub mod contract;
pub mod executor;

pub use executor::FallbackExecutor;
