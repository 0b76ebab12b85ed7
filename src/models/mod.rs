//! Data model module
//!
//! Attempt/metadata records and the HTTP boundary envelope

pub mod envelope;
pub mod metadata;

pub use envelope::{GenerateRequest, GenerateResponse};
pub use metadata::{AttemptStatus, ErrorCategory, GenerationMetadata, Mode, ProviderAttempt};
