//! Prompt module for LLM-based operations.
//!
//! Prompt text is static data: the wording is what the model sees, so it is
//! kept verbatim here rather than assembled from parts.

pub mod triage;

pub use triage::*;
