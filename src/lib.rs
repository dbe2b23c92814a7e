//! # abstract-triage
//!
//! Biomedical Abstract Triage Assistant - classifies PubMed abstracts into one
//! of five Friedreich's Ataxia (FA) research categories with a hosted LLM.
//!
//! ## Modules
//!
//! - [`classifier`] - prompt, model call, fence stripping, JSON parsing
//! - [`prompts`] - the fixed triage prompt and example abstract
//! - [`labels`] - the five triage labels
//! - [`generator`] - text-generation backend trait
//! - [`gemini`] - Gemini `generateContent` client
//! - [`config`] - API key and endpoint configuration
//! - [`server`] - single-page UI and JSON API
//! - [`error`] - Custom error types
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use abstract_triage::{config::{ConfigSources, TriageConfig}, gemini::GeminiClient, Classifier};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = TriageConfig::load(&ConfigSources::default())?;
//!     let classifier = Classifier::new(Arc::new(GeminiClient::new(&config)?));
//!     let result = classifier.classify("Frataxin deficiency causes iron overload.").await?;
//!     println!("{}: {}", result.label, result.reason);
//!     Ok(())
//! }
//! ```

pub mod classifier;
pub mod config;
pub mod error;
pub mod gemini;
pub mod generator;
pub mod labels;
pub mod prompts;
pub mod server;

pub use classifier::{ClassificationRequest, ClassificationResult, Classifier};
pub use error::{ClassificationError, ConfigError, Result};
pub use labels::Label;
