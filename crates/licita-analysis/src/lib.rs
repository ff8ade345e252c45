//! Language-model analysis layer for licita.
//!
//! This crate hides the external analysis service behind a small trait:
//! extracted tender text goes in, a fixed-shape [`TenderAnalysis`] comes out.
//! The main backend speaks the OpenAI-compatible chat-completions protocol
//! with a strict JSON schema response format; without an API key,
//! [`backend_from_config`] falls back to [`StatsBackend`].

mod analysis;
mod backend;
mod error;

pub use analysis::{analysis_schema, truncate_input, TenderAnalysis};
pub use backend::openai::{OpenAiBackend, OpenAiConfig};
pub use backend::stats::{StatsBackend, TextStats};
pub use backend::{backend_from_config, AnalysisBackend};
pub use error::AnalysisError;

/// Result type for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;
