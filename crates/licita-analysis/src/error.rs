//! Error types for the analysis layer.

use thiserror::Error;

/// Errors that can occur while calling the analysis service.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// No API key configured and none found in the environment.
    #[error("analysis API key is not configured (set analysis.api_key or OPENAI_API_KEY)")]
    MissingApiKey,

    /// The text handed to the service was empty.
    #[error("no text to analyze")]
    EmptyInput,

    /// Transport-level failure (connect, timeout, TLS).
    #[error("analysis request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("analysis service returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The service answered without any choice content.
    #[error("analysis service returned no content")]
    EmptyResponse,

    /// The content did not match the expected analysis shape.
    #[error("invalid analysis response: {0}")]
    InvalidResponse(#[from] serde_json::Error),
}
