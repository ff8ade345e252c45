//! Analysis backend implementations.

pub mod openai;
pub mod stats;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::{Result, TenderAnalysis};
use openai::{OpenAiBackend, OpenAiConfig};
use stats::StatsBackend;

/// Trait for analysis service backends.
///
/// Implementations take cleaned document text and return the structured
/// analysis. Callers only rely on the call succeeding and the response
/// having the [`TenderAnalysis`] shape; the content itself is not checked.
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    /// Analyze the given document text.
    async fn analyze(&self, text: &str) -> Result<TenderAnalysis>;

    /// Model or service identifier, for logging.
    fn name(&self) -> &str;
}

/// The chat-completions backend when it can be built, otherwise the
/// statistics-only [`StatsBackend`].
pub fn backend_from_config(config: &OpenAiConfig) -> Arc<dyn AnalysisBackend> {
    match OpenAiBackend::from_config(config) {
        Ok(backend) => {
            info!("Analysis backend ready (model {})", backend.name());
            Arc::new(backend)
        }
        Err(e) => {
            warn!("{}; falling back to text statistics", e);
            Arc::new(StatsBackend::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_configured_key_selects_chat_backend() {
        let backend = backend_from_config(&OpenAiConfig {
            api_key: Some("sk-test".to_string()),
            model: "gpt-test".to_string(),
            ..OpenAiConfig::default()
        });
        assert_eq!(backend.name(), "gpt-test");
    }

    #[test]
    fn test_missing_key_falls_back_to_stats() {
        if std::env::var(openai::API_KEY_ENV).is_ok() {
            return;
        }
        let backend = backend_from_config(&OpenAiConfig::default());
        assert_eq!(backend.name(), "text-statistics");
    }
}
