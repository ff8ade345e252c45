//! Shared, immutable server state.

use std::sync::Arc;

use licita_analysis::{backend_from_config, AnalysisBackend};
use licita_core::{ExtractionPipeline, LicitaConfig, UploadReceiver};

/// State shared by all handlers.
pub struct AppState {
    pub config: LicitaConfig,
    pub pipeline: ExtractionPipeline,
    pub receiver: UploadReceiver,
    analyzer: Arc<dyn AnalysisBackend>,
}

impl AppState {
    /// Build the state from configuration.
    ///
    /// A missing analysis API key does not prevent startup; `/api/analyze`
    /// then answers with text statistics only.
    pub fn new(config: LicitaConfig) -> Self {
        Self {
            pipeline: ExtractionPipeline::new(&config),
            receiver: UploadReceiver::from_config(&config.upload),
            analyzer: backend_from_config(&config.analysis),
            config,
        }
    }

    /// Replace the analysis backend.
    pub fn with_analyzer(mut self, backend: Arc<dyn AnalysisBackend>) -> Self {
        self.analyzer = backend;
        self
    }

    /// The analysis backend.
    pub fn analyzer(&self) -> &dyn AnalysisBackend {
        self.analyzer.as_ref()
    }
}
