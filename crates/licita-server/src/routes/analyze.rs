//! `POST /api/analyze`

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use licita_analysis::TenderAnalysis;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ServerError, ServerResult};
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub analysis: TenderAnalysis,
}

/// Send extracted tender text to the analysis backend.
pub async fn analyze_text(
    State(state): State<Arc<AppState>>,
    request: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> ServerResult<Json<AnalyzeResponse>> {
    let Json(request) =
        request.map_err(|rejection| ServerError::MalformedRequest(rejection.body_text()))?;
    if request.text.trim().is_empty() {
        return Err(ServerError::EmptyText);
    }

    let analyzer = state.analyzer();
    info!(
        "Analyzing {} characters with {}",
        request.text.chars().count(),
        analyzer.name()
    );

    let analysis = analyzer.analyze(&request.text).await?;
    Ok(Json(AnalyzeResponse {
        success: true,
        analysis,
    }))
}
