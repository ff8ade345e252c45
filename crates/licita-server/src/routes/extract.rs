//! `POST /api/extract`

use std::sync::Arc;

use axum::Json;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use licita_core::{ExtractionResult, LicitaError, TextMetadata, UploadError};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ServerError, ServerResult};
use crate::state::AppState;

/// Name of the multipart field carrying the PDF.
pub const FILE_FIELD: &str = "file";

/// Successful extraction body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExtractResponse {
    pub success: bool,
    pub text: String,
    pub metadata: TextMetadata,
    pub message: String,
}

impl From<ExtractionResult> for ExtractResponse {
    fn from(result: ExtractionResult) -> Self {
        let message = format!(
            "Text extracted successfully: {} words, {} lines",
            result.metadata.words, result.metadata.lines
        );
        Self {
            success: true,
            text: result.text,
            metadata: result.metadata,
            message,
        }
    }
}

/// Receive the `file` field to a temporary file, validate it, extract its
/// text and delete it. Other fields are ignored.
pub async fn extract_text(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ServerResult<Json<ExtractResponse>> {
    let mut multipart = multipart.map_err(|rejection| {
        debug!("Rejected non-multipart upload: {}", rejection.body_text());
        ServerError::from(LicitaError::from(UploadError::Stream(rejection.body_text())))
    })?;
    let max_size = state.receiver.max_size();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| upload_error(e, max_size))?
    {
        if field.name() != Some(FILE_FIELD) {
            debug!("Ignoring multipart field {:?}", field.name());
            continue;
        }

        let mime_type = field.content_type().unwrap_or_default().to_string();
        let original_name = field.file_name().map(String::from);

        let (upload, document) = state
            .receiver
            .receive(field, &mime_type, original_name)
            .await
            .map_err(LicitaError::from)?;

        info!(
            "Processing upload {} ({} bytes, {})",
            document.original_name.as_deref().unwrap_or("unnamed"),
            document.size,
            document.mime_type
        );

        let result = state.pipeline.process_upload(upload, document).await?;
        return Ok(Json(result.into()));
    }

    Err(ServerError::MissingFile)
}

fn upload_error(err: MultipartError, max_size: u64) -> ServerError {
    let err = if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        UploadError::TooLarge { max: max_size }
    } else {
        UploadError::Stream(err.body_text())
    };
    LicitaError::from(err).into()
}
