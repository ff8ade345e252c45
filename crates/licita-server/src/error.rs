use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use licita_analysis::AnalysisError;
use licita_core::{ErrorCategory, ErrorReport, LicitaError};
use tracing::error;

pub type ServerResult<T> = Result<T, ServerError>;

/// Server error types
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error(transparent)]
    Licita(#[from] LicitaError),

    #[error("No file field in the upload")]
    MissingFile,

    #[error("No text to analyze")]
    EmptyText,

    #[error("Malformed request body: {0}")]
    MalformedRequest(String),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("Not found")]
    NotFound,
}

impl ServerError {
    /// Report sent to the client.
    pub fn report(&self) -> ErrorReport {
        match self {
            ServerError::Licita(err) => ErrorReport::from(err),
            ServerError::MissingFile => ErrorReport::new(ErrorCategory::MissingFile),
            ServerError::EmptyText | ServerError::Analysis(AnalysisError::EmptyInput) => {
                ErrorReport::new(ErrorCategory::EmptyText)
            }
            ServerError::MalformedRequest(details) => ErrorReport {
                technical_details: Some(details.clone()),
                ..ErrorReport::new(ErrorCategory::MalformedRequest)
            },
            ServerError::Analysis(_) => {
                ErrorReport::with_details(ErrorCategory::AnalysisFailed, self.to_string())
            }
            ServerError::NotFound => ErrorReport::new(ErrorCategory::NotFound),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let report = self.report();
        let status =
            StatusCode::from_u16(report.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            error!("{}: {}", report.error_code, self);
        }

        (status, Json(report)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use licita_core::Rejection;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_rejection_report() {
        let err = ServerError::from(LicitaError::from(Rejection::NotPdfMimeType {
            received: "text/html".to_string(),
        }));
        let report = err.report();
        assert_eq!(report.error_code, "wrong-mimetype");
        assert_eq!(report.status, 400);
        assert_eq!(report.received_type.as_deref(), Some("text/html"));
    }

    #[test]
    fn test_not_found_report() {
        let report = ServerError::NotFound.report();
        assert_eq!(report.error_code, "not-found");
        assert_eq!(report.status, 404);
        assert_eq!(report.suggestion, None);
    }

    #[test]
    fn test_malformed_request_report() {
        let report = ServerError::MalformedRequest("expected value at line 1".to_string()).report();
        assert_eq!(report.error_code, "malformed-request");
        assert_eq!(report.status, 400);
        assert_eq!(
            report.technical_details.as_deref(),
            Some("expected value at line 1")
        );
    }

    #[test]
    fn test_analysis_failure_is_bad_gateway() {
        let err = ServerError::from(AnalysisError::Status {
            status: 500,
            body: "upstream down".to_string(),
        });
        let report = err.report();
        assert_eq!(report.error_code, "analysis-failed");
        assert_eq!(report.status, 502);
        assert!(report.technical_details.unwrap().contains("upstream down"));
    }

    #[test]
    fn test_empty_input_from_backend() {
        let report = ServerError::from(AnalysisError::EmptyInput).report();
        assert_eq!(report.error_code, "empty-text");
        assert_eq!(report.status, 400);
    }
}
