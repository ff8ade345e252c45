//! End-to-end tests of the HTTP API against an in-process router.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use licita_analysis::{AnalysisBackend, AnalysisError, StatsBackend, TenderAnalysis};
use licita_core::{LicitaConfig, fixtures};
use licita_server::{AppState, build_router};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

const BOUNDARY: &str = "licita-test-boundary";

struct CannedAnalysis;

#[async_trait]
impl AnalysisBackend for CannedAnalysis {
    async fn analyze(&self, text: &str) -> licita_analysis::Result<TenderAnalysis> {
        Ok(TenderAnalysis {
            summary: format!("{} words", text.split_whitespace().count()),
            required_codes: "72000000".to_string(),
            ..TenderAnalysis::default()
        })
    }

    fn name(&self) -> &str {
        "canned"
    }
}

struct BrokenAnalysis;

#[async_trait]
impl AnalysisBackend for BrokenAnalysis {
    async fn analyze(&self, _text: &str) -> licita_analysis::Result<TenderAnalysis> {
        Err(AnalysisError::Status {
            status: 503,
            body: "overloaded".to_string(),
        })
    }

    fn name(&self) -> &str {
        "broken"
    }
}

fn test_config(upload_dir: &Path) -> LicitaConfig {
    let mut config = LicitaConfig::default();
    config.upload.dir = upload_dir.to_path_buf();
    config
}

fn app_with(config: LicitaConfig, analyzer: Arc<dyn AnalysisBackend>) -> Router {
    build_router(Arc::new(AppState::new(config).with_analyzer(analyzer)))
}

fn app(upload_dir: &TempDir) -> Router {
    app_with(test_config(upload_dir.path()), Arc::new(CannedAnalysis))
}

fn multipart_body(field: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"pliego.pdf\"\r\nContent-Type: {content_type}\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload_request(field: &str, content_type: &str, data: &[u8]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/extract")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(field, content_type, data)))
        .unwrap()
}

fn analyze_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/analyze")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn assert_no_leftovers(dir: &TempDir) {
    let left: Vec<_> = std::fs::read_dir(dir.path())
        .map(|entries| entries.filter_map(Result::ok).map(|e| e.path()).collect())
        .unwrap_or_default();
    assert!(left.is_empty(), "temporary uploads left behind: {:?}", left);
}

#[tokio::test]
async fn test_extract_text_pdf() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = fixtures::text_pdf(&[&["Hola PDF"], &["Pliego de condiciones"]]);

    let (status, body) = send(app(&dir), upload_request("file", "application/pdf", &pdf)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["text"], "Hola PDF\nPliego de condiciones");
    assert_eq!(body["metadata"]["characters"], 30);
    assert_eq!(body["metadata"]["words"], 5);
    assert_eq!(body["metadata"]["lines"], 2);
    assert_eq!(body["metadata"]["pages"], 2);
    assert_eq!(body["metadata"]["size"], pdf.len() as u64);
    assert_eq!(body["message"], "Text extracted successfully: 5 words, 2 lines");
    assert_no_leftovers(&dir);
}

#[tokio::test]
async fn test_tiny_pdf_is_too_small() {
    let dir = tempfile::tempdir().unwrap();
    let mut data = b"%PDF-1.4\n".to_vec();
    data.resize(40, b' ');

    let (status, body) = send(app(&dir), upload_request("file", "application/pdf", &data)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errorCode"], "too-small");
    assert!(body["suggestion"].is_string());
    assert!(body.get("technicalDetails").is_none());
    assert_no_leftovers(&dir);
}

#[tokio::test]
async fn test_png_is_wrong_mimetype() {
    let dir = tempfile::tempdir().unwrap();
    let mut png = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    png.resize(500, 0);

    let (status, body) = send(app(&dir), upload_request("file", "image/png", &png)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errorCode"], "wrong-mimetype");
    assert_eq!(body["receivedType"], "image/png");
    assert_no_leftovers(&dir);
}

#[tokio::test]
async fn test_fake_pdf_is_bad_signature() {
    let dir = tempfile::tempdir().unwrap();
    let data = vec![b'x'; 400];

    let (status, body) = send(app(&dir), upload_request("file", "application/pdf", &data)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errorCode"], "bad-signature");
    assert_no_leftovers(&dir);
}

#[tokio::test]
async fn test_image_only_pdf_is_scanned_or_empty() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = fixtures::image_only_pdf(1);

    let (status, body) = send(app(&dir), upload_request("file", "application/pdf", &pdf)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errorCode"], "scanned-or-empty");
    assert_eq!(body["suggestion"], "Run the document through an OCR tool first.");
    assert_no_leftovers(&dir);
}

#[tokio::test]
async fn test_corrupt_pdf() {
    let dir = tempfile::tempdir().unwrap();

    let (status, body) = send(
        app(&dir),
        upload_request("file", "application/pdf", &fixtures::corrupt_pdf()),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errorCode"], "corrupt");
    assert_no_leftovers(&dir);
}

#[tokio::test]
async fn test_oversize_upload_is_too_large() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(dir.path());
    config.upload.max_size_bytes = 1024;
    config.validation.max_size_bytes = 1024;
    let mut data = b"%PDF-1.4\n".to_vec();
    data.resize(4096, b'0');

    let (status, body) = send(
        app_with(config, Arc::new(CannedAnalysis)),
        upload_request("file", "application/pdf", &data),
    )
    .await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["errorCode"], "too-large");
    assert_no_leftovers(&dir);
}

#[tokio::test]
async fn test_missing_file_field() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = fixtures::text_pdf(&[&["Hola"]]);

    let (status, body) = send(app(&dir), upload_request("document", "application/pdf", &pdf)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errorCode"], "missing-file");
    assert_no_leftovers(&dir);
}

#[tokio::test]
async fn test_owner_restricted_pdf_is_extracted() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = fixtures::owner_protected_pdf(&[&["Pliego protegido"]]);

    let (status, body) = send(app(&dir), upload_request("file", "application/pdf", &pdf)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["text"], "Pliego protegido");
    assert_no_leftovers(&dir);
}

#[tokio::test]
async fn test_user_password_pdf_is_protected() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = fixtures::user_protected_pdf(&[&["Pliego protegido"]], "secret");

    let (status, body) = send(app(&dir), upload_request("file", "application/pdf", &pdf)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errorCode"], "password-protected");
    assert_no_leftovers(&dir);
}

#[tokio::test]
async fn test_raw_pdf_body_is_malformed_upload() {
    let dir = tempfile::tempdir().unwrap();
    let request = Request::builder()
        .method("POST")
        .uri("/api/extract")
        .header("content-type", "application/pdf")
        .body(Body::from(fixtures::text_pdf(&[&["Hola"]])))
        .unwrap();

    let (status, body) = send(app(&dir), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errorCode"], "malformed-upload");
    assert!(body["message"].is_string());
    assert_no_leftovers(&dir);
}

#[tokio::test]
async fn test_analyze_invalid_json() {
    let dir = tempfile::tempdir().unwrap();
    let request = Request::builder()
        .method("POST")
        .uri("/api/analyze")
        .header("content-type", "application/json")
        .body(Body::from("{ not json"))
        .unwrap();

    let (status, body) = send(app(&dir), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errorCode"], "malformed-request");
    assert!(body["technicalDetails"].is_string());
}

#[tokio::test]
async fn test_analyze_without_api_key_reports_statistics() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_with(test_config(dir.path()), Arc::new(StatsBackend::new()));

    let (status, body) = send(
        app,
        analyze_request(json!({ "text": "Obras viales. Plazo de doce meses." })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let summary = body["analysis"]["summary"].as_str().unwrap();
    assert!(summary.starts_with("Text statistics: 6 words"));
    assert!(summary.contains("2 sentences"));
}

#[tokio::test]
async fn test_analyze() {
    let dir = tempfile::tempdir().unwrap();

    let (status, body) = send(
        app(&dir),
        analyze_request(json!({ "text": "Suministro de equipos informaticos" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["analysis"]["summary"], "4 words");
    assert_eq!(body["analysis"]["required_codes"], "72000000");
}

#[tokio::test]
async fn test_analyze_blank_text() {
    let dir = tempfile::tempdir().unwrap();

    let (status, body) = send(app(&dir), analyze_request(json!({ "text": "  \n " }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errorCode"], "empty-text");
}

#[tokio::test]
async fn test_analyze_backend_failure() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_with(test_config(dir.path()), Arc::new(BrokenAnalysis));

    let (status, body) = send(app, analyze_request(json!({ "text": "Pliego" }))).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["errorCode"], "analysis-failed");
    assert!(
        body["technicalDetails"]
            .as_str()
            .unwrap()
            .contains("overloaded")
    );
}

#[tokio::test]
async fn test_unknown_route() {
    let dir = tempfile::tempdir().unwrap();
    let request = Request::builder()
        .uri("/api/nothing")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(app(&dir), request).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["errorCode"], "not-found");
}

#[tokio::test]
async fn test_health() {
    let dir = tempfile::tempdir().unwrap();
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(app(&dir), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["analysis"], "canned");
}
