//! HTTP contract tests, driven through the router with a fake rasterizer.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Request, StatusCode, header};
use futures::future::BoxFuture;
use serde_json::{Value, json};
use tower::ServiceExt;

use pdf_report_export::DEFAULT_TEMPLATE_PATH;
use pdf_report_export::error::ExportError;
use pdf_report_export::pdf::Rasterizer;
use pdf_report_service::config::Config;
use pdf_report_service::state::AppState;

const FAKE_PDF: &[u8] = b"%PDF-1.7\n% fake\n";

#[derive(Default)]
struct FakeRasterizer {
    seen: Mutex<Vec<String>>,
}

impl Rasterizer for FakeRasterizer {
    fn rasterize<'a>(&'a self, html: &'a str) -> BoxFuture<'a, Result<Vec<u8>, ExportError>> {
        self.seen.lock().unwrap().push(html.to_string());
        Box::pin(async { Ok(FAKE_PDF.to_vec()) })
    }
}

struct FailingRasterizer;

impl Rasterizer for FailingRasterizer {
    fn rasterize<'a>(&'a self, _html: &'a str) -> BoxFuture<'a, Result<Vec<u8>, ExportError>> {
        Box::pin(async { Err(ExportError::BrowserLaunch("no chromium here".to_string())) })
    }
}

fn config(template_path: impl Into<PathBuf>) -> Config {
    Config {
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        template_path: template_path.into(),
        render_timeout: Duration::from_secs(5),
        chrome_executable: None,
    }
}

fn app_with(rasterizer: Arc<dyn Rasterizer>, template_path: &str) -> Router {
    pdf_report_service::app(AppState {
        config: Arc::new(config(template_path)),
        rasterizer,
    })
}

fn app() -> Router {
    app_with(Arc::new(FakeRasterizer::default()), DEFAULT_TEMPLATE_PATH)
}

fn post(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap()
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, HeaderMap, Bytes) {
    let res = app.oneshot(req).await.unwrap();
    let status = res.status();
    let headers = res.headers().clone();
    let body = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    (status, headers, body)
}

fn json_body(body: &Bytes) -> Value {
    serde_json::from_slice(body).expect("json body")
}

fn header_str<'a>(headers: &'a HeaderMap, name: header::HeaderName) -> &'a str {
    headers.get(name).expect("header present").to_str().unwrap()
}

/// Returns the date part of `attachment; filename="maintenance_report_<id>_<date>.pdf"`.
fn filename_date<'a>(disposition: &'a str, id: &str) -> &'a str {
    let prefix = format!("attachment; filename=\"maintenance_report_{id}_");
    disposition
        .strip_prefix(prefix.as_str())
        .and_then(|rest| rest.strip_suffix(".pdf\""))
        .unwrap_or_else(|| panic!("unexpected disposition: {disposition}"))
}

#[tokio::test]
async fn health_reports_healthy() {
    let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, _, body) = send(app(), req).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        &body[..],
        br#"{"status":"healthy","service":"pdf-report-service"}"#
    );
}

#[tokio::test]
async fn routes_are_mounted_under_api_prefix() {
    let req = Request::builder()
        .uri("/api/reports/health")
        .body(Body::empty())
        .unwrap();
    let (status, _, body) = send(app(), req).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body)["status"], "healthy");
}

#[tokio::test]
async fn generate_pdf_without_body_is_rejected() {
    let (status, _, body) = send(app(), post("/generate-pdf", Body::empty())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json_body(&body), json!({ "error": "No data provided" }));
}

#[tokio::test]
async fn generate_pdf_with_empty_object_is_rejected() {
    let (status, _, body) = send(app(), post("/generate-pdf", "{}")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json_body(&body), json!({ "error": "No data provided" }));
}

#[tokio::test]
async fn generate_pdf_returns_attachment() {
    let rasterizer = Arc::new(FakeRasterizer::default());
    let app = app_with(rasterizer.clone(), DEFAULT_TEMPLATE_PATH);
    let req = post(
        "/generate-pdf",
        r#"{"customer_name": "Acme", "inspection_id": "42"}"#,
    );
    let (status, headers, body) = send(app, req).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(header_str(&headers, header::CONTENT_TYPE), "application/pdf");
    let date = filename_date(header_str(&headers, header::CONTENT_DISPOSITION), "42");
    assert_eq!(date.len(), 8);
    assert!(date.chars().all(|c| c.is_ascii_digit()), "{date}");
    assert_eq!(&body[..], FAKE_PDF);

    let seen = rasterizer.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert!(seen[0].contains("Acme"));
}

#[tokio::test]
async fn generate_pdf_defaults_inspection_id() {
    let (status, headers, _) =
        send(app(), post("/generate-pdf", r#"{"customer_name": "Acme"}"#)).await;

    assert_eq!(status, StatusCode::OK);
    filename_date(header_str(&headers, header::CONTENT_DISPOSITION), "unknown");
}

#[tokio::test]
async fn generate_pdf_surfaces_rasterizer_failure() {
    let app = app_with(Arc::new(FailingRasterizer), DEFAULT_TEMPLATE_PATH);
    let (status, _, body) = send(app, post("/generate-pdf", r#"{"customer_name": "Acme"}"#)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json_body(&body),
        json!({ "error": "browser launch failed: no chromium here" })
    );
}

#[tokio::test]
async fn generate_pdf_skips_rasterizer_when_template_is_missing() {
    let rasterizer = Arc::new(FakeRasterizer::default());
    let app = app_with(rasterizer.clone(), "/nonexistent/report_template.html");
    let (status, _, body) = send(app, post("/generate-pdf", r#"{"customer_name": "Acme"}"#)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let error = json_body(&body)["error"].as_str().unwrap().to_string();
    assert!(error.starts_with("template not found"), "{error}");
    assert!(rasterizer.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn preview_html_renders_document() {
    let req = post(
        "/preview-html",
        r#"{"customer_name": "Acme", "inspection_id": "42"}"#,
    );
    let (status, headers, body) = send(app(), req).await;

    assert_eq!(status, StatusCode::OK);
    assert!(header_str(&headers, header::CONTENT_TYPE).starts_with("text/html"));
    let html = std::str::from_utf8(&body).unwrap();
    assert!(html.contains("Acme"));
    assert!(!html.contains("class=\"item-row\""));
}

#[tokio::test]
async fn preview_html_lists_maintenance_items() {
    let payload = json!({
        "customer_name": "Acme",
        "maintenance_items": [
            { "item": "Clean sensors", "status": "completed", "notes": "" },
            { "item": "Replace brushes", "status": "pending", "notes": "Next visit" },
        ],
    });
    let (status, _, body) = send(app(), post("/preview-html", payload.to_string())).await;

    assert_eq!(status, StatusCode::OK);
    let html = std::str::from_utf8(&body).unwrap();
    assert_eq!(html.matches("class=\"item-row\"").count(), 2);
    assert!(html.contains("Replace brushes"));
}

#[tokio::test]
async fn preview_html_without_body_is_rejected() {
    let (status, _, body) = send(app(), post("/preview-html", Body::empty())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json_body(&body), json!({ "error": "No data provided" }));
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let (status, _, body) = send(app(), post("/preview-html", "{\"customer_name\":")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json_body(&body)["error"].as_str().unwrap().starts_with("invalid JSON body"));
}

#[tokio::test]
async fn non_object_json_is_a_bad_request() {
    let (status, _, body) = send(app(), post("/preview-html", "[1, 2, 3]")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(&body),
        json!({ "error": "request body must be a JSON object" })
    );
}

#[tokio::test]
async fn malformed_item_fails_render() {
    let payload = json!({ "maintenance_items": [{ "item": "Lidar", "status": 5 }] });
    let (status, _, body) = send(app(), post("/preview-html", payload.to_string())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let error = json_body(&body)["error"].as_str().unwrap().to_string();
    assert!(error.starts_with("template rendering failed"), "{error}");
}
