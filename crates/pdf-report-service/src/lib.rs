//! pdf-report-service
//!
//! HTTP surface for rendering maintenance-inspection reports to PDF and
//! HTML.

use axum::extract::DefaultBodyLimit;
use axum::middleware as axum_mw;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

use state::AppState;

/// Largest accepted request body. Payloads may carry inline images.
pub const BODY_LIMIT_BYTES: usize = 16 * 1024 * 1024;

/// Build the service router.
///
/// Routes are served at the root and again under `/api/reports`, the prefix
/// the frontend client uses.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(report_routes())
        .nest("/api/reports", report_routes())
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(axum_mw::from_fn(middleware::request_log::log_request))
        .layer(cors)
        .with_state(state)
}

fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/generate-pdf", post(routes::reports::generate_pdf))
        .route("/preview-html", post(routes::reports::preview_html))
}
