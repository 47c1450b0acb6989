use axum::body::Bytes;
use axum::extract::State;
use axum::http::header;
use axum::response::{Html, IntoResponse, Response};
use serde_json::{Map, Value};

use pdf_report_core::filenames;
use pdf_report_core::models::report::{ReportContext, inspection_id, payload_object};
use pdf_report_core::status::format_status;
use pdf_report_core::time;
use pdf_report_export::error::ExportError;
use pdf_report_export::render::{REPORT_TEMPLATE_NAME, load_template, render_report};

use crate::error::ApiError;
use crate::state::AppState;

/// Render the report and return it as a downloadable PDF.
pub async fn generate_pdf(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let payload = payload_object(&body)?;
    let html = render_html(&state, &payload)?;
    let pdf = state.rasterizer.rasterize(&html).await?;

    let filename = filenames::report_pdf(
        &inspection_id(&payload),
        &time::filename_date(&time::now_local()),
    );
    tracing::info!(filename = %filename, bytes = pdf.len(), "report pdf generated");

    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        ),
    ];
    Ok((headers, pdf).into_response())
}

/// Render the report as HTML without rasterizing it.
pub async fn preview_html(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Html<String>, ApiError> {
    let payload = payload_object(&body)?;
    let html = render_html(&state, &payload)?;
    Ok(Html(html))
}

fn render_html(state: &AppState, payload: &Map<String, Value>) -> Result<String, ExportError> {
    let report = ReportContext::from_payload(payload);
    let template = load_template(&state.config.template_path)?;
    render_report(REPORT_TEMPLATE_NAME, &template, &report, format_status)
}
