use std::error::Error as _;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("template rendering failed: {0}")]
    TemplateRender(String),

    #[error("template not found: {0}")]
    TemplateNotFound(String),

    #[error("template parse error: {0}")]
    TemplateParse(String),

    #[error("browser launch failed: {0}")]
    BrowserLaunch(String),

    #[error("page load failed: {0}")]
    Navigation(String),

    #[error("PDF generation failed: {0}")]
    Pdf(String),

    #[error("PDF rendering timed out after {0:?}")]
    Timeout(Duration),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<tera::Error> for ExportError {
    fn from(e: tera::Error) -> Self {
        ExportError::TemplateRender(describe(&e))
    }
}

/// Tera keeps the useful part of a failure (the undefined variable, the
/// failing filter) in the source chain, not in the top-level message.
pub(crate) fn describe(e: &tera::Error) -> String {
    let mut message = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
