//! pdf-report-export
//!
//! HTML rendering of report contexts through Tera, and HTML to PDF
//! rasterization through a headless Chromium.

pub mod error;
pub mod layout;
pub mod pdf;
pub mod render;

/// Report template bundled with this crate.
pub const DEFAULT_TEMPLATE_PATH: &str =
    concat!(env!("CARGO_MANIFEST_DIR"), "/templates/report_template.html");
