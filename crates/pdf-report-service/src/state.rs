use std::sync::Arc;

use pdf_report_export::pdf::Rasterizer;

use crate::config::Config;

/// Shared application state, injected into all route handlers via Axum state.
///
/// Both members are read-only; a render never mutates anything shared.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub rasterizer: Arc<dyn Rasterizer>,
}
