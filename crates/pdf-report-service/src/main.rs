use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use pdf_report_export::layout::PageLayout;
use pdf_report_export::pdf::ChromiumRasterizer;
use pdf_report_service::config::Config;
use pdf_report_service::state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Structured JSON logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let config = Config::from_env()?;

    let mut rasterizer =
        ChromiumRasterizer::new(PageLayout::a4()).with_timeout(config.render_timeout);
    if let Some(executable) = &config.chrome_executable {
        rasterizer = rasterizer.with_executable(executable);
    }

    let bind_addr = config.bind_addr;
    tracing::info!(
        template = %config.template_path.display(),
        render_timeout_secs = config.render_timeout.as_secs(),
        "configuration loaded"
    );

    let state = AppState {
        config: Arc::new(config),
        rasterizer: Arc::new(rasterizer),
    };

    let listener = TcpListener::bind(bind_addr).await?;
    tracing::info!(addr = %bind_addr, "pdf-report-service listening");

    axum::serve(listener, pdf_report_service::app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
