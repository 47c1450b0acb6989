use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::cdp::browser_protocol::network::{
    EventLoadingFailed, EventLoadingFinished, EventRequestWillBeSent,
};
use chromiumoxide::cdp::browser_protocol::page::PrintToPdfParams;
use chromiumoxide::Page;
use futures::future::BoxFuture;
use futures::StreamExt;
use tokio::time::{Instant, timeout, timeout_at};

use crate::error::ExportError;
use crate::layout::PageLayout;

pub const DEFAULT_RENDER_TIMEOUT: Duration = Duration::from_secs(60);

/// How long a browser gets to exit on its own before it is killed.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Turns a complete HTML document into PDF bytes.
pub trait Rasterizer: Send + Sync {
    fn rasterize<'a>(&'a self, html: &'a str) -> BoxFuture<'a, Result<Vec<u8>, ExportError>>;
}

/// Rasterizer backed by a headless Chromium driven over CDP.
///
/// Every call launches its own browser process and closes it afterwards;
/// nothing is pooled between renders.
#[derive(Debug, Clone)]
pub struct ChromiumRasterizer {
    layout: PageLayout,
    timeout: Duration,
    executable: Option<PathBuf>,
}

impl ChromiumRasterizer {
    pub fn new(layout: PageLayout) -> Self {
        Self {
            layout,
            timeout: DEFAULT_RENDER_TIMEOUT,
            executable: None,
        }
    }

    /// Upper bound on launch, page load and print together.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_executable(mut self, executable: impl Into<PathBuf>) -> Self {
        self.executable = Some(executable.into());
        self
    }

    fn browser_config(&self) -> Result<BrowserConfig, ExportError> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .window_size(self.layout.viewport_width, self.layout.viewport_height);
        if let Some(executable) = &self.executable {
            builder = builder.chrome_executable(executable);
        }
        builder.build().map_err(ExportError::BrowserLaunch)
    }

    async fn render(&self, html: &str) -> Result<Vec<u8>, ExportError> {
        let deadline = Instant::now() + self.timeout;
        let timed_out = || ExportError::Timeout(self.timeout);

        let config = self.browser_config()?;
        let (mut browser, mut handler) = timeout_at(deadline, Browser::launch(config))
            .await
            .map_err(|_| timed_out())?
            .map_err(|e| ExportError::BrowserLaunch(e.to_string()))?;
        tracing::debug!("browser launched");

        let handler_task = tokio::spawn(async move {
            // A message the bindings cannot decode is not fatal; keep the
            // connection alive until the browser goes away.
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!(error = %e, "cdp handler error");
                }
            }
        });

        let result = match timeout_at(deadline, capture(&browser, html, &self.layout)).await {
            Ok(result) => result,
            Err(_) => Err(timed_out()),
        };

        shut_down(&mut browser, SHUTDOWN_GRACE).await;
        handler_task.abort();

        result
    }
}

impl Default for ChromiumRasterizer {
    fn default() -> Self {
        Self::new(PageLayout::default())
    }
}

impl Rasterizer for ChromiumRasterizer {
    fn rasterize<'a>(&'a self, html: &'a str) -> BoxFuture<'a, Result<Vec<u8>, ExportError>> {
        Box::pin(async move {
            let result = self.render(html).await;
            if let Err(e) = &result {
                tracing::warn!(error = %e, "rasterization failed");
            }
            result
        })
    }
}

/// Teardown operations of a launched browser process.
trait BrowserProcess: Send {
    fn close(&mut self) -> BoxFuture<'_, Result<(), String>>;
    fn wait(&mut self) -> BoxFuture<'_, Result<(), String>>;
    fn kill(&mut self) -> BoxFuture<'_, ()>;
}

impl BrowserProcess for Browser {
    fn close(&mut self) -> BoxFuture<'_, Result<(), String>> {
        Box::pin(async move {
            Browser::close(self)
                .await
                .map(|_| ())
                .map_err(|e| e.to_string())
        })
    }

    fn wait(&mut self) -> BoxFuture<'_, Result<(), String>> {
        Box::pin(async move {
            Browser::wait(self)
                .await
                .map(|_| ())
                .map_err(|e| e.to_string())
        })
    }

    fn kill(&mut self) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            if let Some(Err(e)) = Browser::kill(self).await {
                tracing::warn!(error = %e, "failed to kill browser process");
            }
        })
    }
}

/// Close the browser and reap its process. Falls back to killing it when
/// the close command fails or the process outlives `grace`.
async fn shut_down<B: BrowserProcess>(browser: &mut B, grace: Duration) {
    let outcome = timeout(grace, async {
        browser.close().await?;
        browser.wait().await
    })
    .await;

    match outcome {
        Ok(Ok(())) => return,
        Ok(Err(e)) => tracing::warn!(error = %e, "browser did not close cleanly, killing it"),
        Err(_) => tracing::warn!("browser did not exit in time, killing it"),
    }
    browser.kill().await;
}

async fn capture(browser: &Browser, html: &str, layout: &PageLayout) -> Result<Vec<u8>, ExportError> {
    let page = browser
        .new_page("about:blank")
        .await
        .map_err(|e| ExportError::Navigation(e.to_string()))?;

    page.execute(SetDeviceMetricsOverrideParams::new(
        i64::from(layout.viewport_width),
        i64::from(layout.viewport_height),
        1.0,
        false,
    ))
    .await
    .map_err(|e| ExportError::Navigation(e.to_string()))?;

    load_until_network_idle(&page, html, layout.network_idle_window()).await?;
    tracing::debug!("page loaded and network idle");

    let pdf = page
        .pdf(print_params(layout))
        .await
        .map_err(|e| ExportError::Pdf(e.to_string()))?;
    tracing::debug!(bytes = pdf.len(), "pdf captured");

    Ok(pdf)
}

/// Load `html` into the page, then wait until no request has been in
/// flight for `idle_window`.
async fn load_until_network_idle(
    page: &Page,
    html: &str,
    idle_window: Duration,
) -> Result<(), ExportError> {
    let navigation = |e: chromiumoxide::error::CdpError| ExportError::Navigation(e.to_string());

    // Subscribe before loading so no request goes unseen.
    let mut started = page
        .event_listener::<EventRequestWillBeSent>()
        .await
        .map_err(navigation)?;
    let mut finished = page
        .event_listener::<EventLoadingFinished>()
        .await
        .map_err(navigation)?;
    let mut failed = page
        .event_listener::<EventLoadingFailed>()
        .await
        .map_err(navigation)?;

    page.set_content(html).await.map_err(navigation)?;

    let mut in_flight: HashSet<String> = HashSet::new();
    loop {
        tokio::select! {
            Some(event) = started.next() => {
                in_flight.insert(event.request_id.inner().clone());
            }
            Some(event) = finished.next() => {
                in_flight.remove(event.request_id.inner());
            }
            Some(event) = failed.next() => {
                in_flight.remove(event.request_id.inner());
            }
            _ = tokio::time::sleep(idle_window), if in_flight.is_empty() => break,
            else => break,
        }
    }

    Ok(())
}

fn print_params(layout: &PageLayout) -> PrintToPdfParams {
    PrintToPdfParams {
        print_background: Some(layout.print_background),
        paper_width: Some(layout.paper_width_inches),
        paper_height: Some(layout.paper_height_inches),
        margin_top: Some(layout.margin_inches),
        margin_bottom: Some(layout.margin_inches),
        margin_left: Some(layout.margin_inches),
        margin_right: Some(layout.margin_inches),
        ..Default::default()
    }
}
