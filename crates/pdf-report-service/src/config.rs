use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use eyre::WrapErr;

use pdf_report_export::DEFAULT_TEMPLATE_PATH;
use pdf_report_export::pdf::DEFAULT_RENDER_TIMEOUT;

pub const DEFAULT_BIND: &str = "0.0.0.0:5001";

/// Runtime settings, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    /// Report template, re-read on every render.
    pub template_path: PathBuf,
    pub render_timeout: Duration,
    /// Chromium binary; auto-detected when unset.
    pub chrome_executable: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> eyre::Result<Self> {
        let bind = lookup("PDF_REPORT_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind_addr = bind
            .parse::<SocketAddr>()
            .wrap_err_with(|| format!("invalid PDF_REPORT_BIND: {bind}"))?;

        let template_path = lookup("PDF_REPORT_TEMPLATE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TEMPLATE_PATH));

        let render_timeout = match lookup("PDF_REPORT_RENDER_TIMEOUT_SECS") {
            Some(secs) => Duration::from_secs(
                secs.parse::<u64>()
                    .wrap_err_with(|| format!("invalid PDF_REPORT_RENDER_TIMEOUT_SECS: {secs}"))?,
            ),
            None => DEFAULT_RENDER_TIMEOUT,
        };

        let chrome_executable = lookup("PDF_REPORT_CHROME")
            .filter(|path| !path.is_empty())
            .map(PathBuf::from);

        Ok(Self {
            bind_addr,
            template_path,
            render_timeout,
            chrome_executable,
        })
    }
}
