use std::time::Duration;

/// Page geometry and load settings for rasterization.
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    /// Browser viewport width in CSS pixels.
    pub viewport_width: u32,

    /// Browser viewport height in CSS pixels.
    pub viewport_height: u32,

    /// Paper width in inches.
    pub paper_width_inches: f64,

    /// Paper height in inches.
    pub paper_height_inches: f64,

    /// Page margin in inches (applied to all four sides).
    pub margin_inches: f64,

    /// Print CSS backgrounds and colors.
    pub print_background: bool,

    /// How long the page must go without in-flight requests to count as loaded.
    pub network_idle_ms: u64,
}

impl PageLayout {
    /// A4 at 96 DPI with half-inch margins.
    pub fn a4() -> Self {
        Self {
            viewport_width: 794,
            viewport_height: 1123,
            paper_width_inches: 8.27,
            paper_height_inches: 11.69,
            margin_inches: 0.5,
            print_background: true,
            network_idle_ms: 500,
        }
    }

    pub fn network_idle_window(&self) -> Duration {
        Duration::from_millis(self.network_idle_ms)
    }
}

impl Default for PageLayout {
    fn default() -> Self {
        Self::a4()
    }
}
