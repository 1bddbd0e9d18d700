/// Tunables for pointer interpretation and frame diagnostics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Pointer travel, in device independent pixels, before a press turns into a drag.
    pub drag_threshold_dips: f32,
    /// World-space distance an element may move during a drag and still count as a click.
    pub click_drag_tolerance: f32,
    /// Emit a `tracing` summary of tick throughput roughly once per second.
    pub trace_ticks: bool,
}

pub const DRAG_THRESHOLD_DIPS_ENV: &str = "UISCENE_DRAG_THRESHOLD_DIPS";
pub const CLICK_DRAG_TOLERANCE_ENV: &str = "UISCENE_CLICK_DRAG_TOLERANCE";
pub const TRACE_TICKS_ENV: &str = "UISCENE_TRACE_TICKS";

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            drag_threshold_dips: 4.0,
            click_drag_tolerance: 5.0,
            trace_ticks: false,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by any of the `UISCENE_*` environment variables that parse.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(value) = parse_positive(lookup(DRAG_THRESHOLD_DIPS_ENV)) {
            config.drag_threshold_dips = value;
        }
        if let Some(value) = parse_positive(lookup(CLICK_DRAG_TOLERANCE_ENV)) {
            config.click_drag_tolerance = value;
        }
        config.trace_ticks = lookup(TRACE_TICKS_ENV).is_some();
        config
    }

    pub const fn with_drag_threshold_dips(mut self, dips: f32) -> Self {
        self.drag_threshold_dips = dips;
        self
    }

    pub const fn with_click_drag_tolerance(mut self, tolerance: f32) -> Self {
        self.click_drag_tolerance = tolerance;
        self
    }
}

fn parse_positive(raw: Option<String>) -> Option<f32> {
    let value = raw?.trim().parse::<f32>().ok()?;
    if value.is_finite() && value >= 0.0 {
        Some(value)
    } else {
        tracing::warn!(value, "ignoring non-finite or negative engine config override");
        None
    }
}
