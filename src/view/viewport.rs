use super::{DisplayMetrics, FixedDisplay, PointerRules, SceneTree, drag_threshold_px};
use crate::config::EngineConfig;
use crate::ui::{MouseButton, PointerState, PointerTracker};
use std::time::{Duration, Instant};

/// Counters gathered over one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub events_fired: usize,
    pub events_queued: usize,
    pub events_dropped: usize,
    pub elements_cleaned: usize,
}

/// Drives a [`SceneTree`] one frame at a time from accumulated window input.
pub struct Viewport {
    scene: SceneTree,
    config: EngineConfig,
    display: Box<dyn DisplayMetrics>,
    input_state: PointerTracker,
    tick_stats: TickStats,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}

impl Viewport {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Configured from `UISCENE_*` environment variables.
    pub fn new_from_env() -> Self {
        Self::with_config(EngineConfig::from_env())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            scene: SceneTree::new(),
            config,
            display: Box::new(FixedDisplay::default()),
            input_state: PointerTracker::new(),
            tick_stats: TickStats::new(config.trace_ticks),
        }
    }

    pub fn with_scene(mut self, scene: SceneTree) -> Self {
        self.scene = scene;
        self
    }

    pub fn set_display(&mut self, display: impl DisplayMetrics + 'static) {
        self.display = Box::new(display);
    }

    pub fn scene(&self) -> &SceneTree {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut SceneTree {
        &mut self.scene
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: EngineConfig) {
        self.tick_stats.enabled = config.trace_ticks;
        self.config = config;
    }

    pub fn pointer_rules(&self) -> PointerRules {
        PointerRules {
            drag_threshold_px: drag_threshold_px(self.display.as_ref(), self.config.drag_threshold_dips),
            click_drag_tolerance: self.config.click_drag_tolerance,
        }
    }

    pub fn set_mouse_position(&mut self, x: f32, y: f32) {
        self.input_state.set_mouse_position(x, y);
    }

    pub fn clear_mouse_position(&mut self) {
        self.input_state.clear_mouse_position();
    }

    pub fn set_mouse_button_pressed(&mut self, button: MouseButton, pressed: bool) {
        self.input_state.set_mouse_button_pressed(button, pressed);
    }

    pub fn is_mouse_button_pressed(&self, button: MouseButton) -> bool {
        self.input_state.is_mouse_button_pressed(button)
    }

    pub fn add_scroll(&mut self, delta_x: f32, delta_y: f32) {
        self.input_state.add_scroll(delta_x, delta_y);
    }

    /// Runs one frame with the input accumulated since the previous tick.
    pub fn tick(&mut self) -> TickReport {
        let pointer = self.input_state.take_frame();
        self.tick_with(pointer)
    }

    /// Runs one frame: every element sees `pointer` in tree order, dispatch
    /// groups flush, then whatever is still dirty gets cleaned.
    pub fn tick_with(&mut self, pointer: PointerState) -> TickReport {
        let started = Instant::now();
        let rules = self.pointer_rules();
        self.scene.begin_frame(pointer);

        for id in self.scene.traversal_order() {
            // removed by an earlier handler this tick
            if !self.scene.contains(id) {
                continue;
            }
            self.scene.update_element(id, &rules);
        }
        self.scene.flush_groups();
        self.scene.clean_all();

        let report = self.scene.end_frame();
        tracing::trace!(?report, "tick");
        self.tick_stats.record_tick(started.elapsed(), &report);
        report
    }

    pub fn request_redraw(&mut self) {
        self.scene.request_redraw();
    }

    pub fn redraw_requested(&self) -> bool {
        self.scene.redraw_requested()
    }

    pub fn take_redraw_request(&mut self) -> bool {
        self.scene.take_redraw_request()
    }
}

struct TickStats {
    enabled: bool,
    last_report_at: Instant,
    ticks: u32,
    total_tick_time: Duration,
    events_fired: usize,
    elements_cleaned: usize,
}

impl TickStats {
    fn new(enabled: bool) -> Self {
        Self {
            enabled,
            last_report_at: Instant::now(),
            ticks: 0,
            total_tick_time: Duration::ZERO,
            events_fired: 0,
            elements_cleaned: 0,
        }
    }

    fn record_tick(&mut self, tick_time: Duration, report: &TickReport) {
        if !self.enabled {
            return;
        }

        self.ticks += 1;
        self.total_tick_time += tick_time;
        self.events_fired += report.events_fired;
        self.elements_cleaned += report.elements_cleaned;

        let elapsed = self.last_report_at.elapsed();
        if elapsed < Duration::from_secs(1) {
            return;
        }

        let secs = elapsed.as_secs_f64().max(f64::EPSILON);
        let tps = self.ticks as f64 / secs;
        let avg_ms = (self.total_tick_time.as_secs_f64() * 1000.0) / self.ticks as f64;

        tracing::debug!(
            tps,
            tick_avg_ms = avg_ms,
            ticks = self.ticks,
            events = self.events_fired,
            cleaned = self.elements_cleaned,
            "tick stats"
        );

        self.last_report_at = Instant::now();
        self.ticks = 0;
        self.total_tick_time = Duration::ZERO;
        self.events_fired = 0;
        self.elements_cleaned = 0;
    }
}
