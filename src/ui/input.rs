use glam::Vec2;
use rustc_hash::FxHashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Back,
    Forward,
    Other(u16),
}

/// Pointer input for one frame, as the hit tester consumes it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerState {
    pub position: Vec2,
    pub moved: bool,
    pub pressed: bool,
    pub released: bool,
    pub scrolled: bool,
    pub scroll_delta: Vec2,
}

impl Default for PointerState {
    fn default() -> Self {
        Self::idle(OFF_SURFACE)
    }
}

/// Position reported once the pointer has left the surface. Never inside any bounds.
pub const OFF_SURFACE: Vec2 = Vec2::splat(f32::INFINITY);

impl PointerState {
    pub fn idle(position: Vec2) -> Self {
        Self {
            position,
            moved: false,
            pressed: false,
            released: false,
            scrolled: false,
            scroll_delta: Vec2::ZERO,
        }
    }

    pub fn moved_to(position: Vec2) -> Self {
        Self {
            moved: true,
            ..Self::idle(position)
        }
    }

    pub fn pressed_at(position: Vec2) -> Self {
        Self {
            pressed: true,
            ..Self::idle(position)
        }
    }

    pub fn released_at(position: Vec2) -> Self {
        Self {
            released: true,
            ..Self::idle(position)
        }
    }

    pub fn scrolled_at(position: Vec2, delta: Vec2) -> Self {
        Self {
            scrolled: true,
            scroll_delta: delta,
            ..Self::idle(position)
        }
    }

    pub fn is_idle(&self) -> bool {
        !(self.moved || self.pressed || self.released || self.scrolled)
    }
}

/// Accumulates raw window input between frames and hands it out as a
/// [`PointerState`] once per tick. Only the primary button drives press and
/// release; the rest are tracked for queries.
#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    position: Option<Vec2>,
    moved: bool,
    pressed: bool,
    released: bool,
    scroll_delta: Vec2,
    scrolled: bool,
    pressed_mouse_buttons: FxHashSet<MouseButton>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_mouse_position(&mut self, x: f32, y: f32) {
        let next = Vec2::new(x, y);
        if self.position != Some(next) {
            self.position = Some(next);
            self.moved = true;
        }
    }

    pub fn clear_mouse_position(&mut self) {
        if self.position.take().is_some() {
            self.moved = true;
        }
    }

    pub fn mouse_position(&self) -> Option<Vec2> {
        self.position
    }

    pub fn set_mouse_button_pressed(&mut self, button: MouseButton, pressed: bool) {
        let changed = if pressed {
            self.pressed_mouse_buttons.insert(button)
        } else {
            self.pressed_mouse_buttons.remove(&button)
        };
        if changed && button == MouseButton::Left {
            if pressed {
                self.pressed = true;
            } else {
                self.released = true;
            }
        }
    }

    pub fn is_mouse_button_pressed(&self, button: MouseButton) -> bool {
        self.pressed_mouse_buttons.contains(&button)
    }

    pub fn add_scroll(&mut self, delta_x: f32, delta_y: f32) {
        self.scroll_delta += Vec2::new(delta_x, delta_y);
        self.scrolled = true;
    }

    /// Drains the per-frame edges. Held buttons and the position persist.
    pub fn take_frame(&mut self) -> PointerState {
        let state = PointerState {
            position: self.position.unwrap_or(OFF_SURFACE),
            moved: self.moved,
            pressed: self.pressed,
            released: self.released,
            scrolled: self.scrolled,
            scroll_delta: self.scroll_delta,
        };
        self.moved = false;
        self.pressed = false;
        self.released = false;
        self.scrolled = false;
        self.scroll_delta = Vec2::ZERO;
        state
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
