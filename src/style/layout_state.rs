/// Resolved box of an element, relative to its parent's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayoutState {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl LayoutState {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Center of this box measured from the center of a parent box of the given size.
    pub fn center_offset_from_parent(&self, parent: Option<&LayoutState>) -> (f32, f32) {
        let cx = self.x + self.width * 0.5;
        let cy = self.y + self.height * 0.5;
        match parent {
            Some(parent) => (cx - parent.width * 0.5, cy - parent.height * 0.5),
            None => (cx, cy),
        }
    }
}

/// What an element declares about its own box before layout runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConstraints {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub clamp_to_parent: bool,
}

impl LayoutConstraints {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            clamp_to_parent: false,
        }
    }

    pub const fn clamped(mut self) -> Self {
        self.clamp_to_parent = true;
        self
    }
}

/// Layout collaborator. Must be idempotent: the same constraints and parent
/// box always resolve to the same state.
pub trait Layoutable {
    fn recompute_layout(
        &self,
        constraints: &LayoutConstraints,
        parent: Option<&LayoutState>,
    ) -> LayoutState;
}

/// Places the box at its declared offset with its declared size.
#[derive(Debug, Clone, Copy, Default)]
pub struct AbsoluteLayout;

impl Layoutable for AbsoluteLayout {
    fn recompute_layout(
        &self,
        constraints: &LayoutConstraints,
        parent: Option<&LayoutState>,
    ) -> LayoutState {
        let width = constraints.width.max(0.0);
        let height = constraints.height.max(0.0);
        let (width, height) = match parent {
            Some(parent) if constraints.clamp_to_parent => {
                let max_width = (parent.width.max(0.0) - constraints.x.max(0.0)).max(0.0);
                let max_height = (parent.height.max(0.0) - constraints.y.max(0.0)).max(0.0);
                (width.min(max_width), height.min(max_height))
            }
            _ => (width, height),
        };
        LayoutState::new(constraints.x, constraints.y, width, height)
    }
}
