use super::base_component::ElementId;
use super::{DirtyState, SceneTree};
use glam::{Vec2, Vec4};

/// Screen-space clip rectangle stored as (left, top, right, bottom).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScissorRect(Vec4);

impl Default for ScissorRect {
    fn default() -> Self {
        Self::UNBOUNDED
    }
}

impl ScissorRect {
    /// "No clip". Every finite point is inside it.
    pub const UNBOUNDED: Self = Self(Vec4::new(-f32::MAX, -f32::MAX, f32::MAX, f32::MAX));

    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self(Vec4::new(left, top, right, bottom))
    }

    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self::new(
            center.x - half.x,
            center.y - half.y,
            center.x + half.x,
            center.y + half.y,
        )
    }

    pub fn left(&self) -> f32 {
        self.0.x
    }

    pub fn top(&self) -> f32 {
        self.0.y
    }

    pub fn right(&self) -> f32 {
        self.0.z
    }

    pub fn bottom(&self) -> f32 {
        self.0.w
    }

    pub fn is_bounded(&self) -> bool {
        self.0.x > -f32::MAX
    }

    /// Edges count as inside.
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.left()
            && point.x <= self.right()
            && point.y >= self.top()
            && point.y <= self.bottom()
    }

    pub fn as_vec4(&self) -> Vec4 {
        self.0
    }
}

impl From<ScissorRect> for Vec4 {
    fn from(rect: ScissorRect) -> Self {
        rect.0
    }
}

impl SceneTree {
    /// Stores `rect` on `id` and pushes it down the subtree. Disconnected
    /// elements, and everything below them, keep their own clip.
    ///
    /// # Panics
    /// When `id` is stale.
    pub fn set_scissor(&mut self, id: ElementId, rect: ScissorRect) {
        let element = self.element_mut(id);
        if element.disconnected_scissor {
            return;
        }
        element.scissor = rect;
        element.scissor_self_derived = false;
        let children = element.children.clone();
        for child in children {
            self.set_scissor(child, rect);
        }
        if self.element(id).dirty.is_clean() {
            self.mark_dirty(id, DirtyState::Scissor);
        }
    }

    /// Derives a clip from the element's own world bounds, unless it already has one.
    pub fn generate_scissor(&mut self, id: ElementId) {
        if self.element(id).scissor.is_bounded() {
            return;
        }
        let rect = self.world_bounds(id);
        tracing::trace!(?id, ?rect, "generate scissor");
        self.set_scissor(id, rect);
        self.element_mut(id).scissor_self_derived = true;
    }

    /// Throws away a clip derived from the element's bounds and derives it
    /// again from where the element is now. Inherited clips are left alone.
    pub(crate) fn regenerate_scissor(&mut self, id: ElementId) {
        let element = self.element_mut(id);
        if !element.scissor_self_derived {
            return;
        }
        let disconnected = std::mem::take(&mut element.disconnected_scissor);
        self.set_scissor(id, ScissorRect::UNBOUNDED);
        self.generate_scissor(id);
        self.element_mut(id).disconnected_scissor = disconnected;
    }

    /// Stops ancestor clips from reaching `id`; the element clips to itself instead.
    pub fn disconnect_parent_scissor(&mut self, id: ElementId) {
        self.element_mut(id).disconnected_scissor = false;
        self.set_scissor(id, ScissorRect::UNBOUNDED);
        self.generate_scissor(id);
        self.element_mut(id).disconnected_scissor = true;
    }

    pub fn reconnect_to_parent_scissor(&mut self, id: ElementId) {
        self.element_mut(id).disconnected_scissor = false;
        match self.inherited_scissor(id) {
            Some(rect) => self.set_scissor(id, rect),
            None => {
                self.set_scissor(id, ScissorRect::UNBOUNDED);
                self.generate_scissor(id);
            }
        }
    }

    /// Replaces the element's clip with whatever its ancestors impose.
    pub fn restore_inherited_scissor(&mut self, id: ElementId) {
        if self.element(id).disconnected_scissor {
            return;
        }
        let rect = self.inherited_scissor(id).unwrap_or(ScissorRect::UNBOUNDED);
        self.set_scissor(id, rect);
    }

    /// Clip of the nearest ancestor that has one.
    pub fn inherited_scissor(&self, id: ElementId) -> Option<ScissorRect> {
        let mut cursor = self.element(id).parent;
        while let Some(current) = cursor {
            let element = self.element(current);
            if element.scissor.is_bounded() {
                return Some(element.scissor);
            }
            cursor = element.parent;
        }
        None
    }
}
