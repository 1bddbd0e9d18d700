use glam::Vec2;

/// Local placement of an element. `position` is the element's center relative
/// to its parent's center, `scale` is its size in world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    position: Vec2,
    scale: Vec2,
    active: bool,
    dirty: bool,
}

impl Default for Transform {
    fn default() -> Self {
        Self::new(Vec2::ZERO, Vec2::ZERO)
    }
}

impl Transform {
    pub fn new(position: Vec2, scale: Vec2) -> Self {
        Self {
            position,
            scale,
            active: true,
            dirty: true,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn scale(&self) -> Vec2 {
        self.scale
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_position(&mut self, position: Vec2) {
        if self.position != position {
            self.position = position;
            self.dirty = true;
        }
    }

    pub fn set_scale(&mut self, scale: Vec2) {
        if self.scale != scale {
            self.scale = scale;
            self.dirty = true;
        }
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Signals the renderer that cached matrices for this element are stale.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

#[cfg(test)]
mod tests {
    use super::Transform;
    use glam::Vec2;

    #[test]
    fn unchanged_values_keep_the_signal_clear() {
        let mut transform = Transform::new(Vec2::new(1.0, 2.0), Vec2::ONE);
        assert!(transform.take_dirty());
        transform.set_position(Vec2::new(1.0, 2.0));
        transform.set_scale(Vec2::ONE);
        assert!(!transform.is_dirty());
        transform.set_scale(Vec2::splat(3.0));
        assert!(transform.take_dirty());
        assert!(!transform.is_dirty());
    }
}
