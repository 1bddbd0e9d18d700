mod layout_state;

pub use layout_state::*;

use crate::view::{DirtyState, ElementId, SceneTree};

/// Side effects the style cascade asks the scene to apply. The scene does not
/// care why a value changed, only which invalidation it implies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleChange {
    ColorChanged,
    VisibilityChanged(bool),
    /// `false` detaches the element from ancestor clipping (scroll viewports).
    ScissorConnection(bool),
    ClipChildren(bool),
}

impl SceneTree {
    pub fn apply_style_change(&mut self, id: ElementId, change: StyleChange) {
        tracing::trace!(?id, ?change, "style change");
        match change {
            StyleChange::ColorChanged => {
                self.mark_dirty(id, DirtyState::ColorChange);
            }
            StyleChange::VisibilityChanged(visible) => {
                if self.element(id).transform().is_active() == visible {
                    return;
                }
                self.element_mut(id).transform_mut().set_active(visible);
                self.notify_layout_changed(id, DirtyState::Layout);
            }
            StyleChange::ScissorConnection(connected) => {
                let disconnected = self.element(id).is_scissor_disconnected();
                if connected && disconnected {
                    self.reconnect_to_parent_scissor(id);
                } else if !connected && !disconnected {
                    self.disconnect_parent_scissor(id);
                }
            }
            StyleChange::ClipChildren(clip) => {
                self.element_mut(id).set_clips_children(clip);
                if clip {
                    self.generate_scissor(id);
                } else {
                    self.restore_inherited_scissor(id);
                }
            }
        }
    }
}
