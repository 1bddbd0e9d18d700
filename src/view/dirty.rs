use super::base_component::{ElementCapabilities, ElementId};
use super::SceneTree;
use crate::ui::EventType;
use glam::{Vec2, Vec4};
use rustc_hash::FxHashSet;

/// Pending recomputation on an element. Own states were requested on the
/// element itself, `Parent*` states were inherited from an ancestor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DirtyState {
    #[default]
    None,
    Layout,
    Resize,
    Generated,
    /// Rebuilt, but another rebuild is still owed downstream.
    ReGenerated,
    ColorChange,
    Scissor,
    ParentLayout,
    ParentResize,
    ParentGenerated,
    ParentReGenerated,
    ParentColorChange,
    ParentScissor,
}

impl DirtyState {
    pub fn is_clean(self) -> bool {
        self == DirtyState::None
    }

    pub fn is_inherited(self) -> bool {
        self.inherited_rank().is_some()
    }

    /// Strength among the `Parent*` states, in declaration order.
    fn inherited_rank(self) -> Option<u8> {
        match self {
            DirtyState::ParentLayout => Some(0),
            DirtyState::ParentResize => Some(1),
            DirtyState::ParentGenerated => Some(2),
            DirtyState::ParentReGenerated => Some(3),
            DirtyState::ParentColorChange => Some(4),
            DirtyState::ParentScissor => Some(5),
            _ => None,
        }
    }

    /// The state descendants receive when this one is set on an ancestor.
    pub fn inherited(self) -> DirtyState {
        match self {
            DirtyState::Layout => DirtyState::ParentLayout,
            DirtyState::Resize => DirtyState::ParentResize,
            DirtyState::Generated => DirtyState::ParentGenerated,
            DirtyState::ReGenerated => DirtyState::ParentReGenerated,
            DirtyState::ColorChange => DirtyState::ParentColorChange,
            DirtyState::Scissor => DirtyState::ParentScissor,
            other => other,
        }
    }

    /// Whether the element, or an ancestor, may have moved or changed size.
    pub fn moves_geometry(self) -> bool {
        matches!(
            self,
            DirtyState::Layout
                | DirtyState::Resize
                | DirtyState::Generated
                | DirtyState::ReGenerated
                | DirtyState::ParentLayout
                | DirtyState::ParentResize
                | DirtyState::ParentGenerated
                | DirtyState::ParentReGenerated
        )
    }

    /// State left behind once the element's own clean step ran.
    pub fn decayed(self) -> DirtyState {
        match self {
            DirtyState::ReGenerated => DirtyState::Generated,
            _ => DirtyState::None,
        }
    }

    /// Whether `kind` may replace `self`.
    pub fn accepts(self, kind: DirtyState) -> bool {
        match kind {
            DirtyState::None => false,
            DirtyState::Generated | DirtyState::ReGenerated => true,
            _ => match (self.inherited_rank(), kind.inherited_rank()) {
                _ if self.is_clean() => true,
                (Some(_), None) => true,
                (Some(current), Some(incoming)) => incoming >= current,
                (None, _) => false,
            },
        }
    }

    /// Whether an ancestor's inherited `incoming` state may overwrite `self`.
    fn yields_to_inherited(self, incoming: DirtyState) -> bool {
        if self.is_clean() {
            return true;
        }
        match (self.inherited_rank(), incoming.inherited_rank()) {
            (Some(current), Some(incoming)) => current <= incoming,
            _ => false,
        }
    }
}

impl SceneTree {
    /// Requests `kind` on `id` and raises every descendant to the inherited
    /// form. Returns `false` when the current state dominates `kind`.
    ///
    /// # Panics
    /// When `id` is stale.
    pub fn mark_dirty(&mut self, id: ElementId, kind: DirtyState) -> bool {
        let element = self.element_mut(id);
        let previous = element.dirty;
        if !previous.accepts(kind) {
            return false;
        }
        element.dirty = kind;
        tracing::trace!(?id, ?previous, ?kind, "mark dirty");

        let inherited = kind.inherited();
        let mut stack = element.children.clone();
        while let Some(current) = stack.pop() {
            let descendant = self.element_mut(current);
            if descendant.dirty.yields_to_inherited(inherited) {
                descendant.dirty = inherited;
            }
            stack.extend(descendant.children.iter().copied());
        }
        true
    }

    /// Marks `id` with `kind`, then tells the parent its content changed.
    pub fn notify_layout_changed(&mut self, id: ElementId, kind: DirtyState) {
        self.mark_dirty(id, kind);
        let Some(parent) = self.element(id).parent else {
            return;
        };
        if self.element(parent).dirty.is_clean() {
            self.mark_dirty(parent, DirtyState::ParentLayout);
        } else {
            self.mark_dirty(parent, DirtyState::ReGenerated);
        }
    }

    /// Cleans `id`, its dirty ancestors first and its dirty descendants after.
    /// No-op on a clean element.
    ///
    /// # Panics
    /// When `id` is stale.
    pub fn clean(&mut self, id: ElementId) {
        if self.element(id).dirty.is_clean() {
            return;
        }
        self.clean_ancestors(id);
        if self.contains(id) {
            self.clean_descending(id);
        }
    }

    /// Cleans every dirty element in the tree, parents before children.
    pub fn clean_all(&mut self) {
        let order = self.traversal_order();
        let dirty_at_start: FxHashSet<ElementId> = order
            .iter()
            .copied()
            .filter(|id| !self.nodes[*id].dirty.is_clean())
            .collect();
        for id in order {
            let Some(element) = self.get(id) else {
                continue;
            };
            if element.dirty.is_clean() {
                continue;
            }
            // reached through the parent's own pass
            if element.parent.is_some_and(|parent| dirty_at_start.contains(&parent)) {
                continue;
            }
            self.clean(id);
        }
    }

    fn clean_descending(&mut self, id: ElementId) {
        self.clean_own(id);
        if !self.contains(id) {
            return;
        }
        let children = self.element(id).children.clone();
        for child in children {
            // a rebuild handler may have detached it or removed the parent
            if !self.contains(id) {
                return;
            }
            if !self.element(id).children.contains(&child) {
                continue;
            }
            if !self.element(child).dirty.is_clean() {
                self.clean_descending(child);
            }
        }
    }

    /// Runs the own clean step of each dirty ancestor of `id`, root first.
    pub(crate) fn clean_ancestors(&mut self, id: ElementId) {
        let mut chain = Vec::new();
        let mut cursor = self.element(id).parent;
        while let Some(current) = cursor {
            chain.push(current);
            cursor = self.element(current).parent;
        }
        for ancestor in chain.into_iter().rev() {
            // removed by a rebuild handler, and `id` with it
            if !self.contains(ancestor) {
                return;
            }
            if !self.element(ancestor).dirty.is_clean() {
                self.clean_own(ancestor);
            }
        }
    }

    /// The element's own work: layout, rebuild handlers, transform signal,
    /// clip derivation and derived size. Leaves children alone.
    pub(crate) fn clean_own(&mut self, id: ElementId) {
        let element = self.element(id);
        let state = element.dirty;
        if let Some(constraints) = element.layout {
            let parent_box = element
                .parent
                .map(|parent| self.element(parent))
                .filter(|parent| parent.layout.is_some())
                .map(|parent| parent.layout_state);
            let resolved = self.layout.recompute_layout(&constraints, parent_box.as_ref());
            let (x, y) = resolved.center_offset_from_parent(parent_box.as_ref());
            let element = self.element_mut(id);
            element.layout_state = resolved;
            element.transform.set_position(Vec2::new(x, y));
            element
                .transform
                .set_scale(Vec2::new(resolved.width, resolved.height));
        }

        self.fire_event(id, EventType::Rebuild);
        if !self.contains(id) {
            return;
        }

        self.element_mut(id).transform.mark_dirty();
        let element = self.element(id);
        if element.scissor_self_derived && state.moves_geometry() {
            self.regenerate_scissor(id);
        } else if element.clips_children && !element.scissor.is_bounded() {
            self.generate_scissor(id);
        }

        let element = self.element_mut(id);
        element.dirty = element.dirty.decayed();
        if element.is_drawable() {
            let scale = element.transform.scale();
            element.size_2d = Vec4::new(
                scale.x,
                scale.y,
                element.texture_size.x,
                element.texture_size.y,
            );
        }
        self.counters.elements_cleaned += 1;
        tracing::trace!(?id, ?state, "cleaned");
    }
}
