use super::base_component::{Element, ElementCapabilities, ElementDesc, ElementId, GroupId};
use super::{DirtyState, ScissorRect, TickReport};
use crate::error::{SceneError, SceneResult};
use crate::style::{AbsoluteLayout, LayoutConstraints, Layoutable};
use crate::ui::{DispatchGroup, PointerState};
use glam::Vec2;
use slotmap::SlotMap;

/// Arena owning every element of a scene plus its dispatch groups.
pub struct SceneTree {
    pub(crate) nodes: SlotMap<ElementId, Element>,
    roots: Vec<ElementId>,
    pub(crate) groups: SlotMap<GroupId, DispatchGroup>,
    pub(crate) layout: Box<dyn Layoutable>,
    pointer: PointerState,
    redraw_requested: bool,
    pub(crate) counters: TickReport,
}

impl Default for SceneTree {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SceneTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneTree")
            .field("elements", &self.nodes.len())
            .field("roots", &self.roots)
            .field("groups", &self.groups.len())
            .finish()
    }
}

impl SceneTree {
    pub fn new() -> Self {
        Self::with_layout(AbsoluteLayout)
    }

    pub fn with_layout(layout: impl Layoutable + 'static) -> Self {
        Self {
            nodes: SlotMap::with_key(),
            roots: Vec::new(),
            groups: SlotMap::with_key(),
            layout: Box::new(layout),
            pointer: PointerState::default(),
            redraw_requested: false,
            counters: TickReport::default(),
        }
    }

    pub fn insert_root(&mut self, desc: ElementDesc) -> ElementId {
        let id = self
            .nodes
            .insert_with_key(|id| Element::from_desc(id, None, desc));
        self.roots.push(id);
        tracing::trace!(?id, "insert root");
        id
    }

    /// Appends a new element under `parent`. The child starts with the
    /// parent's clip and a pending layout; the parent is marked for layout.
    pub fn insert_child(&mut self, parent: ElementId, desc: ElementDesc) -> SceneResult<ElementId> {
        let parent_element = self.get(parent).ok_or(SceneError::StaleElement(parent))?;
        if !parent_element.is_container() {
            return Err(SceneError::NotAContainer(parent));
        }
        let scissor = parent_element.scissor();
        let id = self
            .nodes
            .insert_with_key(|id| Element::from_desc(id, Some(parent), desc));
        self.nodes[id].scissor = scissor;
        self.nodes[parent].children.push(id);
        tracing::trace!(?id, ?parent, "insert child");
        self.mark_dirty(parent, DirtyState::Layout);
        Ok(id)
    }

    /// Removes the element with its whole subtree. Handlers, latches and any
    /// queued group deliveries go with it.
    pub fn remove(&mut self, id: ElementId) -> SceneResult<()> {
        let parent = self.get(id).ok_or(SceneError::StaleElement(id))?.parent;
        self.unlink(id, parent);
        let subtree = self.subtree(id);
        for removed in &subtree {
            self.nodes.remove(*removed);
            self.purge_queued_events(*removed);
        }
        tracing::trace!(?id, removed = subtree.len(), "remove subtree");
        if let Some(parent) = parent {
            self.mark_dirty(parent, DirtyState::Layout);
        }
        Ok(())
    }

    /// Moves `id` under `new_parent`, or makes it a root when `None`.
    pub fn reparent(&mut self, id: ElementId, new_parent: Option<ElementId>) -> SceneResult<()> {
        let old_parent = self.get(id).ok_or(SceneError::StaleElement(id))?.parent;
        if let Some(parent) = new_parent {
            let parent_element = self.get(parent).ok_or(SceneError::StaleElement(parent))?;
            if !parent_element.is_container() {
                return Err(SceneError::NotAContainer(parent));
            }
            if parent == id || self.is_ancestor(id, parent) {
                return Err(SceneError::Cycle { child: id, parent });
            }
        }
        if old_parent == new_parent {
            return Ok(());
        }

        self.unlink(id, old_parent);
        self.nodes[id].parent = new_parent;
        match new_parent {
            Some(parent) => self.nodes[parent].children.push(id),
            None => self.roots.push(id),
        }
        tracing::trace!(?id, ?old_parent, ?new_parent, "reparent");

        if let Some(parent) = old_parent {
            self.mark_dirty(parent, DirtyState::Layout);
        }
        if let Some(parent) = new_parent {
            self.mark_dirty(parent, DirtyState::Layout);
        }
        self.mark_dirty(id, DirtyState::Layout);
        self.restore_inherited_scissor(id);
        Ok(())
    }

    fn unlink(&mut self, id: ElementId, parent: Option<ElementId>) {
        match parent {
            Some(parent) => {
                if let Some(parent) = self.nodes.get_mut(parent) {
                    parent.children.retain(|child| *child != id);
                }
            }
            None => self.roots.retain(|root| *root != id),
        }
    }

    /// Whether `ancestor` appears on the parent chain of `id`.
    pub fn is_ancestor(&self, ancestor: ElementId, id: ElementId) -> bool {
        let mut cursor = self.get(id).and_then(Element::parent);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.get(current).and_then(Element::parent);
        }
        false
    }

    /// `id` followed by its descendants in pre-order.
    pub fn subtree(&self, id: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(element) = self.get(current) else {
                continue;
            };
            out.push(current);
            stack.extend(element.children.iter().rev().copied());
        }
        out
    }

    /// Every element, parents before children, siblings in insertion order.
    pub fn traversal_order(&self) -> Vec<ElementId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        for root in &self.roots {
            out.extend(self.subtree(*root));
        }
        out
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.nodes.get_mut(id)
    }

    /// # Panics
    /// When `id` is stale.
    pub fn element(&self, id: ElementId) -> &Element {
        match self.nodes.get(id) {
            Some(element) => element,
            None => panic!("stale element handle {id:?}"),
        }
    }

    /// # Panics
    /// When `id` is stale.
    pub fn element_mut(&mut self, id: ElementId) -> &mut Element {
        match self.nodes.get_mut(id) {
            Some(element) => element,
            None => panic!("stale element handle {id:?}"),
        }
    }

    pub fn roots(&self) -> &[ElementId] {
        &self.roots
    }

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.element(id).parent
    }

    pub fn children(&self, id: ElementId) -> &[ElementId] {
        &self.element(id).children
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Sum of local positions up the parent chain.
    pub fn world_position(&self, id: ElementId) -> Vec2 {
        let mut position = Vec2::ZERO;
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let element = self.element(current);
            position += element.transform.position();
            cursor = element.parent;
        }
        position
    }

    pub fn world_scale(&self, id: ElementId) -> Vec2 {
        self.element(id).transform.scale()
    }

    pub fn world_bounds(&self, id: ElementId) -> ScissorRect {
        ScissorRect::from_center_size(self.world_position(id), self.world_scale(id))
    }

    pub fn is_hovering(&self, id: ElementId) -> bool {
        self.element(id).interaction.hovering
    }

    pub fn is_active(&self, id: ElementId) -> bool {
        self.element(id).transform.is_active()
    }

    pub fn dirty_state(&self, id: ElementId) -> DirtyState {
        self.element(id).dirty
    }

    pub fn set_layout(&mut self, id: ElementId, layout: Option<LayoutConstraints>) {
        self.element_mut(id).layout = layout;
        self.mark_dirty(id, DirtyState::Layout);
    }

    pub fn set_position(&mut self, id: ElementId, position: Vec2) {
        self.element_mut(id).transform.set_position(position);
        self.mark_dirty(id, DirtyState::Layout);
    }

    pub fn set_scale(&mut self, id: ElementId, scale: Vec2) {
        self.element_mut(id).transform.set_scale(scale);
        self.mark_dirty(id, DirtyState::Resize);
    }

    pub fn pointer(&self) -> PointerState {
        self.pointer
    }

    pub fn request_redraw(&mut self) {
        self.redraw_requested = true;
    }

    pub fn redraw_requested(&self) -> bool {
        self.redraw_requested
    }

    pub fn take_redraw_request(&mut self) -> bool {
        std::mem::take(&mut self.redraw_requested)
    }

    pub(crate) fn begin_frame(&mut self, pointer: PointerState) {
        self.pointer = pointer;
        self.counters = TickReport::default();
    }

    pub(crate) fn end_frame(&mut self) -> TickReport {
        std::mem::take(&mut self.counters)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::SceneError;
    use crate::view::{Capabilities, DirtyState, ElementDesc, SceneTree};
    use glam::Vec2;

    #[test]
    fn only_containers_take_children() {
        let mut tree = SceneTree::new();
        let leaf = tree.insert_root(ElementDesc::new(Capabilities::DRAWABLE));
        assert_eq!(
            tree.insert_child(leaf, ElementDesc::panel()),
            Err(SceneError::NotAContainer(leaf))
        );
    }

    #[test]
    fn removed_handles_stay_stale() {
        let mut tree = SceneTree::new();
        let root = tree.insert_root(ElementDesc::panel());
        let child = tree.insert_child(root, ElementDesc::panel()).expect("container");
        let grandchild = tree.insert_child(child, ElementDesc::panel()).expect("container");
        tree.clean_all();

        tree.remove(child).expect("child is live");
        assert!(!tree.contains(child));
        assert!(!tree.contains(grandchild));
        assert!(tree.children(root).is_empty());
        assert_eq!(tree.dirty_state(root), DirtyState::Layout);
        assert_eq!(tree.remove(child), Err(SceneError::StaleElement(child)));

        let replacement = tree.insert_child(root, ElementDesc::panel()).expect("container");
        assert_ne!(replacement, child);
        assert!(tree.get(child).is_none());
    }

    #[test]
    fn reparent_rejects_cycles() {
        let mut tree = SceneTree::new();
        let root = tree.insert_root(ElementDesc::panel());
        let child = tree.insert_child(root, ElementDesc::panel()).expect("container");
        let grandchild = tree.insert_child(child, ElementDesc::panel()).expect("container");

        assert_eq!(
            tree.reparent(root, Some(grandchild)),
            Err(SceneError::Cycle {
                child: root,
                parent: grandchild
            })
        );
        assert_eq!(
            tree.reparent(child, Some(child)),
            Err(SceneError::Cycle {
                child,
                parent: child
            })
        );
        assert_eq!(tree.parent(root), None);
    }

    #[test]
    fn reparent_moves_between_parents() {
        let mut tree = SceneTree::new();
        let left = tree.insert_root(ElementDesc::panel());
        let right = tree.insert_root(ElementDesc::panel());
        let child = tree.insert_child(left, ElementDesc::panel()).expect("container");
        tree.clean_all();

        tree.reparent(child, Some(right)).expect("no cycle");
        assert!(tree.children(left).is_empty());
        assert_eq!(tree.children(right), &[child]);
        assert_eq!(tree.dirty_state(left), DirtyState::Layout);
        assert_eq!(tree.dirty_state(right), DirtyState::Layout);
        assert_eq!(tree.dirty_state(child), DirtyState::Layout);

        tree.reparent(child, None).expect("roots are always valid");
        assert_eq!(tree.roots(), &[left, right, child]);
    }

    #[test]
    fn world_position_accumulates_parent_offsets() {
        let mut tree = SceneTree::new();
        let root = tree.insert_root(ElementDesc::panel().with_position(Vec2::new(100.0, 50.0)));
        let child = tree
            .insert_child(
                root,
                ElementDesc::panel()
                    .with_position(Vec2::new(-10.0, 5.0))
                    .with_scale(Vec2::new(20.0, 10.0)),
            )
            .expect("container");
        assert_eq!(tree.world_position(child), Vec2::new(90.0, 55.0));
        let bounds = tree.world_bounds(child);
        assert_eq!(bounds.left(), 80.0);
        assert_eq!(bounds.top(), 50.0);
        assert_eq!(bounds.right(), 100.0);
        assert_eq!(bounds.bottom(), 60.0);
    }

    #[test]
    fn traversal_is_pre_order() {
        let mut tree = SceneTree::new();
        let root = tree.insert_root(ElementDesc::panel());
        let a = tree.insert_child(root, ElementDesc::panel()).expect("container");
        let a1 = tree.insert_child(a, ElementDesc::panel()).expect("container");
        let b = tree.insert_child(root, ElementDesc::panel()).expect("container");
        let other = tree.insert_root(ElementDesc::panel());
        assert_eq!(tree.traversal_order(), vec![root, a, a1, b, other]);
    }
}
