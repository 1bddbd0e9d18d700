use super::Transform;
use crate::style::{LayoutConstraints, LayoutState};
use crate::ui::EventHandlers;
use crate::view::{DirtyState, ScissorRect};
use bitflags::bitflags;
use glam::{Vec2, Vec4};
use slotmap::new_key_type;
use smol_str::SmolStr;

new_key_type! {
    /// Generational handle to an element. Stale once the element is removed.
    pub struct ElementId;
    pub struct GroupId;
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Capabilities: u8 {
        const DRAWABLE = 1 << 0;
        const INTERACTIVE = 1 << 1;
        const CONTAINER = 1 << 2;
    }
}

pub trait ElementCapabilities {
    fn capabilities(&self) -> Capabilities;

    fn is_drawable(&self) -> bool {
        self.capabilities().contains(Capabilities::DRAWABLE)
    }

    fn is_interactive(&self) -> bool {
        self.capabilities().contains(Capabilities::INTERACTIVE)
    }

    fn is_container(&self) -> bool {
        self.capabilities().contains(Capabilities::CONTAINER)
    }
}

impl ElementCapabilities for Capabilities {
    fn capabilities(&self) -> Capabilities {
        *self
    }
}

/// Pointer latches carried from one frame to the next.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InteractionState {
    pub(crate) hovering: bool,
    pub(crate) is_down: bool,
    pub(crate) dragging: bool,
    pub(crate) cant_miss: bool,
    pub(crate) was_active_last_frame: bool,
    pub(crate) down_position: Vec2,
    pub(crate) drag_start_world_position: Vec2,
}

impl InteractionState {
    pub fn hovering(&self) -> bool {
        self.hovering
    }

    pub fn is_down(&self) -> bool {
        self.is_down
    }

    pub fn dragging(&self) -> bool {
        self.dragging
    }

    pub fn down_position(&self) -> Vec2 {
        self.down_position
    }

    pub fn drag_start_world_position(&self) -> Vec2 {
        self.drag_start_world_position
    }
}

/// Everything needed to create an element.
#[derive(Debug, Clone)]
pub struct ElementDesc {
    pub name: Option<SmolStr>,
    pub capabilities: Capabilities,
    pub position: Vec2,
    pub scale: Vec2,
    pub layout: Option<LayoutConstraints>,
    pub texture_size: Vec2,
    pub clips_children: bool,
    pub active: bool,
}

impl ElementDesc {
    pub fn new(capabilities: Capabilities) -> Self {
        Self {
            name: None,
            capabilities,
            position: Vec2::ZERO,
            scale: Vec2::ZERO,
            layout: None,
            texture_size: Vec2::ZERO,
            clips_children: false,
            active: true,
        }
    }

    /// A drawable container.
    pub fn panel() -> Self {
        Self::new(Capabilities::DRAWABLE | Capabilities::CONTAINER)
    }

    pub fn with_name(mut self, name: impl Into<SmolStr>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_position(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_layout(mut self, layout: LayoutConstraints) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn with_texture_size(mut self, texture_size: Vec2) -> Self {
        self.texture_size = texture_size;
        self
    }

    pub fn clipping(mut self) -> Self {
        self.clips_children = true;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

pub struct Element {
    pub(crate) id: ElementId,
    pub(crate) name: Option<SmolStr>,
    pub(crate) capabilities: Capabilities,
    pub(crate) parent: Option<ElementId>,
    pub(crate) children: Vec<ElementId>,
    pub(crate) transform: Transform,
    pub(crate) layout: Option<LayoutConstraints>,
    pub(crate) layout_state: LayoutState,
    pub(crate) dirty: DirtyState,
    pub(crate) scissor: ScissorRect,
    pub(crate) disconnected_scissor: bool,
    /// The clip came from this element's own bounds, not from an ancestor.
    pub(crate) scissor_self_derived: bool,
    pub(crate) clips_children: bool,
    pub(crate) interaction: InteractionState,
    pub(crate) handlers: EventHandlers,
    pub(crate) group: Option<GroupId>,
    pub(crate) texture_size: Vec2,
    pub(crate) size_2d: Vec4,
}

impl std::fmt::Debug for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Element")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("capabilities", &self.capabilities)
            .field("parent", &self.parent)
            .field("children", &self.children.len())
            .field("dirty", &self.dirty)
            .field("scissor", &self.scissor)
            .finish()
    }
}

impl ElementCapabilities for Element {
    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }
}

impl Element {
    pub(crate) fn from_desc(id: ElementId, parent: Option<ElementId>, desc: ElementDesc) -> Self {
        let mut transform = Transform::new(desc.position, desc.scale);
        transform.set_active(desc.active);
        Self {
            id,
            name: desc.name,
            capabilities: desc.capabilities,
            parent,
            children: Vec::new(),
            transform,
            layout: desc.layout,
            layout_state: LayoutState::default(),
            dirty: DirtyState::Layout,
            scissor: ScissorRect::UNBOUNDED,
            disconnected_scissor: false,
            scissor_self_derived: false,
            clips_children: desc.clips_children,
            interaction: InteractionState::default(),
            handlers: EventHandlers::default(),
            group: None,
            texture_size: desc.texture_size,
            size_2d: Vec4::ZERO,
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    pub fn children(&self) -> &[ElementId] {
        &self.children
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    pub fn layout_constraints(&self) -> Option<&LayoutConstraints> {
        self.layout.as_ref()
    }

    pub fn layout_state(&self) -> &LayoutState {
        &self.layout_state
    }

    pub fn dirty_state(&self) -> DirtyState {
        self.dirty
    }

    pub fn scissor(&self) -> ScissorRect {
        self.scissor
    }

    pub fn is_scissor_disconnected(&self) -> bool {
        self.disconnected_scissor
    }

    pub fn is_scissor_self_derived(&self) -> bool {
        self.scissor_self_derived
    }

    pub fn clips_children(&self) -> bool {
        self.clips_children
    }

    pub fn set_clips_children(&mut self, clip: bool) {
        self.clips_children = clip;
    }

    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    pub fn handlers(&self) -> &EventHandlers {
        &self.handlers
    }

    pub fn handlers_mut(&mut self) -> &mut EventHandlers {
        &mut self.handlers
    }

    pub fn group(&self) -> Option<GroupId> {
        self.group
    }

    pub(crate) fn set_group(&mut self, group: Option<GroupId>) {
        self.group = group;
    }

    pub fn texture_size(&self) -> Vec2 {
        self.texture_size
    }

    pub fn set_texture_size(&mut self, texture_size: Vec2) {
        self.texture_size = texture_size;
    }

    /// World size and texture size packed for the renderer. Refreshed on clean.
    pub fn size_2d(&self) -> Vec4 {
        self.size_2d
    }
}
