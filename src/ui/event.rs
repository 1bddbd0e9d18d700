use crate::ui::PointerState;
use crate::view::{DirtyState, Element, ElementId, SceneTree};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventType {
    Enter,
    Exit,
    Down,
    Up,
    Click,
    Miss,
    Scroll,
    /// Geometry must be regenerated; fired from the clean step.
    Rebuild,
    Change,
}

impl EventType {
    pub const COUNT: usize = 9;

    pub const ALL: [EventType; Self::COUNT] = [
        EventType::Enter,
        EventType::Exit,
        EventType::Down,
        EventType::Up,
        EventType::Click,
        EventType::Miss,
        EventType::Scroll,
        EventType::Rebuild,
        EventType::Change,
    ];

    const fn index(self) -> usize {
        self as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HandlerId {
    event: EventType,
    id: u64,
}

impl HandlerId {
    pub fn event_type(&self) -> EventType {
        self.event
    }
}

fn next_handler_id() -> u64 {
    static NEXT_ID: AtomicU64 = AtomicU64::new(1);
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

#[derive(Clone)]
pub struct EventHandler {
    id: u64,
    handler: Rc<RefCell<dyn FnMut(&mut EventContext<'_>)>>,
}

impl EventHandler {
    pub fn new<F>(handler: F) -> Self
    where
        F: for<'a> FnMut(&mut EventContext<'a>) + 'static,
    {
        Self {
            id: next_handler_id(),
            handler: Rc::new(RefCell::new(handler)),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn call(&self, ctx: &mut EventContext<'_>) {
        (self.handler.borrow_mut())(ctx);
    }
}

impl PartialEq for EventHandler {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl fmt::Debug for EventHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHandler").field("id", &self.id).finish()
    }
}

/// Handler lists of one element, one slot per [`EventType`].
#[derive(Clone, Debug)]
pub struct EventHandlers {
    lists: [Vec<EventHandler>; EventType::COUNT],
}

impl Default for EventHandlers {
    fn default() -> Self {
        Self {
            lists: std::array::from_fn(|_| Vec::new()),
        }
    }
}

impl EventHandlers {
    pub fn add(&mut self, event: EventType, handler: EventHandler) -> HandlerId {
        let id = handler.id();
        self.lists[event.index()].push(handler);
        HandlerId { event, id }
    }

    pub fn remove(&mut self, handler: HandlerId) -> bool {
        let list = &mut self.lists[handler.event.index()];
        let before = list.len();
        list.retain(|entry| entry.id() != handler.id);
        list.len() != before
    }

    pub fn get(&self, event: EventType) -> &[EventHandler] {
        &self.lists[event.index()]
    }

    pub fn is_empty(&self, event: EventType) -> bool {
        self.lists[event.index()].is_empty()
    }

    pub fn len(&self) -> usize {
        self.lists.iter().map(Vec::len).sum()
    }

    pub fn clear(&mut self) {
        for list in &mut self.lists {
            list.clear();
        }
    }
}

/// What a handler sees while it runs: the event, its target and the whole
/// tree, so it can mark other elements dirty or restructure the scene.
pub struct EventContext<'a> {
    tree: &'a mut SceneTree,
    target: ElementId,
    event: EventType,
}

impl fmt::Debug for EventContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventContext")
            .field("target", &self.target)
            .field("event", &self.event)
            .finish()
    }
}

impl<'a> EventContext<'a> {
    pub(crate) fn new(tree: &'a mut SceneTree, target: ElementId, event: EventType) -> Self {
        Self {
            tree,
            target,
            event,
        }
    }

    pub fn target(&self) -> ElementId {
        self.target
    }

    pub fn event_type(&self) -> EventType {
        self.event
    }

    pub fn pointer(&self) -> PointerState {
        self.tree.pointer()
    }

    /// The target, or `None` once an earlier handler removed it.
    pub fn element(&self) -> Option<&Element> {
        self.tree.get(self.target)
    }

    pub fn tree(&self) -> &SceneTree {
        &*self.tree
    }

    pub fn tree_mut(&mut self) -> &mut SceneTree {
        &mut *self.tree
    }

    pub fn mark_dirty(&mut self, id: ElementId, kind: DirtyState) -> bool {
        self.tree.mark_dirty(id, kind)
    }

    pub fn request_layout(&mut self) {
        if self.tree.contains(self.target) {
            self.tree.notify_layout_changed(self.target, DirtyState::Layout);
        }
    }

    pub fn request_redraw(&mut self) {
        self.tree.request_redraw();
    }
}

impl SceneTree {
    pub fn add_event_handler<F>(&mut self, id: ElementId, event: EventType, handler: F) -> HandlerId
    where
        F: for<'a> FnMut(&mut EventContext<'a>) + 'static,
    {
        self.element_mut(id)
            .handlers_mut()
            .add(event, EventHandler::new(handler))
    }

    pub fn remove_event_handler(&mut self, id: ElementId, handler: HandlerId) -> bool {
        self.element_mut(id).handlers_mut().remove(handler)
    }

    /// Runs every handler registered for `event` on `id` right now, bypassing
    /// any dispatch group. Returns whether there was anything to run.
    pub fn fire_event(&mut self, id: ElementId, event: EventType) -> bool {
        let handlers = self.element(id).handlers().get(event).to_vec();
        if handlers.is_empty() {
            return false;
        }
        tracing::trace!(?id, ?event, handlers = handlers.len(), "fire event");
        self.counters.events_fired += 1;
        let mut ctx = EventContext::new(self, id, event);
        for handler in &handlers {
            if !ctx.tree.contains(id) {
                break;
            }
            handler.call(&mut ctx);
        }
        true
    }

    /// Delivers `event` through the element's dispatch group when it has one,
    /// otherwise fires it in line.
    pub fn request_event(&mut self, id: ElementId, event: EventType) {
        match self.element(id).group() {
            Some(group) => self.enqueue_event(group, id, event),
            None => {
                self.fire_event(id, event);
            }
        }
    }

    /// Tells listeners the element's value changed. Always fires in line.
    pub fn notify_changed(&mut self, id: ElementId) -> bool {
        self.fire_event(id, EventType::Change)
    }
}
