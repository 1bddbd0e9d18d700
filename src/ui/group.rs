use crate::error::{SceneError, SceneResult};
use crate::ui::EventType;
use crate::view::{ElementId, GroupId, SceneTree};
use rustc_hash::FxHashSet;

/// How a group turns the requests queued during a frame into deliveries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupPolicy {
    /// Every distinct (element, event) request, in request order.
    #[default]
    DeliverAll,
    /// Per event type, only the element that asked last. Elements update in
    /// tree order, so that is the one stacked on top.
    Topmost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QueuedEvent {
    pub element: ElementId,
    pub event: EventType,
}

#[derive(Debug, Clone, Default)]
pub struct DispatchGroup {
    policy: GroupPolicy,
    pending: Vec<QueuedEvent>,
    seen: FxHashSet<QueuedEvent>,
}

impl DispatchGroup {
    pub fn new(policy: GroupPolicy) -> Self {
        Self {
            policy,
            pending: Vec::new(),
            seen: FxHashSet::default(),
        }
    }

    pub fn policy(&self) -> GroupPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: GroupPolicy) {
        self.policy = policy;
    }

    pub fn pending(&self) -> &[QueuedEvent] {
        &self.pending
    }

    /// Queues a request. Returns `false` when the same request is already pending.
    pub fn push(&mut self, element: ElementId, event: EventType) -> bool {
        let entry = QueuedEvent { element, event };
        if !self.seen.insert(entry) {
            return false;
        }
        self.pending.push(entry);
        true
    }

    pub fn purge(&mut self, element: ElementId) -> usize {
        let before = self.pending.len();
        self.pending.retain(|entry| entry.element != element);
        self.seen.retain(|entry| entry.element != element);
        before - self.pending.len()
    }

    /// Empties the queue and returns what should actually be delivered.
    pub fn drain(&mut self) -> Vec<QueuedEvent> {
        self.seen.clear();
        let pending = std::mem::take(&mut self.pending);
        match self.policy {
            GroupPolicy::DeliverAll => pending,
            GroupPolicy::Topmost => {
                let mut kept: Vec<QueuedEvent> = Vec::with_capacity(pending.len());
                let mut claimed = FxHashSet::default();
                for entry in pending.into_iter().rev() {
                    if claimed.insert(entry.event) {
                        kept.push(entry);
                    }
                }
                kept.reverse();
                kept
            }
        }
    }
}

impl SceneTree {
    pub fn create_group(&mut self, policy: GroupPolicy) -> GroupId {
        self.groups.insert(DispatchGroup::new(policy))
    }

    pub fn group(&self, group: GroupId) -> Option<&DispatchGroup> {
        self.groups.get(group)
    }

    pub fn group_mut(&mut self, group: GroupId) -> Option<&mut DispatchGroup> {
        self.groups.get_mut(group)
    }

    /// Drops the group with anything still queued on it. Members fall back to
    /// in-line delivery.
    pub fn remove_group(&mut self, group: GroupId) -> SceneResult<()> {
        let removed = self
            .groups
            .remove(group)
            .ok_or(SceneError::StaleGroup(group))?;
        if !removed.pending().is_empty() {
            self.counters.events_dropped += removed.pending().len();
            tracing::debug!(?group, dropped = removed.pending().len(), "dropping queued events with group");
        }
        for (_, element) in self.nodes.iter_mut() {
            if element.group() == Some(group) {
                element.set_group(None);
            }
        }
        Ok(())
    }

    pub fn set_group(&mut self, id: ElementId, group: Option<GroupId>) -> SceneResult<()> {
        if !self.contains(id) {
            return Err(SceneError::StaleElement(id));
        }
        if let Some(group) = group {
            if !self.groups.contains_key(group) {
                return Err(SceneError::StaleGroup(group));
            }
        }
        if let Some(previous) = self.element(id).group() {
            if let Some(previous) = self.groups.get_mut(previous) {
                previous.purge(id);
            }
        }
        self.element_mut(id).set_group(group);
        Ok(())
    }

    pub(crate) fn enqueue_event(&mut self, group: GroupId, id: ElementId, event: EventType) {
        match self.groups.get_mut(group) {
            Some(queue) => {
                if queue.push(id, event) {
                    self.counters.events_queued += 1;
                }
            }
            None => {
                // group vanished without detaching the element
                self.element_mut(id).set_group(None);
                self.fire_event(id, event);
            }
        }
    }

    pub(crate) fn purge_queued_events(&mut self, id: ElementId) {
        for (_, group) in self.groups.iter_mut() {
            self.counters.events_dropped += group.purge(id);
        }
    }

    /// Delivers everything queued on every group. Requests made by handlers
    /// during the flush wait for the next one. Returns the number delivered.
    pub fn flush_groups(&mut self) -> usize {
        let group_ids: Vec<GroupId> = self.groups.keys().collect();
        let mut delivered = 0;
        for group_id in group_ids {
            let Some(group) = self.groups.get_mut(group_id) else {
                continue;
            };
            let batch = group.drain();
            if batch.is_empty() {
                continue;
            }
            tracing::debug!(group = ?group_id, events = batch.len(), "flush dispatch group");
            for entry in batch {
                if !self.contains(entry.element) {
                    self.counters.events_dropped += 1;
                    tracing::warn!(element = ?entry.element, event = ?entry.event, "queued event target is gone");
                    continue;
                }
                self.fire_event(entry.element, entry.event);
                delivered += 1;
            }
        }
        delivered
    }
}
