use super::base_component::{ElementCapabilities, ElementId};
use super::SceneTree;
use crate::ui::EventType;
use glam::Vec2;

/// Thresholds the per-element pointer state machine works with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerRules {
    /// Pointer travel in physical pixels before a press becomes a drag.
    pub drag_threshold_px: f32,
    /// How far the element itself may move during a drag and still click.
    pub click_drag_tolerance: f32,
}

impl Default for PointerRules {
    fn default() -> Self {
        Self {
            drag_threshold_px: 4.0,
            click_drag_tolerance: 5.0,
        }
    }
}

impl SceneTree {
    /// Whether `point` falls inside the element's world bounds and its clip.
    pub fn contains_point(&self, id: ElementId, point: Vec2) -> bool {
        let scissor = self.element(id).scissor;
        self.world_bounds(id).contains(point) && (!scissor.is_bounded() || scissor.contains(point))
    }

    /// One frame of work for one element: run the pointer state machine
    /// against the current pointer, then clean it if something marked it.
    pub fn update_element(&mut self, id: ElementId, rules: &PointerRules) {
        let Some(element) = self.get(id) else {
            return;
        };
        if element.is_interactive() && !self.update_pointer(id, rules) {
            return;
        }

        if !self.element(id).dirty.is_clean() {
            self.clean_ancestors(id);
            if !self.contains(id) {
                return;
            }
            self.clean_own(id);
        }
        if let Some(element) = self.get_mut(id) {
            element.interaction.was_active_last_frame = element.transform.is_active();
        }
    }

    /// Returns `false` once a handler removed the element.
    fn update_pointer(&mut self, id: ElementId, rules: &PointerRules) -> bool {
        let pointer = self.pointer();

        if pointer.moved {
            if !self.update_hover(id, pointer.position) {
                return false;
            }
            let world_position = self.world_position(id);
            let interaction = &mut self.element_mut(id).interaction;
            if interaction.is_down
                && !interaction.dragging
                && interaction.down_position.distance(pointer.position) > rules.drag_threshold_px
            {
                interaction.dragging = true;
                interaction.drag_start_world_position = world_position;
                tracing::trace!(?id, "drag started");
            }
        }

        if pointer.pressed {
            if !self.update_hover(id, pointer.position) {
                return false;
            }
            let interaction = &mut self.element_mut(id).interaction;
            if interaction.hovering && !interaction.is_down {
                interaction.is_down = true;
                interaction.down_position = pointer.position;
                interaction.cant_miss = true;
                if !self.emit(id, EventType::Down) {
                    return false;
                }
            }
        }

        if pointer.released {
            if self.element(id).interaction.hovering && !self.emit(id, EventType::Up) {
                return false;
            }
            let world_position = self.world_position(id);
            let interaction = self.element(id).interaction;
            if interaction.was_active_last_frame {
                if interaction.is_down {
                    let dragged = interaction.dragging
                        && interaction.drag_start_world_position.distance(world_position)
                            > rules.click_drag_tolerance;
                    let state = &mut self.element_mut(id).interaction;
                    state.is_down = false;
                    state.dragging = false;
                    if interaction.hovering && !dragged && !self.emit(id, EventType::Click) {
                        return false;
                    }
                } else if !interaction.hovering
                    && !interaction.cant_miss
                    && !self.emit(id, EventType::Miss)
                {
                    return false;
                }
            }
            self.element_mut(id).interaction.cant_miss = false;
        }

        if pointer.scrolled
            && self.element(id).interaction.hovering
            && !self.emit(id, EventType::Scroll)
        {
            return false;
        }
        true
    }

    fn update_hover(&mut self, id: ElementId, position: Vec2) -> bool {
        let inside = self.contains_point(id, position);
        let interaction = &mut self.element_mut(id).interaction;
        if interaction.hovering == inside {
            return true;
        }
        interaction.hovering = inside;
        self.emit(id, if inside { EventType::Enter } else { EventType::Exit })
    }

    fn emit(&mut self, id: ElementId, event: EventType) -> bool {
        self.request_event(id, event);
        self.contains(id)
    }
}

#[cfg(test)]
mod tests {
    use super::PointerRules;
    use crate::ui::{EventType, PointerState};
    use crate::view::{Capabilities, ElementDesc, ElementId, SceneTree, ScissorRect};
    use glam::Vec2;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Harness {
        tree: SceneTree,
        button: ElementId,
        log: Rc<RefCell<Vec<EventType>>>,
    }

    impl Harness {
        fn new() -> Self {
            let mut tree = SceneTree::new();
            let button = tree.insert_root(
                ElementDesc::new(Capabilities::INTERACTIVE | Capabilities::DRAWABLE)
                    .with_position(Vec2::new(100.0, 100.0))
                    .with_scale(Vec2::new(40.0, 40.0)),
            );
            let log = Rc::new(RefCell::new(Vec::new()));
            for event in EventType::ALL {
                let log = log.clone();
                tree.add_event_handler(button, event, move |ctx| {
                    if ctx.event_type() != EventType::Rebuild {
                        log.borrow_mut().push(ctx.event_type());
                    }
                });
            }
            Self { tree, button, log }
        }

        fn frame(&mut self, pointer: PointerState) -> Vec<EventType> {
            self.tree.begin_frame(pointer);
            self.tree.update_element(self.button, &PointerRules::default());
            self.log.borrow_mut().drain(..).collect()
        }
    }

    #[test]
    fn hover_enter_and_exit() {
        let mut h = Harness::new();
        assert_eq!(h.frame(PointerState::moved_to(Vec2::new(100.0, 100.0))), vec![EventType::Enter]);
        assert!(h.tree.is_hovering(h.button));
        assert!(h.frame(PointerState::moved_to(Vec2::new(110.0, 100.0))).is_empty());
        assert_eq!(h.frame(PointerState::moved_to(Vec2::new(300.0, 100.0))), vec![EventType::Exit]);
        assert!(!h.tree.is_hovering(h.button));
    }

    #[test]
    fn press_and_release_inside_clicks() {
        let mut h = Harness::new();
        let at = Vec2::new(100.0, 100.0);
        h.frame(PointerState::moved_to(at));
        assert_eq!(h.frame(PointerState::pressed_at(at)), vec![EventType::Down]);
        assert_eq!(
            h.frame(PointerState::released_at(at)),
            vec![EventType::Up, EventType::Click]
        );
        assert!(!h.tree.element(h.button).interaction().is_down());
    }

    #[test]
    fn moving_the_element_while_dragging_suppresses_click() {
        let mut h = Harness::new();
        h.frame(PointerState::moved_to(Vec2::new(100.0, 100.0)));
        h.frame(PointerState::pressed_at(Vec2::new(100.0, 100.0)));
        assert_eq!(
            h.frame(PointerState::moved_to(Vec2::new(100.0, 200.0))),
            vec![EventType::Exit]
        );
        let interaction = *h.tree.element(h.button).interaction();
        assert!(interaction.dragging());
        assert_eq!(interaction.drag_start_world_position(), Vec2::new(100.0, 100.0));

        h.tree.set_position(h.button, Vec2::new(100.0, 200.0));
        assert_eq!(
            h.frame(PointerState::moved_to(Vec2::new(100.0, 200.0))),
            vec![EventType::Enter]
        );
        assert_eq!(h.frame(PointerState::released_at(Vec2::new(100.0, 200.0))), vec![EventType::Up]);
    }

    #[test]
    fn small_drag_still_clicks() {
        let mut h = Harness::new();
        h.frame(PointerState::moved_to(Vec2::new(100.0, 100.0)));
        h.frame(PointerState::pressed_at(Vec2::new(100.0, 100.0)));
        h.frame(PointerState::moved_to(Vec2::new(110.0, 100.0)));
        assert!(h.tree.element(h.button).interaction().dragging());
        assert_eq!(
            h.frame(PointerState::released_at(Vec2::new(110.0, 100.0))),
            vec![EventType::Up, EventType::Click]
        );
    }

    #[test]
    fn release_outside_without_press_misses() {
        let mut h = Harness::new();
        h.frame(PointerState::moved_to(Vec2::new(500.0, 500.0)));
        assert_eq!(h.frame(PointerState::released_at(Vec2::new(500.0, 500.0))), vec![EventType::Miss]);
    }

    #[test]
    fn press_inside_release_outside_neither_clicks_nor_misses() {
        let mut h = Harness::new();
        h.frame(PointerState::moved_to(Vec2::new(100.0, 100.0)));
        h.frame(PointerState::pressed_at(Vec2::new(100.0, 100.0)));
        h.frame(PointerState::moved_to(Vec2::new(100.0, 102.0)));
        h.frame(PointerState::moved_to(Vec2::new(400.0, 400.0)));
        assert!(h.frame(PointerState::released_at(Vec2::new(400.0, 400.0))).is_empty());
    }

    #[test]
    fn scroll_only_reaches_hovered_element() {
        let mut h = Harness::new();
        assert!(h.frame(PointerState::scrolled_at(Vec2::ZERO, Vec2::Y)).is_empty());
        h.frame(PointerState::moved_to(Vec2::new(100.0, 100.0)));
        assert_eq!(
            h.frame(PointerState::scrolled_at(Vec2::new(100.0, 100.0), Vec2::Y)),
            vec![EventType::Scroll]
        );
    }

    #[test]
    fn clip_hides_part_of_the_element() {
        let mut h = Harness::new();
        h.tree.set_scissor(h.button, ScissorRect::new(80.0, 80.0, 100.0, 120.0));
        assert!(h.frame(PointerState::moved_to(Vec2::new(110.0, 100.0))).is_empty());
        assert_eq!(h.frame(PointerState::moved_to(Vec2::new(90.0, 100.0))), vec![EventType::Enter]);
    }

    #[test]
    fn handler_removing_the_element_stops_the_update() {
        let mut tree = SceneTree::new();
        let button = tree.insert_root(
            ElementDesc::new(Capabilities::INTERACTIVE)
                .with_position(Vec2::new(10.0, 10.0))
                .with_scale(Vec2::new(20.0, 20.0)),
        );
        tree.add_event_handler(button, EventType::Enter, move |ctx| {
            let target = ctx.target();
            ctx.tree_mut().remove(target).expect("target is live");
        });
        tree.begin_frame(PointerState::moved_to(Vec2::new(10.0, 10.0)));
        tree.update_element(button, &PointerRules::default());
        assert!(!tree.contains(button));
    }

    #[test]
    fn non_interactive_elements_ignore_the_pointer_but_still_clean() {
        let mut tree = SceneTree::new();
        let label = tree.insert_root(
            ElementDesc::new(Capabilities::DRAWABLE).with_scale(Vec2::new(100.0, 100.0)),
        );
        tree.begin_frame(PointerState::moved_to(Vec2::ZERO));
        tree.update_element(label, &PointerRules::default());
        assert!(!tree.is_hovering(label));
        assert!(tree.dirty_state(label).is_clean());
    }
}
