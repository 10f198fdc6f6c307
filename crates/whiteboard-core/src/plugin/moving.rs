//! Drag elements with the primary button.

use kurbo::Point;

use super::{BoardPlugin, EventResult};
use crate::board::Board;
use crate::element::{Element, ElementId};
use crate::input::{MouseButton, PointerEvent};
use crate::path::get_path_by_id;
use crate::point::screen_to_view_port;
use crate::transforms::translate_elements;
use crate::traverse::get_hit_elements;

#[derive(Debug, Clone)]
struct MoveGesture {
    /// World position of the press.
    start: Point,
    /// Elements being moved, as they were when the press started.
    origins: Vec<Element>,
    dragging: bool,
}

/// Moves elements by dragging.
///
/// Pressing on a selected element drags the whole selection; pressing on
/// anything else drags the topmost element under the cursor. A dragged
/// element carries its whole subtree.
#[derive(Debug, Default)]
pub struct MovePlugin {
    gesture: Option<MoveGesture>,
}

impl MovePlugin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.gesture.as_ref().is_some_and(|gesture| gesture.dragging)
    }
}

/// Drop targets that have an ancestor in the set; they move with its subtree.
fn outermost(board: &Board, ids: Vec<ElementId>) -> Vec<ElementId> {
    let paths: Vec<_> = ids.iter().filter_map(|id| get_path_by_id(board, id)).collect();
    ids.into_iter()
        .filter(|id| {
            get_path_by_id(board, id).is_some_and(|path| {
                !paths.iter().any(|other| other.is_ancestor_of(&path))
            })
        })
        .collect()
}

impl BoardPlugin for MovePlugin {
    fn name(&self) -> &str {
        "move"
    }

    fn on_pointer_down(&mut self, event: &mut PointerEvent, board: &mut Board) -> EventResult {
        if event.button != MouseButton::Left || board.is_readonly() {
            return EventResult::NotHandled;
        }
        let Some(start) = screen_to_view_port(board, event.position) else {
            return EventResult::NotHandled;
        };

        let hits = get_hit_elements(board, start);
        let selection = board.selection();
        let targets = if hits.iter().any(|element| selection.contains(&element.id)) {
            selection.selected.clone()
        } else if let Some(topmost) = hits.last() {
            vec![topmost.id.clone()]
        } else {
            return EventResult::NotHandled;
        };

        // Children are positioned in world coordinates, so they move too
        let mut origins = Vec::new();
        for id in outermost(board, targets) {
            origins.extend(board.element(&id).cloned());
            origins.extend(
                board
                    .scene()
                    .descendants(&id)
                    .iter()
                    .filter_map(|child| board.element(child).cloned()),
            );
        }
        self.gesture = Some(MoveGesture {
            start,
            origins,
            dragging: false,
        });
        EventResult::NotHandled
    }

    fn on_pointer_move(&mut self, event: &mut PointerEvent, board: &mut Board) -> EventResult {
        let Some(gesture) = self.gesture.as_mut() else {
            return EventResult::NotHandled;
        };
        let Some(point) = screen_to_view_port(board, event.position) else {
            return EventResult::NotHandled;
        };

        let offset = point - gesture.start;
        let threshold = board.config().drag_threshold;
        if !gesture.dragging && offset.x.abs() <= threshold && offset.y.abs() <= threshold {
            return EventResult::NotHandled;
        }
        gesture.dragging = true;

        if let Err(err) = translate_elements(board, &gesture.origins, offset) {
            log::warn!("Move aborted: {err}");
            self.gesture = None;
        }
        EventResult::Handled
    }

    fn on_global_pointer_up(&mut self, _event: &mut PointerEvent, _board: &mut Board) -> EventResult {
        self.gesture = None;
        EventResult::NotHandled
    }
}
