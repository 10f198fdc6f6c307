//! Click, marquee and keyboard selection.

use kurbo::Point;

use super::{BoardPlugin, EventResult};
use crate::board::Board;
use crate::element::ElementId;
use crate::input::{Cancelable, KeyboardEvent, MouseButton, PointerEvent};
use crate::point::screen_to_view_port;
use crate::selection::SelectArea;
use crate::transforms::{clear_selection, remove_elements, set_selected, update_select_area};
use crate::traverse::{all_element_ids, get_elements_in_area, get_hit_elements};

/// Press in progress.
#[derive(Debug, Clone)]
struct Press {
    /// World position of the press.
    start: Point,
    /// Elements under the press, bottom to top.
    hits: Vec<ElementId>,
    moved: bool,
}

/// Selection handling.
///
/// A press on empty canvas clears the selection and starts a marquee. A
/// click without movement selects the topmost element under the cursor;
/// with Ctrl/Cmd it toggles that element instead. `mod+a` selects all and
/// Delete/Backspace removes the selection.
#[derive(Debug, Default)]
pub struct SelectPlugin {
    press: Option<Press>,
}

impl SelectPlugin {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BoardPlugin for SelectPlugin {
    fn name(&self) -> &str {
        "select"
    }

    fn on_pointer_down(&mut self, event: &mut PointerEvent, board: &mut Board) -> EventResult {
        if event.button != MouseButton::Left {
            return EventResult::NotHandled;
        }
        let Some(start) = screen_to_view_port(board, event.position) else {
            return EventResult::NotHandled;
        };
        let hits: Vec<ElementId> = get_hit_elements(board, start)
            .into_iter()
            .map(|element| element.id.clone())
            .collect();

        let keep = if hits.is_empty() {
            Vec::new()
        } else {
            board.selection().selected.clone()
        };
        update_select_area(board, None, keep);

        self.press = Some(Press {
            start,
            hits,
            moved: false,
        });
        EventResult::NotHandled
    }

    fn on_pointer_move(&mut self, event: &mut PointerEvent, board: &mut Board) -> EventResult {
        let Some(press) = self.press.as_mut() else {
            return EventResult::NotHandled;
        };
        let Some(end) = screen_to_view_port(board, event.position) else {
            return EventResult::NotHandled;
        };

        let threshold = board.config().drag_threshold;
        if !press.moved
            && ((end.x - press.start.x).abs() > threshold || (end.y - press.start.y).abs() > threshold)
        {
            press.moved = true;
        }
        if !press.hits.is_empty() {
            return EventResult::NotHandled;
        }

        let area = SelectArea::new(press.start, end);
        let selected = get_elements_in_area(board, &area)
            .into_iter()
            .map(|element| element.id.clone())
            .collect();
        update_select_area(board, Some(area), selected);
        EventResult::NotHandled
    }

    fn on_global_pointer_up(&mut self, event: &mut PointerEvent, board: &mut Board) -> EventResult {
        let Some(press) = self.press.take() else {
            return EventResult::NotHandled;
        };
        let mut selected = board.selection().selected.clone();
        if let (false, Some(clicked)) = (press.moved, press.hits.last()) {
            if event.modifiers.is_mod() {
                match selected.iter().position(|id| id == clicked) {
                    Some(index) => {
                        selected.remove(index);
                    }
                    None => selected.push(clicked.clone()),
                }
            } else {
                selected = vec![clicked.clone()];
            }
        }
        update_select_area(board, None, selected);
        EventResult::NotHandled
    }

    fn on_key_down(&mut self, event: &mut KeyboardEvent, board: &mut Board) -> EventResult {
        if event.is_hotkey("mod+a") {
            event.prevent_default();
            let all = all_element_ids(board);
            set_selected(board, all);
            return EventResult::Handled;
        }

        if board.selection().is_empty() {
            return EventResult::NotHandled;
        }
        if event.is_hotkey("Delete") || event.is_hotkey("Backspace") {
            let selected = board.selection().selected.clone();
            if let Err(err) = remove_elements(board, &selected) {
                log::warn!("Failed to remove selection: {err}");
            }
            clear_selection(board);
            return EventResult::Handled;
        }
        EventResult::NotHandled
    }
}
