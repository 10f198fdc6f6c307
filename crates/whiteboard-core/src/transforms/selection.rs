//! Selection edits.

use crate::board::Board;
use crate::element::ElementId;
use crate::operation::Operation;
use crate::selection::{SelectArea, Selection};

/// Replace the marquee and the selected elements in one operation.
pub fn update_select_area(board: &mut Board, area: Option<SelectArea>, selected: Vec<ElementId>) {
    let old = board.selection().clone();
    let new = Selection {
        select_area: area,
        selected,
    };
    if let Err(err) = board.apply(Operation::set_selection(old, new)) {
        log::warn!("Selection update rejected: {err}");
    }
}

pub fn set_selected(board: &mut Board, selected: Vec<ElementId>) {
    update_select_area(board, None, selected);
}

pub fn clear_selection(board: &mut Board) {
    update_select_area(board, None, Vec::new());
}
