//! View port edits: pan, zoom, resize and fit.
//!
//! Every function here needs the board's mounted container for pixel
//! geometry and silently does nothing without one.

use kurbo::Point;

use crate::board::Board;
use crate::element::ElementId;
use crate::operation::Operation;
use crate::traverse::elements_bounds;
use crate::view_port::ViewPort;

fn set_view_port(board: &mut Board, new: ViewPort) {
    let old = board.view_port();
    if let Err(err) = board.apply(Operation::set_view_port(old, new)) {
        log::warn!("View port update rejected: {err}");
    }
}

/// Scroll so the world point `(min_x, min_y)` sits at the container's
/// top-left corner. Zoom and size are unchanged.
pub fn move_view_port(board: &mut Board, min_x: f64, min_y: f64) {
    if board.container().is_none() {
        return;
    }
    let moved = board.view_port().moved_to(min_x, min_y);
    set_view_port(board, moved);
}

/// Set the zoom (clamped to the configured range), keeping the world point
/// under `anchor` fixed.
///
/// `anchor` is in container-relative pixels and defaults to the container
/// center.
pub fn update_zoom(board: &mut Board, zoom: f64, anchor: Option<Point>) {
    let Some(container) = board.container() else {
        return;
    };
    let size = container.size();
    let zoom = board.config().clamp_zoom(zoom);
    let anchor = anchor.unwrap_or(Point::new(size.width / 2.0, size.height / 2.0));
    let zoomed = board.view_port().zoomed_about(zoom, anchor, size);
    set_view_port(board, zoomed);
}

/// Zoom in (positive) or out (negative) by whole configured steps.
pub fn zoom_by_steps(board: &mut Board, steps: i32, anchor: Option<Point>) {
    if steps == 0 {
        return;
    }
    let zoom = board.view_port().zoom * board.config().zoom_step.powi(steps);
    update_zoom(board, zoom, anchor);
}

/// Recompute the world size after the container changed size.
pub fn on_container_resize(board: &mut Board) {
    let Some(container) = board.container() else {
        return;
    };
    let resized = board.view_port().resized(container.size());
    set_view_port(board, resized);
}

/// Zoom and scroll so the given elements (all of them for `None`) fill the
/// container, leaving the configured padding.
pub fn fit_all_elements(board: &mut Board, ids: Option<&[ElementId]>) {
    let Some(container) = board.container() else {
        return;
    };
    let Some(bounds) = elements_bounds(board, ids) else {
        return;
    };
    let config = board.config();
    let fitted = ViewPort::fitted(
        bounds,
        container.size(),
        config.fit_padding,
        config.min_zoom,
        config.max_zoom,
    );
    set_view_port(board, fitted);
}
