//! Conversions between client pixels and world coordinates.

use kurbo::Point;

use crate::board::Board;
use crate::geometry::rect_contains;

/// Client pixels to world coordinates. `None` when the board is not mounted.
pub fn screen_to_view_port(board: &Board, screen: Point) -> Option<Point> {
    let local = container_point(board, screen)?;
    Some(board.view_port().to_world(local))
}

/// World coordinates to client pixels. Exact inverse of [`screen_to_view_port`].
pub fn view_port_to_screen(board: &Board, world: Point) -> Option<Point> {
    let origin = board.container()?.bounding_rect().origin();
    let local = board.view_port().to_screen(world);
    Some(Point::new(local.x + origin.x, local.y + origin.y))
}

/// Client pixels relative to the container's top-left corner.
pub fn container_point(board: &Board, screen: Point) -> Option<Point> {
    let origin = board.container()?.bounding_rect().origin();
    Some(Point::new(screen.x - origin.x, screen.y - origin.y))
}

pub fn is_inside_container(board: &Board, screen: Point) -> bool {
    board
        .container()
        .is_some_and(|container| rect_contains(container.bounding_rect(), screen))
}
