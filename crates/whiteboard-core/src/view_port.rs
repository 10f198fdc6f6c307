//! The visible window into world space.
//!
//! `min_x`/`min_y` is the world point shown at the container's top-left
//! corner, `width`/`height` are world units, and `width * zoom` equals the
//! container's pixel width once a container is mounted.

use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// Smallest zoom factor.
pub const MIN_ZOOM: f64 = 0.1;
/// Largest zoom factor.
pub const MAX_ZOOM: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewPort {
    pub min_x: f64,
    pub min_y: f64,
    pub width: f64,
    pub height: f64,
    pub zoom: f64,
}

impl Default for ViewPort {
    fn default() -> Self {
        Self {
            min_x: 0.0,
            min_y: 0.0,
            width: 0.0,
            height: 0.0,
            zoom: 1.0,
        }
    }
}

impl ViewPort {
    pub fn new(min_x: f64, min_y: f64, width: f64, height: f64, zoom: f64) -> Self {
        Self {
            min_x,
            min_y,
            width,
            height,
            zoom,
        }
    }

    /// World point shown at the container's top-left corner.
    pub fn origin(&self) -> Point {
        Point::new(self.min_x, self.min_y)
    }

    /// Visible world rectangle.
    pub fn world_rect(&self) -> Rect {
        Rect::new(
            self.min_x,
            self.min_y,
            self.min_x + self.width,
            self.min_y + self.height,
        )
    }

    /// Container-relative pixels to world coordinates.
    pub fn to_world(&self, container_point: Point) -> Point {
        Point::new(
            container_point.x / self.zoom + self.min_x,
            container_point.y / self.zoom + self.min_y,
        )
    }

    /// World coordinates to container-relative pixels.
    pub fn to_screen(&self, world_point: Point) -> Point {
        Point::new(
            (world_point.x - self.min_x) * self.zoom,
            (world_point.y - self.min_y) * self.zoom,
        )
    }

    /// Same zoom and size, new top-left corner.
    pub fn moved_to(&self, min_x: f64, min_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            ..*self
        }
    }

    /// Change zoom so the world point under `anchor` (container pixels)
    /// stays under it. Does not clamp.
    pub fn zoomed_about(&self, new_zoom: f64, anchor: Point, container: Size) -> Self {
        let factor = 1.0 / self.zoom - 1.0 / new_zoom;
        Self {
            min_x: anchor.x * factor + self.min_x,
            min_y: anchor.y * factor + self.min_y,
            width: container.width / new_zoom,
            height: container.height / new_zoom,
            zoom: new_zoom,
        }
    }

    /// Keep origin and zoom, recompute the world size for a resized container.
    pub fn resized(&self, container: Size) -> Self {
        Self {
            width: container.width / self.zoom,
            height: container.height / self.zoom,
            ..*self
        }
    }

    /// Fit `bounds` inside the container with `padding` pixels on every side.
    pub fn fitted(bounds: Rect, container: Size, padding: f64, min_zoom: f64, max_zoom: f64) -> Self {
        let padded = Size::new(
            (container.width - padding * 2.0).max(1.0),
            (container.height - padding * 2.0).max(1.0),
        );
        let zoom = if bounds.width() <= 0.0 || bounds.height() <= 0.0 {
            1.0_f64.clamp(min_zoom, max_zoom)
        } else {
            (padded.width / bounds.width())
                .min(padded.height / bounds.height())
                .clamp(min_zoom, max_zoom)
        };

        // Center the bounds in the container
        let width = container.width / zoom;
        let height = container.height / zoom;
        let center = bounds.center();
        Self {
            min_x: center.x - width / 2.0,
            min_y: center.y - height / 2.0,
            width,
            height,
            zoom,
        }
    }
}
