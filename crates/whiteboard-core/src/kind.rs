//! Per-type element behavior: hit-testing, marquee selection and moving.

use kurbo::{Point, Rect, Vec2};
use serde_json::{Map, Value};

use crate::element::Element;
use crate::geometry::{is_rect_intersect, rect_contains, rotate_point};

/// Element types that behave as plain boxes out of the box.
pub const DEFAULT_BOX_KINDS: [&str; 7] = [
    "card",
    "geometry",
    "rich-text",
    "mind-node",
    "video",
    "image",
    "frame",
];

/// Behavior shared by all elements of one `type`.
pub trait ElementKind {
    /// The element `type` this kind handles.
    fn name(&self) -> &str;

    /// Whether a world point lies on the element.
    fn is_hit(&self, element: &Element, point: Point) -> bool {
        let point = match element.rotation {
            Some(angle) if angle != 0.0 => rotate_point(point, element.center(), -angle),
            _ => point,
        };
        rect_contains(element.bounds(), point)
    }

    /// Whether a marquee rectangle (world coordinates) selects the element.
    fn is_selected(&self, element: &Element, area: Rect) -> bool {
        is_rect_intersect(element.bounds(), area)
    }

    /// Properties to write so `element` ends up shifted by `offset`.
    fn translate(&self, element: &Element, offset: Vec2) -> Map<String, Value> {
        let mut props = Map::new();
        props.insert("x".into(), (element.x + offset.x).into());
        props.insert("y".into(), (element.y + offset.y).into());
        props
    }
}

/// An element kind that is hit and moved by its bounding box.
#[derive(Debug, Clone)]
pub struct BoxKind {
    name: String,
}

impl BoxKind {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl ElementKind for BoxKind {
    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_hit() {
        let kind = BoxKind::new("card");
        let element = Element::new("a", "card", Rect::new(0.0, 0.0, 100.0, 50.0));
        assert!(kind.is_hit(&element, Point::new(50.0, 25.0)));
        assert!(kind.is_hit(&element, Point::new(100.0, 50.0)));
        assert!(!kind.is_hit(&element, Point::new(101.0, 25.0)));
    }

    #[test]
    fn test_rotated_hit() {
        let kind = BoxKind::new("card");
        let mut element = Element::new("a", "card", Rect::new(0.0, 40.0, 100.0, 60.0));
        // A flat bar turned upright around its center (50, 50).
        element.rotation = Some(std::f64::consts::FRAC_PI_2);
        assert!(kind.is_hit(&element, Point::new(50.0, 5.0)));
        assert!(!kind.is_hit(&element, Point::new(5.0, 50.0)));
    }

    #[test]
    fn test_translate_props() {
        let kind = BoxKind::new("card");
        let element = Element::new("a", "card", Rect::new(10.0, 20.0, 30.0, 40.0));
        let props = kind.translate(&element, Vec2::new(5.0, -5.0));
        assert_eq!(props["x"], 15.0);
        assert_eq!(props["y"], 15.0);
    }
}
