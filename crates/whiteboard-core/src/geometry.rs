//! Small geometry helpers shared by hit-testing and viewport math.

use kurbo::{Point, Rect, Vec2};

/// Whether two rectangles overlap. Touching edges count as intersecting.
pub fn is_rect_intersect(a: Rect, b: Rect) -> bool {
    let a = a.abs();
    let b = b.abs();
    a.x0 <= b.x1 && b.x0 <= a.x1 && a.y0 <= b.y1 && b.y0 <= a.y1
}

/// Inclusive point-in-rectangle test.
pub fn rect_contains(rect: Rect, point: Point) -> bool {
    let rect = rect.abs();
    point.x >= rect.x0 && point.x <= rect.x1 && point.y >= rect.y0 && point.y <= rect.y1
}

/// Build a rectangle from two arbitrary corners.
pub fn normalize_rect(anchor: Point, focus: Point) -> Rect {
    let x = anchor.x.min(focus.x);
    let y = anchor.y.min(focus.y);
    let width = (anchor.x - focus.x).abs();
    let height = (anchor.y - focus.y).abs();
    Rect::new(x, y, x + width, y + height)
}

/// Rotate `point` around `center` by `radians`.
pub fn rotate_point(point: Point, center: Point, radians: f64) -> Point {
    if radians == 0.0 {
        return point;
    }
    let (sin, cos) = radians.sin_cos();
    let d = point - center;
    center + Vec2::new(d.x * cos - d.y * sin, d.x * sin + d.y * cos)
}

/// Union of all rectangles, or `None` for an empty iterator.
pub fn union_bounds<I>(rects: I) -> Option<Rect>
where
    I: IntoIterator<Item = Rect>,
{
    rects.into_iter().reduce(|acc, r| acc.union(r))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(is_rect_intersect(a, Rect::new(5.0, 5.0, 15.0, 15.0)));
        assert!(is_rect_intersect(a, Rect::new(10.0, 0.0, 20.0, 10.0)));
        assert!(!is_rect_intersect(a, Rect::new(11.0, 0.0, 20.0, 10.0)));
    }

    #[test]
    fn test_normalize_rect_any_direction() {
        let r = normalize_rect(Point::new(30.0, 40.0), Point::new(10.0, 5.0));
        assert_eq!(r, Rect::new(10.0, 5.0, 30.0, 40.0));
    }

    #[test]
    fn test_rotate_point_quarter_turn() {
        let p = rotate_point(
            Point::new(10.0, 0.0),
            Point::ZERO,
            std::f64::consts::FRAC_PI_2,
        );
        assert!(p.x.abs() < 1e-9);
        assert!((p.y - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_union_bounds() {
        assert!(union_bounds(Vec::<Rect>::new()).is_none());
        let u = union_bounds([
            Rect::new(0.0, 0.0, 10.0, 10.0),
            Rect::new(-5.0, 20.0, 0.0, 30.0),
        ]);
        assert_eq!(u, Some(Rect::new(-5.0, 0.0, 10.0, 30.0)));
    }
}
