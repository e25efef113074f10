//! Coordinate-space mediation between the scaled interactive canvas and the
//! unscaled page space.

use crate::shapes::Shape;
use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Tight bounding box of a re-based shape set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupBounds {
    /// Max right edge after re-basing.
    pub widest_x: f64,
    /// Max bottom edge after re-basing.
    pub widest_y: f64,
}

/// Uniform scale factor that fits a page into a viewport with padding.
///
/// Both axes share one factor so shapes never distort.
pub fn fit_scale(
    viewport_width: f64,
    viewport_height: f64,
    page_width: f64,
    page_height: f64,
    padding: f64,
) -> f64 {
    let scale_x = (viewport_width - padding) / page_width;
    let scale_y = (viewport_height - padding) / page_height;
    scale_x.min(scale_y)
}

/// Clamp a dragged group's candidate position to the page.
///
/// `candidate` is in scaled screen space; it is converted to page space via
/// the combined `scale * manual_zoom` factor, clamped per axis to
/// `[0, page - bounding box]`, and converted back. The lower bound wins when
/// the box is larger than the page. Clamping an already-clamped position is
/// a no-op.
pub fn clamp_drag_position(
    candidate: Point,
    scale: f64,
    manual_zoom: f64,
    page_size: Size,
    group_box: Size,
) -> Point {
    let factor = scale * manual_zoom;
    let page_x = candidate.x / factor;
    let page_y = candidate.y / factor;
    let max_x = (page_size.width - group_box.width).max(0.0);
    let max_y = (page_size.height - group_box.height).max(0.0);
    Point::new(
        page_x.clamp(0.0, max_x) * factor,
        page_y.clamp(0.0, max_y) * factor,
    )
}

/// Re-base a shape set into group-local coordinates and measure it.
///
/// Finds the minimum left/top edge across the shapes (center-based edges for
/// Oval/Star, corner-based otherwise), shifts every shape so that minimum
/// lands on 0, and returns the max right/bottom edge after the shift. This
/// is the only correct way to turn a free-floating shape set into a valid
/// group: afterwards every member lies within `[0, widest_x] x [0, widest_y]`.
pub fn recompute_group_bounds(shapes: &mut [Shape]) -> GroupBounds {
    if shapes.is_empty() {
        return GroupBounds {
            widest_x: 0.0,
            widest_y: 0.0,
        };
    }

    let shift_x = shapes
        .iter()
        .map(Shape::left_edge)
        .fold(f64::INFINITY, f64::min);
    let shift_y = shapes
        .iter()
        .map(Shape::top_edge)
        .fold(f64::INFINITY, f64::min);

    for shape in shapes.iter_mut() {
        shape.translate(Vec2::new(-shift_x, -shift_y));
    }

    let widest_x = shapes
        .iter()
        .map(Shape::right_edge)
        .fold(f64::NEG_INFINITY, f64::max);
    let widest_y = shapes
        .iter()
        .map(Shape::bottom_edge)
        .fold(f64::NEG_INFINITY, f64::max);

    GroupBounds { widest_x, widest_y }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Oval, Rectangle, Shape};

    #[test]
    fn test_fit_scale_uniform() {
        // A4 page in a 1000x800 viewport with 40px padding: the height is
        // the limiting axis.
        let scale = fit_scale(1000.0, 800.0, 2480.0, 3508.0, 40.0);
        assert!((scale - (800.0 - 40.0) / 3508.0).abs() < 1e-12);
    }

    #[test]
    fn test_fit_scale_width_limited() {
        let scale = fit_scale(500.0, 4000.0, 2480.0, 3508.0, 0.0);
        assert!((scale - 500.0 / 2480.0).abs() < 1e-12);
    }

    #[test]
    fn test_clamp_inside_is_noop() {
        let pos = Point::new(100.0, 150.0);
        let clamped = clamp_drag_position(
            pos,
            0.5,
            1.0,
            Size::new(1000.0, 1000.0),
            Size::new(100.0, 100.0),
        );
        assert!((clamped.x - pos.x).abs() < 1e-12);
        assert!((clamped.y - pos.y).abs() < 1e-12);
    }

    #[test]
    fn test_clamp_is_idempotent() {
        let pos = Point::new(10_000.0, -500.0);
        let page = Size::new(1000.0, 1000.0);
        let bbox = Size::new(300.0, 300.0);
        let once = clamp_drag_position(pos, 0.4, 1.25, page, bbox);
        let twice = clamp_drag_position(once, 0.4, 1.25, page, bbox);
        assert!((once.x - twice.x).abs() < 1e-9);
        assert!((once.y - twice.y).abs() < 1e-9);
    }

    #[test]
    fn test_clamp_respects_bounding_box() {
        // Page 1000 wide, box 300 wide, scale 1: max page-space x is 700.
        let clamped = clamp_drag_position(
            Point::new(2000.0, 0.0),
            1.0,
            1.0,
            Size::new(1000.0, 1000.0),
            Size::new(300.0, 300.0),
        );
        assert!((clamped.x - 700.0).abs() < 1e-12);
    }

    #[test]
    fn test_clamp_oversized_box_pins_to_origin() {
        let clamped = clamp_drag_position(
            Point::new(50.0, 50.0),
            1.0,
            1.0,
            Size::new(100.0, 100.0),
            Size::new(400.0, 400.0),
        );
        assert!(clamped.x.abs() < 1e-12);
        assert!(clamped.y.abs() < 1e-12);
    }

    fn sample_shapes() -> Vec<Shape> {
        vec![
            Shape::Rectangle(Rectangle::new(Point::new(40.0, 60.0), 100.0, 50.0)),
            // Center-based: left edge at 200 - 30 = 170, top at 300 - 20 = 280.
            Shape::Oval(Oval::new(Point::new(200.0, 300.0), 60.0, 40.0)),
        ]
    }

    #[test]
    fn test_rebase_shifts_to_origin() {
        let mut shapes = sample_shapes();
        let bounds = recompute_group_bounds(&mut shapes);
        assert!((shapes[0].left_edge() - 0.0).abs() < 1e-12);
        assert!((shapes[0].top_edge() - 0.0).abs() < 1e-12);
        // Oval center shifted by (-40, -60).
        assert!((shapes[1].position().x - 160.0).abs() < 1e-12);
        assert!((shapes[1].position().y - 240.0).abs() < 1e-12);
        assert!((bounds.widest_x - 190.0).abs() < 1e-12);
        assert!((bounds.widest_y - 240.0).abs() < 1e-12);
    }

    #[test]
    fn test_rebase_is_idempotent() {
        let mut shapes = sample_shapes();
        let first = recompute_group_bounds(&mut shapes);
        let positions: Vec<_> = shapes.iter().map(Shape::position).collect();
        let second = recompute_group_bounds(&mut shapes);
        assert_eq!(first, second);
        for (shape, before) in shapes.iter().zip(positions) {
            assert!((shape.position().x - before.x).abs() < 1e-12);
            assert!((shape.position().y - before.y).abs() < 1e-12);
        }
    }

    #[test]
    fn test_empty_set() {
        let mut shapes: Vec<Shape> = Vec::new();
        let bounds = recompute_group_bounds(&mut shapes);
        assert!((bounds.widest_x - 0.0).abs() < f64::EPSILON);
        assert!((bounds.widest_y - 0.0).abs() < f64::EPSILON);
    }
}
