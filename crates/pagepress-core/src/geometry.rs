//! Pure path-construction helpers shared by the interactive canvas and the
//! vector exporter.

use kurbo::{BezPath, Point, Vec2};
use thiserror::Error;

/// Geometry construction errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeometryError {
    #[error("a polygon needs at least 3 points, got {0}")]
    TooFewPoints(usize),
}

/// Unit vector from `from` towards `to`, or zero when the points coincide.
///
/// Degenerate (zero-length) edges must not produce NaN offsets, so the
/// rounding for that corner simply collapses onto the vertex.
fn direction(from: Point, to: Point) -> Vec2 {
    let v = to - from;
    let len = v.hypot();
    if len < f64::EPSILON {
        Vec2::ZERO
    } else {
        v / len
    }
}

/// Build a closed path for a polygon with rounded corners.
///
/// Every vertex `v` is replaced by two offset points `p1` (towards the
/// previous vertex) and `p2` (towards the next vertex); consecutive corners
/// are joined by straight `p2 -> p1` segments and each corner itself is a
/// single quadratic with `v` as control point. A radius of zero produces the
/// plain polygon with straight joins.
pub fn rounded_polygon_path(points: &[Point], corner_radius: f64) -> Result<BezPath, GeometryError> {
    if points.len() < 3 {
        return Err(GeometryError::TooFewPoints(points.len()));
    }

    let mut path = BezPath::new();

    if corner_radius <= 0.0 {
        path.move_to(points[0]);
        for &p in &points[1..] {
            path.line_to(p);
        }
        path.close_path();
        return Ok(path);
    }

    let n = points.len();
    for (i, &v) in points.iter().enumerate() {
        let prev = points[(i + n - 1) % n];
        let next = points[(i + 1) % n];
        let p1 = v + direction(v, prev) * corner_radius;
        let p2 = v + direction(v, next) * corner_radius;
        if i == 0 {
            path.move_to(p1);
        } else {
            path.line_to(p1);
        }
        path.quad_to(v, p2);
    }
    path.close_path();
    Ok(path)
}

/// Vertices of a star polygon: `2 * num_points` points alternating between
/// the outer and inner radius, spaced `PI / num_points` apart, starting at
/// `-PI / 2` so the first point faces up.
pub fn star_vertices(
    center: Point,
    outer_radius: f64,
    inner_radius: f64,
    num_points: u32,
) -> Vec<Point> {
    let step = std::f64::consts::PI / num_points as f64;
    let start = -std::f64::consts::FRAC_PI_2;
    (0..num_points * 2)
        .map(|i| {
            let radius = if i % 2 == 0 { outer_radius } else { inner_radius };
            let angle = start + step * i as f64;
            Point::new(
                center.x + radius * angle.cos(),
                center.y + radius * angle.sin(),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::PathEl;

    fn square() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0, 100.0),
            Point::new(0.0, 100.0),
        ]
    }

    #[test]
    fn test_too_few_points() {
        let err = rounded_polygon_path(&square()[..2], 10.0).unwrap_err();
        assert_eq!(err, GeometryError::TooFewPoints(2));
    }

    #[test]
    fn test_zero_radius_is_plain_polygon() {
        let path = rounded_polygon_path(&square(), 0.0).unwrap();
        let has_curves = path
            .elements()
            .iter()
            .any(|el| matches!(el, PathEl::QuadTo(..) | PathEl::CurveTo(..)));
        assert!(!has_curves);
        // MoveTo + 3 LineTo + ClosePath
        assert_eq!(path.elements().len(), 5);
    }

    #[test]
    fn test_rounded_square_has_one_quad_per_corner() {
        let path = rounded_polygon_path(&square(), 10.0).unwrap();
        let quads = path
            .elements()
            .iter()
            .filter(|el| matches!(el, PathEl::QuadTo(..)))
            .count();
        assert_eq!(quads, 4);
    }

    #[test]
    fn test_rounded_corner_offsets() {
        let path = rounded_polygon_path(&square(), 10.0).unwrap();
        // First element starts 10px from the first vertex towards the last.
        match path.elements()[0] {
            PathEl::MoveTo(p) => {
                assert!((p.x - 0.0).abs() < 1e-9);
                assert!((p.y - 10.0).abs() < 1e-9);
            }
            ref other => panic!("expected MoveTo, got {other:?}"),
        }
    }

    #[test]
    fn test_degenerate_edge_does_not_panic() {
        // Repeated vertex gives a zero-length edge; the offset collapses
        // onto the vertex instead of dividing by zero.
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(50.0, 80.0),
        ];
        let path = rounded_polygon_path(&points, 10.0).unwrap();
        for el in path.elements() {
            let ok = match el {
                PathEl::MoveTo(p) | PathEl::LineTo(p) => p.x.is_finite() && p.y.is_finite(),
                PathEl::QuadTo(c, p) => {
                    c.x.is_finite() && c.y.is_finite() && p.x.is_finite() && p.y.is_finite()
                }
                _ => true,
            };
            assert!(ok, "non-finite point in {el:?}");
        }
    }

    #[test]
    fn test_star_vertex_count_and_start() {
        let verts = star_vertices(Point::new(50.0, 50.0), 40.0, 20.0, 5);
        assert_eq!(verts.len(), 10);
        // First vertex points straight up from the center.
        assert!((verts[0].x - 50.0).abs() < 1e-9);
        assert!((verts[0].y - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_star_alternates_radii() {
        let center = Point::new(0.0, 0.0);
        let verts = star_vertices(center, 40.0, 20.0, 6);
        for (i, v) in verts.iter().enumerate() {
            let r = (*v - center).hypot();
            let expected = if i % 2 == 0 { 40.0 } else { 20.0 };
            assert!((r - expected).abs() < 1e-9, "vertex {i} at radius {r}");
        }
    }
}
