//! Star shape.

use super::{clamp_size, ShapeId, ShapeStyle};
use crate::geometry::star_vertices;
use kurbo::{BezPath, Point};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Inner radius as a fraction of the outer radius.
const INNER_RADIUS_RATIO: f64 = 0.5;

/// A star polygon anchored at its center.
///
/// The outer radius is half the minor dimension; the inner radius is half
/// the outer one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Star {
    pub(crate) id: ShapeId,
    /// Center position.
    pub position: Point,
    pub width: f64,
    pub height: f64,
    /// Number of outer points (the vertex ring has twice this many).
    pub num_points: u32,
    /// Rotation in degrees. Carried for parity with the other shapes but
    /// not applied by any renderer.
    pub rotation: f64,
    pub style: ShapeStyle,
}

impl Star {
    pub fn new(position: Point, width: f64, height: f64, num_points: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            width: clamp_size(width),
            height: clamp_size(height),
            num_points: num_points.max(3),
            rotation: 0.0,
            style: ShapeStyle::default(),
        }
    }

    pub fn with_style(mut self, style: ShapeStyle) -> Self {
        self.style = style;
        self
    }

    /// Outer radius derived from the bounding box.
    pub fn outer_radius(&self) -> f64 {
        self.width.min(self.height) / 2.0
    }

    /// Vertex ring in anchor-relative coordinates (center at the origin).
    pub fn vertices(&self) -> Vec<Point> {
        let outer = self.outer_radius();
        star_vertices(Point::ZERO, outer, outer * INNER_RADIUS_RATIO, self.num_points)
    }

    /// Closed outline in anchor-relative coordinates.
    pub fn outline(&self) -> BezPath {
        let vertices = self.vertices();
        let mut path = BezPath::new();
        path.move_to(vertices[0]);
        for &v in &vertices[1..] {
            path.line_to(v);
        }
        path.close_path();
        path
    }
}
