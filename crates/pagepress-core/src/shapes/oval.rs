//! Oval (ellipse) shape.

use super::{clamp_size, ShapeId, ShapeStyle};
use kurbo::{BezPath, Ellipse, Point, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An ellipse defined by its bounding width/height, anchored at its center.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Oval {
    pub(crate) id: ShapeId,
    /// Center position.
    pub position: Point,
    /// Bounding width (horizontal radius = width / 2).
    pub width: f64,
    /// Bounding height (vertical radius = height / 2).
    pub height: f64,
    /// Rotation in degrees, clockwise about the center.
    pub rotation: f64,
    pub style: ShapeStyle,
}

impl Oval {
    /// Create a new oval centered at `position`.
    pub fn new(position: Point, width: f64, height: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            width: clamp_size(width),
            height: clamp_size(height),
            rotation: 0.0,
            style: ShapeStyle::default(),
        }
    }

    pub fn with_style(mut self, style: ShapeStyle) -> Self {
        self.style = style;
        self
    }

    /// Outline in anchor-relative coordinates (center at the origin).
    pub fn outline(&self) -> BezPath {
        Ellipse::new(Point::ZERO, Vec2::new(self.width / 2.0, self.height / 2.0), 0.0)
            .to_path(0.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radii_from_bounds() {
        let oval = Oval::new(Point::new(50.0, 50.0), 80.0, 40.0);
        let bbox = oval.outline().bounding_box();
        assert!((bbox.width() - 80.0).abs() < 0.5);
        assert!((bbox.height() - 40.0).abs() < 0.5);
        // Centered on the origin in local space.
        assert!(bbox.center().x.abs() < 0.5);
        assert!(bbox.center().y.abs() < 0.5);
    }
}
