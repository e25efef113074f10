//! Rectangle shape.

use super::{clamp_size, ShapeId, ShapeStyle};
use crate::geometry::{rounded_polygon_path, GeometryError};
use kurbo::{BezPath, Point};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Resolve a corner-radius percentage against a shape's dimensions.
///
/// The stored value is 0-100, a percentage of the minor dimension; 100 maps
/// to half the minor dimension (a full capsule on the short axis).
pub(crate) fn effective_corner_radius(percent: f64, width: f64, height: f64) -> f64 {
    width.min(height) * percent.clamp(0.0, 100.0) / 200.0
}

/// A rectangle with optional rounded corners.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rectangle {
    pub(crate) id: ShapeId,
    /// Top-left corner position.
    pub position: Point,
    pub width: f64,
    pub height: f64,
    /// Corner radius as a percentage (0-100) of the minor dimension.
    pub corner_radius: f64,
    /// Rotation in degrees, clockwise about the top-left corner.
    pub rotation: f64,
    pub style: ShapeStyle,
}

impl Rectangle {
    /// Create a new rectangle.
    pub fn new(position: Point, width: f64, height: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            width: clamp_size(width),
            height: clamp_size(height),
            corner_radius: 0.0,
            rotation: 0.0,
            style: ShapeStyle::default(),
        }
    }

    /// Set the corner radius percentage (clamped to 0-100).
    pub fn with_corner_radius(mut self, percent: f64) -> Self {
        self.corner_radius = percent.clamp(0.0, 100.0);
        self
    }

    pub fn with_style(mut self, style: ShapeStyle) -> Self {
        self.style = style;
        self
    }

    /// Outline in anchor-relative coordinates (top-left at the origin).
    pub fn outline(&self) -> Result<BezPath, GeometryError> {
        let corners = [
            Point::new(0.0, 0.0),
            Point::new(self.width, 0.0),
            Point::new(self.width, self.height),
            Point::new(0.0, self.height),
        ];
        let radius = effective_corner_radius(self.corner_radius, self.width, self.height);
        rounded_polygon_path(&corners, radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::PathEl;

    #[test]
    fn test_creation_clamps_size() {
        let rect = Rectangle::new(Point::new(10.0, 20.0), 1.0, 50.0);
        assert!((rect.width - super::super::MIN_SHAPE_SIZE).abs() < f64::EPSILON);
        assert!((rect.height - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_effective_radius() {
        // 50% of a 100x200 rect: minor dimension 100, radius 25.
        assert!((effective_corner_radius(50.0, 100.0, 200.0) - 25.0).abs() < f64::EPSILON);
        // Out-of-range percentages clamp.
        assert!((effective_corner_radius(150.0, 100.0, 200.0) - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_sharp_outline_is_polygon() {
        let rect = Rectangle::new(Point::ZERO, 100.0, 50.0);
        let path = rect.outline().unwrap();
        assert!(
            !path
                .elements()
                .iter()
                .any(|el| matches!(el, PathEl::QuadTo(..)))
        );
    }

    #[test]
    fn test_rounded_outline_has_quads() {
        let rect = Rectangle::new(Point::ZERO, 100.0, 50.0).with_corner_radius(40.0);
        let path = rect.outline().unwrap();
        let quads = path
            .elements()
            .iter()
            .filter(|el| matches!(el, PathEl::QuadTo(..)))
            .count();
        assert_eq!(quads, 4);
    }
}
