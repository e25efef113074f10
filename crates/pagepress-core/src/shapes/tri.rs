//! Triangle shapes: isosceles and right-angled.

use super::rect::effective_corner_radius;
use super::{clamp_size, ShapeId, ShapeStyle};
use crate::geometry::{rounded_polygon_path, GeometryError};
use kurbo::{BezPath, Point};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An isosceles triangle: apex at the top-center, base along the bottom.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Triangle {
    pub(crate) id: ShapeId,
    /// Top-left corner of the bounding box.
    pub position: Point,
    pub width: f64,
    pub height: f64,
    /// Corner radius as a percentage (0-100) of the minor dimension.
    pub corner_radius: f64,
    /// Rotation in degrees, clockwise about the top-left corner.
    pub rotation: f64,
    pub style: ShapeStyle,
}

impl Triangle {
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

    pub fn with_corner_radius(mut self, percent: f64) -> Self {
        self.corner_radius = percent.clamp(0.0, 100.0);
        self
    }

    pub fn with_style(mut self, style: ShapeStyle) -> Self {
        self.style = style;
        self
    }

    /// Outline in anchor-relative coordinates.
    pub fn outline(&self) -> Result<BezPath, GeometryError> {
        let corners = [
            Point::new(self.width / 2.0, 0.0),
            Point::new(self.width, self.height),
            Point::new(0.0, self.height),
        ];
        let radius = effective_corner_radius(self.corner_radius, self.width, self.height);
        rounded_polygon_path(&corners, radius)
    }
}

/// A right triangle with the right angle at the bottom-left corner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RightTriangle {
    pub(crate) id: ShapeId,
    /// Top-left corner of the bounding box.
    pub position: Point,
    pub width: f64,
    pub height: f64,
    /// Corner radius as a percentage (0-100) of the minor dimension.
    pub corner_radius: f64,
    /// Rotation in degrees, clockwise about the top-left corner.
    pub rotation: f64,
    pub style: ShapeStyle,
}

impl RightTriangle {
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

    pub fn with_corner_radius(mut self, percent: f64) -> Self {
        self.corner_radius = percent.clamp(0.0, 100.0);
        self
    }

    pub fn with_style(mut self, style: ShapeStyle) -> Self {
        self.style = style;
        self
    }

    /// Outline in anchor-relative coordinates: the vertical leg runs down
    /// the left edge, the horizontal leg along the bottom.
    pub fn outline(&self) -> Result<BezPath, GeometryError> {
        let corners = [
            Point::new(0.0, 0.0),
            Point::new(self.width, self.height),
            Point::new(0.0, self.height),
        ];
        let radius = effective_corner_radius(self.corner_radius, self.width, self.height);
        rounded_polygon_path(&corners, radius)
    }
}
