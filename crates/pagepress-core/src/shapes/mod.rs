//! Shape definitions for the page layout model.
//!
//! Coordinates are page-local pixels at the fixed render resolution
//! ([`crate::units::RENDER_DPI`]). Corner-based shapes anchor at their
//! top-left corner; Oval and Star anchor at their center. Rotation is in
//! degrees, clockwise in the y-down page space, about the anchor.

mod image;
mod oval;
mod rect;
mod star;
mod text;
mod tri;

pub use image::{Image, RasterFormat, RasterHandle};
pub use oval::Oval;
pub use rect::Rectangle;
pub use star::Star;
pub use text::{Text, TextAlign};
pub use tri::{RightTriangle, Triangle};

use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for shapes.
pub type ShapeId = Uuid;

/// Minimum shape extent in px; any smaller width/height is clamped up.
pub const MIN_SHAPE_SIZE: f64 = 5.0;

/// Clamp a dimension to the minimum shape size.
pub(crate) fn clamp_size(value: f64) -> f64 {
    value.max(MIN_SHAPE_SIZE)
}

/// RGBA color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    pub const WHITE: Self = Self::new(255, 255, 255, 255);

    /// Parse a `#rgb`, `#rrggbb` or `#rrggbbaa` hex color. Falls back to
    /// black for anything unrecognized.
    pub fn from_hex(color: &str) -> Self {
        if let Some(hex) = color.trim().strip_prefix('#') {
            match hex.len() {
                3 => {
                    let r = u8::from_str_radix(&hex[0..1], 16).unwrap_or(0) * 17;
                    let g = u8::from_str_radix(&hex[1..2], 16).unwrap_or(0) * 17;
                    let b = u8::from_str_radix(&hex[2..3], 16).unwrap_or(0) * 17;
                    return Self::new(r, g, b, 255);
                }
                6 => {
                    let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(0);
                    let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(0);
                    let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(0);
                    return Self::new(r, g, b, 255);
                }
                8 => {
                    let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(0);
                    let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(0);
                    let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(0);
                    let a = u8::from_str_radix(&hex[6..8], 16).unwrap_or(255);
                    return Self::new(r, g, b, a);
                }
                _ => {}
            }
        }
        Self::BLACK
    }
}

/// Fill and stroke properties shared by all shapes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    /// Fill color (None = no fill).
    pub fill: Option<Rgba>,
    /// Stroke color (None = no stroke).
    pub stroke: Option<Rgba>,
    /// Stroke width in px.
    pub stroke_width: f64,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            fill: Some(Rgba::BLACK),
            stroke: None,
            stroke_width: 1.0,
        }
    }
}

/// One drawable primitive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Shape {
    Rectangle(Rectangle),
    Oval(Oval),
    Triangle(Triangle),
    RightTriangle(RightTriangle),
    Star(Star),
    Text(Text),
    Image(Image),
}

impl Shape {
    pub fn id(&self) -> ShapeId {
        match self {
            Shape::Rectangle(s) => s.id,
            Shape::Oval(s) => s.id,
            Shape::Triangle(s) => s.id,
            Shape::RightTriangle(s) => s.id,
            Shape::Star(s) => s.id,
            Shape::Text(s) => s.id,
            Shape::Image(s) => s.id,
        }
    }

    /// Anchor position: top-left corner, or center for Oval/Star.
    pub fn position(&self) -> Point {
        match self {
            Shape::Rectangle(s) => s.position,
            Shape::Oval(s) => s.position,
            Shape::Triangle(s) => s.position,
            Shape::RightTriangle(s) => s.position,
            Shape::Star(s) => s.position,
            Shape::Text(s) => s.position,
            Shape::Image(s) => s.position,
        }
    }

    pub fn set_position(&mut self, position: Point) {
        match self {
            Shape::Rectangle(s) => s.position = position,
            Shape::Oval(s) => s.position = position,
            Shape::Triangle(s) => s.position = position,
            Shape::RightTriangle(s) => s.position = position,
            Shape::Star(s) => s.position = position,
            Shape::Text(s) => s.position = position,
            Shape::Image(s) => s.position = position,
        }
    }

    pub fn width(&self) -> f64 {
        match self {
            Shape::Rectangle(s) => s.width,
            Shape::Oval(s) => s.width,
            Shape::Triangle(s) => s.width,
            Shape::RightTriangle(s) => s.width,
            Shape::Star(s) => s.width,
            Shape::Text(s) => s.width,
            Shape::Image(s) => s.width,
        }
    }

    pub fn height(&self) -> f64 {
        match self {
            Shape::Rectangle(s) => s.height,
            Shape::Oval(s) => s.height,
            Shape::Triangle(s) => s.height,
            Shape::RightTriangle(s) => s.height,
            Shape::Star(s) => s.height,
            Shape::Text(s) => s.height,
            Shape::Image(s) => s.height,
        }
    }

    /// Resize, clamping both dimensions to [`MIN_SHAPE_SIZE`].
    pub fn resize(&mut self, width: f64, height: f64) {
        let (width, height) = (clamp_size(width), clamp_size(height));
        match self {
            Shape::Rectangle(s) => (s.width, s.height) = (width, height),
            Shape::Oval(s) => (s.width, s.height) = (width, height),
            Shape::Triangle(s) => (s.width, s.height) = (width, height),
            Shape::RightTriangle(s) => (s.width, s.height) = (width, height),
            Shape::Star(s) => (s.width, s.height) = (width, height),
            Shape::Text(s) => (s.width, s.height) = (width, height),
            Shape::Image(s) => (s.width, s.height) = (width, height),
        }
    }

    /// Rotation in degrees, clockwise about the anchor.
    pub fn rotation(&self) -> f64 {
        match self {
            Shape::Rectangle(s) => s.rotation,
            Shape::Oval(s) => s.rotation,
            Shape::Triangle(s) => s.rotation,
            Shape::RightTriangle(s) => s.rotation,
            Shape::Star(s) => s.rotation,
            Shape::Text(s) => s.rotation,
            Shape::Image(s) => s.rotation,
        }
    }

    pub fn style(&self) -> &ShapeStyle {
        match self {
            Shape::Rectangle(s) => &s.style,
            Shape::Oval(s) => &s.style,
            Shape::Triangle(s) => &s.style,
            Shape::RightTriangle(s) => &s.style,
            Shape::Star(s) => &s.style,
            Shape::Text(s) => &s.style,
            Shape::Image(s) => &s.style,
        }
    }

    pub fn style_mut(&mut self) -> &mut ShapeStyle {
        match self {
            Shape::Rectangle(s) => &mut s.style,
            Shape::Oval(s) => &mut s.style,
            Shape::Triangle(s) => &mut s.style,
            Shape::RightTriangle(s) => &mut s.style,
            Shape::Star(s) => &mut s.style,
            Shape::Text(s) => &mut s.style,
            Shape::Image(s) => &mut s.style,
        }
    }

    /// Whether the anchor is the shape's center rather than its corner.
    pub fn is_radial(&self) -> bool {
        matches!(self, Shape::Oval(_) | Shape::Star(_))
    }

    /// Leftmost extent in the shape's coordinate space.
    pub fn left_edge(&self) -> f64 {
        if self.is_radial() {
            self.position().x - self.width() / 2.0
        } else {
            self.position().x
        }
    }

    /// Topmost extent in the shape's coordinate space.
    pub fn top_edge(&self) -> f64 {
        if self.is_radial() {
            self.position().y - self.height() / 2.0
        } else {
            self.position().y
        }
    }

    /// Rightmost extent in the shape's coordinate space.
    pub fn right_edge(&self) -> f64 {
        if self.is_radial() {
            self.position().x + self.width() / 2.0
        } else {
            self.position().x + self.width()
        }
    }

    /// Bottommost extent in the shape's coordinate space.
    pub fn bottom_edge(&self) -> f64 {
        if self.is_radial() {
            self.position().y + self.height() / 2.0
        } else {
            self.position().y + self.height()
        }
    }

    /// Shift the shape's anchor by a delta.
    pub fn translate(&mut self, delta: Vec2) {
        let p = self.position();
        self.set_position(p + delta);
    }

    /// Transform mapping anchor-relative coordinates into the shape's
    /// owning space, applying the clockwise rotation about the anchor.
    ///
    /// Star rotation is intentionally not applied; neither the canvas
    /// renderer nor the exporter honors it.
    pub fn placement(&self) -> Affine {
        let rotation = match self {
            Shape::Star(_) => 0.0,
            _ => self.rotation(),
        };
        Affine::translate(self.position().to_vec2()) * Affine::rotate(rotation.to_radians())
    }

    /// Assign a fresh unique id, for duplication and pasting.
    pub fn regenerate_id(&mut self) {
        let new_id = Uuid::new_v4();
        match self {
            Shape::Rectangle(s) => s.id = new_id,
            Shape::Oval(s) => s.id = new_id,
            Shape::Triangle(s) => s.id = new_id,
            Shape::RightTriangle(s) => s.id = new_id,
            Shape::Star(s) => s.id = new_id,
            Shape::Text(s) => s.id = new_id,
            Shape::Image(s) => s.id = new_id,
        }
    }
}
