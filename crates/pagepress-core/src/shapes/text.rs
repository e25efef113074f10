//! Text block shape.

use super::{clamp_size, ShapeId, ShapeStyle};
use crate::units::PX_PER_PT;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Horizontal text alignment within the block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

/// A block of text that wraps to its width and clips to its height.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Text {
    pub(crate) id: ShapeId,
    /// Top-left corner of the text box.
    pub position: Point,
    /// Box width; lines wrap to fit it.
    pub width: f64,
    /// Box height; lines that do not fit are clipped.
    pub height: f64,
    /// Rotation in degrees, clockwise about the top-left corner.
    pub rotation: f64,
    /// The text content.
    pub content: String,
    /// Font size in px (point sizes are scaled by 300/72 on the way in).
    pub font_size: f64,
    pub align: TextAlign,
    /// Style properties; `fill` is the text color.
    pub style: ShapeStyle,
}

impl Text {
    /// Default font size in points.
    pub const DEFAULT_FONT_SIZE_PT: f64 = 16.0;

    /// Create a text block with a font size given in points.
    pub fn new(position: Point, width: f64, height: f64, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            width: clamp_size(width),
            height: clamp_size(height),
            rotation: 0.0,
            content: content.into(),
            font_size: Self::DEFAULT_FONT_SIZE_PT * PX_PER_PT,
            align: TextAlign::default(),
            style: ShapeStyle::default(),
        }
    }

    /// Set the font size in points (stored internally in px).
    pub fn with_font_size_pt(mut self, size_pt: f64) -> Self {
        self.font_size = size_pt * PX_PER_PT;
        self
    }

    pub fn with_align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    pub fn with_style(mut self, style: ShapeStyle) -> Self {
        self.style = style;
        self
    }

    /// Font size expressed back in points.
    pub fn font_size_pt(&self) -> f64 {
        self.font_size / PX_PER_PT
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_size_round_trip() {
        let text = Text::new(Point::ZERO, 200.0, 100.0, "Hello").with_font_size_pt(12.0);
        assert!((text.font_size - 50.0).abs() < 1e-9); // 12 * 300/72
        assert!((text.font_size_pt() - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_default_alignment() {
        let text = Text::new(Point::ZERO, 200.0, 100.0, "Hello");
        assert_eq!(text.align, TextAlign::Left);
    }
}
