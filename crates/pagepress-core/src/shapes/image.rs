//! Image shape for placed raster assets.

use super::{clamp_size, ShapeId, ShapeStyle};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Raster container format of a decoded asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RasterFormat {
    Png,
    Jpeg,
    WebP,
}

impl RasterFormat {
    /// MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            RasterFormat::Png => "image/png",
            RasterFormat::Jpeg => "image/jpeg",
            RasterFormat::WebP => "image/webp",
        }
    }

    /// Detect format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Some(RasterFormat::Png);
        }
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(RasterFormat::Jpeg);
        }
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Some(RasterFormat::WebP);
        }
        None
    }
}

/// An opaque handle to decoded raster data with its intrinsic dimensions.
///
/// The encoded bytes are shared so duplicating a group never copies pixel
/// data. They are skipped by serde; snapshots compare the dimensions,
/// format, and placement only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RasterHandle {
    /// Intrinsic width in pixels.
    pub source_width: u32,
    /// Intrinsic height in pixels.
    pub source_height: u32,
    pub format: RasterFormat,
    /// Encoded bytes in the container format.
    #[serde(skip)]
    pub data: Arc<Vec<u8>>,
}

impl RasterHandle {
    pub fn new(source_width: u32, source_height: u32, format: RasterFormat, data: Vec<u8>) -> Self {
        Self {
            source_width,
            source_height,
            format,
            data: Arc::new(data),
        }
    }
}

/// A placed raster image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub(crate) id: ShapeId,
    /// Top-left corner position.
    pub position: Point,
    /// Display width.
    pub width: f64,
    /// Display height.
    pub height: f64,
    /// Rotation in degrees, clockwise about the top-left corner.
    pub rotation: f64,
    pub raster: RasterHandle,
    /// Style properties (stroke draws an optional border).
    pub style: ShapeStyle,
}

impl Image {
    /// Create an image shape displayed at its intrinsic size.
    pub fn new(position: Point, raster: RasterHandle) -> Self {
        let width = clamp_size(raster.source_width as f64);
        let height = clamp_size(raster.source_height as f64);
        Self {
            id: Uuid::new_v4(),
            position,
            width,
            height,
            rotation: 0.0,
            raster,
            style: ShapeStyle {
                fill: None,
                stroke: None,
                stroke_width: 0.0,
            },
        }
    }

    /// Set specific display dimensions.
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = clamp_size(width);
        self.height = clamp_size(height);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detection() {
        assert_eq!(
            RasterFormat::from_magic_bytes(&[0x89, 0x50, 0x4E, 0x47, 0x0D]),
            Some(RasterFormat::Png)
        );
        assert_eq!(
            RasterFormat::from_magic_bytes(&[0xFF, 0xD8, 0xFF, 0xE0]),
            Some(RasterFormat::Jpeg)
        );
        assert_eq!(RasterFormat::from_magic_bytes(b"RIFF0000WEBPVP8 "), Some(RasterFormat::WebP));
        assert_eq!(RasterFormat::from_magic_bytes(b"GIF89a"), None);
    }

    #[test]
    fn test_intrinsic_display_size() {
        let raster = RasterHandle::new(640, 480, RasterFormat::Png, vec![0u8; 16]);
        let image = Image::new(Point::ZERO, raster);
        assert!((image.width - 640.0).abs() < f64::EPSILON);
        assert!((image.height - 480.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shared_data_on_clone() {
        let raster = RasterHandle::new(10, 10, RasterFormat::Jpeg, vec![1, 2, 3]);
        let image = Image::new(Point::ZERO, raster);
        let copy = image.clone();
        assert!(Arc::ptr_eq(&image.raster.data, &copy.raster.data));
    }
}
