//! Scene-to-PDF export pass.
//!
//! Walks a [`SceneStore`] snapshot and emits one output page per stored
//! page: background first, then groups in z-order with the output origin
//! translated to the group placement, then shapes in array order. Shape
//! geometry is rebuilt from the same kernel the canvas uses, so the output
//! reproduces the interactive rendering instead of approximating it.

use crate::content::{PageCanvas, PT_PER_MM};
use crate::metrics;
use kurbo::{Affine, BezPath, Point, Vec2};
use pagepress_core::geometry::GeometryError;
use pagepress_core::shapes::{Image, RasterHandle, Rgba, Shape, Text, TextAlign};
use pagepress_core::store::{Page, SceneStore};
use pagepress_core::units::{convert_length_f64, px_to_mm, Unit, UnitError};
use pdf_writer::{Filter, Finish, Name, Pdf, Rect, Ref};
use thiserror::Error;

/// Resource name of the export font.
const FONT_RES: Name<'static> = Name(b"F1");

/// Export pass errors. Any shape-level failure aborts the whole pass;
/// partial output is never returned.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("geometry failure during export: {0}")]
    Geometry(#[from] GeometryError),
    #[error("unit conversion failure during export: {0}")]
    Unit(#[from] UnitError),
    #[error("raster encode failure during export: {0}")]
    Raster(String),
    #[error("export cancelled")]
    Cancelled,
}

/// Raster embedding mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageCompression {
    /// Embed decoded pixels losslessly.
    Lossless,
    /// Re-encode as JPEG at the given quality (0-100).
    Jpeg(u8),
}

/// User-facing export settings.
#[derive(Debug, Clone, Copy)]
pub struct ExportOptions {
    pub image_compression: ImageCompression,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            image_compression: ImageCompression::Jpeg(85),
        }
    }
}

/// An image XObject prepared for one page.
struct PreparedImage {
    id: Ref,
    width: u32,
    height: u32,
    data: Vec<u8>,
    jpeg: bool,
}

/// One synchronous export pass over a scene.
pub struct PdfExporter<'a> {
    store: &'a SceneStore,
    options: ExportOptions,
}

impl<'a> PdfExporter<'a> {
    pub fn new(store: &'a SceneStore) -> Self {
        Self {
            store,
            options: ExportOptions::default(),
        }
    }

    pub fn with_options(store: &'a SceneStore, options: ExportOptions) -> Self {
        Self { store, options }
    }

    /// Export every page of the store into a PDF document.
    pub fn export(&self) -> Result<Vec<u8>, ExportError> {
        self.export_with_progress(|_, _| true)
    }

    /// Export with a progress callback, invoked before each page with
    /// `(page_index, page_count)`. Returning `false` cancels the pass;
    /// the in-progress output is discarded and the store is untouched.
    pub fn export_with_progress(
        &self,
        mut progress: impl FnMut(usize, usize) -> bool,
    ) -> Result<Vec<u8>, ExportError> {
        let pages = self.store.pages();
        let mut alloc = Ref::new(1);
        let catalog_id = alloc.bump();
        let tree_id = alloc.bump();
        let font_id = alloc.bump();
        let page_ids: Vec<Ref> = pages.iter().map(|_| alloc.bump()).collect();

        let mut pdf = Pdf::new();
        pdf.catalog(catalog_id).pages(tree_id);
        pdf.pages(tree_id)
            .kids(page_ids.iter().copied())
            .count(pages.len() as i32);
        pdf.type1_font(font_id)
            .base_font(Name(b"Helvetica"))
            .encoding_predefined(Name(b"WinAnsiEncoding"));

        for (index, page) in pages.iter().enumerate() {
            if !progress(index, pages.len()) {
                log::info!("export cancelled before page {}/{}", index + 1, pages.len());
                return Err(ExportError::Cancelled);
            }
            self.export_page(&mut pdf, &mut alloc, tree_id, font_id, page_ids[index], page)?;
        }

        log::info!("exported {} page(s)", pages.len());
        Ok(pdf.finish())
    }

    fn export_page(
        &self,
        pdf: &mut Pdf,
        alloc: &mut Ref,
        tree_id: Ref,
        font_id: Ref,
        page_id: Ref,
        page: &Page,
    ) -> Result<(), ExportError> {
        // Prepare image XObjects up front so the resource dictionary and
        // the content stream agree on names; the draw pass consumes them
        // in the same encounter order.
        let mut images = Vec::new();
        for group in &page.groups {
            for shape in &group.shapes {
                if let Shape::Image(img) = shape {
                    let (data, jpeg, width, height) = self.prepare_raster(&img.raster)?;
                    images.push(PreparedImage {
                        id: alloc.bump(),
                        width,
                        height,
                        data,
                        jpeg,
                    });
                }
            }
        }
        let image_names: Vec<String> = (0..images.len()).map(|i| format!("Im{i}")).collect();

        let mut canvas = PageCanvas::new(page.height)?;
        if page.background != Rgba::WHITE {
            canvas.fill_page(page.width, page.height, page.background)?;
        }

        let mut image_index = 0usize;
        for group in &page.groups {
            let offset = Vec2::new(group.x, group.y);
            for shape in &group.shapes {
                self.draw_shape(&mut canvas, shape, offset, &image_names, &mut image_index)?;
            }
        }
        let content_bytes = canvas.finish();
        let content_id = alloc.bump();

        let width_pt = (px_to_mm(page.width)? * PT_PER_MM) as f32;
        let height_pt = (px_to_mm(page.height)? * PT_PER_MM) as f32;

        let mut page_writer = pdf.page(page_id);
        page_writer.media_box(Rect::new(0.0, 0.0, width_pt, height_pt));
        page_writer.parent(tree_id);
        page_writer.contents(content_id);
        {
            let mut resources = page_writer.resources();
            resources.fonts().pair(FONT_RES, font_id);
            if !images.is_empty() {
                let mut xobjects = resources.x_objects();
                for (image, name) in images.iter().zip(&image_names) {
                    xobjects.pair(Name(name.as_bytes()), image.id);
                }
            }
        }
        page_writer.finish();

        pdf.stream(content_id, &content_bytes);

        for image in &images {
            let mut xobject = pdf.image_xobject(image.id, &image.data);
            xobject.width(image.width as i32);
            xobject.height(image.height as i32);
            xobject.color_space().device_rgb();
            xobject.bits_per_component(8);
            if image.jpeg {
                xobject.filter(Filter::DctDecode);
            }
        }
        Ok(())
    }

    fn draw_shape(
        &self,
        canvas: &mut PageCanvas,
        shape: &Shape,
        offset: Vec2,
        image_names: &[String],
        image_index: &mut usize,
    ) -> Result<(), ExportError> {
        let style = shape.style();
        let stroke = style.stroke.map(|c| (c, style.stroke_width));
        match shape {
            Shape::Rectangle(r) => {
                let path = place(r.outline()?, shape, offset);
                canvas.draw_path(&path, style.fill, stroke)?;
            }
            Shape::Triangle(t) => {
                let path = place(t.outline()?, shape, offset);
                canvas.draw_path(&path, style.fill, stroke)?;
            }
            Shape::RightTriangle(t) => {
                let path = place(t.outline()?, shape, offset);
                canvas.draw_path(&path, style.fill, stroke)?;
            }
            Shape::Oval(o) => {
                let path = place(o.outline(), shape, offset);
                canvas.draw_path(&path, style.fill, stroke)?;
            }
            Shape::Star(s) => {
                let path = place(s.outline(), shape, offset);
                canvas.draw_path(&path, style.fill, stroke)?;
            }
            Shape::Text(t) => self.draw_text(canvas, t, offset)?,
            Shape::Image(img) => {
                let name = &image_names[*image_index];
                *image_index += 1;
                let (origin, x_corner, y_corner) = image_quad(img, offset);
                canvas.draw_image(Name(name.as_bytes()), origin, x_corner, y_corner)?;
            }
        }
        Ok(())
    }

    fn draw_text(
        &self,
        canvas: &mut PageCanvas,
        text: &Text,
        offset: Vec2,
    ) -> Result<(), ExportError> {
        let lines = metrics::wrap(&text.content, text.width, text.font_size);
        let line_height = metrics::line_height(text.font_size);
        let max_lines = (text.height / line_height).floor() as usize;
        let visible = lines.len().min(max_lines);
        if visible == 0 {
            return Ok(());
        }

        let font_size_pt = convert_length_f64(text.font_size, Unit::Px, Unit::Pt)?;
        let color = text.style.fill.unwrap_or(Rgba::BLACK);
        let placement =
            Affine::translate(offset + text.position.to_vec2()) * Affine::rotate(text.rotation.to_radians());

        for (i, line) in lines[..visible].iter().enumerate() {
            let line_width = metrics::measure(line, text.font_size);
            let (start_x, word_spacing_px) = match text.align {
                TextAlign::Left => (0.0, 0.0),
                TextAlign::Center => ((text.width - line_width) / 2.0, 0.0),
                TextAlign::Right => (text.width - line_width, 0.0),
                TextAlign::Justify => {
                    let spaces = metrics::space_count(line);
                    if spaces == 0 || i + 1 == visible {
                        (0.0, 0.0)
                    } else {
                        (0.0, (text.width - line_width) / spaces as f64)
                    }
                }
            };
            // Top-anchored: the first baseline sits one line-height below
            // the box top.
            let baseline = placement * Point::new(start_x, (i as f64 + 1.0) * line_height);
            let word_spacing_pt = convert_length_f64(word_spacing_px, Unit::Px, Unit::Pt)?;
            canvas.draw_text_line(
                FONT_RES,
                &metrics::encode_winansi(line),
                baseline,
                font_size_pt,
                text.rotation,
                word_spacing_pt,
                color,
            )?;
        }
        Ok(())
    }

    fn prepare_raster(
        &self,
        raster: &RasterHandle,
    ) -> Result<(Vec<u8>, bool, u32, u32), ExportError> {
        let decoded = image::load_from_memory(&raster.data)
            .map_err(|e| ExportError::Raster(e.to_string()))?;
        let rgb = decoded.to_rgb8();
        let (width, height) = rgb.dimensions();
        match self.options.image_compression {
            ImageCompression::Jpeg(quality) => {
                let mut buffer = Vec::new();
                let mut encoder =
                    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality);
                encoder
                    .encode_image(&rgb)
                    .map_err(|e| ExportError::Raster(e.to_string()))?;
                Ok((buffer, true, width, height))
            }
            ImageCompression::Lossless => Ok((rgb.into_raw(), false, width, height)),
        }
    }
}

/// Map an anchor-relative outline into page-local space.
fn place(mut path: BezPath, shape: &Shape, offset: Vec2) -> BezPath {
    path.apply_affine(Affine::translate(offset) * shape.placement());
    path
}

/// The placed quad of an image: bottom-left, bottom-right, and top-left
/// corners in page-local px, after rotation and group translation.
fn image_quad(image: &Image, offset: Vec2) -> (Point, Point, Point) {
    let placement = Affine::translate(offset + image.position.to_vec2())
        * Affine::rotate(image.rotation.to_radians());
    (
        placement * Point::new(0.0, image.height),
        placement * Point::new(image.width, image.height),
        placement * Point::new(0.0, 0.0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagepress_core::shapes::{RasterFormat, Rectangle, ShapeStyle};
    use pagepress_core::store::Page;
    use std::io::Cursor;

    fn a4_page() -> Page {
        Page::new(2480.0, 3508.0, Rgba::WHITE)
    }

    fn content_text(bytes: &[u8]) -> String {
        String::from_utf8_lossy(bytes).to_string()
    }

    #[test]
    fn test_single_filled_rect_page() {
        let mut store = SceneStore::new();
        store.add_page(a4_page());
        let rect = Rectangle::new(Point::ZERO, 100.0, 100.0).with_style(ShapeStyle {
            fill: Some(Rgba::BLACK),
            stroke: None,
            stroke_width: 0.0,
        });
        store.add_group(vec![Shape::Rectangle(rect)], 0).unwrap();

        let bytes = PdfExporter::new(&store).export().unwrap();
        assert!(bytes.starts_with(b"%PDF-"));

        let text = content_text(&bytes);
        // Media box: 2480x3508 px = 595.2 x 841.92 pt.
        assert!(text.contains("595.2"), "media box width missing");
        assert!(text.contains("841.92"), "media box height missing");
        // The rect's top edge is at the top of the page, its bottom edge
        // 100 px (= 24 pt) further down.
        assert!(text.contains("817.92"), "rect bottom edge missing");
        // Exactly one fill, no stroke.
        let fills = text.lines().filter(|l| *l == "f").count();
        assert_eq!(fills, 1);
        assert!(!text.lines().any(|l| l == "S"));
    }

    #[test]
    fn test_white_background_not_painted() {
        let mut store = SceneStore::new();
        store.add_page(a4_page());
        let bytes = PdfExporter::new(&store).export().unwrap();
        assert!(!content_text(&bytes).contains(" re\n"));

        let mut tinted = SceneStore::new();
        tinted.add_page(Page::new(2480.0, 3508.0, Rgba::from_hex("#ffeecc")));
        let bytes = PdfExporter::new(&tinted).export().unwrap();
        assert!(content_text(&bytes).contains(" re\n"));
    }

    #[test]
    fn test_text_clips_to_box_height() {
        let mut store = SceneStore::new();
        store.add_page(a4_page());
        // 16 pt text: font size 66.666 px, line height 76.666 px. A 160 px
        // box fits exactly floor(160 / 76.666) = 2 lines.
        let text = pagepress_core::shapes::Text::new(
            Point::ZERO,
            400.0,
            160.0,
            "several words that certainly wrap across many lines of output text",
        )
        .with_font_size_pt(16.0);
        let lines = metrics::wrap(&text.content, text.width, text.font_size);
        assert!(lines.len() > 2, "fixture should overflow the box");

        store.add_group(vec![Shape::Text(text)], 0).unwrap();
        let bytes = PdfExporter::new(&store).export().unwrap();
        let shown = content_text(&bytes).matches("Tj").count();
        assert_eq!(shown, 2);
    }

    #[test]
    fn test_cancel_discards_output() {
        let mut store = SceneStore::new();
        store.add_page(a4_page());
        let err = PdfExporter::new(&store)
            .export_with_progress(|_, _| false)
            .unwrap_err();
        assert!(matches!(err, ExportError::Cancelled));
    }

    #[test]
    fn test_empty_store_exports_empty_document() {
        let store = SceneStore::new();
        let bytes = PdfExporter::new(&store).export().unwrap();
        assert!(content_text(&bytes).contains("/Count 0"));
    }

    fn sample_png() -> Vec<u8> {
        let img = image::RgbImage::from_pixel(4, 4, image::Rgb([200, 30, 30]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_image_lossless_embedding() {
        let mut store = SceneStore::new();
        store.add_page(a4_page());
        let raster = RasterHandle::new(4, 4, RasterFormat::Png, sample_png());
        let image = pagepress_core::shapes::Image::new(Point::ZERO, raster).with_size(400.0, 400.0);
        store.add_group(vec![Shape::Image(image)], 0).unwrap();

        let options = ExportOptions {
            image_compression: ImageCompression::Lossless,
        };
        let bytes = PdfExporter::with_options(&store, options).export().unwrap();
        let text = content_text(&bytes);
        assert!(text.contains("/XObject"));
        assert!(text.contains("/Im0"));
        assert!(!text.contains("DCTDecode"));
    }

    #[test]
    fn test_image_jpeg_embedding() {
        let mut store = SceneStore::new();
        store.add_page(a4_page());
        let raster = RasterHandle::new(4, 4, RasterFormat::Png, sample_png());
        let image = pagepress_core::shapes::Image::new(Point::ZERO, raster);
        store.add_group(vec![Shape::Image(image)], 0).unwrap();

        let options = ExportOptions {
            image_compression: ImageCompression::Jpeg(70),
        };
        let bytes = PdfExporter::with_options(&store, options).export().unwrap();
        assert!(content_text(&bytes).contains("DCTDecode"));
    }

    #[test]
    fn test_group_offset_translates_shapes() {
        let mut store = SceneStore::new();
        store.add_page(a4_page());
        let rect = Rectangle::new(Point::ZERO, 100.0, 100.0);
        store.add_group(vec![Shape::Rectangle(rect)], 0).unwrap();
        let mut info = store.group(0, 0).unwrap().info();
        info.x = 500.0;
        info.y = 1000.0;
        store.set_group_info(info, 0, 0).unwrap();

        let bytes = PdfExporter::new(&store).export().unwrap();
        // Group origin (500, 1000) px = (120, 240) pt from the top, i.e.
        // the rect's first point sits at y = 841.92 - 240 = 601.92.
        let text = content_text(&bytes);
        assert!(text.contains("120 601.92 m"), "translated start point missing");
    }
}
