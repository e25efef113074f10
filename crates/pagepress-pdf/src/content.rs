//! Millimetre-faithful drawing onto a PDF content stream.
//!
//! The scene model is y-down px at 300 dpi; PDF user space is y-up points.
//! Every coordinate entering this module is converted px → mm through the
//! unit kernel and only then mapped to points with the y-flip applied, so
//! no drawing call ever consumes a raw px value.

use kurbo::{BezPath, PathEl, Point};
use pagepress_core::shapes::Rgba;
use pagepress_core::units::{px_to_mm, UnitError};
use pdf_writer::{Content, Name, Str};

/// Points per millimetre (72 pt / 25.4 mm).
pub const PT_PER_MM: f64 = 72.0 / 25.4;

/// Content-stream builder for one output page.
pub struct PageCanvas {
    content: Content,
    page_height_mm: f64,
}

impl PageCanvas {
    /// Start a canvas for a page of the given height in px.
    pub fn new(page_height_px: f64) -> Result<Self, UnitError> {
        Ok(Self {
            content: Content::new(),
            page_height_mm: px_to_mm(page_height_px)?,
        })
    }

    /// Map a px point into PDF points, flipping the y axis.
    fn point_pt(&self, p: Point) -> Result<(f32, f32), UnitError> {
        let x_mm = px_to_mm(p.x)?;
        let y_mm = px_to_mm(p.y)?;
        Ok((
            (x_mm * PT_PER_MM) as f32,
            ((self.page_height_mm - y_mm) * PT_PER_MM) as f32,
        ))
    }

    fn set_fill(&mut self, color: Rgba) {
        self.content.set_fill_rgb(
            color.r as f32 / 255.0,
            color.g as f32 / 255.0,
            color.b as f32 / 255.0,
        );
    }

    fn set_stroke(&mut self, color: Rgba, width_px: f64) -> Result<(), UnitError> {
        self.content.set_stroke_rgb(
            color.r as f32 / 255.0,
            color.g as f32 / 255.0,
            color.b as f32 / 255.0,
        );
        let width_pt = px_to_mm(width_px)? * PT_PER_MM;
        self.content.set_line_width(width_pt as f32);
        Ok(())
    }

    /// Fill the whole page with a background color.
    pub fn fill_page(&mut self, width_px: f64, height_px: f64, color: Rgba) -> Result<(), UnitError> {
        let w_pt = (px_to_mm(width_px)? * PT_PER_MM) as f32;
        let h_pt = (px_to_mm(height_px)? * PT_PER_MM) as f32;
        self.set_fill(color);
        self.content.rect(0.0, 0.0, w_pt, h_pt);
        self.content.fill_nonzero();
        Ok(())
    }

    /// Emit a path (page-local px, y-down) and paint it.
    ///
    /// Quadratic segments are elevated to the cubics PDF understands.
    pub fn draw_path(
        &mut self,
        path: &BezPath,
        fill: Option<Rgba>,
        stroke: Option<(Rgba, f64)>,
    ) -> Result<(), UnitError> {
        if fill.is_none() && stroke.is_none() {
            return Ok(());
        }
        if let Some(color) = fill {
            self.set_fill(color);
        }
        if let Some((color, width_px)) = stroke {
            self.set_stroke(color, width_px)?;
        }

        let mut start = Point::ZERO;
        let mut current = Point::ZERO;
        for el in path.elements() {
            match *el {
                PathEl::MoveTo(p) => {
                    let (x, y) = self.point_pt(p)?;
                    self.content.move_to(x, y);
                    start = p;
                    current = p;
                }
                PathEl::LineTo(p) => {
                    let (x, y) = self.point_pt(p)?;
                    self.content.line_to(x, y);
                    current = p;
                }
                PathEl::QuadTo(q, p) => {
                    // Degree elevation: both cubic controls sit 2/3 of the
                    // way from the endpoints to the quadratic control.
                    let c1 = current + (q - current) * (2.0 / 3.0);
                    let c2 = p + (q - p) * (2.0 / 3.0);
                    let (x1, y1) = self.point_pt(c1)?;
                    let (x2, y2) = self.point_pt(c2)?;
                    let (x3, y3) = self.point_pt(p)?;
                    self.content.cubic_to(x1, y1, x2, y2, x3, y3);
                    current = p;
                }
                PathEl::CurveTo(c1, c2, p) => {
                    let (x1, y1) = self.point_pt(c1)?;
                    let (x2, y2) = self.point_pt(c2)?;
                    let (x3, y3) = self.point_pt(p)?;
                    self.content.cubic_to(x1, y1, x2, y2, x3, y3);
                    current = p;
                }
                PathEl::ClosePath => {
                    self.content.close_path();
                    current = start;
                }
            }
        }

        match (fill.is_some(), stroke.is_some()) {
            (true, true) => self.content.fill_nonzero_and_stroke(),
            (true, false) => self.content.fill_nonzero(),
            (false, true) => self.content.stroke(),
            (false, false) => unreachable!(),
        };
        Ok(())
    }

    /// Draw one line of WinAnsi-encoded text.
    ///
    /// `baseline` is the px position of the line's left baseline end;
    /// `angle_deg` rotates the text clockwise (y-down convention) about
    /// that point. `word_spacing_pt` stretches inter-word gaps for
    /// justified blocks.
    pub fn draw_text_line(
        &mut self,
        font: Name,
        encoded: &[u8],
        baseline: Point,
        font_size_pt: f64,
        angle_deg: f64,
        word_spacing_pt: f64,
        color: Rgba,
    ) -> Result<(), UnitError> {
        let (x, y) = self.point_pt(baseline)?;
        // Clockwise in y-down page space is counterclockwise negative in
        // the y-up PDF space.
        let phi = -angle_deg.to_radians();
        let (sin, cos) = (phi.sin() as f32, phi.cos() as f32);

        self.set_fill(color);
        self.content.begin_text();
        self.content.set_font(font, font_size_pt as f32);
        self.content.set_word_spacing(word_spacing_pt as f32);
        self.content.set_text_matrix([cos, sin, -sin, cos, x, y]);
        self.content.show(Str(encoded));
        self.content.end_text();
        Ok(())
    }

    /// Place an image XObject.
    ///
    /// The three px points describe the placed quad: `origin` is the
    /// image's bottom-left corner, `x_corner` its bottom-right, `y_corner`
    /// its top-left (all after shape rotation and group translation).
    pub fn draw_image(
        &mut self,
        name: Name,
        origin: Point,
        x_corner: Point,
        y_corner: Point,
    ) -> Result<(), UnitError> {
        let (ex, ey) = self.point_pt(origin)?;
        let (xx, xy) = self.point_pt(x_corner)?;
        let (yx, yy) = self.point_pt(y_corner)?;
        self.content.save_state();
        self.content
            .transform([xx - ex, xy - ey, yx - ex, yy - ey, ex, ey]);
        self.content.x_object(name);
        self.content.restore_state();
        Ok(())
    }

    /// Finish the stream and return its bytes.
    pub fn finish(self) -> Vec<u8> {
        self.content.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_px_points_map_to_flipped_pt() {
        // 3508 px page height = 841.92 pt; a point at the px origin lands
        // at the top of the PDF page.
        let canvas = PageCanvas::new(3508.0).unwrap();
        let (x, y) = canvas.point_pt(Point::ZERO).unwrap();
        assert!(x.abs() < 1e-4);
        assert!((y - 841.92).abs() < 1e-3);

        // 100 px down = 24 pt below the top edge.
        let (_, y) = canvas.point_pt(Point::new(0.0, 100.0)).unwrap();
        assert!((y - (841.92 - 24.0)).abs() < 1e-3);
    }

    #[test]
    fn test_draw_path_emits_cubics_for_quads() {
        let mut canvas = PageCanvas::new(1000.0).unwrap();
        let mut path = BezPath::new();
        path.move_to(Point::new(0.0, 0.0));
        path.quad_to(Point::new(50.0, 0.0), Point::new(50.0, 50.0));
        path.close_path();
        canvas
            .draw_path(&path, Some(Rgba::BLACK), None)
            .unwrap();
        let ops = String::from_utf8_lossy(&canvas.finish()).to_string();
        assert!(ops.contains(" c\n"), "no cubic op in {ops:?}");
        assert!(ops.lines().any(|l| l == "f"), "no fill op in {ops:?}");
    }

    #[test]
    fn test_nothing_emitted_without_paint() {
        let mut canvas = PageCanvas::new(1000.0).unwrap();
        let mut path = BezPath::new();
        path.move_to(Point::ZERO);
        path.line_to(Point::new(10.0, 10.0));
        canvas.draw_path(&path, None, None).unwrap();
        assert!(canvas.finish().is_empty());
    }
}
