//! Demo entry point (native).
//!
//! Builds a small A4 project, places a few shapes and a generated image,
//! and writes the exported PDF next to the working directory.

use kurbo::Point;
use pagepress_app::{create_project, EditorSession, ProjectSpec};
use pagepress_core::shapes::{Oval, Rectangle, Rgba, Shape, ShapeStyle, Star, Text, TextAlign};
use pagepress_core::store::SceneCommand;
use pagepress_pdf::ExportOptions;
use std::io::Cursor;

fn main() {
    env_logger::init();
    log::info!("Starting PagePress demo");

    if let Err(err) = run() {
        log::error!("demo failed: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let session = EditorSession::new();
    create_project(session.handle(), &ProjectSpec::a4("demo"))?;

    let accent = ShapeStyle {
        fill: Some(Rgba::from_hex("#2a6fb0")),
        stroke: Some(Rgba::BLACK),
        stroke_width: 3.0,
    };
    session.insert_shapes(vec![
        Shape::Rectangle(
            Rectangle::new(Point::new(0.0, 0.0), 600.0, 400.0)
                .with_corner_radius(30.0)
                .with_style(accent),
        ),
        Shape::Oval(Oval::new(Point::new(900.0, 200.0), 300.0, 300.0)),
        Shape::Star(Star::new(Point::new(1400.0, 200.0), 360.0, 360.0, 5)),
    ])?;
    session.drag_group(0, 0, Point::new(120.0, 120.0))?;

    session.insert_shapes(vec![Shape::Text(
        Text::new(
            Point::ZERO,
            1600.0,
            600.0,
            "PagePress lays out pages interactively and reproduces them as print-resolution vector output.",
        )
        .with_font_size_pt(18.0)
        .with_align(TextAlign::Left),
    )])?;
    let mut info = session
        .handle()
        .read(|store| store.group(0, 1).map(|g| g.info()))?;
    info.x = 200.0;
    info.y = 1200.0;
    session
        .handle()
        .commit(SceneCommand::SetGroupInfo { info, page: 0, group: 1 })?;

    // Exercise the async asset path with a generated raster.
    let img = image::RgbImage::from_fn(64, 64, |x, y| {
        image::Rgb([(x * 4) as u8, (y * 4) as u8, 160])
    });
    let mut png = Vec::new();
    img.write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)?;
    pollster::block_on(session.place_image(png))?;

    let bytes = session.export_pdf(ExportOptions::default())?;
    std::fs::write("pagepress-demo.pdf", &bytes)?;
    log::info!("wrote pagepress-demo.pdf ({} bytes)", bytes.len());
    Ok(())
}
