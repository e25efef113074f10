//! PagePress PDF Exporter
//!
//! Renders a [`pagepress_core::SceneStore`] into a print-resolution,
//! physical-unit PDF: one output page per stored page, shape geometry
//! rebuilt from the core geometry kernel, text wrapped and clipped with the
//! exporter's own font metrics, and rasters embedded at a user-selected
//! compression level.

mod content;
mod exporter;
pub mod metrics;

pub use content::{PageCanvas, PT_PER_MM};
pub use exporter::{ExportError, ExportOptions, ImageCompression, PdfExporter};
