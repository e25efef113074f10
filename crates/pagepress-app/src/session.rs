//! Editor session: the composition root that owns the scene.
//!
//! One session owns the store handle and wires the layout engine, asset
//! loader, and exporter together. UI surfaces hold a session reference and
//! go through its operations; nothing else touches the store.

use crate::assets::{AssetError, AssetLoader, ImageAssetLoader};
use kurbo::{Point, Size};
use pagepress_core::layout::{clamp_drag_position, fit_scale};
use pagepress_core::shapes::{Image, Shape};
use pagepress_core::store::{SceneCommand, SceneStore, StoreError, StoreHandle};
use pagepress_pdf::{ExportError, ExportOptions, PdfExporter};
use thiserror::Error;

/// Padding around a fitted page, in screen px.
pub const PAGE_FIT_PADDING: f64 = 40.0;

/// Session operation errors.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// The editing session.
pub struct EditorSession {
    handle: StoreHandle,
    loader: Box<dyn AssetLoader>,
    viewport: Size,
    manual_zoom: f64,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorSession {
    /// Create a session over an empty store with the default asset loader.
    pub fn new() -> Self {
        Self {
            handle: StoreHandle::new(SceneStore::new()),
            loader: Box::new(ImageAssetLoader),
            viewport: Size::new(1280.0, 800.0),
            manual_zoom: 1.0,
        }
    }

    /// The shared store handle.
    pub fn handle(&self) -> &StoreHandle {
        &self.handle
    }

    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport = Size::new(width, height);
    }

    pub fn set_manual_zoom(&mut self, zoom: f64) {
        self.manual_zoom = zoom.clamp(0.1, 4.0);
    }

    pub fn manual_zoom(&self) -> f64 {
        self.manual_zoom
    }

    /// Scale factor fitting the page in view into the viewport. Uniform on
    /// both axes; 1.0 for an empty store.
    pub fn page_scale(&self) -> f64 {
        self.handle.read(|store| {
            let index = store.estimated_current_page();
            match store.page(index) {
                Ok(page) => fit_scale(
                    self.viewport.width,
                    self.viewport.height,
                    page.width,
                    page.height,
                    PAGE_FIT_PADDING,
                ),
                Err(_) => 1.0,
            }
        })
    }

    /// Insert a shape set as a new group on the page currently in view.
    pub fn insert_shapes(&self, shapes: Vec<Shape>) -> Result<(), StoreError> {
        let page = self.handle.read(|store| store.estimated_current_page());
        self.handle.commit(SceneCommand::AddGroup { shapes, page })
    }

    /// Move a group to a pointer position given in scaled screen space,
    /// clamped so the group stays on its page.
    pub fn drag_group(
        &self,
        page: usize,
        group: usize,
        candidate: Point,
    ) -> Result<(), StoreError> {
        let (page_size, mut info) = self.handle.read(|store| {
            let p = store.page(page)?;
            let g = store.group(page, group)?;
            Ok::<_, StoreError>((Size::new(p.width, p.height), g.info()))
        })?;

        let scale = self.page_scale();
        let clamped = clamp_drag_position(
            candidate,
            scale,
            self.manual_zoom,
            page_size,
            Size::new(info.widest_x, info.widest_y),
        );
        let factor = scale * self.manual_zoom;
        info.x = clamped.x / factor;
        info.y = clamped.y / factor;
        self.handle.commit(SceneCommand::SetGroupInfo { info, page, group })
    }

    /// Decode uploaded image bytes and place them as a new group on the
    /// page in view. A failed decode leaves the store untouched.
    pub async fn place_image(&self, bytes: Vec<u8>) -> Result<(), SessionError> {
        let raster = self.loader.load(bytes).await?;
        let image = Image::new(Point::ZERO, raster);
        self.insert_shapes(vec![Shape::Image(image)])?;
        Ok(())
    }

    /// Run a synchronous export pass over the current scene.
    pub fn export_pdf(&self, options: ExportOptions) -> Result<Vec<u8>, ExportError> {
        self.handle
            .read(|store| PdfExporter::with_options(store, options).export())
    }
}
