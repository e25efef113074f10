//! Paginated-document import.
//!
//! A paginated source (e.g. an uploaded print document) is imported one
//! page at a time: each source page is rasterized at a fixed scale of its
//! native resolution and becomes one store page whose sole group holds a
//! single image shape covering the full page.

use crate::assets::{AssetError, BoxFuture};
use kurbo::Point;
use pagepress_core::shapes::{Image, RasterHandle, Rgba, Shape};
use pagepress_core::store::{Page, SceneCommand, StoreError, StoreHandle};
use thiserror::Error;

/// Raster scale applied to each source page: native pt resolution up to the
/// 300 dpi render resolution.
pub const IMPORT_RASTER_SCALE: f64 = 300.0 / 72.0;

/// Import errors. The page that failed is reported; pages imported before
/// it remain valid (every insertion is an atomic store operation).
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("page {page} could not be rasterized: {source}")]
    Rasterize {
        page: usize,
        #[source]
        source: AssetError,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A source document that can rasterize its pages.
pub trait PageSource {
    /// Number of pages in the source.
    fn page_count(&self) -> usize;

    /// Rasterize one page at `scale` times its native resolution.
    fn rasterize_page(
        &self,
        index: usize,
        scale: f64,
    ) -> BoxFuture<'_, Result<RasterHandle, AssetError>>;
}

/// Import every page of a source into the store. Returns the number of
/// pages imported.
pub async fn import_paginated(
    handle: &StoreHandle,
    source: &dyn PageSource,
) -> Result<usize, ImportError> {
    let count = source.page_count();
    log::info!("importing {count} page(s)");

    for index in 0..count {
        let raster = source
            .rasterize_page(index, IMPORT_RASTER_SCALE)
            .await
            .map_err(|source| ImportError::Rasterize {
                page: index,
                source,
            })?;
        let width = raster.source_width as f64;
        let height = raster.source_height as f64;
        let image = Image::new(Point::ZERO, raster);

        handle.commit(SceneCommand::AddPage(Page::new(width, height, Rgba::WHITE)))?;
        let page_index = handle.read(|store| store.pages().len()) - 1;
        handle.commit(SceneCommand::AddGroup {
            shapes: vec![Shape::Image(image)],
            page: page_index,
        })?;
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagepress_core::shapes::RasterFormat;
    use pagepress_core::store::SceneStore;

    /// Fake source producing fixed-size rasters, failing past a limit.
    struct FakeSource {
        pages: usize,
        fail_from: usize,
    }

    impl PageSource for FakeSource {
        fn page_count(&self) -> usize {
            self.pages
        }

        fn rasterize_page(
            &self,
            index: usize,
            scale: f64,
        ) -> BoxFuture<'_, Result<RasterHandle, AssetError>> {
            let fail = index >= self.fail_from;
            Box::pin(async move {
                if fail {
                    return Err(AssetError::Unavailable(format!("page {index}")));
                }
                // A 612x792 pt page at the import scale.
                let width = (612.0 * scale) as u32;
                let height = (792.0 * scale) as u32;
                Ok(RasterHandle::new(width, height, RasterFormat::Png, Vec::new()))
            })
        }
    }

    #[test]
    fn test_import_one_page_per_source_page() {
        let handle = StoreHandle::new(SceneStore::new());
        let source = FakeSource {
            pages: 2,
            fail_from: usize::MAX,
        };
        let imported = pollster::block_on(import_paginated(&handle, &source)).unwrap();
        assert_eq!(imported, 2);

        handle.read(|store| {
            assert_eq!(store.pages().len(), 2);
            for page in store.pages() {
                // Letter at 300 dpi.
                assert!((page.width - 2550.0).abs() < f64::EPSILON);
                assert!((page.height - 3300.0).abs() < f64::EPSILON);
                assert_eq!(page.groups.len(), 1);
                let group = &page.groups[0];
                assert_eq!(group.shapes.len(), 1);
                // The image covers the full page.
                assert!((group.widest_x - page.width).abs() < f64::EPSILON);
                assert!((group.widest_y - page.height).abs() < f64::EPSILON);
                assert!(matches!(group.shapes[0], Shape::Image(_)));
            }
        });
    }

    #[test]
    fn test_failed_page_aborts_and_keeps_prior_pages() {
        let handle = StoreHandle::new(SceneStore::new());
        let source = FakeSource {
            pages: 3,
            fail_from: 1,
        };
        let err = pollster::block_on(import_paginated(&handle, &source)).unwrap_err();
        assert!(matches!(err, ImportError::Rasterize { page: 1, .. }));

        // The first page landed intact; nothing half-imported follows it.
        handle.read(|store| {
            assert_eq!(store.pages().len(), 1);
            assert_eq!(store.pages()[0].groups.len(), 1);
        });
    }
}
