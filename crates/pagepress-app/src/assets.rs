//! Asynchronous raster asset loading.
//!
//! Image decoding is the only asynchronous operation in the system: it must
//! never block the scene-edit loop, and a failed decode reports an error
//! without touching the store. The boxed-future trait keeps implementations
//! swappable (in-memory bytes, file pickers, network fetches) without an
//! async runtime dependency in the signatures.

use pagepress_core::shapes::{RasterFormat, RasterHandle};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Boxed future for async operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Asset loading errors. Always recoverable: the triggering operation
/// fails, the store stays valid, and the caller decides about retries.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("unrecognized raster container")]
    UnknownFormat,
    #[error("could not decode image: {0}")]
    Decode(String),
    #[error("asset unavailable: {0}")]
    Unavailable(String),
}

/// Trait for sources of decoded raster assets.
pub trait AssetLoader {
    /// Decode encoded image bytes into a raster handle.
    fn load(&self, bytes: Vec<u8>) -> BoxFuture<'_, Result<RasterHandle, AssetError>>;
}

/// Loader decoding in-memory bytes with the `image` crate.
#[derive(Debug, Default)]
pub struct ImageAssetLoader;

impl AssetLoader for ImageAssetLoader {
    fn load(&self, bytes: Vec<u8>) -> BoxFuture<'_, Result<RasterHandle, AssetError>> {
        Box::pin(async move { decode_raster(bytes) })
    }
}

/// Decode encoded bytes, keeping the original container for embedding.
pub fn decode_raster(bytes: Vec<u8>) -> Result<RasterHandle, AssetError> {
    let format = RasterFormat::from_magic_bytes(&bytes).ok_or(AssetError::UnknownFormat)?;
    let decoded =
        image::load_from_memory(&bytes).map_err(|e| AssetError::Decode(e.to_string()))?;
    let (width, height) = (decoded.width(), decoded.height());
    log::debug!("decoded {}x{} {} asset", width, height, format.mime_type());
    Ok(RasterHandle::new(width, height, format, bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn sample_png() -> Vec<u8> {
        let img = image::RgbImage::from_pixel(3, 5, image::Rgb([10, 20, 30]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_decode_png() {
        let raster = pollster::block_on(ImageAssetLoader.load(sample_png())).unwrap();
        assert_eq!(raster.source_width, 3);
        assert_eq!(raster.source_height, 5);
        assert_eq!(raster.format, RasterFormat::Png);
    }

    #[test]
    fn test_unknown_container_rejected() {
        let err = pollster::block_on(ImageAssetLoader.load(b"GIF89a notreally".to_vec()));
        assert!(matches!(err, Err(AssetError::UnknownFormat)));
    }

    #[test]
    fn test_truncated_image_rejected() {
        let mut bytes = sample_png();
        bytes.truncate(12);
        let err = pollster::block_on(ImageAssetLoader.load(bytes));
        assert!(matches!(err, Err(AssetError::Decode(_))));
    }
}
