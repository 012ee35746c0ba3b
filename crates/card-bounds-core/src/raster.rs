//! Raster acquisition capability.
//!
//! Detection code only ever sees [`RgbaImageView`]s. Turning encoded bytes
//! into pixels is the job of a platform-supplied [`RasterIo`] implementation
//! (the `card-bounds` facade ships one backed by the `image` crate).

use crate::{RgbaImage, RgbaImageView};

/// Errors raised while validating or acquiring a raster.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RasterError {
    #[error("invalid raster dimensions (width={width}, height={height})")]
    InvalidDimensions { width: usize, height: usize },

    #[error("invalid RGBA buffer length (expected {expected} bytes, got {got})")]
    InvalidBuffer { expected: usize, got: usize },
}

/// Minimal raster I/O surface a platform has to provide.
pub trait RasterIo {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Decode an encoded image (PNG, JPEG, ...) into an RGBA8 raster.
    fn decode(&self, bytes: &[u8]) -> Result<RgbaImage, Self::Error>;

    /// Allocate a blank raster of the given size.
    fn allocate(&self, width: usize, height: usize) -> RgbaImage {
        RgbaImage::new(width, height)
    }

    /// Copy out the pixels of a raster.
    fn get_pixels(&self, image: &RgbaImageView<'_>) -> Vec<u8> {
        image.data.to_vec()
    }

    /// Overwrite the pixels of a raster with a same-sized buffer.
    fn put_pixels(&self, image: &mut RgbaImage, pixels: &[u8]) -> Result<(), RasterError> {
        if pixels.len() != image.data.len() {
            return Err(RasterError::InvalidBuffer {
                expected: image.data.len(),
                got: pixels.len(),
            });
        }
        image.data.copy_from_slice(pixels);
        Ok(())
    }
}
