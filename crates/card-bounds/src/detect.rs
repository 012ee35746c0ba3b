use crate::core::{RasterError, RasterIo, RgbaImage, RgbaImageView};
use crate::detector::{CardDetection, CardDetector, CardDetectorParams, DetectError};
use std::path::Path;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Errors produced by the high-level facade helpers.
#[derive(thiserror::Error, Debug)]
pub enum CardBoundsError {
    #[error(transparent)]
    Detect(#[from] DetectError),

    #[error(transparent)]
    Image(#[from] ::image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("detection worker failed: {0}")]
    Worker(String),
}

/// [`RasterIo`] backed by the `image` crate's codecs.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImageRasterIo;

impl RasterIo for ImageRasterIo {
    type Error = ::image::ImageError;

    fn decode(&self, bytes: &[u8]) -> Result<RgbaImage, Self::Error> {
        let img = ::image::load_from_memory(bytes)?.to_rgba8();
        Ok(from_image(img))
    }
}

/// Convert an `image::RgbaImage` into the lightweight core view type.
pub fn rgba_view(img: &::image::RgbaImage) -> RgbaImageView<'_> {
    RgbaImageView {
        width: img.width() as usize,
        height: img.height() as usize,
        data: img.as_raw(),
    }
}

/// Take ownership of an `image::RgbaImage` as a core raster.
pub fn from_image(img: ::image::RgbaImage) -> RgbaImage {
    RgbaImage {
        width: img.width() as usize,
        height: img.height() as usize,
        data: img.into_raw(),
    }
}

/// Copy a core raster into an `image::RgbaImage`.
pub fn to_image(img: &RgbaImage) -> Result<::image::RgbaImage, CardBoundsError> {
    let invalid = || {
        DetectError::from(RasterError::InvalidDimensions {
            width: img.width,
            height: img.height,
        })
    };
    let w = u32::try_from(img.width).map_err(|_| invalid())?;
    let h = u32::try_from(img.height).map_err(|_| invalid())?;
    ::image::RgbaImage::from_raw(w, h, img.data.clone()).ok_or_else(|| {
        DetectError::from(RasterError::InvalidBuffer {
            expected: img.width * img.height * 4,
            got: img.data.len(),
        })
        .into()
    })
}

/// Run the card detector on a decoded `image::RgbaImage`.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(img, params), fields(width = img.width(), height = img.height()))
)]
pub fn detect_card(
    img: &::image::RgbaImage,
    params: CardDetectorParams,
) -> Result<CardDetection, CardBoundsError> {
    Ok(CardDetector::new(params).detect(&rgba_view(img))?)
}

/// Convenience overload using `CardDetectorParams::default()`.
pub fn detect_card_default(img: &::image::RgbaImage) -> Result<CardDetection, CardBoundsError> {
    detect_card(img, CardDetectorParams::default())
}

/// Decode an encoded image (PNG, JPEG, ...) and detect the card in it.
pub fn detect_card_bytes(
    bytes: &[u8],
    params: CardDetectorParams,
) -> Result<CardDetection, CardBoundsError> {
    let img = ImageRasterIo.decode(bytes)?;
    Ok(CardDetector::new(params).detect(&img.view())?)
}

/// Open an image file and detect the card in it.
pub fn detect_card_path(
    path: impl AsRef<Path>,
    params: CardDetectorParams,
) -> Result<CardDetection, CardBoundsError> {
    let img = ::image::ImageReader::open(path)?.decode()?.to_rgba8();
    detect_card(&img, params)
}

/// Write the rectified raster of `det` as an image file.
///
/// Returns `false` without touching the file system when the detection
/// carries no rectified raster.
pub fn save_rectified(
    det: &CardDetection,
    path: impl AsRef<Path>,
) -> Result<bool, CardBoundsError> {
    let Some(rectified) = det.rectified.as_ref() else {
        return Ok(false);
    };
    to_image(rectified)?.save(path.as_ref())?;
    log::debug!(
        "rectified {}x{} written to {}",
        rectified.width,
        rectified.height,
        path.as_ref().display()
    );
    Ok(true)
}

/// Decode and detect on the blocking thread pool.
///
/// Detection itself is synchronous and CPU bound; this only keeps it off
/// the async executor threads.
#[cfg(feature = "tokio")]
pub async fn detect_card_async(
    bytes: Vec<u8>,
    params: CardDetectorParams,
) -> Result<CardDetection, CardBoundsError> {
    tokio::task::spawn_blocking(move || detect_card_bytes(&bytes, params))
        .await
        .map_err(|e| CardBoundsError::Worker(e.to_string()))?
}
