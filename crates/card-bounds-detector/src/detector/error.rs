use card_bounds_core::RasterError;

/// Errors returned by the card detector.
///
/// Only raster acquisition can fail; weak evidence lowers the confidence
/// instead.
#[derive(thiserror::Error, Debug)]
pub enum DetectError {
    #[error(transparent)]
    Raster(#[from] RasterError),
    #[error("failed to decode image: {0}")]
    Decode(String),
}
