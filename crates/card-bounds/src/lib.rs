//! High-level facade crate for the `card-bounds-*` workspace.
//!
//! This crate provides:
//! - stable, convenient re-exports of the core and detector crates
//! - (feature `image`) end-to-end helpers that decode an image with the
//!   `image` crate and run the card detector on it
//! - (feature `tokio`) an async entry point that runs detection on the
//!   blocking thread pool
//!
//! ## Quickstart
//!
//! ```no_run
//! use card_bounds::detect;
//! use card_bounds::CardDetectorParams;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let det = detect::detect_card_path("card.jpg", CardDetectorParams::default())?;
//! println!(
//!     "{} border, edges {:?}, confidence {:.2}",
//!     det.border_color, det.edges, det.confidence
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `card_bounds::core`: rasters, edges, homographies, statistics, logging.
//! - `card_bounds::detector`: the detection stages and the orchestrating
//!   [`CardDetector`].
//! - `card_bounds::detect` (feature `image`): helpers from encoded bytes,
//!   files or `image::RgbaImage`.

pub use card_bounds_core as core;
pub use card_bounds_detector as detector;

pub use card_bounds_core::{Corners, Edges, Point2, RgbaImage, RgbaImageView, Side};
pub use card_bounds_detector::{
    adjust_edge, BorderColor, CardDetection, CardDetector, CardDetectorParams, Centering,
    DetectError, DetectionMethod,
};

#[cfg(feature = "image")]
pub mod detect;
