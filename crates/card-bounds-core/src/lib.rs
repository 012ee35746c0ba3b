//! Core types and utilities for card boundary detection.
//!
//! This crate is intentionally small and purely geometric. It holds the
//! raster types the detector reads, the projective math it needs, and the
//! [`RasterIo`] capability through which platforms hand in decoded pixels.
//! It does *not* depend on any concrete image codec.

mod geom;
mod homography;
mod image;
mod logger;
mod raster;
mod stats;

pub use geom::{Corners, Edges, Side};
pub use homography::{homography_from_4pt, solve_linear_8x8, Homography, DEGENERATE_EPS};
pub use image::{
    luminance, sample_bilinear_rgba, to_luminance, FloatImage, RgbaImage, RgbaImageView,
};
pub use raster::{RasterError, RasterIo};
pub use stats::{median, percentile};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;

pub use nalgebra::Point2;
