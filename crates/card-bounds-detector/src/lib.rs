//! Trading card boundary detection.
//!
//! Pipeline, per call:
//! - vote the printed border color from four border strips,
//! - build a smoothed grayscale and its Sobel gradient field,
//! - scan each side for the first border-colored gradient hit and take
//!   per-side medians, correcting the box toward the 5:7 card aspect,
//! - refine every side to sub-pixel precision and snap the corners,
//! - rectify noticeably skewed cards with a 4-point homography and rescan,
//! - sample the background and blend an overall confidence.
//!
//! Rasters and geometry primitives live in `card-bounds-core`.
//!
//! ## Quickstart
//!
//! ```no_run
//! use card_bounds_core::RgbaImage;
//! use card_bounds_detector::{CardDetector, CardDetectorParams};
//!
//! let img = RgbaImage::new(500, 700);
//! let detector = CardDetector::new(CardDetectorParams::default());
//! let det = detector.detect(&img.view())?;
//! println!("{:?} confidence={:.2}", det.edges, det.confidence);
//! # Ok::<(), card_bounds_detector::DetectError>(())
//! ```

mod adjust;
mod background;
mod border;
mod centering;
mod color;
mod corners;
mod detector;
mod edges;
mod gradient;
mod io;
mod params;
mod rectify;
mod subpixel;

pub use adjust::adjust_edge;
pub use background::{analyze_background, recommend, BackgroundAnalysis};
pub use border::{detect_border_color, BorderColorEstimate};
pub use centering::Centering;
pub use color::{classify_rgb, BorderColor};
pub use corners::refine_corners;
pub use detector::{CardDetection, CardDetector, DetectError, DetectionMethod};
pub use edges::{adaptive_threshold, correct_aspect, locate_edges, EdgeLocation, EdgeSamples};
pub use gradient::{
    build_gradient_field, gaussian_blur_3x3, gradient_field_from_smoothed, GradientField,
};
pub use io::{CardDetectConfig, CardDetectReport, CardIoError, RectifiedImageInfo};
pub use params::{
    BackgroundParams, BorderSampleParams, CardDetectorParams, CornerSearchParams,
    EdgeScanParams, RectifyParams, SubpixelParams, CARD_ASPECT,
};
pub use rectify::{
    max_skew, output_size, rectify_card, warp_perspective_rgba, RectifiedCard, RectifyError,
    RectifyOutcome,
};
pub use subpixel::{fit_step_position, refine_edges_subpixel};

pub use card_bounds_core::{Corners, Edges, Side};
