//! Card detection pipeline.
//!
//! This module wires together the border color vote, the gradient field,
//! coarse edge scanning, sub-pixel refinement, corner snapping, optional
//! perspective rectification and the background check.

mod error;
mod pipeline;
mod result;

pub use error::DetectError;
pub use pipeline::CardDetector;
pub use result::{CardDetection, DetectionMethod};
