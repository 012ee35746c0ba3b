use card_bounds_core::{Corners, Edges, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::background::BackgroundAnalysis;
use crate::color::BorderColor;

/// How the reported edges were obtained.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DetectionMethod {
    /// Gradient scan plus sub-pixel fit on the input raster.
    GradientSubpixel,
    /// Same, repeated on the perspective-corrected raster.
    GradientSubpixelRectified,
    /// Edges were moved by hand after detection.
    Manual,
}

impl DetectionMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            DetectionMethod::GradientSubpixel => "gradient-subpixel",
            DetectionMethod::GradientSubpixelRectified => "gradient-subpixel-rectified",
            DetectionMethod::Manual => "manual",
        }
    }
}

impl std::fmt::Display for DetectionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of a card detection run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardDetection {
    /// Card box. In rectified-raster pixels when `perspective_corrected`,
    /// otherwise in input pixels.
    pub edges: Edges,
    /// Refined corners in input pixels, clockwise from top-left.
    pub corners: Corners,
    /// Perspective-corrected raster, present only when `perspective_corrected`.
    #[serde(skip)]
    pub rectified: Option<RgbaImage>,
    /// Overall score in `[0, 1]`.
    pub confidence: f32,
    pub perspective_corrected: bool,
    #[serde(default)]
    pub background_recommendation: Option<String>,
    pub method: DetectionMethod,
    pub border_color: BorderColor,
    pub border_confidence: f32,
    pub edge_confidence: f32,
    /// Largest side deviation from the image axes, when it was measured.
    #[serde(default)]
    pub max_skew: Option<f64>,
    #[serde(default)]
    pub background: Option<BackgroundAnalysis>,
}

impl CardDetection {
    /// Size of the raster the edges refer to, if it is the rectified one.
    pub fn rectified_size(&self) -> Option<(usize, usize)> {
        self.rectified.as_ref().map(|img| (img.width, img.height))
    }
}
