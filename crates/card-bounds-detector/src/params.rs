use serde::{Deserialize, Serialize};

/// Standard trading card width over height (63 x 88 mm rounds to 5:7).
pub const CARD_ASPECT: f64 = 5.0 / 7.0;

/// Border-zone sampling for the border color vote.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BorderSampleParams {
    /// Inner bound of the sampled strip, as a fraction of the dimension.
    pub strip_start_frac: f64,
    /// Outer bound of the sampled strip, as a fraction of the dimension.
    pub strip_end_frac: f64,
    /// Approximate number of samples spanning the shorter image side.
    pub samples_across: usize,
    /// Confidence at or below which the vote is reported as `unknown`.
    pub min_confidence: f32,
}

impl Default for BorderSampleParams {
    fn default() -> Self {
        Self {
            strip_start_frac: 0.05,
            strip_end_frac: 0.15,
            samples_across: 200,
            min_confidence: 0.2,
        }
    }
}

/// Coarse directional edge scan.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeScanParams {
    /// Percentile of non-zero gradient magnitudes used as the hit threshold.
    pub threshold_percentile: f32,
    /// Threshold used when the gradient field is entirely zero.
    pub fallback_threshold: f32,
    /// Scan start offset from the image border, as a fraction of the dimension.
    pub margin_frac: f64,
    /// Near-side scan limit for left/top scans (right/bottom use `1 - near_half_frac`).
    pub near_half_frac: f64,
    /// Distance between neighbouring scan lines in pixels.
    pub line_step: usize,
    /// How far past a hit (toward the center) the border color is probed.
    pub color_probe_px: usize,
    /// Minimum hits per side before the median is trusted.
    pub min_points: usize,
    /// Target card aspect (width / height).
    pub target_aspect: f64,
    /// Allowed deviation from `target_aspect` before the weaker axis is resized.
    pub aspect_tolerance: f64,
}

impl Default for EdgeScanParams {
    fn default() -> Self {
        Self {
            threshold_percentile: 0.85,
            fallback_threshold: 30.0,
            margin_frac: 0.03,
            near_half_frac: 0.4,
            line_step: 4,
            color_probe_px: 2,
            min_points: 6,
            target_aspect: CARD_ASPECT,
            aspect_tolerance: 0.15,
        }
    }
}

/// Corner snapping to local gradient maxima.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CornerSearchParams {
    /// Half-size of the square search window in pixels.
    pub radius: i64,
}

impl Default for CornerSearchParams {
    fn default() -> Self {
        Self { radius: 15 }
    }
}

/// Perspective rectification.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RectifyParams {
    /// Disable to always keep the input geometry.
    pub enabled: bool,
    /// Skew (radians) below which resampling is skipped.
    pub max_skew_rad: f64,
    /// Output card aspect (width / height).
    pub target_aspect: f64,
    /// Output height may not exceed this multiple of the measured average height.
    pub max_height_ratio: f64,
    /// Margin placed around the card in the output, as a fraction of card size.
    pub padding_frac: f64,
}

impl Default for RectifyParams {
    fn default() -> Self {
        Self {
            enabled: true,
            max_skew_rad: 0.035,
            target_aspect: CARD_ASPECT,
            max_height_ratio: 1.3,
            padding_frac: 0.05,
        }
    }
}

/// Sub-pixel edge fitting.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubpixelParams {
    /// Number of perpendicular strips per side.
    pub strips: usize,
    /// Strip half-length in pixels.
    pub half_width: i64,
    /// Maximum parabolic offset from the integer peak.
    pub max_offset: f64,
}

impl Default for SubpixelParams {
    fn default() -> Self {
        Self {
            strips: 30,
            half_width: 20,
            max_offset: 0.5,
        }
    }
}

/// Background contrast analysis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundParams {
    /// Fraction of each exterior margin, next to the card, that is excluded.
    pub inset_frac: f64,
    /// Approximate total number of background samples.
    pub target_samples: usize,
}

impl Default for BackgroundParams {
    fn default() -> Self {
        Self {
            inset_frac: 0.2,
            target_samples: 100,
        }
    }
}

/// Configuration for the card boundary detector.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardDetectorParams {
    pub border: BorderSampleParams,
    pub edges: EdgeScanParams,
    pub corners: CornerSearchParams,
    pub rectify: RectifyParams,
    pub subpixel: SubpixelParams,
    pub background: BackgroundParams,
    /// Weight of the border color confidence in the overall score.
    ///
    /// The edge confidence receives `1 - color_weight`.
    pub color_weight: f32,
}

impl Default for CardDetectorParams {
    fn default() -> Self {
        Self {
            border: BorderSampleParams::default(),
            edges: EdgeScanParams::default(),
            corners: CornerSearchParams::default(),
            rectify: RectifyParams::default(),
            subpixel: SubpixelParams::default(),
            background: BackgroundParams::default(),
            color_weight: 0.3,
        }
    }
}

impl CardDetectorParams {
    /// Parameters with rectification switched off.
    pub fn without_rectification() -> Self {
        let mut params = Self::default();
        params.rectify.enabled = false;
        params
    }
}
