//! Coarse card edges from directional gradient scans.
//!
//! Each side is scanned with lines perpendicular to it, walking from a small
//! margin toward the image center but never past the near half of the image.
//! The first pixel on a line whose directional gradient reaches the adaptive
//! threshold, and whose inward neighbour is border colored, is that line's
//! edge point. Per-side medians give the coarse box.

use card_bounds_core::{median, percentile, Edges, RgbaImageView, Side};
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::color::{classify_rgb, BorderColor};
use crate::gradient::GradientField;
use crate::params::EdgeScanParams;

/// Relative slack on the hit test; equal steps on different axes may differ by a few ulps.
const THRESHOLD_REL_TOL: f32 = 1e-4;

/// Raw per-side scan hits (x for left/right, y for top/bottom).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeSamples {
    pub left: Vec<f64>,
    pub right: Vec<f64>,
    pub top: Vec<f64>,
    pub bottom: Vec<f64>,
}

impl EdgeSamples {
    pub fn side(&self, side: Side) -> &[f64] {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
            Side::Top => &self.top,
            Side::Bottom => &self.bottom,
        }
    }

    fn side_mut(&mut self, side: Side) -> &mut Vec<f64> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
            Side::Top => &mut self.top,
            Side::Bottom => &mut self.bottom,
        }
    }

    pub fn total(&self) -> usize {
        self.left.len() + self.right.len() + self.top.len() + self.bottom.len()
    }
}

/// Coarse edge estimate plus the evidence behind it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgeLocation {
    pub edges: Edges,
    /// Collected points over expected points, in `[0, 1]`.
    pub confidence: f32,
    /// Gradient threshold the scans were held to.
    pub threshold: f32,
    /// Whether the aspect correction resized one axis.
    pub aspect_corrected: bool,
    pub samples: EdgeSamples,
}

/// Adaptive hit threshold: a percentile of the non-zero gradient magnitudes.
pub fn adaptive_threshold(field: &GradientField, params: &EdgeScanParams) -> f32 {
    let mut nonzero: Vec<f32> = field
        .magnitude
        .data
        .iter()
        .copied()
        .filter(|&v| v > 0.0)
        .collect();
    percentile(&mut nonzero, params.threshold_percentile).unwrap_or(params.fallback_threshold)
}

/// Locate the four coarse card edges.
///
/// Never fails: a side with fewer than `min_points` hits falls back to the
/// default proportional position, and weak evidence only lowers the
/// confidence.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(field, img, border, params), fields(border = %border))
)]
pub fn locate_edges(
    field: &GradientField,
    img: &RgbaImageView<'_>,
    border: BorderColor,
    params: &EdgeScanParams,
) -> EdgeLocation {
    let (w, h) = (field.width, field.height);
    let threshold = adaptive_threshold(field, params);
    let fallback = Edges::default_for(w, h);

    let mut samples = EdgeSamples::default();
    let mut edges = fallback;
    for side in Side::ALL {
        let hits = scan_side(field, img, border, threshold, side, params);
        if hits.len() >= params.min_points {
            if let Some(m) = median(&hits) {
                edges = edges.with(side, m);
            }
        } else {
            log::warn!(
                "{side:?} edge: only {} hits, using default {:.1}",
                hits.len(),
                fallback.get(side)
            );
        }
        *samples.side_mut(side) = hits;
    }

    let horizontal_support = samples.left.len() + samples.right.len();
    let vertical_support = samples.top.len() + samples.bottom.len();
    let (edges, aspect_corrected) =
        correct_aspect(edges, horizontal_support, vertical_support, params);
    let edges = edges.sanitized(w, h);

    let expected = (w + h) as f32 / 2.0;
    let confidence = if expected > 0.0 {
        (samples.total() as f32 / expected).clamp(0.0, 1.0)
    } else {
        0.0
    };

    log::debug!(
        "coarse edges l={:.1} r={:.1} t={:.1} b={:.1} thr={:.1} conf={:.2} hits={}",
        edges.left,
        edges.right,
        edges.top,
        edges.bottom,
        threshold,
        confidence,
        samples.total()
    );

    EdgeLocation {
        edges,
        confidence,
        threshold,
        aspect_corrected,
        samples,
    }
}

/// Resize the less supported axis so the box matches `target_aspect`,
/// keeping that axis centered. Returns whether anything changed.
pub fn correct_aspect(
    edges: Edges,
    horizontal_support: usize,
    vertical_support: usize,
    params: &EdgeScanParams,
) -> (Edges, bool) {
    let aspect = edges.aspect();
    if (aspect - params.target_aspect).abs() <= params.aspect_tolerance {
        return (edges, false);
    }

    let mut out = edges;
    if horizontal_support < vertical_support {
        let cx = 0.5 * (edges.left + edges.right);
        let half = 0.5 * edges.height() * params.target_aspect;
        out.left = cx - half;
        out.right = cx + half;
    } else {
        let cy = 0.5 * (edges.top + edges.bottom);
        let half = 0.5 * edges.width() / params.target_aspect;
        out.top = cy - half;
        out.bottom = cy + half;
    }
    log::debug!(
        "aspect {:.3} off target {:.3}; resized {} axis",
        aspect,
        params.target_aspect,
        if horizontal_support < vertical_support {
            "horizontal"
        } else {
            "vertical"
        }
    );
    (out, true)
}

fn scan_side(
    field: &GradientField,
    img: &RgbaImageView<'_>,
    border: BorderColor,
    threshold: f32,
    side: Side,
    params: &EdgeScanParams,
) -> Vec<f64> {
    let (w, h) = (field.width, field.height);
    // extent along the scan direction and across it
    let (along, across) = if side.is_vertical() { (w, h) } else { (h, w) };
    let strength = if side.is_vertical() {
        &field.vertical
    } else {
        &field.horizontal
    };

    let margin = (params.margin_frac * along as f64) as usize;
    let across_margin = (params.margin_frac * across as f64) as usize;
    let near_limit = (params.near_half_frac * along as f64) as usize;
    let far_limit = ((1.0 - params.near_half_frac) * along as f64) as usize;
    let probe = params.color_probe_px as i64;
    let step = params.line_step.max(1);
    let min_strength = threshold * (1.0 - THRESHOLD_REL_TOL);

    let mut hits = Vec::new();
    if across <= 2 * across_margin {
        return hits;
    }

    // half-open range along the scan; near sides walk it forward, far sides backward
    let forward = matches!(side, Side::Left | Side::Top);
    let (start, end) = if forward {
        (margin, near_limit.min(along))
    } else {
        (far_limit.saturating_add(1), along.saturating_sub(margin))
    };
    let inward = if forward { probe } else { -probe };
    let span = end.saturating_sub(start);

    for line in (across_margin..across - across_margin).step_by(step) {
        for k in 0..span {
            let pos = if forward { start + k } else { end - 1 - k };
            let (x, y) = if side.is_vertical() {
                (pos, line)
            } else {
                (line, pos)
            };
            if strength.get(x, y) < min_strength {
                continue;
            }
            let (px, py) = if side.is_vertical() {
                (x as i64 + inward, y as i64)
            } else {
                (x as i64, y as i64 + inward)
            };
            let compatible = match img.rgb_checked(px, py) {
                Some([r, g, b]) => border.accepts(classify_rgb(r, g, b)),
                None => border == BorderColor::Unknown,
            };
            if compatible {
                hits.push(pos as f64);
                break;
            }
        }
    }
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gradient::build_gradient_field;
    use card_bounds_core::RgbaImage;

    const GREEN: [u8; 4] = [40, 160, 60, 255];
    const BLACK: [u8; 4] = [5, 5, 5, 255];

    fn card(w: usize, h: usize, l: usize, r: usize, t: usize, b: usize) -> RgbaImage {
        let mut img = RgbaImage::new(w, h);
        img.fill_rect(0, 0, w, h, GREEN);
        img.fill_rect(l, t, r, b, BLACK);
        img
    }

    #[test]
    fn finds_black_card_edges() {
        let img = card(250, 350, 25, 225, 35, 315);
        let field = build_gradient_field(&img.view());
        let loc = locate_edges(
            &field,
            &img.view(),
            BorderColor::Black,
            &EdgeScanParams::default(),
        );
        let e = loc.edges;
        assert!((e.left - 25.0).abs() <= 2.0, "left {}", e.left);
        assert!((e.right - 225.0).abs() <= 2.0, "right {}", e.right);
        assert!((e.top - 35.0).abs() <= 2.0, "top {}", e.top);
        assert!((e.bottom - 315.0).abs() <= 2.0, "bottom {}", e.bottom);
        assert!(!loc.aspect_corrected);
        assert!(loc.confidence > 0.7, "confidence {}", loc.confidence);
        assert!(loc.samples.left.len() >= 6);
    }

    #[test]
    fn wrong_border_color_falls_back_to_defaults() {
        let img = card(200, 280, 20, 180, 28, 252);
        let field = build_gradient_field(&img.view());
        let loc = locate_edges(
            &field,
            &img.view(),
            BorderColor::White,
            &EdgeScanParams::default(),
        );
        assert_eq!(loc.samples.total(), 0);
        assert_eq!(loc.confidence, 0.0);
        assert_eq!(loc.edges, Edges::default_for(200, 280));
    }

    #[test]
    fn flat_image_uses_fallback_threshold() {
        let img = card(60, 80, 0, 0, 0, 0);
        let field = build_gradient_field(&img.view());
        let params = EdgeScanParams::default();
        assert_eq!(adaptive_threshold(&field, &params), params.fallback_threshold);
    }

    #[test]
    fn aspect_correction_trusts_better_supported_axis() {
        let params = EdgeScanParams::default();
        // too wide: 400 x 400 against 5:7
        let edges = Edges::new(100.0, 500.0, 100.0, 500.0);

        let (fixed, changed) = correct_aspect(edges, 10, 50, &params);
        assert!(changed);
        assert_eq!((fixed.top, fixed.bottom), (100.0, 500.0));
        assert!((fixed.width() - 400.0 * 5.0 / 7.0).abs() < 1e-9);
        assert!((0.5 * (fixed.left + fixed.right) - 300.0).abs() < 1e-9);

        let (fixed, _) = correct_aspect(edges, 50, 10, &params);
        assert_eq!((fixed.left, fixed.right), (100.0, 500.0));
        assert!((fixed.height() - 560.0).abs() < 1e-9);

        let good = Edges::new(0.0, 50.0, 0.0, 70.0);
        assert_eq!(correct_aspect(good, 0, 0, &params), (good, false));
    }
}
