use super::{CardDetection, DetectError, DetectionMethod};
use crate::background::analyze_background;
use crate::border::{detect_border_color, BorderColorEstimate};
use crate::color::BorderColor;
use crate::corners::refine_corners;
use crate::edges::locate_edges;
use crate::gradient::build_gradient_field;
use crate::params::CardDetectorParams;
use crate::rectify::{rectify_card, RectifyOutcome};
use crate::subpixel::refine_edges_subpixel;
use card_bounds_core::{Edges, FloatImage, RasterIo, RgbaImage, RgbaImageView, Side};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Edges found on one raster, with their scan confidence.
struct EdgePass {
    edges: Edges,
    coarse: Edges,
    magnitude: FloatImage,
    confidence: f32,
    hits: usize,
    /// Every side collected enough scan hits for its median.
    supported: bool,
}

/// Gradient-based card boundary detector.
///
/// Holds only parameters; every call allocates its own working buffers, so
/// one detector can serve concurrent calls.
#[derive(Clone, Debug, Default)]
pub struct CardDetector {
    params: CardDetectorParams,
}

impl CardDetector {
    pub fn new(params: CardDetectorParams) -> Self {
        Self { params }
    }

    /// Detector parameters.
    #[inline]
    pub fn params(&self) -> &CardDetectorParams {
        &self.params
    }

    /// Decode `bytes` through `io`, then detect.
    pub fn detect_bytes<R: RasterIo>(
        &self,
        io: &R,
        bytes: &[u8],
    ) -> Result<CardDetection, DetectError> {
        let image = io
            .decode(bytes)
            .map_err(|e| DetectError::Decode(e.to_string()))?;
        self.detect(&image.view())
    }

    /// Detect the card in a raw RGBA8 buffer.
    pub fn detect_rgba(
        &self,
        width: usize,
        height: usize,
        data: &[u8],
    ) -> Result<CardDetection, DetectError> {
        let view = RgbaImageView::new(width, height, data)?;
        self.detect(&view)
    }

    /// Detect the card boundary in `image`.
    ///
    /// Fails only for a zero-sized raster or a buffer that does not match
    /// the dimensions. Rectification problems fall back to the input geometry.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, image), fields(width = image.width, height = image.height))
    )]
    pub fn detect(&self, image: &RgbaImageView<'_>) -> Result<CardDetection, DetectError> {
        let image = RgbaImageView::new(image.width, image.height, image.data)?;
        let params = &self.params;

        let mut border = detect_border_color(&image, &params.border);
        log::debug!(
            "border {} (confidence {:.2}, {} samples)",
            border.color,
            border.confidence,
            border.total
        );

        let mut first = self.edge_pass(&image, border.color);
        if !first.supported {
            if let Some(alt) = border.runner_up(params.border.min_confidence) {
                let retry = self.edge_pass(&image, alt.color);
                if retry.hits > first.hits {
                    log::info!(
                        "{} border found {} edge hits, {} found {}; taking {}",
                        border.color,
                        first.hits,
                        alt.color,
                        retry.hits,
                        alt.color
                    );
                    border = alt;
                    first = retry;
                }
            }
        }
        let corners = refine_corners(&first.magnitude, &first.edges, &params.corners);
        log::debug!(
            "coarse l={:.1} r={:.1} t={:.1} b={:.1}; corners {:?}",
            first.coarse.left,
            first.coarse.right,
            first.coarse.top,
            first.coarse.bottom,
            corners.map(|c| (c.x, c.y))
        );

        let mut edges = first.edges;
        let mut edge_confidence = first.confidence;
        let mut max_skew = None;
        let mut rectified: Option<RgbaImage> = None;

        if params.rectify.enabled {
            let outcome = rectify_card(&image, &corners, &params.rectify);
            max_skew = outcome.max_skew();
            if let RectifyOutcome::Rectified(card) = outcome {
                let second = self.edge_pass(&card.image.view(), border.color);
                log::debug!(
                    "re-scanned rectified {}x{}: confidence {:.2} -> {:.2}",
                    card.image.width,
                    card.image.height,
                    edge_confidence,
                    second.confidence
                );
                edges = second.edges;
                edge_confidence = second.confidence;
                rectified = Some(card.image);
            }
        }

        let background = {
            let target = rectified.as_ref().map_or(image, RgbaImage::view);
            analyze_background(&target, &edges, border.color, &params.background)
        };

        let confidence = overall_confidence(&border, edge_confidence, params.color_weight);
        let perspective_corrected = rectified.is_some();
        let method = if perspective_corrected {
            DetectionMethod::GradientSubpixelRectified
        } else {
            DetectionMethod::GradientSubpixel
        };

        log::info!(
            "card {} border, edges l={:.2} r={:.2} t={:.2} b={:.2}, confidence {:.2} ({})",
            border.color,
            edges.left,
            edges.right,
            edges.top,
            edges.bottom,
            confidence,
            method
        );

        Ok(CardDetection {
            edges,
            corners,
            rectified,
            confidence,
            perspective_corrected,
            background_recommendation: background
                .as_ref()
                .and_then(|bg| bg.recommendation.clone()),
            method,
            border_color: border.color,
            border_confidence: border.confidence,
            edge_confidence,
            max_skew,
            background,
        })
    }

    fn edge_pass(&self, image: &RgbaImageView<'_>, border: BorderColor) -> EdgePass {
        let field = build_gradient_field(image);
        let located = locate_edges(&field, image, border, &self.params.edges);
        let edges = refine_edges_subpixel(&field, &located.edges, &self.params.subpixel)
            .sanitized(image.width, image.height);
        let min_points = self.params.edges.min_points;
        EdgePass {
            edges,
            coarse: located.edges,
            magnitude: field.magnitude,
            confidence: located.confidence,
            hits: located.samples.total(),
            supported: Side::ALL
                .into_iter()
                .all(|side| located.samples.side(side).len() >= min_points),
        }
    }
}

/// Weighted blend of the border vote and the edge scan, clamped to `[0, 1]`.
fn overall_confidence(border: &BorderColorEstimate, edge_confidence: f32, color_weight: f32) -> f32 {
    let w = color_weight.clamp(0.0, 1.0);
    let c = w * border.confidence + (1.0 - w) * edge_confidence;
    if c.is_finite() {
        c.clamp(0.0, 1.0)
    } else {
        0.0
    }
}
