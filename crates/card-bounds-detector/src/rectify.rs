//! Perspective rectification of a detected card quadrilateral.

use card_bounds_core::{
    homography_from_4pt, sample_bilinear_rgba, Corners, Edges, Homography, Point2, RgbaImage,
    RgbaImageView,
};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::params::RectifyParams;

/// Reasons a rectification attempt was abandoned.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RectifyError {
    #[error("card quadrilateral gives a singular homography")]
    SingularHomography,
    #[error("rectified output would be empty ({width}x{height})")]
    ZeroSizedOutput { width: usize, height: usize },
    #[error("no rectified pixel maps inside the source image")]
    NoPixelsSampled,
}

/// Fronto-parallel view of the card.
#[derive(Clone, Debug)]
pub struct RectifiedCard {
    pub image: RgbaImage,
    /// Output pixel -> input pixel.
    pub h_img_from_rect: Homography,
    /// Input pixel -> output pixel.
    pub h_rect_from_img: Homography,
    /// Where the detected corners land in the output (inside the padding).
    pub card_box: Edges,
    pub max_skew: f64,
}

/// Result of a rectification attempt. Only `Rectified` carries a new raster.
#[derive(Clone, Debug)]
pub enum RectifyOutcome {
    /// The quadrilateral is already axis-aligned within tolerance.
    NotNeeded { max_skew: f64 },
    Rectified(RectifiedCard),
    Failed(RectifyError),
}

impl RectifyOutcome {
    pub fn rectified(self) -> Option<RectifiedCard> {
        match self {
            RectifyOutcome::Rectified(card) => Some(card),
            _ => None,
        }
    }

    pub fn max_skew(&self) -> Option<f64> {
        match self {
            RectifyOutcome::NotNeeded { max_skew } => Some(*max_skew),
            RectifyOutcome::Rectified(card) => Some(card.max_skew),
            RectifyOutcome::Failed(_) => None,
        }
    }
}

/// Largest angular deviation (radians) of the four sides from the image axes.
///
/// Corners are TL, TR, BR, BL.
pub fn max_skew(corners: &Corners) -> f64 {
    let [tl, tr, br, bl] = *corners;
    let horizontal = |a: Point2<f64>, b: Point2<f64>| (b.y - a.y).atan2(b.x - a.x).abs();
    let vertical = |a: Point2<f64>, b: Point2<f64>| (b.x - a.x).atan2(b.y - a.y).abs();
    [
        horizontal(tl, tr),
        horizontal(bl, br),
        vertical(tl, bl),
        vertical(tr, br),
    ]
    .into_iter()
    .fold(0.0, f64::max)
}

/// Card size in the rectified output, `(width, height)` in pixels.
///
/// Width is the mean of the top and bottom side lengths, height follows from
/// the target aspect unless that would exceed `max_height_ratio` times the
/// mean measured height, in which case the measured height wins and width
/// is derived from it.
pub fn output_size(corners: &Corners, params: &RectifyParams) -> (usize, usize) {
    let [tl, tr, br, bl] = *corners;
    let avg_w = 0.5 * ((tr - tl).norm() + (br - bl).norm());
    let avg_h = 0.5 * ((bl - tl).norm() + (br - tr).norm());

    let mut out_w = avg_w;
    let mut out_h = avg_w / params.target_aspect;
    if out_h > params.max_height_ratio * avg_h {
        out_h = avg_h;
        out_w = avg_h * params.target_aspect;
    }
    (
        out_w.round().max(0.0) as usize,
        out_h.round().max(0.0) as usize,
    )
}

/// Rectify the card bounded by `corners` (TL, TR, BR, BL, input pixels).
///
/// Near-axis-aligned input is left alone. Every failure is reported through
/// [`RectifyOutcome::Failed`]; nothing here panics or propagates.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(img, corners, params), fields(width = img.width, height = img.height))
)]
pub fn rectify_card(
    img: &RgbaImageView<'_>,
    corners: &Corners,
    params: &RectifyParams,
) -> RectifyOutcome {
    let skew = max_skew(corners);
    if skew < params.max_skew_rad {
        log::debug!("skew {:.4} rad below {:.4}; no correction", skew, params.max_skew_rad);
        return RectifyOutcome::NotNeeded { max_skew: skew };
    }

    match build_rectified(img, corners, params, skew) {
        Ok(card) => {
            log::debug!(
                "rectified to {}x{} (skew {:.4} rad)",
                card.image.width,
                card.image.height,
                skew
            );
            RectifyOutcome::Rectified(card)
        }
        Err(err) => {
            log::warn!("rectification skipped: {err}");
            RectifyOutcome::Failed(err)
        }
    }
}

fn build_rectified(
    img: &RgbaImageView<'_>,
    corners: &Corners,
    params: &RectifyParams,
    skew: f64,
) -> Result<RectifiedCard, RectifyError> {
    if !is_convex_quad(corners) {
        return Err(RectifyError::SingularHomography);
    }

    let (card_w, card_h) = output_size(corners, params);
    if card_w < 2 || card_h < 2 {
        return Err(RectifyError::ZeroSizedOutput {
            width: card_w,
            height: card_h,
        });
    }

    let pad_x = (params.padding_frac.max(0.0) * card_w as f64).round();
    let pad_y = (params.padding_frac.max(0.0) * card_h as f64).round();
    let out_w = card_w + 2 * pad_x as usize;
    let out_h = card_h + 2 * pad_y as usize;

    let card_box = Edges::new(
        pad_x,
        pad_x + (card_w - 1) as f64,
        pad_y,
        pad_y + (card_h - 1) as f64,
    );

    let h_img_from_rect = homography_from_4pt(&card_box.corners(), corners);
    if h_img_from_rect.is_degenerate() {
        return Err(RectifyError::SingularHomography);
    }
    let h_rect_from_img = h_img_from_rect
        .inverse()
        .ok_or(RectifyError::SingularHomography)?;

    let (image, sampled) = warp_perspective_rgba(img, &h_img_from_rect, out_w, out_h);
    if sampled == 0 {
        return Err(RectifyError::NoPixelsSampled);
    }

    Ok(RectifiedCard {
        image,
        h_img_from_rect,
        h_rect_from_img,
        card_box,
        max_skew: skew,
    })
}

/// Consecutive edge turns all share one sign and none is degenerate.
fn is_convex_quad(c: &Corners) -> bool {
    let mut sign = 0.0_f64;
    for i in 0..4 {
        let (a, b, d) = (c[i], c[(i + 1) % 4], c[(i + 2) % 4]);
        let turn = (b.x - a.x) * (d.y - b.y) - (b.y - a.y) * (d.x - b.x);
        if turn.abs() < 1e-9 {
            return false;
        }
        if sign == 0.0 {
            sign = turn.signum();
        } else if turn.signum() != sign {
            return false;
        }
    }
    true
}

/// Backward-mapped bilinear warp: each output pixel is pulled from
/// `h_img_from_rect * (x, y)`.
///
/// Output pixels whose source falls outside `[0, w-2] x [0, h-2]` stay
/// transparent black. Returns the raster and the number of sampled pixels.
pub fn warp_perspective_rgba(
    src: &RgbaImageView<'_>,
    h_img_from_rect: &Homography,
    out_w: usize,
    out_h: usize,
) -> (RgbaImage, usize) {
    let mut out = RgbaImage::new(out_w, out_h);
    let max_x = src.width as f64 - 2.0;
    let max_y = src.height as f64 - 2.0;
    let mut sampled = 0usize;

    for y in 0..out_h {
        for x in 0..out_w {
            let p = h_img_from_rect.apply(Point2::new(x as f64, y as f64));
            let inside = p.x >= 0.0 && p.x <= max_x && p.y >= 0.0 && p.y <= max_y;
            if !inside {
                continue;
            }
            out.put_pixel(x, y, sample_bilinear_rgba(src, p.x, p.y));
            sampled += 1;
        }
    }

    (out, sampled)
}
