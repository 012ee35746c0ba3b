//! Snap coarse box corners to nearby gradient maxima.

use card_bounds_core::{Corners, Edges, FloatImage, Point2};

use crate::params::CornerSearchParams;

/// Magnitudes within this relative distance of the window maximum tie with it.
const TIE_REL_TOL: f32 = 1e-4;

/// Move each box corner (TL, TR, BR, BL) to the strongest magnitude in its
/// `(2r+1) x (2r+1)` window.
///
/// Ties keep the first maximum in row-major scan order; values within
/// [`TIE_REL_TOL`] of the maximum count as ties, so equal plateaus on the two
/// axes resolve the same way whatever their last few bits. A window without
/// any positive magnitude leaves the corner where it was.
pub fn refine_corners(
    magnitude: &FloatImage,
    edges: &Edges,
    params: &CornerSearchParams,
) -> Corners {
    edges
        .corners()
        .map(|c| refine_corner(magnitude, c, params.radius))
}

fn refine_corner(magnitude: &FloatImage, corner: Point2<f64>, radius: i64) -> Point2<f64> {
    let cx = corner.x.round() as i64;
    let cy = corner.y.round() as i64;
    let window = || {
        (-radius..=radius).flat_map(move |dy| {
            (-radius..=radius).filter_map(move |dx| {
                let (x, y) = (cx + dx, cy + dy);
                magnitude.get_checked(x, y).map(|v| (x, y, v))
            })
        })
    };

    let peak = window().fold(0.0_f32, |m, (_, _, v)| m.max(v));
    if peak <= 0.0 {
        return corner;
    }
    let floor = peak * (1.0 - TIE_REL_TOL);
    window()
        .find(|&(_, _, v)| v >= floor)
        .map_or(corner, |(x, y, _)| Point2::new(x as f64, y as f64))
}
