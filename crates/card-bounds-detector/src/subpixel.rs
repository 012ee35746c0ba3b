//! Sub-pixel edge positions from perpendicular intensity strips.

use card_bounds_core::{median, Edges, FloatImage, Side};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::gradient::GradientField;
use crate::params::SubpixelParams;

/// Position of the strongest step in `strip`, in strip index units.
///
/// The peak of `|strip[i+1] - strip[i-1]|` is refined by a parabola through
/// the one-sided difference behind it, the peak itself and the one-sided
/// difference ahead of it; the offset is clamped to `±max_offset`. Returns
/// `None` for strips shorter than three samples or without any intensity
/// change.
pub fn fit_step_position(strip: &[f32], max_offset: f64) -> Option<f64> {
    let n = strip.len();
    if n < 3 {
        return None;
    }
    let diff = |i: usize| (strip[i + 1] - strip[i - 1]).abs() as f64;

    let mut best_i = 0usize;
    let mut best = 0.0_f64;
    for i in 1..n - 1 {
        let d = diff(i);
        if d > best {
            best = d;
            best_i = i;
        }
    }
    if best_i == 0 {
        return None;
    }

    let behind = (strip[best_i] - strip[best_i - 1]).abs() as f64;
    let ahead = (strip[best_i + 1] - strip[best_i]).abs() as f64;
    let denom = behind - 2.0 * best + ahead;
    let offset = if denom.abs() > f64::EPSILON {
        (0.5 * (behind - ahead) / denom).clamp(-max_offset, max_offset)
    } else {
        0.0
    };
    Some(best_i as f64 + offset)
}

/// Refine each coarse side to sub-pixel precision.
///
/// `params.strips` strips per side are spread evenly along the side, each
/// spanning `±half_width` pixels across it on the smoothed grayscale. The
/// side position is the median of the per-strip estimates; a side with no
/// usable strip keeps its coarse value.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(field, coarse, params))
)]
pub fn refine_edges_subpixel(
    field: &GradientField,
    coarse: &Edges,
    params: &SubpixelParams,
) -> Edges {
    let mut refined = *coarse;
    for side in Side::ALL {
        let estimates = side_estimates(&field.smoothed, coarse, side, params);
        match median(&estimates) {
            Some(pos) => refined = refined.with(side, pos),
            None => log::warn!("{side:?}: no usable sub-pixel strip, keeping coarse edge"),
        }
    }
    log::debug!(
        "sub-pixel edges l={:.2} r={:.2} t={:.2} b={:.2}",
        refined.left,
        refined.right,
        refined.top,
        refined.bottom
    );
    refined
}

fn side_estimates(
    smoothed: &FloatImage,
    coarse: &Edges,
    side: Side,
    params: &SubpixelParams,
) -> Vec<f64> {
    let (along_len, across_start, across_end) = if side.is_vertical() {
        (smoothed.width as i64, coarse.top, coarse.bottom)
    } else {
        (smoothed.height as i64, coarse.left, coarse.right)
    };
    let center = coarse.get(side).round() as i64;
    let lo = (center - params.half_width).max(0);
    let hi = (center + params.half_width).min(along_len - 1);
    if hi - lo + 1 < 3 {
        return Vec::new();
    }

    let n = params.strips.max(1);
    let mut strip = Vec::with_capacity((hi - lo + 1) as usize);
    let mut out = Vec::with_capacity(n);
    for k in 0..n {
        let t = across_start + (across_end - across_start) * (k + 1) as f64 / (n + 1) as f64;
        let line = t.round() as i64;

        strip.clear();
        for pos in lo..=hi {
            let v = if side.is_vertical() {
                smoothed.get_checked(pos, line)
            } else {
                smoothed.get_checked(line, pos)
            };
            match v {
                Some(v) => strip.push(v),
                None => break,
            }
        }
        if strip.len() != (hi - lo + 1) as usize {
            continue;
        }
        if let Some(p) = fit_step_position(&strip, params.max_offset) {
            out.push(lo as f64 + p);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gradient::build_gradient_field;
    use card_bounds_core::RgbaImage;

    #[test]
    fn clean_step_lands_between_samples() {
        // discontinuity between index 9 and 10
        let strip: Vec<f32> = (0..20).map(|i| if i < 10 { 200.0 } else { 10.0 }).collect();
        let pos = fit_step_position(&strip, 0.5).expect("step");
        assert!((pos - 9.5).abs() <= 0.5, "pos {pos}");
        assert!((pos - 9.5).abs() < 1e-9);
    }

    #[test]
    fn asymmetric_ramp_leans_toward_steeper_side() {
        // central peak 90 at i=3; one-sided steps 30 behind, 60 ahead
        let strip = [0.0, 0.0, 0.0, 30.0, 90.0, 100.0, 100.0, 100.0];
        let pos = fit_step_position(&strip, 0.5).expect("edge");
        let expected = 3.0 + 0.5 * (30.0 - 60.0) / (30.0 - 180.0 + 60.0);
        assert!((pos - expected).abs() < 1e-9, "pos {pos}, expected {expected}");
        assert!((pos - (3.0 + 1.0 / 6.0)).abs() < 1e-9);
    }

    #[test]
    fn offset_is_clamped() {
        // one-sided steps 0 and 100 around a central peak of 100 give 0.5 exactly;
        // a tighter clamp must hold
        let strip = [50.0, 50.0, 50.0, 150.0, 150.0, 150.0];
        let pos = fit_step_position(&strip, 0.25).expect("edge");
        assert!((pos - 2.25).abs() < 1e-9, "pos {pos}");
    }

    #[test]
    fn flat_strip_has_no_edge() {
        assert_eq!(fit_step_position(&[5.0; 10], 0.5), None);
        assert_eq!(fit_step_position(&[1.0, 2.0], 0.5), None);
    }

    #[test]
    fn refines_blurred_box_edges() {
        let (w, h) = (200, 280);
        let mut img = RgbaImage::new(w, h);
        img.fill_rect(0, 0, w, h, [40, 160, 60, 255]);
        img.fill_rect(20, 28, 180, 252, [5, 5, 5, 255]);
        let field = build_gradient_field(&img.view());

        // after the 3x3 blur the two central differences straddling each
        // boundary tie; either peak leans 1/6 px toward the boundary
        let coarse = Edges::new(22.0, 177.0, 30.0, 250.0);
        let e = refine_edges_subpixel(&field, &coarse, &SubpixelParams::default());
        assert!((e.left - 19.5).abs() < 0.35, "left {}", e.left);
        assert!((e.right - 179.5).abs() < 0.35, "right {}", e.right);
        assert!((e.top - 27.5).abs() < 0.35, "top {}", e.top);
        assert!((e.bottom - 251.5).abs() < 0.35, "bottom {}", e.bottom);
    }
}
