//! Background contrast check around the card.

use card_bounds_core::{luminance, Edges, RgbaImageView};
use serde::{Deserialize, Serialize};

use crate::color::{classify_rgb, BorderColor};
use crate::params::BackgroundParams;

/// Mean color of the image corners outside the card.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BackgroundAnalysis {
    pub mean_rgb: [f32; 3],
    pub color: BorderColor,
    pub luminance: f32,
    pub samples: usize,
    /// Set when the background is known to hurt contrast for this border.
    pub recommendation: Option<String>,
}

/// Advice for a background of luminance `bg_lum` behind a `border` card.
pub fn recommend(border: BorderColor, bg_lum: f32) -> Option<&'static str> {
    match border {
        BorderColor::Black if bg_lum < 100.0 => {
            Some("use a lighter background to separate the black border")
        }
        BorderColor::White if bg_lum > 180.0 => {
            Some("use a darker background to separate the white border")
        }
        BorderColor::Silver if (120.0..=210.0).contains(&bg_lum) => {
            Some("use a darker or a brighter background than the silver border")
        }
        BorderColor::Yellow if bg_lum > 160.0 => {
            Some("use a darker background to separate the yellow border")
        }
        _ => None,
    }
}

/// Sample the four image-corner regions outside the card box.
///
/// Each region spans from the image corner to the card, minus the
/// `inset_frac` share of the margin closest to the card. Returns `None` when
/// the card leaves no exterior margin to sample.
pub fn analyze_background(
    img: &RgbaImageView<'_>,
    edges: &Edges,
    border: BorderColor,
    params: &BackgroundParams,
) -> Option<BackgroundAnalysis> {
    let w = img.width as f64;
    let h = img.height as f64;
    let keep = (1.0 - params.inset_frac).clamp(0.0, 1.0);

    let left_end = (edges.left.max(0.0) * keep) as usize;
    let right_start = (w - (w - edges.right).max(0.0) * keep).ceil() as usize;
    let top_end = (edges.top.max(0.0) * keep) as usize;
    let bottom_start = (h - (h - edges.bottom).max(0.0) * keep).ceil() as usize;

    let xs = [(0, left_end), (right_start, img.width)];
    let ys = [(0, top_end), (bottom_start, img.height)];

    let area: usize = xs
        .iter()
        .flat_map(|&(x0, x1)| {
            ys.iter()
                .map(move |&(y0, y1)| x1.saturating_sub(x0) * y1.saturating_sub(y0))
        })
        .sum();
    if area == 0 {
        return None;
    }
    let stride = ((area as f64 / params.target_samples.max(1) as f64).sqrt() as usize).max(1);

    let mut sum = [0.0_f64; 3];
    let mut samples = 0usize;
    for &(x0, x1) in &xs {
        for &(y0, y1) in &ys {
            for y in (y0..y1.min(img.height)).step_by(stride) {
                for x in (x0..x1.min(img.width)).step_by(stride) {
                    let [r, g, b, _] = img.pixel(x, y);
                    sum[0] += r as f64;
                    sum[1] += g as f64;
                    sum[2] += b as f64;
                    samples += 1;
                }
            }
        }
    }
    if samples == 0 {
        return None;
    }

    let mean_rgb = sum.map(|s| (s / samples as f64) as f32);
    let color = classify_rgb(
        mean_rgb[0].round() as u8,
        mean_rgb[1].round() as u8,
        mean_rgb[2].round() as u8,
    );
    let lum = luminance(mean_rgb[0], mean_rgb[1], mean_rgb[2]);
    let recommendation = recommend(border, lum).map(str::to_owned);

    log::debug!(
        "background {} lum={:.1} from {} samples{}",
        color,
        lum,
        samples,
        recommendation
            .as_deref()
            .map(|r| format!(": {r}"))
            .unwrap_or_default()
    );

    Some(BackgroundAnalysis {
        mean_rgb,
        color,
        luminance: lum,
        samples,
        recommendation,
    })
}
