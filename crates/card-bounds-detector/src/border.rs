//! Border color vote over the four border strips.

use card_bounds_core::RgbaImageView;
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::color::{classify_rgb, BorderColor};
use crate::params::BorderSampleParams;

/// Outcome of the border color vote.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BorderColorEstimate {
    pub color: BorderColor,
    /// Share of all samples (including `unknown` ones) that voted for `color`.
    pub confidence: f32,
    /// Votes per class, indexed black, white, yellow, silver, unknown.
    pub counts: [usize; 5],
    pub total: usize,
}

impl BorderColorEstimate {
    pub fn count(&self, color: BorderColor) -> usize {
        self.counts[color.index()]
    }

    /// The best-voted known color other than `color`, as an estimate of its
    /// own. `None` when the vote was `unknown` or the runner-up share is at
    /// or below `min_confidence`.
    ///
    /// When the background is itself classifiable it covers the outer part
    /// of every strip and can outvote the border; the runner-up is then the
    /// border.
    pub fn runner_up(&self, min_confidence: f32) -> Option<BorderColorEstimate> {
        if self.color == BorderColor::Unknown || self.total == 0 {
            return None;
        }
        let (color, n) = BorderColor::KNOWN
            .into_iter()
            .filter(|&c| c != self.color)
            .map(|c| (c, self.count(c)))
            .fold((BorderColor::Unknown, 0usize), |best, cur| {
                if cur.1 > best.1 {
                    cur
                } else {
                    best
                }
            });
        let confidence = n as f32 / self.total as f32;
        (n > 0 && confidence > min_confidence).then_some(BorderColorEstimate {
            color,
            confidence,
            counts: self.counts,
            total: self.total,
        })
    }
}

/// Sample the strips between `strip_start_frac` and `strip_end_frac` inward
/// from every image side and vote a dominant border color.
///
/// A winner whose share is at or below `min_confidence` is reported as
/// `unknown`, carrying that share as its confidence.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(img, params), fields(width = img.width, height = img.height))
)]
pub fn detect_border_color(
    img: &RgbaImageView<'_>,
    params: &BorderSampleParams,
) -> BorderColorEstimate {
    let w = img.width as f64;
    let h = img.height as f64;
    let stride = (img.width.min(img.height) / params.samples_across.max(1)).max(1);
    let (s0, s1) = (params.strip_start_frac, params.strip_end_frac);

    let px = |f: f64| (f * w) as usize;
    let py = |f: f64| (f * h) as usize;

    // (x0, x1, y0, y1) half-open ranges: left, right, top, bottom strips
    let strips = [
        (px(s0), px(s1), py(s0), py(1.0 - s0)),
        (px(1.0 - s1), px(1.0 - s0), py(s0), py(1.0 - s0)),
        (px(s0), px(1.0 - s0), py(s0), py(s1)),
        (px(s0), px(1.0 - s0), py(1.0 - s1), py(1.0 - s0)),
    ];

    let mut counts = [0usize; 5];
    for (x0, x1, y0, y1) in strips {
        for y in (y0..y1.min(img.height)).step_by(stride) {
            for x in (x0..x1.min(img.width)).step_by(stride) {
                let [r, g, b, _] = img.pixel(x, y);
                counts[classify_rgb(r, g, b).index()] += 1;
            }
        }
    }

    let total: usize = counts.iter().sum();
    let mut dominant = BorderColor::Unknown;
    let mut dominant_count = 0usize;
    for color in BorderColor::KNOWN {
        let n = counts[color.index()];
        if n > dominant_count {
            dominant = color;
            dominant_count = n;
        }
    }

    let confidence = if total == 0 {
        0.0
    } else {
        dominant_count as f32 / total as f32
    };
    let color = if confidence <= params.min_confidence {
        BorderColor::Unknown
    } else {
        dominant
    };

    log::debug!(
        "border vote: {} ({:.2}) from {} samples, counts={:?}",
        color,
        confidence,
        total,
        counts
    );

    BorderColorEstimate {
        color,
        confidence,
        counts,
        total,
    }
}
