//! Grayscale, Gaussian smoothing and Sobel gradients.

use card_bounds_core::{to_luminance, FloatImage, RgbaImageView};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Per-pass gradient data over the image plane.
///
/// All fields share the input dimensions. The outermost pixel ring of every
/// gradient array is zero.
#[derive(Clone, Debug)]
pub struct GradientField {
    pub width: usize,
    pub height: usize,
    /// 3x3 Gaussian-smoothed luminance.
    pub smoothed: FloatImage,
    /// `sqrt(gx^2 + gy^2)`.
    pub magnitude: FloatImage,
    /// `|gy|`: response to horizontal edges (top, bottom).
    pub horizontal: FloatImage,
    /// `|gx|`: response to vertical edges (left, right).
    pub vertical: FloatImage,
}

/// 3x3 `[1 2 1; 2 4 2; 1 2 1] / 16` blur. The border ring is copied unfiltered.
pub fn gaussian_blur_3x3(src: &FloatImage) -> FloatImage {
    let (w, h) = (src.width, src.height);
    let mut out = src.clone();
    if w < 3 || h < 3 {
        return out;
    }
    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let p = |dx: usize, dy: usize| src.get(x + dx - 1, y + dy - 1);
            let v = p(0, 0)
                + 2.0 * p(1, 0)
                + p(2, 0)
                + 2.0 * p(0, 1)
                + 4.0 * p(1, 1)
                + 2.0 * p(2, 1)
                + p(0, 2)
                + 2.0 * p(1, 2)
                + p(2, 2);
            out.set(x, y, v / 16.0);
        }
    }
    out
}

/// Build the gradient field of an RGBA raster.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(img), fields(width = img.width, height = img.height))
)]
pub fn build_gradient_field(img: &RgbaImageView<'_>) -> GradientField {
    let gray = to_luminance(img);
    let smoothed = gaussian_blur_3x3(&gray);
    gradient_field_from_smoothed(smoothed)
}

/// Sobel gradients of an already smoothed grayscale field.
pub fn gradient_field_from_smoothed(smoothed: FloatImage) -> GradientField {
    let (w, h) = (smoothed.width, smoothed.height);
    let mut magnitude = FloatImage::zeros(w, h);
    let mut horizontal = FloatImage::zeros(w, h);
    let mut vertical = FloatImage::zeros(w, h);

    // Sobel kernels:
    // Gx: [-1 0 1; -2 0 2; -1 0 1]
    // Gy: [-1 -2 -1; 0 0 0; 1 2 1]
    if w >= 3 && h >= 3 {
        for y in 1..h - 1 {
            for x in 1..w - 1 {
                let p00 = smoothed.get(x - 1, y - 1);
                let p10 = smoothed.get(x, y - 1);
                let p20 = smoothed.get(x + 1, y - 1);
                let p01 = smoothed.get(x - 1, y);
                let p21 = smoothed.get(x + 1, y);
                let p02 = smoothed.get(x - 1, y + 1);
                let p12 = smoothed.get(x, y + 1);
                let p22 = smoothed.get(x + 1, y + 1);

                let gx = -p00 + p20 - 2.0 * p01 + 2.0 * p21 - p02 + p22;
                let gy = -p00 - 2.0 * p10 - p20 + p02 + 2.0 * p12 + p22;

                magnitude.set(x, y, (gx * gx + gy * gy).sqrt());
                horizontal.set(x, y, gy.abs());
                vertical.set(x, y, gx.abs());
            }
        }
    }

    GradientField {
        width: w,
        height: h,
        smoothed,
        magnitude,
        horizontal,
        vertical,
    }
}
