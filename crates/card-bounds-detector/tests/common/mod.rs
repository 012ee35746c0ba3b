#![allow(dead_code)]

use card_bounds_core::{Point2, RgbaImage};

pub const GREEN: [u8; 4] = [40, 160, 60, 255];
pub const BLACK: [u8; 4] = [5, 5, 5, 255];
pub const YELLOW: [u8; 4] = [230, 200, 40, 255];
pub const WHITE: [u8; 4] = [245, 245, 245, 255];
pub const LIGHT_GREY: [u8; 4] = [240, 240, 240, 255];
pub const SILVER: [u8; 4] = [180, 180, 185, 255];
pub const RED: [u8; 4] = [200, 60, 60, 255];

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Solid card `[left, right) x [top, bottom)` over a uniform background.
pub fn card_on_background(
    size: (usize, usize),
    card: (usize, usize, usize, usize),
    card_px: [u8; 4],
    bg: [u8; 4],
) -> RgbaImage {
    let (w, h) = size;
    let (l, r, t, b) = card;
    let mut img = RgbaImage::new(w, h);
    img.fill_rect(0, 0, w, h, bg);
    img.fill_rect(l, t, r, b, card_px);
    img
}

/// Fill the convex quad (clockwise in image coordinates) with `fg`.
pub fn quad_on_background(
    size: (usize, usize),
    quad: &[Point2<f64>; 4],
    fg: [u8; 4],
    bg: [u8; 4],
) -> RgbaImage {
    let (w, h) = size;
    let mut img = RgbaImage::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let p = Point2::new(x as f64 + 0.5, y as f64 + 0.5);
            let inside = (0..4).all(|i| {
                let (a, b) = (quad[i], quad[(i + 1) % 4]);
                (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x) >= 0.0
            });
            img.put_pixel(x, y, if inside { fg } else { bg });
        }
    }
    img
}

/// Deterministic xorshift64 noise raster.
pub fn noise(w: usize, h: usize, seed: u64) -> RgbaImage {
    let mut state = seed.max(1);
    let mut img = RgbaImage::new(w, h);
    for px in img.data.chunks_exact_mut(4) {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        let bytes = state.to_le_bytes();
        px.copy_from_slice(&[bytes[0], bytes[1], bytes[2], 255]);
    }
    img
}
