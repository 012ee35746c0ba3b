//! Per-pixel border color classification.

use card_bounds_core::luminance;
use serde::{Deserialize, Serialize};

/// Printed border color of a card.
///
/// `Unknown` marks a pixel (or a whole border zone) without a confident class.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderColor {
    Black,
    White,
    Yellow,
    Silver,
    #[default]
    Unknown,
}

impl BorderColor {
    /// Classes that take part in the border vote.
    pub const KNOWN: [BorderColor; 4] = [
        BorderColor::Black,
        BorderColor::White,
        BorderColor::Yellow,
        BorderColor::Silver,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BorderColor::Black => "black",
            BorderColor::White => "white",
            BorderColor::Yellow => "yellow",
            BorderColor::Silver => "silver",
            BorderColor::Unknown => "unknown",
        }
    }

    /// Whether a pixel of class `other` may belong to a border of this color.
    #[inline]
    pub fn accepts(self, other: BorderColor) -> bool {
        self == BorderColor::Unknown || self == other
    }

    pub(crate) fn index(self) -> usize {
        match self {
            BorderColor::Black => 0,
            BorderColor::White => 1,
            BorderColor::Yellow => 2,
            BorderColor::Silver => 3,
            BorderColor::Unknown => 4,
        }
    }
}

impl std::fmt::Display for BorderColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify one RGB pixel.
///
/// Checks run in a fixed order: yellow, silver, white, black.
pub fn classify_rgb(r: u8, g: u8, b: u8) -> BorderColor {
    let (rf, gf, bf) = (r as f32, g as f32, b as f32);
    let lum = luminance(rf, gf, bf);
    let spread = (r.max(g).max(b) - r.min(g).min(b)) as f32;

    if rf > 170.0 && gf > 150.0 && bf < 120.0 && rf > 1.5 * bf && gf > 1.3 * bf {
        BorderColor::Yellow
    } else if spread < 35.0 && lum > 120.0 && lum < 210.0 {
        BorderColor::Silver
    } else if lum > 210.0 && spread < 50.0 {
        BorderColor::White
    } else if lum < 60.0 {
        BorderColor::Black
    } else {
        BorderColor::Unknown
    }
}
