//! Border-width centering between an outer card box and an inner frame.

use card_bounds_core::{Edges, Side};
use serde::{Deserialize, Serialize};

/// Border widths around an inner frame, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Centering {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Centering {
    /// Measure the four border widths between `outer` and `inner`.
    ///
    /// Returns `None` unless both boxes are ordered and `inner` lies within
    /// `outer`.
    pub fn measure(outer: &Edges, inner: &Edges) -> Option<Self> {
        if !outer.is_ordered() || !inner.is_ordered() {
            return None;
        }
        let c = Self {
            left: inner.left - outer.left,
            right: outer.right - inner.right,
            top: inner.top - outer.top,
            bottom: outer.bottom - inner.bottom,
        };
        if c.left < 0.0 || c.right < 0.0 || c.top < 0.0 || c.bottom < 0.0 {
            return None;
        }
        Some(c)
    }

    pub fn width(&self, side: Side) -> f64 {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
            Side::Top => self.top,
            Side::Bottom => self.bottom,
        }
    }

    /// Left/right split as percentages, larger share first (e.g. `(55, 45)`).
    pub fn horizontal(&self) -> (f64, f64) {
        split(self.left, self.right)
    }

    /// Top/bottom split as percentages, larger share first.
    pub fn vertical(&self) -> (f64, f64) {
        split(self.top, self.bottom)
    }

    /// The worse of the two splits, by its larger share.
    pub fn worst(&self) -> (f64, f64) {
        let (h, v) = (self.horizontal(), self.vertical());
        if h.0 >= v.0 {
            h
        } else {
            v
        }
    }
}

fn split(a: f64, b: f64) -> (f64, f64) {
    let total = a + b;
    if total <= f64::EPSILON {
        return (50.0, 50.0);
    }
    let pa = 100.0 * a / total;
    (pa.max(100.0 - pa), pa.min(100.0 - pa))
}
