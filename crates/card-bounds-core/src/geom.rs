use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// One side of an axis-aligned card box.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Left, Side::Right, Side::Top, Side::Bottom];

    /// Left and right edges are vertical lines located by an x coordinate.
    #[inline]
    pub fn is_vertical(self) -> bool {
        matches!(self, Side::Left | Side::Right)
    }
}

/// Card boundary in image pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Edges {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Edges {
    pub fn new(left: f64, right: f64, top: f64, bottom: f64) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    /// Fixed proportional box used when no evidence is available.
    pub fn default_for(width: usize, height: usize) -> Self {
        let w = width as f64;
        let h = height as f64;
        Self::new(0.05 * w, 0.95 * w, 0.05 * h, 0.95 * h)
    }

    #[inline]
    pub fn get(&self, side: Side) -> f64 {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
            Side::Top => self.top,
            Side::Bottom => self.bottom,
        }
    }

    /// Copy with one side replaced.
    #[must_use]
    pub fn with(mut self, side: Side, value: f64) -> Self {
        match side {
            Side::Left => self.left = value,
            Side::Right => self.right = value,
            Side::Top => self.top = value,
            Side::Bottom => self.bottom = value,
        }
        self
    }

    /// Copy with one side moved by `delta` pixels.
    #[must_use]
    pub fn nudged(self, side: Side, delta: f64) -> Self {
        self.with(side, self.get(side) + delta)
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Width over height; zero for a collapsed box.
    pub fn aspect(&self) -> f64 {
        let h = self.height();
        if h.abs() < f64::EPSILON {
            0.0
        } else {
            self.width() / h
        }
    }

    /// True when `left < right` and `top < bottom`.
    pub fn is_ordered(&self) -> bool {
        self.left < self.right && self.top < self.bottom
    }

    /// Clamp every side into `[0, dim - 1]`.
    #[must_use]
    pub fn clamped(self, width: usize, height: usize) -> Self {
        let max_x = width.saturating_sub(1) as f64;
        let max_y = height.saturating_sub(1) as f64;
        Self::new(
            self.left.clamp(0.0, max_x),
            self.right.clamp(0.0, max_x),
            self.top.clamp(0.0, max_y),
            self.bottom.clamp(0.0, max_y),
        )
    }

    /// Clamp, then replace any collapsed axis with the default proportions.
    #[must_use]
    pub fn sanitized(self, width: usize, height: usize) -> Self {
        let mut out = self.clamped(width, height);
        let fallback = Self::default_for(width, height).clamped(width, height);
        if !(out.left < out.right) {
            out.left = fallback.left;
            out.right = fallback.right;
        }
        if !(out.top < out.bottom) {
            out.top = fallback.top;
            out.bottom = fallback.bottom;
        }
        out
    }

    /// Rectangle corners, clockwise from top-left.
    pub fn corners(&self) -> Corners {
        [
            Point2::new(self.left, self.top),
            Point2::new(self.right, self.top),
            Point2::new(self.right, self.bottom),
            Point2::new(self.left, self.bottom),
        ]
    }
}

/// Quadrilateral corners TL, TR, BR, BL.
pub type Corners = [Point2<f64>; 4];
