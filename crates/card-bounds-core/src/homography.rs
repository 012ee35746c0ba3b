use nalgebra::{Matrix3, Point2, SMatrix, SVector, Vector3};
use serde::{Deserialize, Serialize};

/// Pivots (and projective denominators) below this magnitude are treated as zero.
pub const DEGENERATE_EPS: f64 = 1e-12;

/// 3x3 projective transform, normalized so that `h[(2, 2)] == 1` whenever possible.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Homography {
    pub h: Matrix3<f64>,
}

impl Homography {
    pub fn new(h: Matrix3<f64>) -> Self {
        Self { h }
    }

    pub fn identity() -> Self {
        Self::new(Matrix3::identity())
    }

    pub fn from_array(rows: [[f64; 3]; 3]) -> Self {
        Self::new(Matrix3::from_row_slice(&[
            rows[0][0], rows[0][1], rows[0][2], rows[1][0], rows[1][1], rows[1][2], rows[2][0],
            rows[2][1], rows[2][2],
        ]))
    }

    pub fn to_array(&self) -> [[f64; 3]; 3] {
        [
            [self.h[(0, 0)], self.h[(0, 1)], self.h[(0, 2)]],
            [self.h[(1, 0)], self.h[(1, 1)], self.h[(1, 2)]],
            [self.h[(2, 0)], self.h[(2, 1)], self.h[(2, 2)]],
        ]
    }

    /// Map `p` through the transform.
    ///
    /// Returns the origin when the homogeneous denominator vanishes.
    #[inline]
    pub fn apply(&self, p: Point2<f64>) -> Point2<f64> {
        let v = self.h * Vector3::new(p.x, p.y, 1.0);
        let w = v[2];
        if w.abs() < DEGENERATE_EPS {
            return Point2::origin();
        }
        Point2::new(v[0] / w, v[1] / w)
    }

    pub fn determinant(&self) -> f64 {
        self.h.determinant()
    }

    /// True when the matrix cannot represent a proper plane-to-plane mapping.
    pub fn is_degenerate(&self) -> bool {
        !self.h.iter().all(|v| v.is_finite()) || self.determinant().abs() < DEGENERATE_EPS
    }

    pub fn inverse(&self) -> Option<Self> {
        if self.is_degenerate() {
            return None;
        }
        let inv = self.h.try_inverse()?;
        Some(Self::new(normalize_homography(inv)))
    }
}

fn hartley_normalization(cx: f64, cy: f64, mean_dist: f64) -> Matrix3<f64> {
    let s = if mean_dist > DEGENERATE_EPS {
        (2.0_f64).sqrt() / mean_dist
    } else {
        1.0
    };

    Matrix3::<f64>::new(s, 0.0, -s * cx, 0.0, s, -s * cy, 0.0, 0.0, 1.0)
}

fn normalize_points4(pts: &[Point2<f64>; 4]) -> ([Point2<f64>; 4], Matrix3<f64>) {
    let cx = pts.iter().map(|p| p.x).sum::<f64>() / 4.0;
    let cy = pts.iter().map(|p| p.y).sum::<f64>() / 4.0;
    let mean_dist = pts
        .iter()
        .map(|p| ((p.x - cx).powi(2) + (p.y - cy).powi(2)).sqrt())
        .sum::<f64>()
        / 4.0;

    let t = hartley_normalization(cx, cy, mean_dist);
    let out = pts.map(|p| {
        let v = t * Vector3::new(p.x, p.y, 1.0);
        Point2::new(v[0], v[1])
    });
    (out, t)
}

/// Scale so the last entry is 1; left unscaled when that entry vanishes.
fn normalize_homography(h: Matrix3<f64>) -> Matrix3<f64> {
    let s = h[(2, 2)];
    if s.abs() < DEGENERATE_EPS {
        return h;
    }
    h / s
}

/// Solve `a * x = b` by Gaussian elimination with partial pivoting.
///
/// A column whose best pivot is below [`DEGENERATE_EPS`] is left unsolved and
/// its unknown is set to zero instead of failing.
pub fn solve_linear_8x8(
    mut a: SMatrix<f64, 8, 8>,
    mut b: SVector<f64, 8>,
) -> SVector<f64, 8> {
    const N: usize = 8;
    let mut solved = [false; N];

    for col in 0..N {
        let mut pivot_row = col;
        let mut pivot_abs = a[(col, col)].abs();
        for row in col + 1..N {
            let v = a[(row, col)].abs();
            if v > pivot_abs {
                pivot_abs = v;
                pivot_row = row;
            }
        }
        if pivot_abs < DEGENERATE_EPS {
            continue;
        }
        if pivot_row != col {
            a.swap_rows(col, pivot_row);
            b.swap_rows(col, pivot_row);
        }
        solved[col] = true;

        let pivot = a[(col, col)];
        for row in col + 1..N {
            let factor = a[(row, col)] / pivot;
            if factor == 0.0 {
                continue;
            }
            for k in col..N {
                a[(row, k)] -= factor * a[(col, k)];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = SVector::<f64, 8>::zeros();
    for row in (0..N).rev() {
        if !solved[row] {
            continue;
        }
        let mut acc = b[row];
        for k in row + 1..N {
            acc -= a[(row, k)] * x[k];
        }
        x[row] = acc / a[(row, row)];
    }
    x
}

/// Compute H such that `dst ~ H * src` from 4 point correspondences (DLT, `h33 = 1`).
///
/// Corner order must be consistent between `src` and `dst`. Degenerate
/// correspondences do not fail; they produce a matrix for which
/// [`Homography::is_degenerate`] may hold.
pub fn homography_from_4pt(src: &[Point2<f64>; 4], dst: &[Point2<f64>; 4]) -> Homography {
    // Two rows per pair (x, y) -> (u, v), unknowns h0..h7:
    //   [x y 1 0 0 0 -ux -uy] . h = u
    //   [0 0 0 x y 1 -vx -vy] . h = v
    let (src_n, t_src) = normalize_points4(src);
    let (dst_n, t_dst) = normalize_points4(dst);

    let mut a = SMatrix::<f64, 8, 8>::zeros();
    let mut b = SVector::<f64, 8>::zeros();

    for k in 0..4 {
        let x = src_n[k].x;
        let y = src_n[k].y;
        let u = dst_n[k].x;
        let v = dst_n[k].y;

        let r0 = 2 * k;
        a[(r0, 0)] = x;
        a[(r0, 1)] = y;
        a[(r0, 2)] = 1.0;
        a[(r0, 6)] = -u * x;
        a[(r0, 7)] = -u * y;
        b[r0] = u;

        let r1 = 2 * k + 1;
        a[(r1, 3)] = x;
        a[(r1, 4)] = y;
        a[(r1, 5)] = 1.0;
        a[(r1, 6)] = -v * x;
        a[(r1, 7)] = -v * y;
        b[r1] = v;
    }

    let x = solve_linear_8x8(a, b);

    let hn = Matrix3::<f64>::new(
        x[0], x[1], x[2], //
        x[3], x[4], x[5], //
        x[6], x[7], 1.0,
    );

    // t_dst is a similarity with positive scale, always invertible.
    let t_dst_inv = t_dst.try_inverse().unwrap_or_else(Matrix3::identity);
    Homography::new(normalize_homography(t_dst_inv * hn * t_src))
}
