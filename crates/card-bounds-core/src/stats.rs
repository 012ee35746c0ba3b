//! Small robust statistics helpers.

/// Median of `values`; the mean of the two middle values for even lengths.
///
/// Returns `None` for an empty slice. NaNs are ordered last.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut v = values.to_vec();
    v.sort_by(|a, b| a.total_cmp(b));
    let n = v.len();
    if n % 2 == 1 {
        Some(v[n / 2])
    } else {
        Some(0.5 * (v[n / 2 - 1] + v[n / 2]))
    }
}

/// Nearest-rank percentile (`q` in `[0, 1]`) of `values`.
pub fn percentile(values: &mut [f32], q: f32) -> Option<f32> {
    if values.is_empty() {
        return None;
    }
    let q = q.clamp(0.0, 1.0);
    let idx = ((values.len() - 1) as f32 * q).floor() as usize;
    let (_, v, _) = values.select_nth_unstable_by(idx, |a, b| a.total_cmp(b));
    Some(*v)
}
