//! Descriptive statistics over series columns.
//!
//! Undefined values are `None` rather than NaN so callers must decide how to
//! render gaps (e.g. the first `window - 1` points of a moving average).

use nalgebra::DMatrix;

/// Arithmetic mean. `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Smallest and largest finite value.
pub fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for &v in values.iter().filter(|v| v.is_finite()) {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    if lo.is_finite() && hi.is_finite() {
        Some((lo, hi))
    } else {
        None
    }
}

/// Mean day-over-day relative change, in percent.
///
/// Steps from a zero value are skipped. `None` when no step is usable.
pub fn mean_pct_change(values: &[f64]) -> Option<f64> {
    let changes: Vec<f64> = values
        .windows(2)
        .filter(|w| w[0] != 0.0)
        .map(|w| (w[1] / w[0] - 1.0) * 100.0)
        .filter(|c| c.is_finite())
        .collect();
    mean(&changes)
}

/// Trailing moving average. Entry `i` averages `values[i + 1 - window..=i]`.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }

    let mut out = Vec::with_capacity(values.len());
    let mut sum = 0.0;
    for i in 0..values.len() {
        sum += values[i];
        if i >= window {
            sum -= values[i - window];
        }
        if i + 1 >= window {
            out.push(Some(sum / window as f64));
        } else {
            out.push(None);
        }
    }
    out
}

/// Pearson correlation of two equally long samples.
///
/// `None` when lengths differ, fewer than two points, or either side is constant.
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }
    let mx = mean(x)?;
    let my = mean(y)?;

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (&a, &b) in x.iter().zip(y) {
        let dx = a - mx;
        let dy = b - my;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    let denom = (sxx * syy).sqrt();
    if denom <= f64::EPSILON {
        return None;
    }
    Some((sxy / denom).clamp(-1.0, 1.0))
}

/// Pairwise Pearson correlations between columns.
///
/// Undefined pairs (constant columns) are NaN so the matrix stays rectangular.
pub fn correlation_matrix(columns: &[Vec<f64>]) -> DMatrix<f64> {
    let n = columns.len();
    DMatrix::from_fn(n, n, |i, j| {
        if i == j {
            1.0
        } else {
            pearson(&columns[i], &columns[j]).unwrap_or(f64::NAN)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_and_min_max() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[1.0, 2.0, 3.0]), Some(2.0));
        assert_eq!(min_max(&[3.0, f64::NAN, -1.0, 2.0]), Some((-1.0, 3.0)));
        assert_eq!(min_max(&[]), None);
    }

    #[test]
    fn pct_change_averages_relative_steps() {
        // +10% then -50%.
        let v = mean_pct_change(&[10.0, 11.0, 5.5]).unwrap();
        assert!((v - (-20.0)).abs() < 1e-9, "got {v}");
        assert_eq!(mean_pct_change(&[1.0]), None);
    }

    #[test]
    fn rolling_mean_leaves_warmup_undefined() {
        let out = rolling_mean(&[1.0, 2.0, 3.0, 4.0], 3);
        assert_eq!(out, vec![None, None, Some(2.0), Some(3.0)]);
    }

    #[test]
    fn correlation_matrix_is_symmetric_with_unit_diagonal() {
        let a = vec![1.0, 2.0, 3.0, 4.0];
        let b = vec![2.0, 4.0, 6.0, 8.5];
        let c = vec![4.0, 3.0, 2.0, 1.0];
        let m = correlation_matrix(&[a, b, c]);
        for i in 0..3 {
            assert_eq!(m[(i, i)], 1.0);
            for j in 0..3 {
                assert!((m[(i, j)] - m[(j, i)]).abs() < 1e-12);
            }
        }
        assert!(m[(0, 1)] > 0.99);
        assert!((m[(0, 2)] + 1.0).abs() < 1e-12);
    }

    #[test]
    fn constant_column_has_no_correlation() {
        assert_eq!(pearson(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]), None);
    }
}
