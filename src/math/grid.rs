//! Evenly spaced grids for sweeps and surfaces.

use crate::error::AppError;

/// Generate `steps` evenly spaced points between `start` and `end` (inclusive).
pub fn linspace(start: f64, end: f64, steps: usize) -> Result<Vec<f64>, AppError> {
    if !(start.is_finite() && end.is_finite()) {
        return Err(AppError::validation(format!(
            "Invalid grid range: start={start}, end={end} (must be finite)."
        )));
    }
    if steps < 2 {
        return Err(AppError::validation("Grid steps must be >= 2."));
    }

    let step = (end - start) / (steps as f64 - 1.0);
    let mut out = Vec::with_capacity(steps);
    for i in 0..steps - 1 {
        out.push(start + step * i as f64);
    }
    // Pin the last point so the endpoint is exact.
    out.push(end);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linspace_includes_endpoints() {
        let v = linspace(0.1, 0.5, 100).unwrap();
        assert_eq!(v.len(), 100);
        assert!((v[0] - 0.1).abs() < 1e-12);
        assert_eq!(v[99], 0.5);
        for w in v.windows(2) {
            assert!(w[1] > w[0]);
        }
    }

    #[test]
    fn degenerate_range_repeats_value() {
        let v = linspace(2.0, 2.0, 3).unwrap();
        assert_eq!(v, vec![2.0, 2.0, 2.0]);
    }

    #[test]
    fn too_few_steps_is_an_error() {
        assert!(linspace(0.0, 1.0, 1).is_err());
        assert!(linspace(f64::NAN, 1.0, 5).is_err());
    }
}
