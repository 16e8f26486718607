//! Seasonal decomposition of an evenly spaced series.
//!
//! The dashboard only needs "observed / trend / seasonal / residual" for the
//! order-volume series, so the decomposer sits behind a small trait and the
//! pipeline treats it as a black box. Its errors are returned unchanged.
//!
//! [`ClassicalAdditive`] is the textbook moving-average method:
//!
//! 1. trend = centered moving average over one period (a `2 x period` MA when
//!    the period is even), undefined for the first/last half-period
//! 2. seasonal = mean of `observed - trend` at each phase, shifted to zero mean
//!    and tiled over the series
//! 3. residual = `observed - trend - seasonal`

use tracing::debug;

use crate::domain::Decomposition;
use crate::error::AppError;

pub trait SeasonalDecomposer {
    fn decompose(&self, series: &[f64], period: usize) -> Result<Decomposition, AppError>;
}

/// Additive moving-average decomposition.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassicalAdditive;

impl SeasonalDecomposer for ClassicalAdditive {
    fn decompose(&self, series: &[f64], period: usize) -> Result<Decomposition, AppError> {
        if period < 2 {
            return Err(AppError::decomposition(format!(
                "Seasonal period must be >= 2 (got {period})."
            )));
        }
        if series.iter().any(|v| !v.is_finite()) {
            return Err(AppError::decomposition(
                "Series contains missing or non-finite values.",
            ));
        }
        let n = series.len();
        if n < 2 * period {
            return Err(AppError::decomposition(format!(
                "Series must cover 2 complete cycles ({} observations); it only has {n}.",
                2 * period
            )));
        }

        let trend = centered_moving_average(series, period);

        let detrended: Vec<Option<f64>> = series
            .iter()
            .zip(&trend)
            .map(|(&y, t)| t.map(|t| y - t))
            .collect();

        let mut phase_means = Vec::with_capacity(period);
        for phase in 0..period {
            let values: Vec<f64> = detrended
                .iter()
                .skip(phase)
                .step_by(period)
                .flatten()
                .copied()
                .collect();
            // Every phase has at least one defined value once n >= 2 * period.
            let m = if values.is_empty() {
                0.0
            } else {
                values.iter().sum::<f64>() / values.len() as f64
            };
            phase_means.push(m);
        }
        let offset = phase_means.iter().sum::<f64>() / period as f64;
        for m in &mut phase_means {
            *m -= offset;
        }

        let seasonal: Vec<f64> = (0..n).map(|i| phase_means[i % period]).collect();
        let residual: Vec<Option<f64>> = detrended
            .iter()
            .zip(&seasonal)
            .map(|(d, s)| d.map(|d| d - s))
            .collect();

        debug!(n, period, "decomposed series");
        Ok(Decomposition {
            period,
            observed: series.to_vec(),
            trend,
            seasonal,
            residual,
        })
    }
}

/// Centered moving average with `period`-point support.
///
/// Odd periods use equal weights; even periods use `period + 1` points with
/// half weight at both ends so the window stays centered.
fn centered_moving_average(series: &[f64], period: usize) -> Vec<Option<f64>> {
    let weights: Vec<f64> = if period % 2 == 0 {
        let mut w = vec![1.0; period + 1];
        w[0] = 0.5;
        w[period] = 0.5;
        w.into_iter().map(|x| x / period as f64).collect()
    } else {
        vec![1.0 / period as f64; period]
    };

    let half = weights.len() / 2;
    let n = series.len();
    (0..n)
        .map(|i| {
            if i < half || i + half >= n {
                return None;
            }
            let start = i - half;
            Some(
                weights
                    .iter()
                    .zip(&series[start..start + weights.len()])
                    .map(|(w, y)| w * y)
                    .sum(),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::f64::consts::TAU;

    fn synthetic(n: usize, period: usize) -> Vec<f64> {
        (0..n)
            .map(|i| 100.0 + 0.5 * i as f64 + 10.0 * (TAU * i as f64 / period as f64).sin())
            .collect()
    }

    #[test]
    fn components_have_input_length() {
        let y = synthetic(365, 30);
        let d = ClassicalAdditive.decompose(&y, 30).unwrap();
        assert_eq!(d.observed.len(), 365);
        assert_eq!(d.trend.len(), 365);
        assert_eq!(d.seasonal.len(), 365);
        assert_eq!(d.residual.len(), 365);

        // Even period: half-window of 15 undefined at each edge.
        assert!(d.trend[..15].iter().all(Option::is_none));
        assert!(d.trend[15..350].iter().all(Option::is_some));
        assert!(d.trend[350..].iter().all(Option::is_none));
    }

    #[test]
    fn seasonal_is_periodic_with_zero_mean() {
        let y = synthetic(120, 12);
        let d = ClassicalAdditive.decompose(&y, 12).unwrap();
        for i in 12..120 {
            assert!((d.seasonal[i] - d.seasonal[i - 12]).abs() < 1e-12);
        }
        let m: f64 = d.seasonal[..12].iter().sum::<f64>() / 12.0;
        assert!(m.abs() < 1e-9);
    }

    #[test]
    fn linear_plus_periodic_leaves_small_residual() {
        // Odd period: the MA removes the sinusoid exactly and passes the line through.
        let y = synthetic(105, 7);
        let d = ClassicalAdditive.decompose(&y, 7).unwrap();
        for (i, r) in d.residual.iter().enumerate() {
            if let Some(r) = r {
                assert!(r.abs() < 1e-6, "residual {r} at {i}");
            }
        }
        let t = d.trend[50].unwrap();
        assert!((t - (100.0 + 25.0)).abs() < 1e-6);
    }

    #[test]
    fn observed_equals_sum_of_parts() {
        let y = synthetic(90, 30);
        let d = ClassicalAdditive.decompose(&y, 30).unwrap();
        for i in 0..y.len() {
            if let (Some(t), Some(r)) = (d.trend[i], d.residual[i]) {
                assert!((t + d.seasonal[i] + r - y[i]).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn short_series_is_surfaced_as_decomposition_error() {
        let err = ClassicalAdditive.decompose(&synthetic(59, 30), 30).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decomposition);
        assert!(err.message().contains("60"));

        assert!(ClassicalAdditive.decompose(&synthetic(60, 30), 30).is_ok());
        assert!(ClassicalAdditive.decompose(&synthetic(60, 30), 1).is_err());
        assert!(ClassicalAdditive.decompose(&[1.0, f64::NAN, 2.0, 3.0], 2).is_err());
    }
}
