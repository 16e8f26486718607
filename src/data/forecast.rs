//! Naive demand forecast.
//!
//! Each future day is an independent uniform integer between the lowest and
//! highest observed order volume. It is a placeholder for a real model and is
//! labelled as such wherever it is shown.

use chrono::NaiveDate;
use rand::Rng;
use tracing::debug;

use crate::domain::{DemandForecast, ForecastPoint, Metric, MetricSeries};
use crate::error::AppError;
use crate::math::min_max;

/// Predict `horizon` days of order volume following the last observation.
pub fn forecast_demand<R: Rng + ?Sized>(
    rng: &mut R,
    series: &MetricSeries,
    horizon: usize,
) -> Result<DemandForecast, AppError> {
    let today = series
        .last_date()
        .ok_or_else(|| AppError::validation("Cannot forecast demand from an empty series."))?;
    if horizon == 0 {
        return Err(AppError::validation("Forecast horizon must be > 0."));
    }

    let volumes = series.column(Metric::OrderVolume);
    let (lo, hi) = min_max(&volumes)
        .ok_or_else(|| AppError::validation("Order volume has no finite values to forecast from."))?;
    // Integer bounds of the half-open draw, truncated toward zero.
    let (lo, hi) = (lo as i64, hi as i64);
    if hi <= lo {
        return Err(AppError::validation(format!(
            "Order volume range [{lo}, {hi}) is empty; cannot draw a forecast."
        )));
    }

    let mut points = Vec::with_capacity(horizon);
    let mut date = today;
    for _ in 0..horizon {
        date = next_day(date)?;
        points.push(ForecastPoint {
            date,
            order_volume: rng.gen_range(lo..hi) as f64,
        });
    }

    debug!(horizon, lo, hi, %today, "drew naive demand forecast");
    Ok(DemandForecast { today, points })
}

fn next_day(date: NaiveDate) -> Result<NaiveDate, AppError> {
    date.succ_opt()
        .ok_or_else(|| AppError::validation("Forecast runs past the end of the calendar."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use crate::data::sample::generate_series;
    use crate::domain::MetricRecord;
    use crate::error::ErrorKind;

    fn flat_series(days: u32, order_volume: f64) -> MetricSeries {
        let records = (1..=days)
            .map(|d| MetricRecord {
                date: NaiveDate::from_ymd_opt(2025, 1, d).unwrap(),
                steel_cost: 0.75,
                aluminum_cost: 1.25,
                fiberglass_cost: 0.45,
                labor_rate: 25.0,
                electricity_cost: 0.15,
                order_volume,
            })
            .collect();
        MetricSeries { records }
    }

    #[test]
    fn forecast_follows_last_date_within_observed_range() {
        let end = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();
        let mut rng = StdRng::seed_from_u64(9);
        let series = generate_series(&mut rng, 120, end).unwrap();
        let volumes = series.column(Metric::OrderVolume);
        let (lo, hi) = min_max(&volumes).unwrap();

        let forecast = forecast_demand(&mut rng, &series, 30).unwrap();
        assert_eq!(forecast.today, end);
        assert_eq!(forecast.points.len(), 30);
        assert_eq!(forecast.points[0].date, NaiveDate::from_ymd_opt(2025, 4, 1).unwrap());
        for p in &forecast.points {
            assert!(p.order_volume >= lo.trunc() && p.order_volume < hi);
            assert_eq!(p.order_volume.fract(), 0.0);
        }
    }

    #[test]
    fn empty_series_is_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        let series = MetricSeries { records: Vec::new() };
        assert!(forecast_demand(&mut rng, &series, 30).is_err());
    }

    #[test]
    fn one_day_series_has_no_range_to_draw_from() {
        let mut rng = StdRng::seed_from_u64(2);
        let series = generate_series(&mut rng, 1, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()).unwrap();
        let err = forecast_demand(&mut rng, &series, 30).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn constant_order_volume_is_rejected() {
        let mut rng = StdRng::seed_from_u64(3);
        let err = forecast_demand(&mut rng, &flat_series(10, 120.0), 30).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.message().contains("[120, 120)"));

        // Fractional spread that truncates to one integer is still empty.
        let mut series = flat_series(10, 120.2);
        series.records[3].order_volume = 120.9;
        assert_eq!(forecast_demand(&mut rng, &series, 30).unwrap_err().kind(), ErrorKind::Validation);
    }

    #[test]
    fn zero_horizon_is_rejected() {
        let mut rng = StdRng::seed_from_u64(4);
        let series = generate_series(&mut rng, 60, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()).unwrap();
        let err = forecast_demand(&mut rng, &series, 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.message().contains("horizon"));
    }
}
