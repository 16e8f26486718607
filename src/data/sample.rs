//! Synthetic market series generation.
//!
//! Every metric is a uniform daily draw plus a shape term:
//!
//! - the four material/energy costs and order volume add a yearly sinusoid
//!   `amplitude * sin(2π * i / 365)`, phase-aligned with the day index `i`
//! - labor rate adds a random walk (running sum of `N(0, 0.01)` increments),
//!   which makes it the only path-dependent column
//!
//! The caller supplies the random source: seeded runs are reproducible,
//! unseeded runs draw from OS entropy.

use std::f64::consts::TAU;

use chrono::{Duration, NaiveDate};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;
use tracing::debug;

use crate::domain::{MetricRecord, MetricSeries};
use crate::error::AppError;

/// Period of the seasonal term, in days.
pub const SEASON_DAYS: f64 = 365.0;

/// Uniform range and seasonal amplitude of a cost column.
#[derive(Debug, Clone, Copy)]
struct SeasonalShape {
    low: f64,
    high: f64,
    amplitude: f64,
}

const STEEL: SeasonalShape = SeasonalShape { low: 0.5, high: 1.0, amplitude: 0.1 };
const ALUMINUM: SeasonalShape = SeasonalShape { low: 1.0, high: 1.5, amplitude: 0.15 };
const FIBERGLASS: SeasonalShape = SeasonalShape { low: 0.3, high: 0.6, amplitude: 0.05 };
const ELECTRICITY: SeasonalShape = SeasonalShape { low: 0.1, high: 0.2, amplitude: 0.02 };

const LABOR_BASE: (f64, f64) = (20.0, 30.0);
const LABOR_DRIFT_SIGMA: f64 = 0.01;

/// Half-open integer range of the daily order draw.
const ORDER_BASE: (i64, i64) = (50, 500);
const ORDER_AMPLITUDE: f64 = 100.0;

/// Seasonal factor for day `index` (0 = oldest day in the window).
pub fn seasonal_term(index: usize) -> f64 {
    (TAU * index as f64 / SEASON_DAYS).sin()
}

/// Generate `days` daily records ending at `end_date` (inclusive), oldest first.
pub fn generate_series<R: Rng + ?Sized>(
    rng: &mut R,
    days: usize,
    end_date: NaiveDate,
) -> Result<MetricSeries, AppError> {
    if days == 0 {
        return Err(AppError::validation("Day count must be > 0."));
    }

    let span = i64::try_from(days - 1)
        .map_err(|_| AppError::validation(format!("Day count {days} is too large.")))?;
    let back = Duration::try_days(span)
        .ok_or_else(|| AppError::validation(format!("Day count {days} is too large.")))?;
    let start_date = end_date
        .checked_sub_signed(back)
        .ok_or_else(|| AppError::validation(format!("Day count {days} reaches before the calendar start.")))?;

    let drift = Normal::new(0.0, LABOR_DRIFT_SIGMA)
        .map_err(|e| AppError::validation(format!("Labor drift distribution error: {e}")))?;

    let mut records = Vec::with_capacity(days);
    let mut labor_walk = 0.0;
    let mut date = start_date;

    for i in 0..days {
        let s = seasonal_term(i);

        let steel_cost = seasonal_draw(rng, STEEL, s);
        let aluminum_cost = seasonal_draw(rng, ALUMINUM, s);
        let fiberglass_cost = seasonal_draw(rng, FIBERGLASS, s);

        labor_walk += drift.sample(rng);
        let labor_rate = rng.gen_range(LABOR_BASE.0..LABOR_BASE.1) + labor_walk;

        let electricity_cost = seasonal_draw(rng, ELECTRICITY, s);

        // The draw can sit below the seasonal dip (50 - 100); orders never go negative.
        let orders = rng.gen_range(ORDER_BASE.0..ORDER_BASE.1) as f64;
        let order_volume = (orders + ORDER_AMPLITUDE * s).max(0.0);

        records.push(MetricRecord {
            date,
            steel_cost,
            aluminum_cost,
            fiberglass_cost,
            labor_rate,
            electricity_cost,
            order_volume,
        });

        date = date.succ_opt().unwrap_or(date);
    }

    debug!(days, %start_date, %end_date, labor_drift = labor_walk, "generated market series");
    Ok(MetricSeries { records })
}

/// Check a signed day count from a user-facing surface (flags, env vars).
pub fn validate_day_count(days: i64) -> Result<usize, AppError> {
    match usize::try_from(days) {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(AppError::validation(format!("Day count must be > 0 (got {days})."))),
    }
}

/// Random source for a session.
pub fn session_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn seasonal_draw<R: Rng + ?Sized>(rng: &mut R, shape: SeasonalShape, s: f64) -> f64 {
    rng.gen_range(shape.low..shape.high) + shape.amplitude * s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Metric;
    use crate::error::ErrorKind;

    fn end() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()
    }

    #[test]
    fn length_and_contiguous_dates() {
        let mut rng = StdRng::seed_from_u64(7);
        for days in [1usize, 2, 30, 365, 400] {
            let series = generate_series(&mut rng, days, end()).unwrap();
            assert_eq!(series.len(), days);
            assert_eq!(series.last_date(), Some(end()));
            for w in series.records.windows(2) {
                assert_eq!(w[1].date - w[0].date, Duration::days(1));
            }
        }
    }

    #[test]
    fn zero_and_negative_days_are_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        let err = generate_series(&mut rng, 0, end()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        for days in [-1, 0] {
            let err = validate_day_count(days).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation);
        }
        assert_eq!(validate_day_count(365).unwrap(), 365);
    }

    #[test]
    fn oversized_day_counts_are_rejected() {
        let mut rng = session_rng(Some(1));
        for days in [1usize << 60, usize::MAX, 400_000 * 365] {
            let err = generate_series(&mut rng, days, end()).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation, "days = {days}");
        }

        let huge = validate_day_count(i64::MAX).unwrap();
        assert!(generate_series(&mut rng, huge, end()).is_err());
    }

    #[test]
    fn same_seed_same_series() {
        let a = generate_series(&mut StdRng::seed_from_u64(42), 90, end()).unwrap();
        let b = generate_series(&mut StdRng::seed_from_u64(42), 90, end()).unwrap();
        let c = generate_series(&mut StdRng::seed_from_u64(43), 90, end()).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn values_stay_within_shaped_ranges() {
        let series = generate_series(&mut StdRng::seed_from_u64(3), 730, end()).unwrap();
        for (i, r) in series.records.iter().enumerate() {
            let s = seasonal_term(i);
            assert!(r.steel_cost >= 0.5 + 0.1 * s - 1e-12 && r.steel_cost < 1.0 + 0.1 * s + 1e-12);
            assert!(r.aluminum_cost >= 1.0 + 0.15 * s - 1e-12 && r.aluminum_cost < 1.5 + 0.15 * s + 1e-12);
            assert!(r.fiberglass_cost >= 0.3 + 0.05 * s - 1e-12 && r.fiberglass_cost < 0.6 + 0.05 * s + 1e-12);
            assert!(r.electricity_cost >= 0.1 + 0.02 * s - 1e-12 && r.electricity_cost < 0.2 + 0.02 * s + 1e-12);
            assert!(r.order_volume >= 0.0);
            assert!(r.order_volume < 600.0);
        }
    }

    #[test]
    fn labor_walk_drifts_slowly() {
        // Two years of sigma=0.01 steps: the walk is tiny next to the [20, 30) base.
        let series = generate_series(&mut StdRng::seed_from_u64(11), 730, end()).unwrap();
        for rate in series.column(Metric::LaborRate) {
            assert!(rate > 19.0 && rate < 31.0, "labor rate {rate} left its band");
        }
    }

    #[test]
    fn seasonal_term_has_yearly_period() {
        assert!(seasonal_term(0).abs() < 1e-12);
        assert!((seasonal_term(365 / 4) - (TAU * 91.0 / 365.0).sin()).abs() < 1e-12);
        assert!((seasonal_term(365) - seasonal_term(0)).abs() < 1e-9);
    }

    #[test]
    fn session_rng_is_seeded_when_asked() {
        let a = generate_series(&mut session_rng(Some(5)), 10, end()).unwrap();
        let b = generate_series(&mut session_rng(Some(5)), 10, end()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.last_date(), Some(end()));
    }
}
