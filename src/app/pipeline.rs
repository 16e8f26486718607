//! Shared "dashboard pipeline" logic used by both CLI and TUI front-ends.
//!
//! A session splits into two stages:
//!
//! - [`start_session`]: generate the market series once, then derive everything
//!   that depends only on the series (overview, decomposition, forecast)
//! - [`price_session`]: recompute every pricing output from the current
//!   controls; the TUI calls this on each key press
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use tracing::{debug, info, warn};

use crate::data::{forecast_demand, generate_series, require_product, resolve_selections, session_rng};
use crate::decompose::{ClassicalAdditive, SeasonalDecomposer};
use crate::domain::{
    CompetitorAnalysis, CostSurface, DashboardConfig, Decomposition, DemandForecast, MARGIN_RANGE,
    Metric, MetricSeries, Quote, SensitivityCurve,
};
use crate::error::AppError;
use crate::math::{linspace, min_max};
use crate::pricing::{analyze_competitors, cost_surface, quote, sweep_margin};
use crate::report::{MarketOverview, market_overview};

/// Outputs that depend only on the generated series.
#[derive(Debug, Clone)]
pub struct Session {
    pub series: MetricSeries,
    pub overview: MarketOverview,
    /// Kept as a result so a too-short series shows the collaborator's error
    /// in its own view instead of failing the whole dashboard.
    pub decomposition: Result<Decomposition, AppError>,
    pub forecast: Result<DemandForecast, AppError>,
}

impl Session {
    pub fn mean_labor_rate(&self) -> Result<f64, AppError> {
        self.overview
            .summary(Metric::LaborRate)
            .map(|s| s.mean)
            .ok_or_else(|| AppError::validation("Series has no labor rate summary."))
    }
}

/// Outputs that depend on the pricing controls.
#[derive(Debug, Clone)]
pub struct PricingView {
    pub quote: Quote,
    pub sensitivity: SensitivityCurve,
    pub surface: CostSurface,
    pub competitors: CompetitorAnalysis,
}

/// All computed outputs of a single dashboard run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub session: Session,
    pub pricing: PricingView,
}

/// Generate the series and compute everything in one go.
pub fn run_dashboard(config: &DashboardConfig) -> Result<RunOutput, AppError> {
    let session = start_session(config)?;
    let pricing = price_session(&session, config)?;
    Ok(RunOutput { session, pricing })
}

/// Generate the session's series and the series-only analyses.
pub fn start_session(config: &DashboardConfig) -> Result<Session, AppError> {
    let end_date = config
        .series
        .end_date
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    // One random source per session: the series first, then the forecast draw.
    let mut rng = session_rng(config.series.seed);
    let series = generate_series(&mut rng, config.series.days, end_date)?;
    info!(
        days = series.len(),
        seeded = config.series.seed.is_some(),
        "started dashboard session"
    );

    session_from_series(series, config, &mut rng)
}

/// Derive the series-only analyses from an existing series.
pub fn session_from_series<R: rand::Rng + ?Sized>(
    series: MetricSeries,
    config: &DashboardConfig,
    rng: &mut R,
) -> Result<Session, AppError> {
    let overview = market_overview(&series, config.moving_average_window)?;

    let decomposition = ClassicalAdditive.decompose(
        &series.column(Metric::OrderVolume),
        config.decomposition_period,
    );
    if let Err(e) = &decomposition {
        warn!(error = %e, "order volume decomposition unavailable");
    }

    let forecast = forecast_demand(rng, &series, config.forecast_horizon);
    if let Err(e) = &forecast {
        warn!(error = %e, "demand forecast unavailable");
    }

    Ok(Session {
        series,
        overview,
        decomposition,
        forecast,
    })
}

/// Recompute the quote, margin sweep, cost surface and competitor view.
pub fn price_session(session: &Session, config: &DashboardConfig) -> Result<PricingView, AppError> {
    let entry = require_product(&config.product)?;
    let selections = resolve_selections(entry, &config.selections)?;
    let labor_rate = session.mean_labor_rate()?;

    let quote = quote(
        entry,
        selections,
        &config.costs,
        labor_rate,
        config.margin,
        config.volume_discount,
    )?;

    let margins = linspace(MARGIN_RANGE.0, MARGIN_RANGE.1, config.sensitivity_steps)?;
    let sensitivity = sweep_margin(quote.base_cost, &margins, config.volume_discount)?;

    let surface = surface_for(session, config)?;
    let competitors = analyze_competitors(quote.price, &config.competitors)?;

    debug!(
        product = %quote.product,
        price = quote.price,
        position = ?competitors.position,
        "priced session"
    );

    Ok(PricingView {
        quote,
        sensitivity,
        surface,
        competitors,
    })
}

/// Price over the observed steel-cost x labor-rate ranges.
fn surface_for(session: &Session, config: &DashboardConfig) -> Result<CostSurface, AppError> {
    let axis = |metric: Metric| -> Result<Vec<f64>, AppError> {
        let (lo, hi) = min_max(&session.series.column(metric)).ok_or_else(|| {
            AppError::validation(format!("{} has no finite values.", metric.display_name()))
        })?;
        linspace(lo, hi, config.surface_steps)
    };

    let material_axis = axis(Metric::SteelCost)?;
    let labor_axis = axis(Metric::LaborRate)?;
    cost_surface(
        &material_axis,
        &labor_axis,
        config.costs.overhead_cost,
        config.margin,
        config.volume_discount,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use test_log::test;

    use crate::domain::{MarketPosition, SeriesConfig};
    use crate::error::ErrorKind;

    fn config(days: usize) -> DashboardConfig {
        DashboardConfig {
            series: SeriesConfig {
                days,
                end_date: NaiveDate::from_ymd_opt(2025, 12, 31),
                seed: Some(2024),
            },
            ..DashboardConfig::default()
        }
    }

    #[test]
    fn full_run_produces_every_view() {
        let run = run_dashboard(&config(365)).unwrap();
        assert_eq!(run.session.series.len(), 365);
        assert!(run.session.decomposition.is_ok());
        assert_eq!(run.session.forecast.as_ref().unwrap().points.len(), 30);

        let p = &run.pricing;
        assert_eq!(p.quote.product, "Rectangular Duct");
        assert_eq!(p.sensitivity.points.len(), 100);
        assert_eq!(p.surface.prices.len(), 100);
        assert_eq!(p.surface.prices[0].len(), 100);
        assert_eq!(p.competitors.position, MarketPosition::WithinRange);

        let expected = p.quote.base_cost / (1.0 - 0.3) * (1.0 - 0.05);
        assert!((p.quote.price - expected).abs() < 1e-9);
    }

    #[test]
    fn seeded_sessions_repeat() {
        let a = run_dashboard(&config(120)).unwrap();
        let b = run_dashboard(&config(120)).unwrap();
        assert_eq!(a.session.series, b.session.series);
        assert_eq!(a.session.forecast.unwrap(), b.session.forecast.unwrap());
        assert_eq!(a.pricing.quote, b.pricing.quote);
    }

    #[test]
    fn short_series_keeps_decomposition_error() {
        let run = run_dashboard(&config(45)).unwrap();
        let err = run.session.decomposition.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decomposition);
    }

    #[test]
    fn repricing_reuses_the_series() {
        let cfg = config(90);
        let session = start_session(&cfg).unwrap();
        let low = price_session(&session, &DashboardConfig { margin: 0.1, ..cfg.clone() }).unwrap();
        let high = price_session(&session, &DashboardConfig { margin: 0.5, ..cfg.clone() }).unwrap();
        assert_eq!(low.quote.base_cost, high.quote.base_cost);
        assert!(high.quote.price > low.quote.price);
    }

    #[test]
    fn margin_of_one_fails_pricing() {
        let cfg = config(90);
        let session = start_session(&cfg).unwrap();
        let err = price_session(&session, &DashboardConfig { margin: 1.0, ..cfg }).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Domain);
    }

    #[test]
    fn zero_days_is_a_validation_error() {
        let err = start_session(&config(0)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}
