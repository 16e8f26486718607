//! Reporting utilities: market overview statistics and formatted terminal output.

use nalgebra::DMatrix;
use serde::Serialize;

use crate::domain::{Metric, MetricSeries, MetricSummary};
use crate::error::AppError;
use crate::math::{correlation_matrix, mean, mean_pct_change, min_max, rolling_mean};

pub mod format;

pub use format::*;

/// Metrics shown as headline cards on the market overview.
pub const HEADLINE_METRICS: [Metric; 3] = [Metric::SteelCost, Metric::LaborRate, Metric::ElectricityCost];

/// Everything the market overview and cost-analysis views show about a series.
#[derive(Debug, Clone)]
pub struct MarketOverview {
    pub summaries: Vec<MetricSummary>,
    /// Trailing moving average of order volume.
    pub order_moving_average: Vec<Option<f64>>,
    pub moving_average_window: usize,
    /// Pearson correlations between [`Metric::COSTS`], in that order.
    pub correlation: DMatrix<f64>,
}

impl MarketOverview {
    pub fn summary(&self, metric: Metric) -> Option<&MetricSummary> {
        self.summaries.iter().find(|s| s.metric == metric)
    }

    /// Correlation matrix as nested rows (for JSON export).
    pub fn correlation_rows(&self) -> Vec<Vec<f64>> {
        self.correlation
            .row_iter()
            .map(|row| row.iter().copied().collect())
            .collect()
    }
}

/// Serializable mirror of [`MarketOverview`].
#[derive(Debug, Clone, Serialize)]
pub struct MarketOverviewExport {
    pub summaries: Vec<MetricSummary>,
    pub moving_average_window: usize,
    pub order_moving_average: Vec<Option<f64>>,
    pub correlation_metrics: Vec<Metric>,
    pub correlation: Vec<Vec<f64>>,
}

impl From<&MarketOverview> for MarketOverviewExport {
    fn from(o: &MarketOverview) -> Self {
        Self {
            summaries: o.summaries.clone(),
            moving_average_window: o.moving_average_window,
            order_moving_average: o.order_moving_average.clone(),
            correlation_metrics: Metric::COSTS.to_vec(),
            correlation: o.correlation_rows(),
        }
    }
}

/// Level, range and mean daily change of one metric.
pub fn summarize_metric(series: &MetricSeries, metric: Metric) -> Result<MetricSummary, AppError> {
    let values = series.column(metric);
    let avg = mean(&values)
        .ok_or_else(|| AppError::validation("Cannot summarize an empty series."))?;
    let (min, max) = min_max(&values)
        .ok_or_else(|| AppError::validation(format!("{} has no finite values.", metric.display_name())))?;

    Ok(MetricSummary {
        metric,
        mean: avg,
        // A single day has no change; report flat rather than failing.
        mean_pct_change: mean_pct_change(&values).unwrap_or(0.0),
        min,
        max,
    })
}

/// Compute the overview for every metric.
pub fn market_overview(series: &MetricSeries, window: usize) -> Result<MarketOverview, AppError> {
    if window == 0 {
        return Err(AppError::validation("Moving average window must be > 0."));
    }

    let summaries = Metric::ALL
        .iter()
        .map(|&m| summarize_metric(series, m))
        .collect::<Result<Vec<_>, _>>()?;

    let order_moving_average = rolling_mean(&series.column(Metric::OrderVolume), window);

    let columns: Vec<Vec<f64>> = Metric::COSTS.iter().map(|&m| series.column(m)).collect();
    let correlation = correlation_matrix(&columns);

    Ok(MarketOverview {
        summaries,
        order_moving_average,
        moving_average_window: window,
        correlation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use crate::data::generate_series;

    #[test]
    fn overview_covers_every_metric() {
        let end = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        let series = generate_series(&mut StdRng::seed_from_u64(2), 90, end).unwrap();
        let overview = market_overview(&series, 30).unwrap();

        assert_eq!(overview.summaries.len(), Metric::ALL.len());
        let labor = overview.summary(Metric::LaborRate).unwrap();
        assert!(labor.mean > 20.0 && labor.mean < 30.0);
        assert!(labor.min <= labor.mean && labor.mean <= labor.max);

        assert_eq!(overview.order_moving_average.len(), 90);
        assert!(overview.order_moving_average[28].is_none());
        assert!(overview.order_moving_average[29].is_some());

        assert_eq!(overview.correlation.nrows(), 5);
        assert_eq!(overview.correlation_rows()[3][3], 1.0);
    }

    #[test]
    fn single_day_series_reports_flat_change() {
        let end = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        let series = generate_series(&mut StdRng::seed_from_u64(2), 1, end).unwrap();
        let s = summarize_metric(&series, Metric::SteelCost).unwrap();
        assert_eq!(s.mean_pct_change, 0.0);
    }
}
