//! Debug bundle writer for inspecting a dashboard session.
//!
//! The bundle is a single markdown file with the resolved configuration, the
//! head and tail of the generated series, per-metric summaries and every
//! pricing output, so a surprising number on screen can be traced back to its
//! inputs.

use std::fs::{create_dir_all, write};
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::info;

use crate::app::pipeline::RunOutput;
use crate::domain::{DashboardConfig, Metric, MetricRecord};
use crate::error::AppError;

/// Rows shown from each end of the series.
const SERIES_EDGE_ROWS: usize = 5;

pub fn write_debug_bundle(run: &RunOutput, config: &DashboardConfig) -> Result<PathBuf, AppError> {
    write_debug_bundle_in(Path::new("debug"), run, config)
}

pub fn write_debug_bundle_in(dir: &Path, run: &RunOutput, config: &DashboardConfig) -> Result<PathBuf, AppError> {
    create_dir_all(dir).map_err(|e| AppError::io(format!("Failed to create debug dir: {e}")))?;

    let ts = Local::now().format("%Y%m%d_%H%M%S");
    let date = run
        .session
        .series
        .last_date()
        .map(|d| d.format("%Y%m%d").to_string())
        .unwrap_or_else(|| "empty".to_string());
    let seed = config
        .series
        .seed
        .map(|s| s.to_string())
        .unwrap_or_else(|| "none".to_string());
    let path = dir.join(format!("hvac_debug_{date}_seed{seed}_{ts}.md"));

    write(&path, render_bundle(run, config))
        .map_err(|e| AppError::io(format!("Failed to write debug file: {e}")))?;

    info!(path = %path.display(), "wrote debug bundle");
    Ok(path)
}

fn render_bundle(run: &RunOutput, config: &DashboardConfig) -> String {
    let series = &run.session.series;
    let q = &run.pricing.quote;
    let mut lines = Vec::new();

    lines.push("# hvac debug bundle".to_string());
    lines.push(format!("- generated: {}", Local::now().to_rfc3339()));
    lines.push(format!(
        "- series: {} days, {} .. {}",
        series.len(),
        fmt_date(series.first_date()),
        fmt_date(series.last_date())
    ));
    lines.push(format!(
        "- seed: {}",
        config.series.seed.map(|s| s.to_string()).unwrap_or_else(|| "none (entropy)".to_string())
    ));
    lines.push(format!(
        "- margin: {:.2}, volume_discount: {:.2}",
        config.margin, config.volume_discount
    ));
    lines.push(format!(
        "- costs: material {:.2}, labor_hours {:.2}, overhead {:.2}",
        config.costs.material_cost, config.costs.labor_hours, config.costs.overhead_cost
    ));
    lines.push(format!(
        "- windows: decomposition {}, forecast {}, moving_average {}",
        config.decomposition_period, config.forecast_horizon, config.moving_average_window
    ));

    lines.push(String::new());
    lines.push("## Series (head / tail)".to_string());
    lines.push(format!(
        "| date | {} |",
        Metric::ALL.iter().map(|m| m.column()).collect::<Vec<_>>().join(" | ")
    ));
    lines.push(format!("|{}", " - |".repeat(Metric::ALL.len() + 1)));
    let n = series.records.len();
    for (i, r) in series.records.iter().enumerate() {
        if i < SERIES_EDGE_ROWS || i + SERIES_EDGE_ROWS >= n {
            lines.push(series_row(r));
        } else if i == SERIES_EDGE_ROWS {
            lines.push(format!("| ... {} rows ... |", n - 2 * SERIES_EDGE_ROWS));
        }
    }

    lines.push(String::new());
    lines.push("## Summaries".to_string());
    lines.push("| metric | mean | mean daily % | min | max |".to_string());
    lines.push("| - | - | - | - | - |".to_string());
    for s in &run.session.overview.summaries {
        lines.push(format!(
            "| {} | {:.4} | {:+.3} | {:.4} | {:.4} |",
            s.metric.display_name(),
            s.mean,
            s.mean_pct_change,
            s.min,
            s.max
        ));
    }

    lines.push(String::new());
    lines.push(format!("## Quote: {}", q.product));
    let selections: Vec<String> = q.selections.iter().map(|(k, v)| format!("{k}={v}")).collect();
    lines.push(format!("- selections: {}", selections.join(", ")));
    lines.push(format!(
        "- breakdown: material {:.4}, labor {:.4} (mean rate {:.4}), overhead {:.4}",
        q.breakdown.material, q.breakdown.labor, q.mean_labor_rate, q.breakdown.overhead
    ));
    lines.push(format!("- base_cost: {:.4}", q.base_cost));
    lines.push(format!("- price: {:.4}", q.price));

    let curve = &run.pricing.sensitivity;
    if let (Some(first), Some(last)) = (curve.points.first(), curve.points.last()) {
        lines.push(format!(
            "- sensitivity: {:.2} -> {:.4}, {:.2} -> {:.4} ({} points)",
            first.0,
            first.1,
            last.0,
            last.1,
            curve.points.len()
        ));
    }

    let c = &run.pricing.competitors;
    lines.push(String::new());
    lines.push(format!("## Competitors ({:?})", c.position));
    lines.push("| label | price | quality |".to_string());
    lines.push("| - | - | - |".to_string());
    for p in &c.matrix {
        lines.push(format!("| {} | {:.4} | {} |", p.label, p.price, p.quality));
    }

    lines.push(String::new());
    lines.push("## Decomposition".to_string());
    match &run.session.decomposition {
        Ok(d) => {
            let defined = d.trend.iter().filter(|v| v.is_some()).count();
            lines.push(format!("- period {}, trend defined on {defined}/{} days", d.period, d.observed.len()));
            let seasonal: Vec<String> = d.seasonal.iter().take(d.period).map(|v| format!("{v:.2}")).collect();
            lines.push(format!("- seasonal cycle: [{}]", seasonal.join(", ")));
        }
        Err(e) => lines.push(format!("- unavailable: {e}")),
    }

    lines.push(String::new());
    lines.push("## Forecast".to_string());
    match &run.session.forecast {
        Ok(f) => {
            for p in &f.points {
                lines.push(format!("- {}: {:.0}", p.date, p.order_volume));
            }
        }
        Err(e) => lines.push(format!("- unavailable: {e}")),
    }

    lines.push(String::new());
    lines.join("\n")
}

fn series_row(r: &MetricRecord) -> String {
    let values: Vec<String> = Metric::ALL.iter().map(|&m| format!("{:.4}", r.value(m))).collect();
    format!("| {} | {} |", r.date, values.join(" | "))
}

fn fmt_date(date: Option<chrono::NaiveDate>) -> String {
    date.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::app::pipeline::run_dashboard;
    use crate::domain::SeriesConfig;

    #[test]
    fn bundle_lands_in_directory_with_seed_in_name() {
        let config = DashboardConfig {
            series: SeriesConfig {
                days: 40,
                end_date: NaiveDate::from_ymd_opt(2025, 4, 30),
                seed: Some(13),
            },
            surface_steps: 4,
            ..DashboardConfig::default()
        };
        let run = run_dashboard(&config).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = write_debug_bundle_in(dir.path(), &run, &config).unwrap();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("hvac_debug_20250430_seed13_"));

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("# hvac debug bundle"));
        assert!(text.contains("| ... 30 rows ... |"));
        assert!(text.contains("## Quote: Rectangular Duct"));
        // 40 days is shorter than two 30-day periods.
        assert!(text.contains("- unavailable:"));
    }
}
