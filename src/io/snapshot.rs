//! JSON exports of a dashboard run.
//!
//! The snapshot is the "portable" representation of a session:
//! - the resolved configuration (seed included, so seeded runs can be replayed)
//! - the generated series and its overview statistics
//! - every pricing output for the configured product
//! - decomposition and forecast, or the reason they are unavailable

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::app::pipeline::RunOutput;
use crate::domain::{
    CompetitorAnalysis, CostSurface, DashboardConfig, Decomposition, DemandForecast, MetricSeries, Quote,
    SensitivityCurve,
};
use crate::error::AppError;
use crate::report::MarketOverviewExport;

/// Either the computed value or the error message explaining its absence.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability<T> {
    Ok(T),
    Unavailable { error: String },
}

impl<T: Clone> From<&Result<T, AppError>> for Availability<T> {
    fn from(r: &Result<T, AppError>) -> Self {
        match r {
            Ok(v) => Availability::Ok(v.clone()),
            Err(e) => Availability::Unavailable { error: e.to_string() },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub tool: String,
    pub generated_at: DateTime<Local>,
    pub config: DashboardConfig,
    pub series: MetricSeries,
    pub overview: MarketOverviewExport,
    pub quote: Quote,
    pub sensitivity: SensitivityCurve,
    pub surface: CostSurface,
    pub competitors: CompetitorAnalysis,
    pub decomposition: Availability<Decomposition>,
    pub forecast: Availability<DemandForecast>,
}

impl SessionSnapshot {
    pub fn new(run: &RunOutput, config: &DashboardConfig) -> Self {
        Self {
            tool: "hvac".to_string(),
            generated_at: Local::now(),
            config: config.clone(),
            series: run.session.series.clone(),
            overview: MarketOverviewExport::from(&run.session.overview),
            quote: run.pricing.quote.clone(),
            sensitivity: run.pricing.sensitivity.clone(),
            surface: run.pricing.surface.clone(),
            competitors: run.pricing.competitors.clone(),
            decomposition: Availability::from(&run.session.decomposition),
            forecast: Availability::from(&run.session.forecast),
        }
    }
}

/// Cost surface on its own, for plotting in external tools.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurfaceFile {
    pub tool: String,
    pub product: String,
    pub surface: CostSurface,
}

/// Write the full session snapshot.
pub fn write_snapshot_json(path: &Path, run: &RunOutput, config: &DashboardConfig) -> Result<(), AppError> {
    let snapshot = SessionSnapshot::new(run, config);
    write_json(path, &snapshot, "snapshot")?;
    info!(path = %path.display(), "wrote session snapshot");
    Ok(())
}

/// Write the cost surface for `product`.
pub fn write_surface_json(path: &Path, product: &str, surface: &CostSurface) -> Result<(), AppError> {
    let file = SurfaceFile {
        tool: "hvac".to_string(),
        product: product.to_string(),
        surface: surface.clone(),
    };
    write_json(path, &file, "surface")?;
    info!(path = %path.display(), "wrote cost surface");
    Ok(())
}

/// Read a surface file written by [`write_surface_json`].
pub fn read_surface_json(path: &Path) -> Result<SurfaceFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::io(format!("Failed to open surface JSON '{}': {e}", path.display())))?;
    serde_json::from_reader(file).map_err(|e| AppError::io(format!("Invalid surface JSON: {e}")))
}

fn write_json<T: Serialize>(path: &Path, value: &T, what: &str) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create {what} JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(BufWriter::new(file), value)
        .map_err(|e| AppError::io(format!("Failed to write {what} JSON: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::app::pipeline::run_dashboard;
    use crate::domain::SeriesConfig;

    fn config(days: usize) -> DashboardConfig {
        DashboardConfig {
            series: SeriesConfig {
                days,
                end_date: NaiveDate::from_ymd_opt(2025, 1, 31),
                seed: Some(77),
            },
            surface_steps: 5,
            ..DashboardConfig::default()
        }
    }

    #[test]
    fn snapshot_records_unavailable_decomposition() {
        let cfg = config(20);
        let run = run_dashboard(&cfg).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        write_snapshot_json(&path, &run, &cfg).unwrap();

        let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["tool"], "hvac");
        assert_eq!(value["config"]["series"]["seed"], 77);
        assert_eq!(value["series"]["records"].as_array().unwrap().len(), 20);
        assert!(value["decomposition"]["unavailable"]["error"].is_string());
        assert!(value["forecast"]["ok"]["points"].is_array());
        assert_eq!(value["overview"]["correlation"].as_array().unwrap().len(), 5);
    }

    #[test]
    fn surface_file_reads_back() {
        let cfg = config(60);
        let run = run_dashboard(&cfg).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("surface.json");
        write_surface_json(&path, &run.pricing.quote.product, &run.pricing.surface).unwrap();

        let back = read_surface_json(&path).unwrap();
        assert_eq!(back.product, "Rectangular Duct");
        assert_eq!(back.surface.material_axis.len(), 5);
        assert_eq!(back.surface.prices.len(), 5);
    }
}
