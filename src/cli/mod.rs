//! Command-line parsing for the HVAC pricing dashboard.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the pricing/analytics code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::domain::{
    CostInputs, DECOMPOSITION_PERIOD, FORECAST_HORIZON, MOVING_AVERAGE_WINDOW, Metric,
};

pub mod picker;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "hvac", version, about = "HVAC sheet-metal pricing & market dashboard")]
pub struct Cli {
    /// Emit debug logs to stderr (RUST_LOG overrides).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Market overview: per-metric statistics, correlations, and a plot of one metric.
    Overview(OverviewArgs),
    /// Quote a catalog product (prompts for one when --product is omitted on a terminal).
    Quote(DashboardArgs),
    /// Sweep the margin range and show how the quoted price responds.
    Sensitivity(SensitivityArgs),
    /// Price over observed steel-cost x labor-rate ranges.
    Surface(SurfaceArgs),
    /// Split order volume into trend, seasonal and residual components.
    Decompose(DashboardArgs),
    /// Naive demand forecast for the coming days.
    Forecast(DashboardArgs),
    /// Compare the quoted price against competitors.
    Compete(DashboardArgs),
    /// List catalog products and their attributes.
    Catalog,
    /// Launch the interactive TUI.
    ///
    /// This uses the same underlying pipeline as the other commands, but renders
    /// results in a terminal UI using Ratatui.
    Tui(DashboardArgs),
}

/// Options shared by every session-based command.
///
/// Session options left unset fall back to `HVAC_*` environment variables, then
/// to built-in defaults.
#[derive(Debug, Args, Clone)]
pub struct DashboardArgs {
    /// Days of synthetic history to generate [env: HVAC_DAYS] [default: 365].
    #[arg(long, allow_negative_numbers = true)]
    pub days: Option<i64>,

    /// Seed for reproducible series [env: HVAC_SEED]; omitted means a fresh draw.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Last day of the series (YYYY-MM-DD) [default: today].
    #[arg(long, value_name = "DATE")]
    pub end_date: Option<NaiveDate>,

    /// Target margin in [0, 1) [env: HVAC_MARGIN] [default: 0.30].
    #[arg(short, long, allow_negative_numbers = true)]
    pub margin: Option<f64>,

    /// Volume discount in [0, 1] [env: HVAC_DISCOUNT] [default: 0.05].
    #[arg(long, allow_negative_numbers = true)]
    pub discount: Option<f64>,

    /// Catalog product to quote (exact name, case-insensitive).
    #[arg(short, long)]
    pub product: Option<String>,

    /// Attribute selection as NAME=VALUE (repeatable).
    #[arg(short = 'o', long = "option", value_name = "NAME=VALUE")]
    pub options: Vec<String>,

    /// Material cost per unit ($).
    #[arg(long, default_value_t = CostInputs::default().material_cost)]
    pub material_cost: f64,

    /// Labor hours per unit.
    #[arg(long, default_value_t = CostInputs::default().labor_hours)]
    pub labor_hours: f64,

    /// Overhead cost per unit ($).
    #[arg(long, default_value_t = CostInputs::default().overhead_cost)]
    pub overhead: f64,

    /// Competitor prices as A,B [default: 0.9x and 1.1x our price].
    #[arg(long, value_delimiter = ',', value_name = "A,B")]
    pub competitor_prices: Option<Vec<f64>>,

    /// Our quality score (1-10).
    #[arg(long, default_value_t = 8)]
    pub quality: u8,

    /// Competitor quality scores as A,B (1-10).
    #[arg(long, value_delimiter = ',', default_values_t = [7u8, 6u8], value_name = "A,B")]
    pub competitor_quality: Vec<u8>,

    /// Seasonal period (days) for the decomposition.
    #[arg(long, default_value_t = DECOMPOSITION_PERIOD)]
    pub period: usize,

    /// Forecast horizon (days).
    #[arg(long, default_value_t = FORECAST_HORIZON)]
    pub horizon: usize,

    /// Order-volume moving average window (days).
    #[arg(long, default_value_t = MOVING_AVERAGE_WINDOW)]
    pub window: usize,

    /// Disable terminal plots.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,
}

/// Options for `overview`.
#[derive(Debug, Args, Clone)]
pub struct OverviewArgs {
    #[command(flatten)]
    pub dashboard: DashboardArgs,

    /// Metric to plot.
    #[arg(long, value_enum, default_value_t = Metric::SteelCost)]
    pub metric: Metric,

    /// Export the generated series to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Export the full session snapshot to JSON.
    #[arg(long = "export-json", value_name = "JSON")]
    pub export_json: Option<PathBuf>,
}

/// Options for `sensitivity`.
#[derive(Debug, Args, Clone)]
pub struct SensitivityArgs {
    #[command(flatten)]
    pub dashboard: DashboardArgs,

    /// Print every N-th sweep point.
    #[arg(long, default_value_t = 10)]
    pub every: usize,
}

/// Options for `surface`.
#[derive(Debug, Args, Clone)]
pub struct SurfaceArgs {
    #[command(flatten)]
    pub dashboard: DashboardArgs,

    /// Export the surface grid to JSON.
    #[arg(long, value_name = "JSON")]
    pub export: Option<PathBuf>,

    /// Print a surface previously written with `--export` instead of computing one.
    #[arg(long, value_name = "JSON", conflicts_with = "export")]
    pub load: Option<PathBuf>,
}
