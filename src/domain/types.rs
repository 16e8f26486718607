//! Shared domain types.
//!
//! Plain serde structs, recomputed per session and shared by the CLI
//! reports, the TUI and the JSON/CSV exports.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Days in the synthetic series when nothing else is requested.
pub const DEFAULT_DAYS: usize = 365;
/// Target profit margin used by the dashboard on start-up.
pub const DEFAULT_MARGIN: f64 = 0.3;
/// Volume discount used by the dashboard on start-up.
pub const DEFAULT_VOLUME_DISCOUNT: f64 = 0.05;
/// Margin range offered by the dashboard controls (and swept by the sensitivity curve).
pub const MARGIN_RANGE: (f64, f64) = (0.1, 0.5);
/// Volume discount range offered by the dashboard controls.
pub const VOLUME_DISCOUNT_RANGE: (f64, f64) = (0.0, 0.2);
/// Slider step for margin and discount.
pub const RATE_STEP: f64 = 0.01;
/// Seasonal period (days) used for the order-volume decomposition.
pub const DECOMPOSITION_PERIOD: usize = 30;
/// Days of predicted demand after the last observation.
pub const FORECAST_HORIZON: usize = 30;
/// Window of the order-volume moving average.
pub const MOVING_AVERAGE_WINDOW: usize = 30;
/// Points on the margin sensitivity curve.
pub const SENSITIVITY_STEPS: usize = 100;
/// Points per axis of the cost-sensitivity surface.
pub const SURFACE_STEPS: usize = 100;

/// One column of the synthetic market series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    SteelCost,
    AluminumCost,
    FiberglassCost,
    LaborRate,
    ElectricityCost,
    OrderVolume,
}

impl Metric {
    pub const ALL: [Metric; 6] = [
        Metric::SteelCost,
        Metric::AluminumCost,
        Metric::FiberglassCost,
        Metric::LaborRate,
        Metric::ElectricityCost,
        Metric::OrderVolume,
    ];

    /// The cost metrics compared in the correlation heatmap.
    pub const COSTS: [Metric; 5] = [
        Metric::SteelCost,
        Metric::AluminumCost,
        Metric::FiberglassCost,
        Metric::LaborRate,
        Metric::ElectricityCost,
    ];

    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            Metric::SteelCost => "Steel Cost",
            Metric::AluminumCost => "Aluminum Cost",
            Metric::FiberglassCost => "Fiberglass Cost",
            Metric::LaborRate => "Labor Rate",
            Metric::ElectricityCost => "Electricity Cost",
            Metric::OrderVolume => "Order Volume",
        }
    }

    /// Column name used in CSV exports.
    pub fn column(self) -> &'static str {
        match self {
            Metric::SteelCost => "steel_cost",
            Metric::AluminumCost => "aluminum_cost",
            Metric::FiberglassCost => "fiberglass_cost",
            Metric::LaborRate => "labor_rate",
            Metric::ElectricityCost => "electricity_cost",
            Metric::OrderVolume => "order_volume",
        }
    }

    pub fn unit_label(self) -> &'static str {
        match self {
            Metric::SteelCost | Metric::AluminumCost | Metric::FiberglassCost => "$/lb",
            Metric::LaborRate => "$/hr",
            Metric::ElectricityCost => "$/kWh",
            Metric::OrderVolume => "orders",
        }
    }
}

/// One day of synthetic market data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    pub date: NaiveDate,
    pub steel_cost: f64,
    pub aluminum_cost: f64,
    pub fiberglass_cost: f64,
    pub labor_rate: f64,
    pub electricity_cost: f64,
    /// Orders per day. Integer draw plus a fractional seasonal term, never negative.
    pub order_volume: f64,
}

impl MetricRecord {
    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::SteelCost => self.steel_cost,
            Metric::AluminumCost => self.aluminum_cost,
            Metric::FiberglassCost => self.fiberglass_cost,
            Metric::LaborRate => self.labor_rate,
            Metric::ElectricityCost => self.electricity_cost,
            Metric::OrderVolume => self.order_volume,
        }
    }
}

/// Daily records, oldest first, one per calendar day with no gaps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricSeries {
    pub records: Vec<MetricRecord>,
}

impl MetricSeries {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.records.iter().map(|r| r.date).collect()
    }

    pub fn column(&self, metric: Metric) -> Vec<f64> {
        self.records.iter().map(|r| r.value(metric)).collect()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.records.first().map(|r| r.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.records.last().map(|r| r.date)
    }
}

/// How a session's series is generated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesConfig {
    pub days: usize,
    /// Last (inclusive) date of the series. `None` means today (local time).
    pub end_date: Option<NaiveDate>,
    /// Seed for reproducible runs. `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for SeriesConfig {
    fn default() -> Self {
        Self {
            days: DEFAULT_DAYS,
            end_date: None,
            seed: None,
        }
    }
}

/// Inputs of the pricing formula.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingInput {
    /// Material + labor + overhead, per unit.
    pub base_cost: f64,
    /// Fraction of the price that is profit, in `[0, 1)`.
    pub margin: f64,
    /// Multiplicative price reduction after margin, in `[0, 1]`.
    pub volume_discount: f64,
}

/// Per-unit cost entries for a product quote.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostInputs {
    pub material_cost: f64,
    pub labor_hours: f64,
    pub overhead_cost: f64,
}

impl CostInputs {
    pub const MATERIAL_COST_RANGE: (f64, f64) = (0.5, 5.0);
    pub const LABOR_HOURS_RANGE: (f64, f64) = (0.5, 10.0);
    pub const OVERHEAD_COST_RANGE: (f64, f64) = (5.0, 50.0);
}

impl Default for CostInputs {
    fn default() -> Self {
        Self {
            material_cost: 1.0,
            labor_hours: 1.0,
            overhead_cost: 10.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitOfMeasure {
    #[serde(rename = "sq ft")]
    SqFt,
    #[serde(rename = "linear ft")]
    LinearFt,
    #[serde(rename = "piece")]
    Piece,
}

impl UnitOfMeasure {
    pub fn label(self) -> &'static str {
        match self {
            UnitOfMeasure::SqFt => "sq ft",
            UnitOfMeasure::LinearFt => "linear ft",
            UnitOfMeasure::Piece => "piece",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Material {
    GalvanizedSteel,
    Aluminum,
    Fiberglass,
}

impl Material {
    pub fn display_name(self) -> &'static str {
        match self {
            Material::GalvanizedSteel => "Galvanized Steel",
            Material::Aluminum => "Aluminum",
            Material::Fiberglass => "Fiberglass",
        }
    }
}

/// A named product attribute with its allowed values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attribute {
    pub name: &'static str,
    pub options: &'static [&'static str],
}

impl Attribute {
    pub fn allows(&self, value: &str) -> bool {
        self.options.contains(&value)
    }
}

/// Static reference data for one product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductCatalogEntry {
    pub name: &'static str,
    pub unit: UnitOfMeasure,
    pub material: Material,
    pub attributes: &'static [Attribute],
}

impl ProductCatalogEntry {
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name.eq_ignore_ascii_case(name))
    }
}

/// Attribute name -> chosen option.
pub type Selections = BTreeMap<String, String>;

/// Cost components of a quote (labor already multiplied out).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub material: f64,
    pub labor: f64,
    pub overhead: f64,
}

impl CostBreakdown {
    pub fn total(&self) -> f64 {
        self.material + self.labor + self.overhead
    }
}

/// A priced product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub product: String,
    pub unit: UnitOfMeasure,
    pub material: Material,
    pub selections: Selections,
    pub breakdown: CostBreakdown,
    pub mean_labor_rate: f64,
    pub base_cost: f64,
    pub margin: f64,
    pub volume_discount: f64,
    pub price: f64,
}

/// Price as a function of margin, other inputs held fixed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityCurve {
    pub base_cost: f64,
    pub volume_discount: f64,
    /// `(margin, price)` pairs in margin order.
    pub points: Vec<(f64, f64)>,
}

/// Price over a grid of material cost x labor rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostSurface {
    pub material_axis: Vec<f64>,
    pub labor_axis: Vec<f64>,
    /// `prices[j][i]` is the price at `labor_axis[j]`, `material_axis[i]`.
    pub prices: Vec<Vec<f64>>,
    pub overhead_cost: f64,
    pub margin: f64,
    pub volume_discount: f64,
}

/// Additive split of a series into trend, seasonal and residual parts.
///
/// `trend` and `residual` are undefined for the first and last half-period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decomposition {
    pub period: usize,
    pub observed: Vec<f64>,
    pub trend: Vec<Option<f64>>,
    pub seasonal: Vec<f64>,
    pub residual: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub order_volume: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandForecast {
    /// Last observed date ("today" on the chart).
    pub today: NaiveDate,
    pub points: Vec<ForecastPoint>,
}

/// Where our price sits relative to the competitors'.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketPosition {
    /// Strictly below every competitor.
    Competitive,
    /// Strictly above every competitor.
    AboveMarket,
    WithinRange,
}

impl MarketPosition {
    pub fn advice(self) -> &'static str {
        match self {
            MarketPosition::Competitive => "Your price is competitive in the market!",
            MarketPosition::AboveMarket => {
                "Your price is higher than competitors. Consider adjusting your margins or reducing costs."
            }
            MarketPosition::WithinRange => "Your price is within the competitive range.",
        }
    }
}

/// One point of the price-quality matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitorPoint {
    pub label: String,
    pub price: f64,
    pub quality: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitorAnalysis {
    pub position: MarketPosition,
    /// Ours first, then competitors in input order.
    pub matrix: Vec<CompetitorPoint>,
}

/// Average level and mean daily % change of one metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    pub metric: Metric,
    pub mean: f64,
    pub mean_pct_change: f64,
    pub min: f64,
    pub max: f64,
}

/// Competitor inputs. Prices default to 0.9x / 1.1x our price when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitorInputs {
    pub prices: Option<[f64; 2]>,
    pub our_quality: u8,
    pub qualities: [u8; 2],
}

impl Default for CompetitorInputs {
    fn default() -> Self {
        Self {
            prices: None,
            our_quality: 8,
            qualities: [7, 6],
        }
    }
}

/// A full session's configuration as understood by the pipeline.
///
/// This is derived from CLI flags, environment overrides, and defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    pub series: SeriesConfig,
    pub margin: f64,
    pub volume_discount: f64,
    pub product: String,
    pub selections: Selections,
    pub costs: CostInputs,
    pub competitors: CompetitorInputs,
    pub decomposition_period: usize,
    pub forecast_horizon: usize,
    pub moving_average_window: usize,
    pub sensitivity_steps: usize,
    pub surface_steps: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            series: SeriesConfig::default(),
            margin: DEFAULT_MARGIN,
            volume_discount: DEFAULT_VOLUME_DISCOUNT,
            product: "Rectangular Duct".to_string(),
            selections: Selections::new(),
            costs: CostInputs::default(),
            competitors: CompetitorInputs::default(),
            decomposition_period: DECOMPOSITION_PERIOD,
            forecast_horizon: FORECAST_HORIZON,
            moving_average_window: MOVING_AVERAGE_WINDOW,
            sensitivity_steps: SENSITIVITY_STEPS,
            surface_steps: SURFACE_STEPS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(day: u32, steel: f64) -> MetricRecord {
        MetricRecord {
            date: NaiveDate::from_ymd_opt(2025, 1, day).unwrap(),
            steel_cost: steel,
            aluminum_cost: 1.2,
            fiberglass_cost: 0.4,
            labor_rate: 25.0,
            electricity_cost: 0.15,
            order_volume: 200.0,
        }
    }

    #[test]
    fn column_extracts_in_date_order() {
        let series = MetricSeries {
            records: vec![record(1, 0.6), record(2, 0.7), record(3, 0.8)],
        };
        assert_eq!(series.column(Metric::SteelCost), vec![0.6, 0.7, 0.8]);
        assert_eq!(series.first_date(), NaiveDate::from_ymd_opt(2025, 1, 1));
        assert_eq!(series.last_date(), NaiveDate::from_ymd_opt(2025, 1, 3));
    }

    #[test]
    fn unit_labels_match_catalog_wording() {
        assert_eq!(UnitOfMeasure::SqFt.label(), "sq ft");
        assert_eq!(UnitOfMeasure::LinearFt.label(), "linear ft");
        assert_eq!(UnitOfMeasure::Piece.label(), "piece");
    }
}
