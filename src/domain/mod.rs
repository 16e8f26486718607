//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the synthetic market series (`Metric`, `MetricRecord`, `MetricSeries`)
//! - pricing inputs and outputs (`PricingInput`, `Quote`, `SensitivityCurve`, `CostSurface`)
//! - catalog records (`ProductCatalogEntry`, `Attribute`)
//! - analysis outputs (`Decomposition`, `DemandForecast`, `CompetitorAnalysis`)
//! - the session configuration (`DashboardConfig`)

pub mod types;

pub use types::*;
