//! Data sources: the synthetic market series, the static product catalog, and
//! the naive demand forecast drawn from the series.

pub mod catalog;
pub mod forecast;
pub mod sample;

pub use catalog::{CATALOG, default_selections, find_product, require_product, resolve_selections};
pub use forecast::forecast_demand;
pub use sample::{generate_series, session_rng, validate_day_count};
