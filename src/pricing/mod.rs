//! Pricing: the unit-price formula, its sweeps, product quotes, and the
//! competitor comparison built on top of a quoted price.

pub mod calculator;
pub mod competitor;

pub use calculator::{cost_surface, price, quote, sweep_margin};
pub use competitor::{analyze as analyze_competitors, market_position};
