//! Unit pricing from cost, margin and volume discount.
//!
//! ```text
//! price = base_cost / (1 - margin) * (1 - volume_discount)
//! ```
//!
//! The single-price formula is reused for the margin sensitivity curve (one
//! price per margin, everything else fixed) and the cost surface (one price per
//! material x labor grid cell).

use tracing::debug;

use crate::domain::{
    CostBreakdown, CostInputs, CostSurface, PricingInput, ProductCatalogEntry, Quote, Selections,
    SensitivityCurve,
};
use crate::error::AppError;

/// Price one unit.
///
/// Fails with a domain error when `margin` is not in `[0, 1)`, `volume_discount`
/// is not in `[0, 1]`, or `base_cost` is not a finite positive number.
pub fn price(base_cost: f64, margin: f64, volume_discount: f64) -> Result<f64, AppError> {
    if !(base_cost.is_finite() && base_cost > 0.0) {
        return Err(AppError::domain(format!(
            "Base cost must be a positive number (got {base_cost})."
        )));
    }
    // Written as a negated range check so NaN fails too.
    if !(0.0..1.0).contains(&margin) {
        return Err(AppError::domain(format!(
            "Margin must be in [0, 1) (got {margin}); price diverges as margin reaches 1."
        )));
    }
    if !(0.0..=1.0).contains(&volume_discount) {
        return Err(AppError::domain(format!(
            "Volume discount must be in [0, 1] (got {volume_discount})."
        )));
    }

    Ok(base_cost / (1.0 - margin) * (1.0 - volume_discount))
}

impl PricingInput {
    pub fn price(&self) -> Result<f64, AppError> {
        price(self.base_cost, self.margin, self.volume_discount)
    }
}

/// Price at each margin in `margins`, holding cost and discount fixed.
pub fn sweep_margin(
    base_cost: f64,
    margins: &[f64],
    volume_discount: f64,
) -> Result<SensitivityCurve, AppError> {
    let points = margins
        .iter()
        .map(|&m| price(base_cost, m, volume_discount).map(|p| (m, p)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SensitivityCurve {
        base_cost,
        volume_discount,
        points,
    })
}

/// Price over every `(material, labor)` pair, with `base_cost = material + labor + overhead`.
pub fn cost_surface(
    material_axis: &[f64],
    labor_axis: &[f64],
    overhead_cost: f64,
    margin: f64,
    volume_discount: f64,
) -> Result<CostSurface, AppError> {
    let mut prices = Vec::with_capacity(labor_axis.len());
    for &labor in labor_axis {
        let row = material_axis
            .iter()
            .map(|&material| price(material + labor + overhead_cost, margin, volume_discount))
            .collect::<Result<Vec<_>, _>>()?;
        prices.push(row);
    }

    Ok(CostSurface {
        material_axis: material_axis.to_vec(),
        labor_axis: labor_axis.to_vec(),
        prices,
        overhead_cost,
        margin,
        volume_discount,
    })
}

impl CostInputs {
    /// Check each entry against the bounds the dashboard offers.
    pub fn validate(&self) -> Result<(), AppError> {
        check_bounds("Material cost", self.material_cost, Self::MATERIAL_COST_RANGE)?;
        check_bounds("Labor hours", self.labor_hours, Self::LABOR_HOURS_RANGE)?;
        check_bounds("Overhead cost", self.overhead_cost, Self::OVERHEAD_COST_RANGE)?;
        Ok(())
    }

    /// Split into cost components, pricing labor at `labor_rate` per hour.
    pub fn breakdown(&self, labor_rate: f64) -> CostBreakdown {
        CostBreakdown {
            material: self.material_cost,
            labor: self.labor_hours * labor_rate,
            overhead: self.overhead_cost,
        }
    }
}

fn check_bounds(label: &str, value: f64, (lo, hi): (f64, f64)) -> Result<(), AppError> {
    if !(lo..=hi).contains(&value) {
        return Err(AppError::validation(format!(
            "{label} must be in [{lo}, {hi}] (got {value})."
        )));
    }
    Ok(())
}

/// Price a catalog product.
///
/// `selections` must already be resolved against `entry`
/// (see [`crate::data::resolve_selections`]).
pub fn quote(
    entry: &ProductCatalogEntry,
    selections: Selections,
    costs: &CostInputs,
    mean_labor_rate: f64,
    margin: f64,
    volume_discount: f64,
) -> Result<Quote, AppError> {
    costs.validate()?;
    if !(mean_labor_rate.is_finite() && mean_labor_rate > 0.0) {
        return Err(AppError::validation(format!(
            "Labor rate must be a positive number (got {mean_labor_rate})."
        )));
    }

    let breakdown = costs.breakdown(mean_labor_rate);
    let base_cost = breakdown.total();
    let unit_price = price(base_cost, margin, volume_discount)?;

    debug!(
        product = entry.name,
        base_cost,
        margin,
        volume_discount,
        price = unit_price,
        "computed quote"
    );

    Ok(Quote {
        product: entry.name.to_string(),
        unit: entry.unit,
        material: entry.material,
        selections,
        breakdown,
        mean_labor_rate,
        base_cost,
        margin,
        volume_discount,
        price: unit_price,
    })
}
