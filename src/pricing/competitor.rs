//! Market position against competitor prices and the price-quality matrix.

use crate::domain::{CompetitorAnalysis, CompetitorInputs, CompetitorPoint, MarketPosition};
use crate::error::AppError;

/// Quality scores are whole numbers on this scale.
pub const QUALITY_RANGE: (u8, u8) = (1, 10);

/// Competitor prices relative to ours when none are given.
pub const DEFAULT_COMPETITOR_FACTORS: [f64; 2] = [0.9, 1.1];

const OUR_LABEL: &str = "HVAC-PRO";

/// Classify `ours` against the competitors' prices.
pub fn market_position(ours: f64, competitors: &[f64]) -> Result<MarketPosition, AppError> {
    if competitors.is_empty() {
        return Err(AppError::validation("At least one competitor price is required."));
    }
    if let Some(bad) = competitors.iter().find(|p| !(p.is_finite() && **p >= 0.0)) {
        return Err(AppError::validation(format!(
            "Competitor prices must be non-negative numbers (got {bad})."
        )));
    }

    let lo = competitors.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = competitors.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    Ok(if ours < lo {
        MarketPosition::Competitive
    } else if ours > hi {
        MarketPosition::AboveMarket
    } else {
        MarketPosition::WithinRange
    })
}

/// Resolve competitor prices, falling back to fixed multiples of our price.
pub fn competitor_prices(ours: f64, inputs: &CompetitorInputs) -> [f64; 2] {
    inputs
        .prices
        .unwrap_or(DEFAULT_COMPETITOR_FACTORS.map(|f| ours * f))
}

/// Full competitor view: position plus the price-quality matrix.
pub fn analyze(ours: f64, inputs: &CompetitorInputs) -> Result<CompetitorAnalysis, AppError> {
    check_quality(OUR_LABEL, inputs.our_quality)?;
    for (i, &q) in inputs.qualities.iter().enumerate() {
        check_quality(&competitor_label(i), q)?;
    }

    let prices = competitor_prices(ours, inputs);
    let position = market_position(ours, &prices)?;

    let mut matrix = Vec::with_capacity(prices.len() + 1);
    matrix.push(CompetitorPoint {
        label: OUR_LABEL.to_string(),
        price: ours,
        quality: inputs.our_quality,
    });
    for (i, (&price, &quality)) in prices.iter().zip(&inputs.qualities).enumerate() {
        matrix.push(CompetitorPoint {
            label: competitor_label(i),
            price,
            quality,
        });
    }

    Ok(CompetitorAnalysis { position, matrix })
}

fn competitor_label(index: usize) -> String {
    format!("Competitor {}", index + 1)
}

fn check_quality(label: &str, score: u8) -> Result<(), AppError> {
    let (lo, hi) = QUALITY_RANGE;
    if !(lo..=hi).contains(&score) {
        return Err(AppError::validation(format!(
            "{label} quality score must be in {lo}..={hi} (got {score})."
        )));
    }
    Ok(())
}
