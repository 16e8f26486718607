//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the pricing/statistics code stays clean and testable
//! - output changes are localized (important for snapshot tests)

use nalgebra::DMatrix;

use crate::data::CATALOG;
use crate::domain::{
    CompetitorAnalysis, CostSurface, Decomposition, DemandForecast, Metric, MetricSeries, Quote,
    SensitivityCurve,
};
use crate::report::{HEADLINE_METRICS, MarketOverview};

/// Headline cards, per-metric table and order-volume trend.
pub fn format_overview(series: &MetricSeries, overview: &MarketOverview) -> String {
    let mut out = String::new();

    out.push_str("=== HVAC-PRO Market Overview ===\n");
    if let (Some(first), Some(last)) = (series.first_date(), series.last_date()) {
        out.push_str(&format!("Window: {first} .. {last} ({} days)\n", series.len()));
    }
    out.push('\n');

    for metric in HEADLINE_METRICS {
        if let Some(s) = overview.summary(metric) {
            out.push_str(&format!(
                "Avg. {:<17} ${:.2}{}  ({:+.2}%/day)\n",
                metric.display_name(),
                s.mean,
                per_unit(metric),
                s.mean_pct_change
            ));
        }
    }

    out.push_str("\nAll metrics:\n");
    out.push_str(&format!(
        "{:<18} {:>10} {:>10} {:>10} {:>10}\n",
        "metric", "mean", "min", "max", "chg %/d"
    ));
    out.push_str(&format!("{:-<18} {:-<10} {:-<10} {:-<10} {:-<10}\n", "", "", "", "", ""));
    for s in &overview.summaries {
        out.push_str(&format!(
            "{:<18} {:>10.3} {:>10.3} {:>10.3} {:>+10.3}\n",
            s.metric.display_name(),
            s.mean,
            s.min,
            s.max,
            s.mean_pct_change
        ));
    }

    let latest_ma = overview.order_moving_average.iter().rev().flatten().next();
    out.push_str(&format!(
        "\nOrder volume {}-day moving average (latest): {}\n",
        overview.moving_average_window,
        fmt_opt(latest_ma.copied(), 1)
    ));

    out
}

fn per_unit(metric: Metric) -> &'static str {
    match metric {
        Metric::OrderVolume => "",
        _ => metric.unit_label().trim_start_matches('$'),
    }
}

/// Correlation heatmap as a labelled table.
pub fn format_correlation(matrix: &DMatrix<f64>, metrics: &[Metric]) -> String {
    let mut out = String::new();
    out.push_str("Cost correlation (Pearson):\n");
    out.push_str(&format!("{:<18}", ""));
    for m in metrics {
        out.push_str(&format!(" {:>10}", truncate(m.display_name(), 10)));
    }
    out.push('\n');

    for (i, m) in metrics.iter().enumerate() {
        out.push_str(&format!("{:<18}", m.display_name()));
        for j in 0..metrics.len() {
            let v = matrix.get((i, j)).copied().unwrap_or(f64::NAN);
            out.push_str(&format!(" {:>10}", fmt_num(v, 3)));
        }
        out.push('\n');
    }
    out
}

/// Quote card with cost breakdown.
pub fn format_quote(quote: &Quote) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== {} ===\n", quote.product));
    out.push_str(&format!(
        "Material: {} | Unit: {}\n",
        quote.material.display_name(),
        quote.unit.label()
    ));
    for (name, value) in &quote.selections {
        out.push_str(&format!("- {name}: {value}\n"));
    }

    let total = quote.breakdown.total();
    out.push_str("\nCost breakdown:\n");
    for (label, value) in [
        ("Material", quote.breakdown.material),
        ("Labor", quote.breakdown.labor),
        ("Overhead", quote.breakdown.overhead),
    ] {
        out.push_str(&format!(
            "  {:<10} ${:>9.2}  {:>5.1}%\n",
            label,
            value,
            100.0 * value / total
        ));
    }
    out.push_str(&format!(
        "  (labor priced at mean rate ${:.2}/hr)\n",
        quote.mean_labor_rate
    ));

    out.push_str(&format!(
        "\nBase cost ${:.2} | margin {:.0}% | volume discount {:.0}%\n",
        quote.base_cost,
        quote.margin * 100.0,
        quote.volume_discount * 100.0
    ));
    out.push_str(&format!(
        "Calculated price: ${:.2}/{}\n",
        quote.price,
        quote.unit.label()
    ));
    out
}

/// Margin sweep table, thinned to every `every`-th point (plus the last).
pub fn format_sensitivity(curve: &SensitivityCurve, current_margin: f64, every: usize) -> String {
    let every = every.max(1);
    let mut out = String::new();
    out.push_str(&format!(
        "Price sensitivity (base cost ${:.2}, discount {:.0}%):\n",
        curve.base_cost,
        curve.volume_discount * 100.0
    ));
    out.push_str(&format!("{:>8} {:>12}\n", "margin", "price"));
    out.push_str(&format!("{:->8} {:->12}\n", "", ""));

    let last = curve.points.len().saturating_sub(1);
    for (i, &(m, p)) in curve.points.iter().enumerate() {
        if i % every != 0 && i != last {
            continue;
        }
        out.push_str(&format!("{:>7.1}% {:>12.2}\n", m * 100.0, p));
    }
    out.push_str(&format!("Current margin: {:.0}%\n", current_margin * 100.0));
    out
}

/// Corners and extremes of the cost surface.
pub fn format_surface(surface: &CostSurface) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Cost sensitivity surface ({} material x {} labor points):\n",
        surface.material_axis.len(),
        surface.labor_axis.len()
    ));
    out.push_str(&format!(
        "overhead ${:.2} | margin {:.0}% | discount {:.0}%\n",
        surface.overhead_cost,
        surface.margin * 100.0,
        surface.volume_discount * 100.0
    ));

    let (Some(&m0), Some(&m1), Some(&l0), Some(&l1)) = (
        surface.material_axis.first(),
        surface.material_axis.last(),
        surface.labor_axis.first(),
        surface.labor_axis.last(),
    ) else {
        out.push_str("(empty surface)\n");
        return out;
    };

    let corner = |j: usize, i: usize| {
        surface
            .prices
            .get(j)
            .and_then(|row| row.get(i))
            .copied()
            .unwrap_or(f64::NAN)
    };
    let (jl, il) = (surface.labor_axis.len() - 1, surface.material_axis.len() - 1);

    out.push_str(&format!("{:>16} {:>14} {:>14}\n", "", format!("mat {m0:.3}"), format!("mat {m1:.3}")));
    out.push_str(&format!(
        "{:>16} {:>14} {:>14}\n",
        format!("labor {l0:.2}"),
        fmt_num(corner(0, 0), 2),
        fmt_num(corner(0, il), 2)
    ));
    out.push_str(&format!(
        "{:>16} {:>14} {:>14}\n",
        format!("labor {l1:.2}"),
        fmt_num(corner(jl, 0), 2),
        fmt_num(corner(jl, il), 2)
    ));
    out
}

/// Decomposition summary: component ranges plus the seasonal profile.
pub fn format_decomposition(decomposition: &Decomposition) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Seasonal decomposition (additive, period {}):\n",
        decomposition.period
    ));

    let trend: Vec<f64> = decomposition.trend.iter().flatten().copied().collect();
    let resid: Vec<f64> = decomposition.residual.iter().flatten().copied().collect();

    for (label, values) in [
        ("Observed", decomposition.observed.as_slice()),
        ("Trend", trend.as_slice()),
        ("Seasonal", decomposition.seasonal.as_slice()),
        ("Residual", resid.as_slice()),
    ] {
        let (lo, hi) = crate::math::min_max(values).unwrap_or((f64::NAN, f64::NAN));
        out.push_str(&format!(
            "  {:<9} n={:<4} range=[{}, {}]\n",
            label,
            values.len(),
            fmt_num(lo, 2),
            fmt_num(hi, 2)
        ));
    }

    out.push_str("Seasonal profile (by phase):\n  ");
    let profile: Vec<String> = decomposition
        .seasonal
        .iter()
        .take(decomposition.period)
        .map(|v| format!("{v:+.1}"))
        .collect();
    out.push_str(&profile.join(" "));
    out.push('\n');
    out
}

/// Forecast table.
pub fn format_forecast(forecast: &DemandForecast) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Predicted demand after {} (naive draw within observed range):\n",
        forecast.today
    ));
    out.push_str(&format!("{:<12} {:>8}\n", "date", "orders"));
    out.push_str(&format!("{:-<12} {:->8}\n", "", ""));
    for p in &forecast.points {
        out.push_str(&format!("{:<12} {:>8.0}\n", p.date.to_string(), p.order_volume));
    }
    out
}

/// Market position and price-quality matrix.
pub fn format_competitors(analysis: &CompetitorAnalysis) -> String {
    let mut out = String::new();
    out.push_str("Market position:\n");
    out.push_str(&format!(
        "{:<14} {:>10} {:>8}\n",
        "", "price", "quality"
    ));
    for p in &analysis.matrix {
        out.push_str(&format!("{:<14} {:>10.2} {:>8}\n", p.label, p.price, p.quality));
    }
    out.push_str(&format!("\n{}\n", analysis.position.advice()));
    out
}

/// Catalog listing.
pub fn format_catalog() -> String {
    let mut out = String::new();
    for entry in CATALOG {
        out.push_str(&format!(
            "{} ({}, per {})\n",
            entry.name,
            entry.material.display_name(),
            entry.unit.label()
        ));
        for a in entry.attributes {
            out.push_str(&format!("  {:<10} {}\n", a.name, a.options.join(", ")));
        }
    }
    out
}

fn fmt_opt(v: Option<f64>, decimals: usize) -> String {
    v.map(|v| fmt_num(v, decimals)).unwrap_or_else(|| "-".to_string())
}

fn fmt_num(v: f64, decimals: usize) -> String {
    if v.is_finite() {
        format!("{v:.decimals$}")
    } else {
        "-".to_string()
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CompetitorPoint, CostBreakdown, Material, MarketPosition, Selections, UnitOfMeasure};

    #[test]
    fn quote_card_shows_price_per_unit() {
        let mut selections = Selections::new();
        selections.insert("diameter".to_string(), "8\"".to_string());
        let quote = Quote {
            product: "Round Pipes".to_string(),
            unit: UnitOfMeasure::LinearFt,
            material: Material::GalvanizedSteel,
            selections,
            breakdown: CostBreakdown { material: 1.0, labor: 25.0, overhead: 10.0 },
            mean_labor_rate: 25.0,
            base_cost: 36.0,
            margin: 0.3,
            volume_discount: 0.0,
            price: 36.0 / 0.7,
        };
        let txt = format_quote(&quote);
        assert!(txt.contains("=== Round Pipes ==="));
        assert!(txt.contains("- diameter: 8\""));
        assert!(txt.contains("Calculated price: $51.43/linear ft"));
    }

    #[test]
    fn sensitivity_table_keeps_endpoints() {
        let curve = SensitivityCurve {
            base_cost: 20.0,
            volume_discount: 0.0,
            points: vec![(0.1, 22.22), (0.2, 25.0), (0.3, 28.57), (0.5, 40.0)],
        };
        let txt = format_sensitivity(&curve, 0.3, 2);
        assert!(txt.contains("10.0%"));
        assert!(txt.contains("30.0%"));
        assert!(txt.contains("50.0%"));
        assert!(!txt.contains("20.0%"));
    }

    #[test]
    fn competitor_block_includes_advice() {
        let analysis = CompetitorAnalysis {
            position: MarketPosition::Competitive,
            matrix: vec![CompetitorPoint { label: "HVAC-PRO".to_string(), price: 10.0, quality: 8 }],
        };
        assert!(format_competitors(&analysis).contains("competitive in the market"));
    }

    #[test]
    fn truncate_marks_cut_labels() {
        assert_eq!(truncate("Electricity Cost", 10), "Electrici.");
        assert_eq!(truncate("Steel", 10), "Steel");
    }
}
