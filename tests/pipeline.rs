//! End-to-end runs through the library API: config -> pipeline -> exports.

use chrono::NaiveDate;
use hvac_pricing::app::pipeline::{price_session, run_dashboard, start_session};
use hvac_pricing::domain::{CompetitorInputs, DashboardConfig, MarketPosition, Metric, SeriesConfig};
use hvac_pricing::error::ErrorKind;
use hvac_pricing::io::{SERIES_CSV_HEADER, write_series_csv, write_snapshot_json};
use hvac_pricing::pricing::price;
use test_log::test;

fn seeded(days: usize) -> DashboardConfig {
    DashboardConfig {
        series: SeriesConfig {
            days,
            end_date: NaiveDate::from_ymd_opt(2025, 12, 31),
            seed: Some(42),
        },
        ..DashboardConfig::default()
    }
}

#[test]
fn year_long_session_end_to_end() {
    let config = seeded(365);
    let run = run_dashboard(&config).unwrap();
    let series = &run.session.series;

    assert_eq!(series.len(), 365);
    assert_eq!(series.first_date(), NaiveDate::from_ymd_opt(2025, 1, 1));
    assert!(series.column(Metric::OrderVolume).iter().all(|v| *v >= 0.0));

    let d = run.session.decomposition.as_ref().unwrap();
    assert_eq!(d.observed.len(), 365);
    let cycle: f64 = d.seasonal[..d.period].iter().sum();
    assert!(cycle.abs() < 1e-9);

    let q = &run.pricing.quote;
    assert!((q.price - price(q.base_cost, 0.3, 0.05).unwrap()).abs() < 1e-12);

    let sweep = &run.pricing.sensitivity.points;
    assert!(sweep.windows(2).all(|w| w[1].1 > w[0].1));
    assert!((sweep[0].0 - 0.1).abs() < 1e-12);
    assert!((sweep[sweep.len() - 1].0 - 0.5).abs() < 1e-12);

    let f = run.session.forecast.as_ref().unwrap();
    assert_eq!(f.today, NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());
    assert_eq!(f.points[0].date, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
}

#[test]
fn explicit_competitor_prices_drive_position() {
    let config = DashboardConfig {
        competitors: CompetitorInputs {
            prices: Some([1.0, 2.0]),
            ..CompetitorInputs::default()
        },
        ..seeded(60)
    };
    let run = run_dashboard(&config).unwrap();
    assert_eq!(run.pricing.competitors.position, MarketPosition::AboveMarket);
    assert_eq!(run.pricing.competitors.matrix.len(), 3);
}

#[test]
fn invalid_selection_is_rejected_without_touching_the_series() {
    let config = seeded(60);
    let session = start_session(&config).unwrap();

    let mut bad = config.clone();
    bad.selections.insert("thickness".to_string(), "18 ga".to_string());
    let err = price_session(&session, &bad).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(err.message().contains("18 ga"));

    assert!(price_session(&session, &config).is_ok());
}

#[test]
fn exports_land_on_disk() {
    let config = seeded(45);
    let run = run_dashboard(&config).unwrap();
    let dir = tempfile::tempdir().unwrap();

    let csv = dir.path().join("series.csv");
    write_series_csv(&csv, &run.session.series).unwrap();
    let text = std::fs::read_to_string(&csv).unwrap();
    assert_eq!(text.lines().next(), Some(SERIES_CSV_HEADER));
    assert_eq!(text.lines().count(), 46);

    let json = dir.path().join("snapshot.json");
    write_snapshot_json(&json, &run, &config).unwrap();
    let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&json).unwrap()).unwrap();
    assert_eq!(value["quote"]["product"], "Rectangular Duct");
}
