//! Top-level application orchestration.
//!
//! `src/main.rs` only maps errors to exit codes. Argument parsing, env
//! defaults, the pipeline run, report printing and exports all happen here.

use std::io::IsTerminal;

use clap::Parser;
use tracing::debug;

use crate::cli::{Command, DashboardArgs, OverviewArgs, SensitivityArgs, SurfaceArgs};
use crate::config::EnvDefaults;
use crate::data::validate_day_count;
use crate::domain::{
    CompetitorInputs, CostInputs, DEFAULT_DAYS, DEFAULT_MARGIN, DEFAULT_VOLUME_DISCOUNT, DashboardConfig, Metric,
    SeriesConfig,
};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `hvac` binary.
pub fn run() -> Result<(), AppError> {
    // We want `hvac` and `hvac --seed 7` to behave like `hvac tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing. This preserves a clean clap structure while
    // retaining the requested UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);
    crate::log::init_logging(cli.verbose);

    let env = EnvDefaults::load()?;
    debug!(?env, "environment defaults");

    match cli.command {
        Command::Overview(args) => handle_overview(args, &env),
        Command::Quote(args) => handle_quote(args, &env),
        Command::Sensitivity(args) => handle_sensitivity(args, &env),
        Command::Surface(args) => handle_surface(args, &env),
        Command::Decompose(args) => handle_decompose(args, &env),
        Command::Forecast(args) => handle_forecast(args, &env),
        Command::Compete(args) => handle_compete(args, &env),
        Command::Catalog => {
            println!("{}", crate::report::format_catalog());
            Ok(())
        }
        Command::Tui(args) => handle_tui(args, &env),
    }
}

fn handle_overview(args: OverviewArgs, env: &EnvDefaults) -> Result<(), AppError> {
    let config = dashboard_config_from_args(&args.dashboard, env)?;
    let run = pipeline::run_dashboard(&config)?;
    let session = &run.session;

    println!("{}", crate::report::format_overview(&session.series, &session.overview));
    println!(
        "{}",
        crate::report::format_correlation(&session.overview.correlation, &Metric::COSTS)
    );

    if !args.dashboard.no_plot {
        let moving_average =
            (args.metric == Metric::OrderVolume).then_some(session.overview.order_moving_average.as_slice());
        let plot = crate::plot::metric_plot(
            &session.series,
            args.metric,
            moving_average,
            args.dashboard.width,
            args.dashboard.height,
        );
        println!("{}", crate::plot::render_ascii_plot(&plot));
    }

    // Optional exports.
    if let Some(path) = &args.export {
        crate::io::write_series_csv(path, &session.series)?;
    }
    if let Some(path) = &args.export_json {
        crate::io::write_snapshot_json(path, &run, &config)?;
    }

    Ok(())
}

fn handle_quote(args: DashboardArgs, env: &EnvDefaults) -> Result<(), AppError> {
    let mut config = dashboard_config_from_args(&args, env)?;

    if args.product.is_none() && std::io::stdin().is_terminal() {
        let pick = crate::cli::picker::prompt_for_product()?;
        config.product = pick.product.name.to_string();
        // Flags still override what was picked.
        let mut selections = pick.selections;
        selections.extend(config.selections);
        config.selections = selections;
    }

    let run = pipeline::run_dashboard(&config)?;
    println!("{}", crate::report::format_quote(&run.pricing.quote));
    Ok(())
}

fn handle_sensitivity(args: SensitivityArgs, env: &EnvDefaults) -> Result<(), AppError> {
    let config = dashboard_config_from_args(&args.dashboard, env)?;
    let run = pipeline::run_dashboard(&config)?;
    let curve = &run.pricing.sensitivity;

    println!("{}", crate::report::format_sensitivity(curve, config.margin, args.every));

    if !args.dashboard.no_plot {
        let plot = crate::plot::sensitivity_plot(curve, config.margin, args.dashboard.width, args.dashboard.height);
        println!("{}", crate::plot::render_ascii_plot(&plot));
    }
    Ok(())
}

fn handle_surface(args: SurfaceArgs, env: &EnvDefaults) -> Result<(), AppError> {
    if let Some(path) = &args.load {
        println!("{}", saved_surface_report(path)?);
        return Ok(());
    }

    let config = dashboard_config_from_args(&args.dashboard, env)?;
    let run = pipeline::run_dashboard(&config)?;

    println!("{}", crate::report::format_surface(&run.pricing.surface));

    if let Some(path) = &args.export {
        crate::io::write_surface_json(path, &run.pricing.quote.product, &run.pricing.surface)?;
    }
    Ok(())
}

fn saved_surface_report(path: &std::path::Path) -> Result<String, AppError> {
    let saved = crate::io::read_surface_json(path)?;
    debug!(path = %path.display(), product = %saved.product, "loaded cost surface");
    Ok(format!(
        "Product: {} (saved by {})\n{}",
        saved.product,
        saved.tool,
        crate::report::format_surface(&saved.surface)
    ))
}

fn handle_decompose(args: DashboardArgs, env: &EnvDefaults) -> Result<(), AppError> {
    let config = dashboard_config_from_args(&args, env)?;
    let session = pipeline::start_session(&config)?;

    // Here the decomposition is the whole point, so its error ends the command.
    let decomposition = session.decomposition?;
    println!("{}", crate::report::format_decomposition(&decomposition));

    if !args.no_plot {
        for plot in crate::plot::decomposition_plots(&decomposition, args.width, args.height / 2) {
            println!("{}", crate::plot::render_ascii_plot(&plot));
        }
    }
    Ok(())
}

fn handle_forecast(args: DashboardArgs, env: &EnvDefaults) -> Result<(), AppError> {
    let config = dashboard_config_from_args(&args, env)?;
    let session = pipeline::start_session(&config)?;

    let forecast = session.forecast?;
    println!("{}", crate::report::format_forecast(&forecast));

    if !args.no_plot {
        let plot = crate::plot::forecast_plot(&session.series, &forecast, args.width, args.height);
        println!("{}", crate::plot::render_ascii_plot(&plot));
    }
    Ok(())
}

fn handle_compete(args: DashboardArgs, env: &EnvDefaults) -> Result<(), AppError> {
    let config = dashboard_config_from_args(&args, env)?;
    let run = pipeline::run_dashboard(&config)?;
    println!("{}", crate::report::format_competitors(&run.pricing.competitors));
    Ok(())
}

fn handle_tui(args: DashboardArgs, env: &EnvDefaults) -> Result<(), AppError> {
    let config = dashboard_config_from_args(&args, env)?;
    crate::tui::run(config)
}

/// Resolve flags against environment overrides and built-in defaults.
///
/// Precedence: CLI flag > environment > default.
pub fn dashboard_config_from_args(args: &DashboardArgs, env: &EnvDefaults) -> Result<DashboardConfig, AppError> {
    let days = validate_day_count(args.days.or(env.days).unwrap_or(DEFAULT_DAYS as i64))?;

    let competitor_prices = match args.competitor_prices.as_deref() {
        None => None,
        Some(&[a, b]) => Some([a, b]),
        Some(other) => {
            return Err(AppError::validation(format!(
                "--competitor-prices takes exactly two values (got {}).",
                other.len()
            )));
        }
    };
    let qualities = match args.competitor_quality.as_slice() {
        &[a, b] => [a, b],
        other => {
            return Err(AppError::validation(format!(
                "--competitor-quality takes exactly two values (got {}).",
                other.len()
            )));
        }
    };

    let defaults = DashboardConfig::default();
    Ok(DashboardConfig {
        series: SeriesConfig {
            days,
            end_date: args.end_date,
            seed: args.seed.or(env.seed),
        },
        margin: args.margin.or(env.margin).unwrap_or(DEFAULT_MARGIN),
        volume_discount: args
            .discount
            .or(env.volume_discount)
            .unwrap_or(DEFAULT_VOLUME_DISCOUNT),
        product: args.product.clone().unwrap_or(defaults.product),
        selections: crate::cli::picker::parse_selections(&args.options)?,
        costs: CostInputs {
            material_cost: args.material_cost,
            labor_hours: args.labor_hours,
            overhead_cost: args.overhead,
        },
        competitors: CompetitorInputs {
            prices: competitor_prices,
            our_quality: args.quality,
            qualities,
        },
        decomposition_period: args.period,
        forecast_horizon: args.horizon,
        moving_average_window: args.window,
        ..defaults
    })
}

/// Rewrite argv so `hvac` defaults to `hvac tui`.
///
/// Rules:
/// - `hvac`                      -> `hvac tui`
/// - `hvac --seed 7 ...`         -> `hvac tui --seed 7 ...`
/// - `hvac --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(
        arg1.as_str(),
        "overview" | "quote" | "sensitivity" | "surface" | "decompose" | "forecast" | "compete" | "catalog" | "tui"
    );
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use crate::error::ErrorKind;

    fn argv(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn dashboard_args(items: &[&str]) -> DashboardArgs {
        let mut full = vec!["hvac", "quote"];
        full.extend_from_slice(items);
        match Cli::parse_from(full).command {
            Command::Quote(args) => args,
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn bare_invocation_and_flags_go_to_tui() {
        assert_eq!(rewrite_args(argv(&["hvac"])), argv(&["hvac", "tui"]));
        assert_eq!(
            rewrite_args(argv(&["hvac", "--seed", "7"])),
            argv(&["hvac", "tui", "--seed", "7"])
        );
        assert_eq!(rewrite_args(argv(&["hvac", "--help"])), argv(&["hvac", "--help"]));
        assert_eq!(rewrite_args(argv(&["hvac", "quote"])), argv(&["hvac", "quote"]));
    }

    #[test]
    fn flags_beat_env_beats_defaults() {
        let env = EnvDefaults {
            days: Some(90),
            seed: Some(1),
            margin: Some(0.2),
            volume_discount: None,
        };

        let cfg = dashboard_config_from_args(&dashboard_args(&["--margin", "0.4"]), &env).unwrap();
        assert_eq!(cfg.series.days, 90);
        assert_eq!(cfg.series.seed, Some(1));
        assert_eq!(cfg.margin, 0.4);
        assert_eq!(cfg.volume_discount, DEFAULT_VOLUME_DISCOUNT);

        let cfg = dashboard_config_from_args(&dashboard_args(&[]), &EnvDefaults::default()).unwrap();
        assert_eq!(cfg.series.days, DEFAULT_DAYS);
        assert_eq!(cfg.series.seed, None);
        assert_eq!(cfg.margin, DEFAULT_MARGIN);
        assert_eq!(cfg.product, "Rectangular Duct");
    }

    #[test]
    fn bad_counts_are_validation_errors() {
        let env = EnvDefaults::default();
        for args in [
            dashboard_args(&["--days", "0"]),
            dashboard_args(&["--days", "-10"]),
            dashboard_args(&["--competitor-prices", "1,2,3"]),
            dashboard_args(&["--competitor-quality", "5"]),
            dashboard_args(&["-o", "thickness"]),
        ] {
            let err = dashboard_config_from_args(&args, &env).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation);
        }
    }

    #[test]
    fn env_days_are_validated_too() {
        let env = EnvDefaults {
            days: Some(-1),
            ..EnvDefaults::default()
        };
        let err = dashboard_config_from_args(&dashboard_args(&[]), &env).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn saved_surface_is_reported_without_a_new_session() {
        let config = DashboardConfig {
            series: SeriesConfig {
                days: 60,
                end_date: chrono::NaiveDate::from_ymd_opt(2025, 1, 31),
                seed: Some(8),
            },
            surface_steps: 4,
            ..DashboardConfig::default()
        };
        let run = pipeline::run_dashboard(&config).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("surface.json");
        crate::io::write_surface_json(&path, &run.pricing.quote.product, &run.pricing.surface).unwrap();

        let report = saved_surface_report(&path).unwrap();
        assert!(report.starts_with("Product: Rectangular Duct (saved by hvac)"));
        assert!(report.contains("4 material x 4 labor points"));

        let err = saved_surface_report(&dir.path().join("missing.json")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }
}
