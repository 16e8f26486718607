//! Ratatui-based terminal dashboard.
//!
//! Five tabs cover the market overview, product pricing, cost analysis, demand
//! forecasting and competitor analysis. The pricing controls live on the
//! Product Pricing tab; every adjustment reprices against the same generated
//! series, and `r` draws a new one.

use std::io;
use std::time::Duration;

use chrono::NaiveDate;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs},
};
use tracing::{debug, warn};

use crate::app::pipeline::{RunOutput, price_session, run_dashboard};
use crate::data::{CATALOG, require_product};
use crate::domain::{
    CostInputs, DashboardConfig, MARGIN_RANGE, Metric, RATE_STEP, VOLUME_DISCOUNT_RANGE,
};
use crate::error::AppError;
use crate::pricing::competitor::QUALITY_RANGE;
use crate::report::HEADLINE_METRICS;

mod plotters_chart;

use plotters_chart::{CYAN, ChartDots, ChartLine, DashboardChart, GREEN, MAGENTA, RED, YELLOW, chart_bounds};

/// Start the TUI.
pub fn run(config: DashboardConfig) -> Result<(), AppError> {
    // Bad inputs should fail before the terminal is switched into raw mode.
    let run = run_dashboard(&config)?;
    let mut app = App::new(config, run);

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::terminal(format!("Failed to initialize terminal: {e}")))?;

    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::terminal(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::terminal(format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Overview,
    Pricing,
    Costs,
    Forecast,
    Competitors,
}

impl Tab {
    const ALL: [Tab; 5] = [Tab::Overview, Tab::Pricing, Tab::Costs, Tab::Forecast, Tab::Competitors];

    fn title(self) -> &'static str {
        match self {
            Tab::Overview => "Market Overview",
            Tab::Pricing => "Product Pricing",
            Tab::Costs => "Cost Analysis",
            Tab::Forecast => "Demand Forecasting",
            Tab::Competitors => "Competitor Analysis",
        }
    }

    fn index(self) -> usize {
        Tab::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    fn shifted(self, delta: isize) -> Tab {
        let n = Tab::ALL.len() as isize;
        Tab::ALL[(self.index() as isize + delta).rem_euclid(n) as usize]
    }
}

/// One adjustable control on the pricing tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Product,
    Attribute(usize),
    Margin,
    Discount,
    MaterialCost,
    LaborHours,
    Overhead,
}

struct App {
    config: DashboardConfig,
    run: RunOutput,
    tab: Tab,
    selected_field: usize,
    overview_metric: Metric,
    status: String,
}

impl App {
    fn new(config: DashboardConfig, run: RunOutput) -> Self {
        let status = match &config.series.seed {
            Some(seed) => format!("Generated {} days (seed {seed}).", run.session.series.len()),
            None => format!("Generated {} days.", run.session.series.len()),
        };
        Self {
            config,
            run,
            tab: Tab::Overview,
            selected_field: 0,
            overview_metric: Metric::SteelCost,
            status,
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::terminal(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::terminal(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::terminal(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the user asked to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Tab => self.tab = self.tab.shifted(1),
            KeyCode::BackTab => self.tab = self.tab.shifted(-1),
            KeyCode::Char(c @ '1'..='5') => {
                let idx = c as usize - '1' as usize;
                self.tab = Tab::ALL[idx];
            }
            KeyCode::Up => {
                if self.selected_field > 0 {
                    self.selected_field -= 1;
                }
            }
            KeyCode::Down => {
                if self.selected_field + 1 < self.fields().len() {
                    self.selected_field += 1;
                }
            }
            KeyCode::Left => self.adjust_field(-1),
            KeyCode::Right => self.adjust_field(1),
            KeyCode::Char('m') => {
                let idx = Metric::ALL.iter().position(|m| *m == self.overview_metric).unwrap_or(0);
                self.overview_metric = Metric::ALL[(idx + 1) % Metric::ALL.len()];
                self.status = format!("chart: {}", self.overview_metric.display_name());
            }
            KeyCode::Char('r') => self.regenerate(),
            KeyCode::Char('d') => match crate::debug::write_debug_bundle(&self.run, &self.config) {
                Ok(path) => {
                    self.status = format!("Wrote debug bundle: {}", path.display());
                }
                Err(err) => {
                    self.status = format!("Debug write failed: {err}");
                }
            },
            _ => {}
        }

        false
    }

    fn fields(&self) -> Vec<Field> {
        let attributes = require_product(&self.config.product)
            .map(|p| p.attributes.len())
            .unwrap_or(0);

        let mut fields = vec![Field::Product];
        fields.extend((0..attributes).map(Field::Attribute));
        fields.extend([
            Field::Margin,
            Field::Discount,
            Field::MaterialCost,
            Field::LaborHours,
            Field::Overhead,
        ]);
        fields
    }

    fn adjust_field(&mut self, delta: i32) {
        if self.tab != Tab::Pricing {
            return;
        }
        let Some(&field) = self.fields().get(self.selected_field) else {
            return;
        };

        let mut next = self.config.clone();
        let d = f64::from(delta);
        match field {
            Field::Product => {
                let idx = CATALOG
                    .iter()
                    .position(|p| p.name == self.run.pricing.quote.product)
                    .unwrap_or(0);
                let n = CATALOG.len() as i32;
                let idx = (idx as i32 + delta).rem_euclid(n) as usize;
                next.product = CATALOG[idx].name.to_string();
                next.selections.clear();
            }
            Field::Attribute(i) => {
                let Ok(entry) = require_product(&self.config.product) else {
                    return;
                };
                let Some(attribute) = entry.attributes.get(i) else {
                    return;
                };
                let current = self.run.pricing.quote.selections.get(attribute.name);
                let idx = attribute
                    .options
                    .iter()
                    .position(|o| Some(*o) == current.map(String::as_str))
                    .unwrap_or(0);
                let n = attribute.options.len() as i32;
                let idx = (idx as i32 + delta).rem_euclid(n) as usize;
                next.selections
                    .insert(attribute.name.to_string(), attribute.options[idx].to_string());
            }
            Field::Margin => next.margin = step(next.margin, d * RATE_STEP, MARGIN_RANGE),
            Field::Discount => {
                next.volume_discount = step(next.volume_discount, d * RATE_STEP, VOLUME_DISCOUNT_RANGE)
            }
            Field::MaterialCost => {
                next.costs.material_cost =
                    step(next.costs.material_cost, d * 0.1, CostInputs::MATERIAL_COST_RANGE)
            }
            Field::LaborHours => {
                next.costs.labor_hours = step(next.costs.labor_hours, d * 0.5, CostInputs::LABOR_HOURS_RANGE)
            }
            Field::Overhead => {
                next.costs.overhead_cost =
                    step(next.costs.overhead_cost, d, CostInputs::OVERHEAD_COST_RANGE)
            }
        }

        self.reprice(next);
        self.selected_field = self.selected_field.min(self.fields().len().saturating_sub(1));
    }

    fn reprice(&mut self, next: DashboardConfig) {
        match price_session(&self.run.session, &next) {
            Ok(pricing) => {
                self.status = format!("{}: ${:.2}", pricing.quote.product, pricing.quote.price);
                self.run.pricing = pricing;
                self.config = next;
            }
            Err(err) => {
                warn!(error = %err, "repricing rejected");
                self.status = err.to_string();
            }
        }
    }

    /// Draw a new series (next seed when seeded, fresh entropy otherwise).
    fn regenerate(&mut self) {
        let mut next = self.config.clone();
        next.series.seed = next.series.seed.map(|s| s.wrapping_add(1));

        match run_dashboard(&next) {
            Ok(run) => {
                debug!(seed = ?next.series.seed, "regenerated series");
                self.status = match next.series.seed {
                    Some(seed) => format!("Regenerated series (seed {seed})."),
                    None => "Regenerated series.".to_string(),
                };
                self.run = run;
                self.config = next;
            }
            Err(err) => {
                self.status = format!("Regeneration failed: {err}");
            }
        }
    }

    fn draw(&self, frame: &mut Frame<'_>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(frame.area());

        self.draw_header(frame, chunks[0]);
        self.draw_tabs(frame, chunks[1]);
        match self.tab {
            Tab::Overview => self.draw_overview(frame, chunks[2]),
            Tab::Pricing => self.draw_pricing(frame, chunks[2]),
            Tab::Costs => self.draw_costs(frame, chunks[2]),
            Tab::Forecast => self.draw_forecast(frame, chunks[2]),
            Tab::Competitors => self.draw_competitors(frame, chunks[2]),
        }
        self.draw_footer(frame, chunks[3]);
    }

    fn draw_header(&self, frame: &mut Frame<'_>, area: Rect) {
        let series = &self.run.session.series;
        let q = &self.run.pricing.quote;
        let window = match (series.first_date(), series.last_date()) {
            (Some(a), Some(b)) => format!("{a} .. {b}"),
            _ => "-".to_string(),
        };
        let seed = self
            .config
            .series
            .seed
            .map(|s| s.to_string())
            .unwrap_or_else(|| "none".to_string());

        let lines = vec![
            Line::from(vec![
                Span::styled("HVAC-PRO", Style::default().fg(Color::Cyan)),
                Span::raw(" | sheet-metal pricing & market dashboard"),
            ]),
            Line::from(Span::styled(
                format!(
                    "series: {} days, {window} | seed: {seed} | {}: ${:.2} / {}",
                    series.len(),
                    q.product,
                    q.price,
                    q.unit.label()
                ),
                Style::default().fg(Color::Gray),
            )),
        ];

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_tabs(&self, frame: &mut Frame<'_>, area: Rect) {
        let titles: Vec<String> = Tab::ALL
            .iter()
            .enumerate()
            .map(|(i, t)| format!("{} {}", i + 1, t.title()))
            .collect();
        let tabs = Tabs::new(titles)
            .select(self.tab.index())
            .block(Block::default().borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White));
        frame.render_widget(tabs, area);
    }

    fn draw_overview(&self, frame: &mut Frame<'_>, area: Rect) {
        let session = &self.run.session;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(8)])
            .split(area);

        let cards = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 3); 3])
            .split(chunks[0]);
        for (metric, rect) in HEADLINE_METRICS.iter().zip(cards.iter()) {
            let Some(s) = session.overview.summary(*metric) else {
                continue;
            };
            let color = if s.mean_pct_change >= 0.0 { Color::Green } else { Color::Red };
            let text = Text::from(vec![
                Line::from(format!("{:.2} {}", s.mean, metric.unit_label())),
                Line::from(Span::styled(
                    format!("{:+.2}% / day", s.mean_pct_change),
                    Style::default().fg(color),
                )),
            ]);
            let card = Paragraph::new(text).block(
                Block::default()
                    .title(format!("Avg. {}", metric.display_name()))
                    .borders(Borders::ALL),
            );
            frame.render_widget(card, *rect);
        }

        let origin = session.series.first_date();
        let values: Vec<(f64, f64)> = session
            .series
            .records
            .iter()
            .enumerate()
            .map(|(i, r)| (i as f64, r.value(self.overview_metric)))
            .collect();
        let mut lines = vec![ChartLine {
            points: values,
            color: CYAN,
        }];
        if self.overview_metric == Metric::OrderVolume {
            lines.push(ChartLine {
                points: session
                    .overview
                    .order_moving_average
                    .iter()
                    .enumerate()
                    .filter_map(|(i, v)| v.map(|v| (i as f64, v)))
                    .collect(),
                color: YELLOW,
            });
        }
        let (x_bounds, y_bounds) = chart_bounds(lines.iter().map(|l| l.points.as_slice()));
        let fmt_x = move |v: f64| fmt_day(origin, v);
        render_chart(
            frame,
            chunks[1],
            &format!("{} (m: next metric)", self.overview_metric.display_name()),
            DashboardChart {
                lines: &lines,
                dots: &[],
                marker_x: None,
                x_bounds,
                y_bounds,
                x_label: "date",
                y_label: self.overview_metric.unit_label(),
                fmt_x: &fmt_x,
                fmt_y: &fmt_value,
            },
        );

        let corr = crate::report::format_correlation(&session.overview.correlation, &Metric::COSTS);
        frame.render_widget(
            Paragraph::new(corr).block(Block::default().title("Cost correlation").borders(Borders::ALL)),
            chunks[2],
        );
    }

    fn draw_pricing(&self, frame: &mut Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(42), Constraint::Min(0)])
            .split(area);
        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(12), Constraint::Min(0)])
            .split(chunks[1]);

        self.draw_settings(frame, chunks[0]);

        let quote = crate::report::format_quote(&self.run.pricing.quote);
        frame.render_widget(
            Paragraph::new(quote).block(Block::default().title("Quote").borders(Borders::ALL)),
            right[0],
        );

        let curve = &self.run.pricing.sensitivity;
        let lines = [ChartLine {
            points: curve.points.clone(),
            color: CYAN,
        }];
        let (x_bounds, y_bounds) = chart_bounds([curve.points.as_slice()]);
        render_chart(
            frame,
            right[1],
            "Price sensitivity to margin",
            DashboardChart {
                lines: &lines,
                dots: &[],
                marker_x: Some(self.config.margin),
                x_bounds,
                y_bounds,
                x_label: "margin",
                y_label: "price ($)",
                fmt_x: &fmt_pct,
                fmt_y: &fmt_value,
            },
        );
    }

    fn draw_settings(&self, frame: &mut Frame<'_>, area: Rect) {
        let q = &self.run.pricing.quote;
        let entry = require_product(&self.config.product).ok();

        let items: Vec<ListItem> = self
            .fields()
            .into_iter()
            .map(|field| {
                let text = match field {
                    Field::Product => format!("Product: {}", q.product),
                    Field::Attribute(i) => {
                        let name = entry
                            .and_then(|e| e.attributes.get(i))
                            .map(|a| a.name)
                            .unwrap_or("-");
                        let value = q.selections.get(name).map(String::as_str).unwrap_or("-");
                        format!("  {name}: {value}")
                    }
                    Field::Margin => format!("Margin: {:.0}%", self.config.margin * 100.0),
                    Field::Discount => format!("Volume discount: {:.0}%", self.config.volume_discount * 100.0),
                    Field::MaterialCost => format!("Material cost: ${:.2}", self.config.costs.material_cost),
                    Field::LaborHours => format!("Labor hours: {:.1}", self.config.costs.labor_hours),
                    Field::Overhead => format!("Overhead: ${:.0}", self.config.costs.overhead_cost),
                };
                ListItem::new(text)
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().title("Settings").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_costs(&self, frame: &mut Frame<'_>, area: Rect) {
        let surface = &self.run.pricing.surface;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(7), Constraint::Min(0)])
            .split(area);

        frame.render_widget(
            Paragraph::new(crate::report::format_surface(surface))
                .block(Block::default().title("Cost surface").borders(Borders::ALL)),
            chunks[0],
        );

        // Slices of the surface at the lowest, middle and highest labor rate.
        let last = surface.labor_axis.len().saturating_sub(1);
        let lines: Vec<ChartLine> = [(0, GREEN), (last / 2, CYAN), (last, RED)]
            .into_iter()
            .filter_map(|(j, color)| {
                let row = surface.prices.get(j)?;
                Some(ChartLine {
                    points: surface.material_axis.iter().copied().zip(row.iter().copied()).collect(),
                    color,
                })
            })
            .collect();
        let (x_bounds, y_bounds) = chart_bounds(lines.iter().map(|l| l.points.as_slice()));
        let title = match (surface.labor_axis.first(), surface.labor_axis.last()) {
            (Some(lo), Some(hi)) => format!("Price vs steel cost at labor ${lo:.2} (green) .. ${hi:.2} (red)"),
            _ => "Price vs steel cost".to_string(),
        };
        render_chart(
            frame,
            chunks[1],
            &title,
            DashboardChart {
                lines: &lines,
                dots: &[],
                marker_x: None,
                x_bounds,
                y_bounds,
                x_label: "steel cost ($/lb)",
                y_label: "price ($)",
                fmt_x: &fmt_value,
                fmt_y: &fmt_value,
            },
        );
    }

    fn draw_forecast(&self, frame: &mut Frame<'_>, area: Rect) {
        let session = &self.run.session;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(area);
        let origin = session.series.first_date();
        let fmt_x = move |v: f64| fmt_day(origin, v);

        match &session.forecast {
            Ok(forecast) => {
                let history: Vec<(f64, f64)> = session
                    .series
                    .records
                    .iter()
                    .enumerate()
                    .map(|(i, r)| (i as f64, r.order_volume))
                    .collect();
                let offset = |d: NaiveDate| origin.map(|o| (d - o).num_days() as f64).unwrap_or(0.0);
                let predicted: Vec<(f64, f64)> =
                    forecast.points.iter().map(|p| (offset(p.date), p.order_volume)).collect();
                let lines = [
                    ChartLine {
                        points: history,
                        color: CYAN,
                    },
                    ChartLine {
                        points: predicted,
                        color: MAGENTA,
                    },
                ];
                let (x_bounds, y_bounds) = chart_bounds(lines.iter().map(|l| l.points.as_slice()));
                render_chart(
                    frame,
                    chunks[0],
                    "Order volume: historical (cyan) and predicted (magenta)",
                    DashboardChart {
                        lines: &lines,
                        dots: &[],
                        marker_x: Some(offset(forecast.today)),
                        x_bounds,
                        y_bounds,
                        x_label: "date",
                        y_label: "orders",
                        fmt_x: &fmt_x,
                        fmt_y: &fmt_value,
                    },
                );
            }
            Err(err) => render_unavailable(frame, chunks[0], "Demand forecast", err),
        }

        match &session.decomposition {
            Ok(d) => {
                let halves = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Length(48), Constraint::Min(0)])
                    .split(chunks[1]);
                frame.render_widget(
                    Paragraph::new(crate::report::format_decomposition(d))
                        .block(Block::default().title("Seasonal decomposition").borders(Borders::ALL)),
                    halves[0],
                );

                let trend = [ChartLine {
                    points: d
                        .trend
                        .iter()
                        .enumerate()
                        .filter_map(|(i, v)| v.map(|v| (i as f64, v)))
                        .collect(),
                    color: YELLOW,
                }];
                let observed = [ChartDots {
                    points: d.observed.iter().enumerate().map(|(i, &v)| (i as f64, v)).collect(),
                    color: plotters::style::RGBColor(200, 200, 200),
                }];
                let (x_bounds, y_bounds) = chart_bounds([trend[0].points.as_slice(), observed[0].points.as_slice()]);
                render_chart(
                    frame,
                    halves[1],
                    "Observed (dots) and trend",
                    DashboardChart {
                        lines: &trend,
                        dots: &observed,
                        marker_x: None,
                        x_bounds,
                        y_bounds,
                        x_label: "date",
                        y_label: "orders",
                        fmt_x: &fmt_x,
                        fmt_y: &fmt_value,
                    },
                );
            }
            Err(err) => render_unavailable(frame, chunks[1], "Seasonal decomposition", err),
        }
    }

    fn draw_competitors(&self, frame: &mut Frame<'_>, area: Rect) {
        let analysis = &self.run.pricing.competitors;
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(48), Constraint::Min(0)])
            .split(area);

        let advice_color = match analysis.position {
            crate::domain::MarketPosition::Competitive => Color::Green,
            crate::domain::MarketPosition::AboveMarket => Color::Yellow,
            crate::domain::MarketPosition::WithinRange => Color::Cyan,
        };
        frame.render_widget(
            Paragraph::new(crate::report::format_competitors(analysis))
                .style(Style::default().fg(advice_color))
                .block(Block::default().title("Market position").borders(Borders::ALL)),
            chunks[0],
        );

        let (ours, theirs): (Vec<_>, Vec<_>) = analysis
            .matrix
            .iter()
            .enumerate()
            .partition(|(i, _)| *i == 0);
        let to_points = |v: Vec<(usize, &crate::domain::CompetitorPoint)>| -> Vec<(f64, f64)> {
            v.into_iter().map(|(_, p)| (f64::from(p.quality), p.price)).collect()
        };
        let dots = [
            ChartDots {
                points: to_points(ours),
                color: GREEN,
            },
            ChartDots {
                points: to_points(theirs),
                color: RED,
            },
        ];
        let (_, y_bounds) = chart_bounds(dots.iter().map(|d| d.points.as_slice()));
        let x_bounds = [f64::from(QUALITY_RANGE.0) - 0.5, f64::from(QUALITY_RANGE.1) + 0.5];
        render_chart(
            frame,
            chunks[1],
            "Price-quality matrix (green: ours)",
            DashboardChart {
                lines: &[],
                dots: &dots,
                marker_x: None,
                x_bounds,
                y_bounds,
                x_label: "quality",
                y_label: "price ($)",
                fmt_x: &|v: f64| format!("{v:.0}"),
                fmt_y: &fmt_value,
            },
        );
    }

    fn draw_footer(&self, frame: &mut Frame<'_>, area: Rect) {
        let help = "Tab/1-5 view  ↑/↓ select  ←/→ adjust  m metric  r new series  d debug  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Move `value` by `delta`, clamp into `range`, and snap to two decimals.
fn step(value: f64, delta: f64, range: (f64, f64)) -> f64 {
    let next = (value + delta).clamp(range.0, range.1);
    (next * 100.0).round() / 100.0
}

fn fmt_day(origin: Option<NaiveDate>, offset: f64) -> String {
    origin
        .and_then(|o| o.checked_add_signed(chrono::Duration::days(offset.round() as i64)))
        .map(|d| d.format("%m-%d").to_string())
        .unwrap_or_else(|| format!("{offset:.0}"))
}

fn fmt_value(v: f64) -> String {
    format!("{v:.2}")
}

fn fmt_pct(v: f64) -> String {
    format!("{:.0}%", v * 100.0)
}

fn render_unavailable(frame: &mut Frame<'_>, area: Rect, title: &str, err: &AppError) {
    let msg = Paragraph::new(format!("Unavailable: {err}"))
        .style(Style::default().fg(Color::Red))
        .block(Block::default().title(title.to_string()).borders(Borders::ALL));
    frame.render_widget(msg, area);
}

fn render_chart(frame: &mut Frame<'_>, area: Rect, title: &str, chart: DashboardChart<'_>) {
    let block = Block::default().title(title.to_string()).borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(Clear, inner);

    let axes = AxisLabels {
        x_bounds: chart.x_bounds,
        y_bounds: chart.y_bounds,
        x_label: chart.x_label,
        y_label: chart.y_label,
        fmt_x: chart.fmt_x,
        fmt_y: chart.fmt_y,
    };

    let (chart_rect, insets) = chart_layout(inner);
    frame.render_widget(chart, chart_rect);
    if let Some(insets) = insets {
        draw_axis_ticks(frame, inner, chart_rect, insets, &axes);
    }
}

#[derive(Debug, Clone, Copy)]
struct AxisInsets {
    left: u16,
    right: u16,
    top: u16,
    bottom: u16,
}

struct AxisLabels<'a> {
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
    x_label: &'a str,
    y_label: &'a str,
    fmt_x: &'a dyn Fn(f64) -> String,
    fmt_y: &'a dyn Fn(f64) -> String,
}

fn chart_layout(inner: Rect) -> (Rect, Option<AxisInsets>) {
    let insets = AxisInsets {
        left: 8,
        right: 2,
        top: 1,
        bottom: 2,
    };

    if inner.width <= insets.left + insets.right + 10 || inner.height <= insets.top + insets.bottom + 5 {
        return (inner, None);
    }

    let rect = Rect {
        x: inner.x + insets.left,
        y: inner.y + insets.top,
        width: inner.width - insets.left - insets.right,
        height: inner.height - insets.top - insets.bottom,
    };

    (rect, Some(insets))
}

fn draw_axis_ticks(frame: &mut Frame<'_>, inner: Rect, chart: Rect, insets: AxisInsets, axes: &AxisLabels<'_>) {
    let ticks = 5usize;
    let style = Style::default().fg(Color::Gray);

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let x_val = axes.x_bounds[0] + u * (axes.x_bounds[1] - axes.x_bounds[0]);
        let x = chart.x + ((chart.width - 1) as f64 * u).round() as u16;
        let label = (axes.fmt_x)(x_val);
        let label_len = label.len() as u16;
        let start = x.saturating_sub(label_len / 2);
        let y = chart.y + chart.height;
        if y >= inner.y + inner.height - 1 {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len.min((inner.x + inner.width).saturating_sub(start)),
                height: 1,
            },
        );
    }

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let y_val = axes.y_bounds[0] + u * (axes.y_bounds[1] - axes.y_bounds[0]);
        let y = chart.y + (chart.height - 1) - ((chart.height - 1) as f64 * u).round() as u16;
        let label = (axes.fmt_y)(y_val);
        let label_len = label.len() as u16;
        let x = inner.x + insets.left.saturating_sub(1);
        let start = x.saturating_sub(label_len);
        if start < inner.x {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    let x_label = Paragraph::new(axes.x_label.to_string())
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray));
    let x_rect = Rect {
        x: chart.x,
        y: chart.y + chart.height + 1,
        width: chart.width,
        height: 1,
    };
    if x_rect.y < inner.y + inner.height {
        frame.render_widget(x_label, x_rect);
    }

    let y_label = Paragraph::new(axes.y_label.to_string())
        .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD));
    let y_rect = Rect {
        x: inner.x,
        y: inner.y,
        width: insets.left.saturating_sub(1),
        height: 1,
    };
    frame.render_widget(y_label, y_rect);
}
