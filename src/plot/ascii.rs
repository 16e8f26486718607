//! ASCII plotting for terminal output.
//!
//! Fixed-size character grid; output is deterministic for a given input.
//!
//! Each series is drawn either as a connected line or as isolated points with
//! its own glyph. Lines are drawn first so points overlay them. An optional
//! vertical marker (current margin, "today") is drawn as `|`.

use chrono::NaiveDate;

use crate::domain::{Decomposition, DemandForecast, MetricSeries, Metric, SensitivityCurve};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    Line(char),
    Points(char),
}

#[derive(Debug, Clone)]
pub struct PlotSeries {
    pub label: String,
    pub points: Vec<(f64, f64)>,
    pub glyph: Glyph,
}

#[derive(Debug, Clone)]
pub struct AsciiPlot {
    pub title: String,
    pub series: Vec<PlotSeries>,
    pub marker_x: Option<f64>,
    pub width: usize,
    pub height: usize,
}

/// Render a plot into a string (header, legend, grid).
pub fn render_ascii_plot(plot: &AsciiPlot) -> String {
    let width = plot.width.max(10);
    let height = plot.height.max(5);

    let (x_min, x_max) = range(plot.series.iter().flat_map(|s| s.points.iter().map(|p| p.0)))
        .unwrap_or((0.0, 1.0));
    let (y_min, y_max) = range(plot.series.iter().flat_map(|s| s.points.iter().map(|p| p.1)))
        .unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    if let Some(x) = plot.marker_x {
        if x.is_finite() && x >= x_min && x <= x_max {
            let col = map_x(x, x_min, x_max, width);
            for row in grid.iter_mut() {
                row[col] = '|';
            }
        }
    }

    for s in plot.series.iter().filter(|s| matches!(s.glyph, Glyph::Line(_))) {
        if let Glyph::Line(ch) = s.glyph {
            draw_curve(&mut grid, &s.points, (x_min, x_max), (y_min, y_max), ch);
        }
    }
    for s in plot.series.iter() {
        if let Glyph::Points(ch) = s.glyph {
            for &(x, y) in s.points.iter().filter(|(x, y)| x.is_finite() && y.is_finite()) {
                let col = map_x(x, x_min, x_max, width);
                let row = map_y(y, y_min, y_max, height);
                grid[row][col] = ch;
            }
        }
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: {} | x=[{x_min:.3}, {x_max:.3}] | y=[{y_min:.2}, {y_max:.2}]\n",
        plot.title
    ));
    if plot.series.len() > 1 {
        let legend: Vec<String> = plot
            .series
            .iter()
            .map(|s| {
                let ch = match s.glyph {
                    Glyph::Line(c) | Glyph::Points(c) => c,
                };
                format!("{ch} {}", s.label)
            })
            .collect();
        out.push_str(&legend.join("  "));
        out.push('\n');
    }

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out
}

/// Price vs margin with the current margin marked.
pub fn sensitivity_plot(curve: &SensitivityCurve, current_margin: f64, width: usize, height: usize) -> AsciiPlot {
    AsciiPlot {
        title: "price vs margin".to_string(),
        series: vec![PlotSeries {
            label: "price".to_string(),
            points: curve.points.clone(),
            glyph: Glyph::Line('-'),
        }],
        marker_x: Some(current_margin),
        width,
        height,
    }
}

/// Daily values of `metric`; order volume additionally gets its moving average.
pub fn metric_plot(
    series: &MetricSeries,
    metric: Metric,
    moving_average: Option<&[Option<f64>]>,
    width: usize,
    height: usize,
) -> AsciiPlot {
    let origin = series.first_date();
    let points: Vec<(f64, f64)> = series
        .records
        .iter()
        .map(|r| (day_offset(origin, r.date), r.value(metric)))
        .collect();

    let mut out = vec![PlotSeries {
        label: metric.display_name().to_string(),
        points,
        glyph: if moving_average.is_some() { Glyph::Points('.') } else { Glyph::Line('-') },
    }];

    if let Some(ma) = moving_average {
        let ma_points = series
            .records
            .iter()
            .zip(ma)
            .filter_map(|(r, v)| v.map(|v| (day_offset(origin, r.date), v)))
            .collect();
        out.push(PlotSeries {
            label: "moving average".to_string(),
            points: ma_points,
            glyph: Glyph::Line('*'),
        });
    }

    AsciiPlot {
        title: format!("{} ({}) by day", metric.display_name(), metric.unit_label()),
        series: out,
        marker_x: None,
        width,
        height,
    }
}

/// One plot per decomposition component.
pub fn decomposition_plots(decomposition: &Decomposition, width: usize, height: usize) -> Vec<AsciiPlot> {
    let dense = |v: &[f64]| -> Vec<(f64, f64)> {
        v.iter().enumerate().map(|(i, &y)| (i as f64, y)).collect()
    };
    let sparse = |v: &[Option<f64>]| -> Vec<(f64, f64)> {
        v.iter()
            .enumerate()
            .filter_map(|(i, y)| y.map(|y| (i as f64, y)))
            .collect()
    };

    [
        ("Observed", dense(&decomposition.observed)),
        ("Trend", sparse(&decomposition.trend)),
        ("Seasonal", dense(&decomposition.seasonal)),
        ("Residual", sparse(&decomposition.residual)),
    ]
    .into_iter()
    .map(|(title, points)| AsciiPlot {
        title: title.to_string(),
        series: vec![PlotSeries {
            label: title.to_lowercase(),
            points,
            glyph: Glyph::Line('-'),
        }],
        marker_x: None,
        width,
        height,
    })
    .collect()
}

/// Historical order volume followed by the forecast, with "today" marked.
pub fn forecast_plot(series: &MetricSeries, forecast: &DemandForecast, width: usize, height: usize) -> AsciiPlot {
    let origin = series.first_date();
    let history = series
        .records
        .iter()
        .map(|r| (day_offset(origin, r.date), r.order_volume))
        .collect();
    let predicted = forecast
        .points
        .iter()
        .map(|p| (day_offset(origin, p.date), p.order_volume))
        .collect();

    AsciiPlot {
        title: "order volume: history and prediction".to_string(),
        series: vec![
            PlotSeries {
                label: "historical".to_string(),
                points: history,
                glyph: Glyph::Line('-'),
            },
            PlotSeries {
                label: "predicted".to_string(),
                points: predicted,
                glyph: Glyph::Line('+'),
            },
        ],
        marker_x: Some(day_offset(origin, forecast.today)),
        width,
        height,
    }
}

fn day_offset(origin: Option<NaiveDate>, date: NaiveDate) -> f64 {
    origin.map(|o| (date - o).num_days() as f64).unwrap_or(0.0)
}

fn range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for v in values.filter(|v| v.is_finite()) {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    if lo.is_finite() && hi.is_finite() && hi > lo {
        Some((lo, hi))
    } else if lo.is_finite() {
        // Flat data: open a unit-wide window around it.
        Some((lo - 0.5, hi + 0.5))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_curve(grid: &mut [Vec<char>], curve: &[(f64, f64)], xr: (f64, f64), yr: (f64, f64), ch: char) {
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(x, y) in curve.iter().filter(|(x, y)| x.is_finite() && y.is_finite()) {
        let col = map_x(x, xr.0, xr.1, width);
        let row = map_y(y, yr.0, yr.1, height);
        if let Some((c0, r0)) = prev {
            draw_line(grid, c0, r0, col, row, ch);
        } else {
            grid[row][col] = ch;
        }
        prev = Some((col, row));
    }
}

/// Integer line drawing (Bresenham-ish). Only blank or marker cells are overwritten.
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0 && (y0 as usize) < grid.len() && x0 >= 0 && (x0 as usize) < grid[0].len() {
            let cell = &mut grid[y0 as usize][x0 as usize];
            if *cell == ' ' || *cell == '|' {
                *cell = ch;
            }
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plot_golden_snapshot_small() {
        let plot = AsciiPlot {
            title: "demo".to_string(),
            series: vec![
                PlotSeries {
                    label: "flat".to_string(),
                    points: vec![(0.0, 100.0), (9.0, 100.0)],
                    glyph: Glyph::Line('-'),
                },
                PlotSeries {
                    label: "obs".to_string(),
                    points: vec![(9.0, 110.0)],
                    glyph: Glyph::Points('o'),
                },
            ],
            marker_x: None,
            width: 10,
            height: 5,
        };

        let txt = render_ascii_plot(&plot);
        let expected = concat!(
            "Plot: demo | x=[0.000, 9.000] | y=[99.50, 110.50]\n",
            "- flat  o obs\n",
            "         o\n",
            "          \n",
            "          \n",
            "          \n",
            "----------\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn marker_column_is_drawn_under_lines() {
        let curve = SensitivityCurve {
            base_cost: 20.0,
            volume_discount: 0.0,
            points: vec![(0.1, 22.0), (0.5, 40.0)],
        };
        let txt = render_ascii_plot(&sensitivity_plot(&curve, 0.3, 21, 5));
        let rows: Vec<&str> = txt.lines().skip(1).collect();
        assert_eq!(rows.len(), 5);
        assert!(rows.iter().filter(|r| r.chars().nth(10) == Some('|')).count() >= 3);
    }
}
