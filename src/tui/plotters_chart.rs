//! Plotters-powered trend chart widget for Ratatui.
//!
//! Why Plotters instead of Ratatui's built-in `Chart` widget?
//! - nicer axis + mesh rendering
//! - less manual work for ticks/labels
//! - easy to extend later (legend, annotations, exportable PNG/SVG backends, etc.)
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// A lightweight, render-only chart description.
///
/// The widget is intentionally data-driven: all series and bounds are computed
/// outside the render call. This keeps `render()` focused on drawing and makes
/// it easy to test/benchmark the data prep separately.
pub struct TrendChart<'a> {
    /// Line series per metric; x is the record index, y the cumulative count.
    pub cases: &'a [(f64, f64)],
    pub deaths: &'a [(f64, f64)],
    pub recovered: &'a [(f64, f64)],
    /// X bounds (record index space).
    pub x_bounds: [f64; 2],
    /// Y bounds (counts).
    pub y_bounds: [f64; 2],
    /// Canonical dates backing the x axis, indexed by record position.
    pub dates: &'a [String],
}

impl<'a> Widget for TrendChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a chart.
        // In that case, we render a small hint rather than panicking.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let x0 = self.x_bounds[0];
        let x1 = self.x_bounds[1];
        let y0 = self.y_bounds[0];
        let y1 = self.y_bounds[1];

        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite())
            || x1 <= x0
            || y1 <= y0
        {
            return;
        }

        // `plotters-ratatui-backend` draws Plotters primitives via Ratatui's
        // `Canvas` widget, which ultimately writes to the terminal buffer.
        //
        // We delegate rendering to the crate-provided widget helper to avoid
        // coupling our code to its internal backend types.
        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                // Small margins keep the chart readable without wasting space.
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 7)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            // Axes + tick labels.
            //
            // We disable the mesh lines to reduce visual clutter in
            // low-resolution terminal rendering; axes + labels are enough.
            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc("date")
                .y_desc("count")
                .x_labels(4)
                .y_labels(5)
                .x_label_formatter(&|v| fmt_date_tick(*v, self.dates))
                .y_label_formatter(&|v| fmt_count_tick(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            // Series palette carried over from the web dashboard this replaces.
            let cases_color = RGBColor(156, 168, 255);
            let deaths_color = RGBColor(244, 74, 83);
            let recovered_color = RGBColor(71, 217, 40);

            chart.draw_series(LineSeries::new(self.cases.iter().copied(), &cases_color))?;
            chart.draw_series(LineSeries::new(self.deaths.iter().copied(), &deaths_color))?;
            chart.draw_series(LineSeries::new(
                self.recovered.iter().copied(),
                &recovered_color,
            ))?;

            Ok(())
        });

        widget.render(area, buf);
    }
}

/// Map an x tick (record index) back to its canonical date, month-precision.
fn fmt_date_tick(v: f64, dates: &[String]) -> String {
    if dates.is_empty() {
        return String::new();
    }
    let idx = (v.round() as usize).min(dates.len() - 1);
    // YYYY-MM is enough resolution for a terminal tick label.
    dates[idx].chars().take(7).collect()
}

/// Compact count tick labels (raw below 1M, millions above).
fn fmt_count_tick(v: f64) -> String {
    if v.abs() >= 1_000_000.0 {
        format!("{:.1}M", v / 1_000_000.0)
    } else if v.abs() >= 1_000.0 {
        format!("{:.0}k", v / 1_000.0)
    } else {
        format!("{v:.0}")
    }
}
