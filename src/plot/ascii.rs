//! ASCII/Unicode plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - cases: `C`
//! - recoveries: `R`
//! - deaths: `D`

use crate::domain::AlignedRecord;

/// Render the three trend series over the filtered records.
///
/// X is the record index (the records are already in ascending date order);
/// Y is linear from 0 to the largest observed count. Deaths are drawn last so
/// the smallest-magnitude series stays visible where markers overlap.
pub fn render_trend_plot(records: &[AlignedRecord], width: usize, height: usize) -> String {
    if records.is_empty() {
        return "No records in range.\n".to_string();
    }

    let width = width.max(10);
    let height = height.max(5);

    let y_max = records
        .iter()
        .flat_map(|r| [r.cases, r.deaths, r.recovered])
        .flatten()
        .max()
        .unwrap_or(0)
        .max(1) as f64;

    let mut grid = vec![vec![' '; width]; height];

    draw_series(&mut grid, records, |r| r.cases, 'C', y_max);
    draw_series(&mut grid, records, |r| r.recovered, 'R', y_max);
    draw_series(&mut grid, records, |r| r.deaths, 'D', y_max);

    let first = &records[0].date;
    let last = &records[records.len() - 1].date;

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: dates=[{first} .. {last}] | y=[0, {y_max:.0}] | C cases, R recovered, D deaths\n"
    ));
    for row in grid {
        let line: String = row.into_iter().collect();
        out.push_str(line.trim_end());
        out.push('\n');
    }

    out
}

fn draw_series(
    grid: &mut [Vec<char>],
    records: &[AlignedRecord],
    metric: impl Fn(&AlignedRecord) -> Option<u64>,
    marker: char,
    y_max: f64,
) {
    let height = grid.len();
    let width = grid[0].len();

    for (i, r) in records.iter().enumerate() {
        let Some(v) = metric(r) else {
            continue;
        };
        let x = map_x(i, records.len(), width);
        let y = map_y(v as f64, y_max, height);
        grid[y][x] = marker;
    }
}

fn map_x(index: usize, n: usize, width: usize) -> usize {
    if n <= 1 {
        return 0;
    }
    let u = index as f64 / (n as f64 - 1.0);
    ((u * (width as f64 - 1.0)).round() as usize).min(width - 1)
}

fn map_y(value: f64, y_max: f64, height: usize) -> usize {
    let u = (value / y_max).clamp(0.0, 1.0);
    let row = ((1.0 - u) * (height as f64 - 1.0)).round() as usize;
    row.min(height - 1)
}
