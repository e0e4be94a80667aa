//! Ratatui-based terminal UI.
//!
//! The TUI provides a settings panel for choosing a country, date range, and
//! lookback window, then renders the trend chart, stat cards, and totals.
//!
//! Fetches run on background threads and report over a channel; every request
//! carries a request id plus the selection it was issued for, and results
//! from superseded requests are discarded instead of trusting completion
//! order (see `on_fetch_msg`).

use std::io;
use std::sync::mpsc::{Receiver, Sender, channel};
use std::time::Duration;

use chrono::NaiveDate;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
};

use crate::app::pipeline::RunOutput;
use crate::data::{DirectoryClient, HistoryClient};
use crate::domain::{
    ChartConfig, CountryDirectory, HistorySnapshot, RANGE_CEILING, RANGE_FLOOR,
};
use crate::error::AppError;
use crate::stats::convert_to_millions;

mod plotters_chart;

use plotters_chart::TrendChart;

/// Start the TUI.
pub fn run(config: ChartConfig) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::runtime(format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(config);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode()
            .map_err(|e| AppError::runtime(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::runtime(format!(
                "Failed to enter alternate screen: {e}"
            )));
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

/// A completed background fetch, tagged with the request it answered.
enum FetchMsg {
    Directory {
        req_id: u64,
        result: Result<CountryDirectory, AppError>,
    },
    History {
        req_id: u64,
        country: String,
        result: Result<HistorySnapshot, AppError>,
    },
}

const FIELD_COUNTRY: usize = 0;
const FIELD_START: usize = 1;
const FIELD_END: usize = 2;
const FIELD_LASTDAYS: usize = 3;
const FIELD_COUNT: usize = 4;

struct App {
    config: ChartConfig,
    directory: Option<CountryDirectory>,
    snapshot: Option<HistorySnapshot>,
    run: Option<RunOutput>,
    status: String,
    selected_field: usize,
    editing: Option<usize>,
    input: String,
    tx: Sender<FetchMsg>,
    rx: Receiver<FetchMsg>,
    dir_req_id: u64,
    hist_req_id: u64,
}

impl App {
    fn new(config: ChartConfig) -> Self {
        let (tx, rx) = channel();
        let mut app = Self {
            config,
            directory: None,
            snapshot: None,
            run: None,
            status: "Fetching data...".to_string(),
            selected_field: 0,
            editing: None,
            input: String::new(),
            tx,
            rx,
            dir_req_id: 0,
            hist_req_id: 0,
        };
        app.request_directory();
        app.request_history();
        app
    }

    fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::runtime(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            while let Ok(msg) = self.rx.try_recv() {
                self.on_fetch_msg(msg);
                needs_redraw = true;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::runtime(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::runtime(format!("Event read error: {e}")))? {
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

    // Background fetches. Each request bumps its id; completions carrying an
    // older id are answers to a superseded selection and get dropped.

    fn request_directory(&mut self) {
        self.dir_req_id += 1;
        let req_id = self.dir_req_id;
        let tx = self.tx.clone();
        std::thread::spawn(move || {
            let result = DirectoryClient::from_env().fetch_directory();
            let _ = tx.send(FetchMsg::Directory { req_id, result });
        });
    }

    fn request_history(&mut self) {
        self.hist_req_id += 1;
        let req_id = self.hist_req_id;
        let country = self.config.country.clone();
        let lastdays = self.config.lastdays;
        let tx = self.tx.clone();
        self.status = format!("Fetching history for {country}...");
        std::thread::spawn(move || {
            let result = HistoryClient::from_env().fetch_history(&country, lastdays);
            let _ = tx.send(FetchMsg::History {
                req_id,
                country,
                result,
            });
        });
    }

    fn on_fetch_msg(&mut self, msg: FetchMsg) {
        match msg {
            FetchMsg::Directory { req_id, result } => {
                if req_id != self.dir_req_id {
                    log::debug!("discarding stale directory fetch (req {req_id})");
                    return;
                }
                match result {
                    Ok(directory) => {
                        self.directory = Some(directory);
                        self.recompute();
                    }
                    // A failed fetch leaves prior state in place; the status
                    // line is the user-visible record of it.
                    Err(err) => {
                        log::warn!("directory fetch failed: {err}");
                        self.status = format!("Directory fetch failed: {err}");
                    }
                }
            }
            FetchMsg::History {
                req_id,
                country,
                result,
            } => {
                if req_id != self.hist_req_id || country != self.config.country {
                    log::warn!("discarding stale history fetch for '{country}' (req {req_id})");
                    return;
                }
                match result {
                    Ok(snapshot) => {
                        self.snapshot = Some(snapshot);
                        self.recompute();
                        self.status = format!("History loaded for {country}.");
                    }
                    Err(err) => {
                        log::warn!("history fetch failed: {err}");
                        self.status = format!("Fetch failed: {err} (showing previous data)");
                    }
                }
            }
        }
    }

    /// Re-run the pipeline against the cached snapshot. Range edits land
    /// here; only country/lookback changes need a refetch.
    fn recompute(&mut self) {
        let Some(snapshot) = &self.snapshot else {
            return;
        };
        let population = self
            .directory
            .as_ref()
            .and_then(|d| d.population_of(&self.config.country));

        match crate::app::pipeline::run_chart_with_data(&self.config, population, snapshot) {
            Ok(run) => self.run = Some(run),
            Err(err) => self.status = format!("Pipeline error: {err}"),
        }
    }

    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.editing.is_some() {
            self.handle_edit_key(code);
            return false;
        }

        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Up => {
                if self.selected_field > 0 {
                    self.selected_field -= 1;
                }
            }
            KeyCode::Down => {
                if self.selected_field < FIELD_COUNT - 1 {
                    self.selected_field += 1;
                }
            }
            KeyCode::Left => self.adjust_field(-1),
            KeyCode::Right => self.adjust_field(1),
            KeyCode::Enter => self.begin_edit(),
            KeyCode::Char('r') => {
                self.request_directory();
                self.request_history();
            }
            KeyCode::Char('d') => self.write_debug_bundle(),
            _ => {}
        }

        false
    }

    fn adjust_field(&mut self, delta: i64) {
        match self.selected_field {
            FIELD_COUNTRY => self.cycle_country(delta),
            FIELD_START => {
                if let Some(date) = step_date(&self.config.start_date, delta) {
                    self.config.start_date = clamp_date(&date);
                    self.recompute();
                    self.status = format!("start: {}", self.config.start_date);
                }
            }
            FIELD_END => {
                if let Some(date) = step_date(&self.config.end_date, delta) {
                    self.config.end_date = clamp_date(&date);
                    self.recompute();
                    self.status = format!("end: {}", self.config.end_date);
                }
            }
            FIELD_LASTDAYS => {
                let next = if delta >= 0 {
                    self.config.lastdays.saturating_add(100)
                } else {
                    self.config.lastdays.saturating_sub(100)
                };
                self.config.lastdays = next.max(30);
                self.status = format!("lastdays: {}", self.config.lastdays);
                self.request_history();
            }
            _ => {}
        }
    }

    fn cycle_country(&mut self, delta: i64) {
        let Some(directory) = &self.directory else {
            self.status = "Country directory not loaded yet.".to_string();
            return;
        };
        if directory.is_empty() {
            return;
        }
        let len = directory.len() as i64;
        let pos = directory
            .position_of(&self.config.country)
            .map(|p| p as i64)
            .unwrap_or(if delta >= 0 { -1 } else { 0 });
        let next = (pos + delta).rem_euclid(len) as usize;
        self.config.country = directory.countries()[next].name.clone();
        self.request_history();
    }

    fn begin_edit(&mut self) {
        self.editing = Some(self.selected_field);
        self.input = match self.selected_field {
            FIELD_COUNTRY => self.config.country.clone(),
            FIELD_START => self.config.start_date.clone(),
            FIELD_END => self.config.end_date.clone(),
            FIELD_LASTDAYS => self.config.lastdays.to_string(),
            _ => String::new(),
        };
        self.status = match self.selected_field {
            FIELD_COUNTRY => "Editing country. Enter to apply, Esc to cancel.".to_string(),
            FIELD_START | FIELD_END => {
                "Editing date (YYYY-MM-DD). Enter to apply, Esc to cancel.".to_string()
            }
            _ => "Editing. Enter to apply, Esc to cancel.".to_string(),
        };
    }

    fn handle_edit_key(&mut self, code: KeyCode) {
        let Some(field) = self.editing else {
            return;
        };
        match code {
            KeyCode::Esc => {
                self.editing = None;
                self.status = "Edit canceled.".to_string();
            }
            KeyCode::Enter => {
                self.editing = None;
                self.apply_edit(field);
            }
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(c) => {
                let accept = match field {
                    FIELD_START | FIELD_END => c.is_ascii_digit() || c == '-',
                    FIELD_LASTDAYS => c.is_ascii_digit(),
                    _ => true,
                };
                if accept {
                    self.input.push(c);
                }
            }
            _ => {}
        }
    }

    fn apply_edit(&mut self, field: usize) {
        let input = self.input.trim().to_string();
        match field {
            FIELD_COUNTRY => {
                if input.is_empty() {
                    self.status = "Country unchanged.".to_string();
                    return;
                }
                self.config.country = input;
                self.request_history();
            }
            FIELD_START | FIELD_END => {
                if NaiveDate::parse_from_str(&input, "%Y-%m-%d").is_err() {
                    self.status = format!("Invalid date '{input}' (expected YYYY-MM-DD).");
                    return;
                }
                let clamped = clamp_date(&input);
                if field == FIELD_START {
                    self.config.start_date = clamped;
                } else {
                    self.config.end_date = clamped;
                }
                self.recompute();
                self.status = format!(
                    "range: {} .. {}",
                    self.config.start_date, self.config.end_date
                );
            }
            FIELD_LASTDAYS => match input.parse::<u32>() {
                Ok(v) if v > 0 => {
                    self.config.lastdays = v;
                    self.request_history();
                }
                _ => self.status = format!("Invalid lookback '{input}'."),
            },
            _ => {}
        }
    }

    fn write_debug_bundle(&mut self) {
        let (Some(run), Some(snapshot)) = (&self.run, &self.snapshot) else {
            self.status = "No data to dump yet.".to_string();
            return;
        };
        match crate::debug::write_debug_bundle(run, snapshot, &self.config) {
            Ok(path) => {
                self.status = format!("Wrote debug bundle: {}", path.display());
            }
            Err(err) => {
                self.status = format!("Debug write failed: {err}");
            }
        }
    }

    // Drawing.

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("epi", Style::default().fg(Color::Cyan)),
            Span::raw(" — COVID-19 country trends"),
        ]));

        let population = self
            .directory
            .as_ref()
            .and_then(|d| d.population_of(&self.config.country))
            .map(|p| p.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        let n = self.run.as_ref().map(|r| r.records.len()).unwrap_or(0);

        lines.push(Line::from(Span::styled(
            format!(
                "country: {} | population: {population} | range: {} .. {} | n={n}",
                self.config.country, self.config.start_date, self.config.end_date,
            ),
            Style::default().fg(Color::Gray),
        )));

        if let Some(run) = &self.run {
            lines.push(Line::from(Span::styled(
                format!(
                    "cases: {} ({}) | recovered: {} ({}) | deaths: {} ({})",
                    fmt_millions(run.metrics.case_total),
                    fmt_pct(run.metrics.case_pct),
                    fmt_millions(run.metrics.recover_total),
                    fmt_pct(run.metrics.recover_pct),
                    fmt_millions(run.metrics.death_total),
                    fmt_pct(run.metrics.death_pct),
                ),
                Style::default().fg(Color::Gray),
            )));
        }

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(8)])
            .split(area);

        self.draw_chart(frame, chunks[0]);

        let bottom = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(chunks[1]);

        self.draw_settings(frame, bottom[0]);
        self.draw_totals(frame, bottom[1]);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Trends").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some(run) = &self.run else {
            let msg = Paragraph::new("Waiting for data...")
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default());
            frame.render_widget(msg, inner);
            return;
        };

        if run.records.is_empty() {
            let msg = Paragraph::new("No records in the selected range.")
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default());
            frame.render_widget(msg, inner);
            return;
        }

        let series = ChartSeries::from_run(run);
        let widget = TrendChart {
            cases: &series.cases,
            deaths: &series.deaths,
            recovered: &series.recovered,
            x_bounds: series.x_bounds,
            y_bounds: series.y_bounds,
            dates: &series.dates,
        };
        frame.render_widget(widget, inner);
    }

    fn draw_settings(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let items = vec![
            ListItem::new(format!("Country: {}", self.config.country)),
            ListItem::new(format!("Start: {}", self.config.start_date)),
            ListItem::new(format!("End: {}", self.config.end_date)),
            ListItem::new(format!("Lookback: {} days", self.config.lastdays)),
        ];

        let list = List::new(items)
            .block(Block::default().title("Settings").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, area, &mut state);

        if self.editing.is_some() {
            let hint = Paragraph::new(format!("> {}", self.input)).style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            );
            let rect = Rect {
                x: area.x + 2,
                y: area.y + area.height.saturating_sub(2),
                width: area.width.saturating_sub(4),
                height: 1,
            };
            frame.render_widget(hint, rect);
        }
    }

    fn draw_totals(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let items: Vec<ListItem> = match &self.run {
            Some(run) => run
                .totals
                .iter()
                .map(|t| ListItem::new(format!("{:<16} {}", t.label, t.value)))
                .collect(),
            None => vec![ListItem::new("-")],
        };

        let list =
            List::new(items).block(Block::default().title("Range totals").borders(Borders::ALL));
        frame.render_widget(list, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  ←/→ adjust  Enter edit  r refresh  d debug  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Chart-ready series built from one run.
struct ChartSeries {
    cases: Vec<(f64, f64)>,
    deaths: Vec<(f64, f64)>,
    recovered: Vec<(f64, f64)>,
    dates: Vec<String>,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
}

impl ChartSeries {
    fn from_run(run: &RunOutput) -> Self {
        let mut cases = Vec::new();
        let mut deaths = Vec::new();
        let mut recovered = Vec::new();
        let mut dates = Vec::with_capacity(run.records.len());
        let mut y_max = 0.0_f64;

        for (i, r) in run.records.iter().enumerate() {
            let x = i as f64;
            dates.push(r.date.clone());
            if let Some(v) = r.cases {
                cases.push((x, v as f64));
                y_max = y_max.max(v as f64);
            }
            if let Some(v) = r.deaths {
                deaths.push((x, v as f64));
                y_max = y_max.max(v as f64);
            }
            if let Some(v) = r.recovered {
                recovered.push((x, v as f64));
                y_max = y_max.max(v as f64);
            }
        }

        let x_max = (run.records.len().saturating_sub(1)).max(1) as f64;
        let pad = (y_max * 0.05).max(1.0);

        Self {
            cases,
            deaths,
            recovered,
            dates,
            x_bounds: [0.0, x_max],
            y_bounds: [0.0, y_max + pad],
        }
    }
}

/// Step a canonical date by `delta` days; `None` when it does not parse.
fn step_date(date: &str, delta: i64) -> Option<String> {
    let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    let stepped = parsed + chrono::Duration::days(delta);
    Some(stepped.format("%Y-%m-%d").to_string())
}

/// Clamp a canonical date into the selectable span of the upstream history.
fn clamp_date(date: &str) -> String {
    if date < RANGE_FLOOR {
        RANGE_FLOOR.to_string()
    } else if date > RANGE_CEILING {
        RANGE_CEILING.to_string()
    } else {
        date.to_string()
    }
}

fn fmt_millions(v: Option<u64>) -> String {
    match v {
        Some(v) => convert_to_millions(v as f64),
        None => "-".to_string(),
    }
}

fn fmt_pct(v: Option<f64>) -> String {
    match v {
        Some(v) => format!("{v:.4}%"),
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_date_moves_one_day_across_months() {
        assert_eq!(step_date("2021-01-31", 1).unwrap(), "2021-02-01");
        assert_eq!(step_date("2021-03-01", -1).unwrap(), "2021-02-28");
        assert!(step_date("not-a-date", 1).is_none());
    }

    #[test]
    fn clamp_date_enforces_floor_and_ceiling() {
        assert_eq!(clamp_date("2019-12-31"), RANGE_FLOOR);
        assert_eq!(clamp_date("2024-01-01"), RANGE_CEILING);
        assert_eq!(clamp_date("2021-06-15"), "2021-06-15");
    }

    #[test]
    fn chart_series_skips_missing_points_but_keeps_dates() {
        use crate::domain::{AlignedRecord, Metrics};

        let run = RunOutput {
            population: None,
            records: vec![
                AlignedRecord {
                    date: "2021-01-01".to_string(),
                    cases: Some(10),
                    deaths: None,
                    recovered: Some(2),
                },
                AlignedRecord {
                    date: "2021-01-02".to_string(),
                    cases: Some(20),
                    deaths: Some(1),
                    recovered: None,
                },
            ],
            aligned_len: 2,
            skipped: vec![],
            metrics: Metrics {
                case_pct: None,
                death_pct: None,
                recover_pct: None,
                case_total: None,
                death_total: None,
                recover_total: None,
            },
            totals: vec![],
        };

        let series = ChartSeries::from_run(&run);
        assert_eq!(series.cases.len(), 2);
        assert_eq!(series.deaths.len(), 1);
        assert_eq!(series.recovered.len(), 1);
        assert_eq!(series.dates.len(), 2);
        assert_eq!(series.x_bounds, [0.0, 1.0]);
        assert!(series.y_bounds[1] > 20.0);
    }
}
