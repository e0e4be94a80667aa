//! Command-line parsing for the country trend explorer.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the pipeline code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "epi", version, about = "COVID-19 country trend explorer")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch a country's history, print stat cards, totals, the record table,
    /// and optionally an ASCII trend plot; optionally export CSV/JSON.
    Chart(ChartArgs),
    /// Print the stat cards and totals only (useful for scripting).
    Summary(ChartArgs),
    /// Print the country directory (name + population).
    Countries(CountriesArgs),
    /// Re-plot a previously exported dashboard JSON, offline.
    Plot(PlotArgs),
    /// Launch the interactive TUI.
    ///
    /// This uses the same underlying pipeline as `epi chart`, but renders
    /// results in a terminal UI using Ratatui.
    Tui(ChartArgs),
}

/// Common options for charting and summarizing.
#[derive(Debug, Parser, Clone)]
pub struct ChartArgs {
    /// Country to chart (exact directory name).
    #[arg(short = 'c', long, default_value = "India")]
    pub country: String,

    /// Range start, canonical YYYY-MM-DD (inclusive).
    #[arg(long, default_value = "2020-07-15")]
    pub start: String,

    /// Range end, canonical YYYY-MM-DD (inclusive).
    #[arg(long, default_value = "2021-07-24")]
    pub end: String,

    /// Lookback window (days) requested from the history source.
    #[arg(long, default_value_t = crate::data::history::DEFAULT_LASTDAYS)]
    pub lastdays: u32,

    /// Reference date (M/D/YY) for the case percentage and case total.
    #[arg(long, default_value = "3/9/23")]
    pub case_ref: String,

    /// Reference date (M/D/YY) for the death percentage and death total.
    #[arg(long, default_value = "3/9/23")]
    pub death_ref: String,

    /// Reference date (M/D/YY) for the recovery percentage and recovery total.
    /// Independent of the other references; recovery reporting stopped earlier.
    #[arg(long, default_value = "8/4/21")]
    pub recover_ref: String,

    /// Number of trailing records shown in the table.
    #[arg(long, default_value_t = 20)]
    pub rows: usize,

    /// Render an ASCII plot in the terminal (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Export the filtered records to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export the full dashboard (selection + metrics + totals + records) to JSON.
    #[arg(long = "export-json")]
    pub export_json: Option<PathBuf>,
}

/// Options for listing the country directory.
#[derive(Debug, Parser)]
pub struct CountriesArgs {
    /// Case-insensitive substring filter on the country name.
    #[arg(short = 'f', long)]
    pub filter: Option<String>,
}

/// Options for plotting a saved dashboard.
#[derive(Debug, Parser)]
pub struct PlotArgs {
    /// Dashboard JSON file produced by `epi chart --export-json`.
    #[arg(long, value_name = "JSON")]
    pub dashboard: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}
