//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - fetches the country directory and historical series
//! - runs the alignment/filter/metrics pipeline
//! - prints reports/plots
//! - writes optional exports

use chrono::NaiveDate;
use clap::Parser;

use crate::cli::{ChartArgs, Command, CountriesArgs, PlotArgs};
use crate::domain::ChartConfig;
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `epi` binary.
pub fn run() -> Result<(), AppError> {
    env_logger::init();

    // We want `epi` and `epi -c Brazil` to behave like `epi tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of
    // the argv list before parsing. This preserves a clean clap structure
    // while retaining the requested UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Chart(args) => handle_chart(args, OutputMode::Full),
        Command::Summary(args) => handle_chart(args, OutputMode::SummaryOnly),
        Command::Countries(args) => handle_countries(args),
        Command::Plot(args) => handle_plot(args),
        Command::Tui(args) => handle_tui(args),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Full,
    SummaryOnly,
}

fn handle_chart(args: ChartArgs, mode: OutputMode) -> Result<(), AppError> {
    let config = chart_config_from_args(&args)?;
    let run = pipeline::run_chart(&config)?;

    println!(
        "{}",
        crate::report::format_run_summary(&run, &config)
    );
    println!("{}", crate::report::format_metrics(&run.metrics));
    println!("{}", crate::report::format_totals(&run.totals));

    if mode == OutputMode::Full {
        println!("{}", crate::report::format_table(&run.records, config.rows));

        if config.plot {
            let plot = crate::plot::render_trend_plot(
                &run.records,
                config.plot_width,
                config.plot_height,
            );
            println!("{plot}");
        }
    }

    // Optional exports.
    if let Some(path) = &config.export_csv {
        crate::io::write_records_csv(path, &run.records)?;
    }
    if let Some(path) = &config.export_json {
        crate::io::write_dashboard_json(path, &run, &config)?;
    }

    Ok(())
}

fn handle_countries(args: CountriesArgs) -> Result<(), AppError> {
    let directory = crate::data::DirectoryClient::from_env().fetch_directory()?;
    println!(
        "{}",
        crate::report::format_directory(&directory, args.filter.as_deref())
    );
    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let dashboard = crate::io::read_dashboard_json(&args.dashboard)?;
    let plot = crate::plot::render_trend_plot(&dashboard.records, args.width, args.height);
    println!(
        "{} | {} .. {}",
        dashboard.country, dashboard.start_date, dashboard.end_date
    );
    println!("{plot}");
    Ok(())
}

fn handle_tui(args: ChartArgs) -> Result<(), AppError> {
    let config = chart_config_from_args(&args)?;
    crate::tui::run(config)
}

pub fn chart_config_from_args(args: &ChartArgs) -> Result<ChartConfig, AppError> {
    Ok(ChartConfig {
        country: args.country.clone(),
        start_date: parse_canonical_date("start", &args.start)?,
        end_date: parse_canonical_date("end", &args.end)?,
        lastdays: args.lastdays,
        refs: crate::domain::RefDates {
            case_ref: args.case_ref.clone(),
            death_ref: args.death_ref.clone(),
            recover_ref: args.recover_ref.clone(),
        },
        rows: args.rows,
        plot: args.plot && !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        export_csv: args.export.clone(),
        export_json: args.export_json.clone(),
    })
}

/// Range bounds arrive from the user and must already be canonical
/// `YYYY-MM-DD`; everything downstream relies on lexicographic comparison.
fn parse_canonical_date(which: &str, raw: &str) -> Result<String, AppError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| AppError::input(format!("Invalid {which} date '{raw}': {e}")))?;
    Ok(raw.to_string())
}

/// Rewrite argv so `epi` defaults to `epi tui`.
///
/// Rules:
/// - `epi`                      -> `epi tui`
/// - `epi -c Brazil ...`        -> `epi tui -c Brazil ...`
/// - `epi --help/--version/-h`  -> unchanged (show top-level help/version)
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
        "chart" | "summary" | "countries" | "plot" | "tui"
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

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_tui() {
        assert_eq!(rewrite_args(argv(&["epi"])), argv(&["epi", "tui"]));
    }

    #[test]
    fn leading_flag_routes_to_tui() {
        assert_eq!(
            rewrite_args(argv(&["epi", "-c", "Brazil"])),
            argv(&["epi", "tui", "-c", "Brazil"])
        );
    }

    #[test]
    fn subcommands_and_help_pass_through() {
        assert_eq!(
            rewrite_args(argv(&["epi", "chart", "-c", "India"])),
            argv(&["epi", "chart", "-c", "India"])
        );
        assert_eq!(rewrite_args(argv(&["epi", "--help"])), argv(&["epi", "--help"]));
    }

    #[test]
    fn canonical_dates_are_validated() {
        assert!(parse_canonical_date("start", "2021-07-24").is_ok());
        assert!(parse_canonical_date("start", "7/24/21").is_err());
        assert!(parse_canonical_date("end", "2021-02-30").is_err());
    }
}
