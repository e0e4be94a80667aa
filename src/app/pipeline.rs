//! Shared "chart pipeline" logic used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! directory fetch -> history fetch -> align -> range filter -> metrics -> totals
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use crate::data::{DirectoryClient, HistoryClient};
use crate::domain::{AlignedRecord, ChartConfig, HistorySnapshot, Metrics, SummaryTotal};
use crate::error::AppError;
use crate::series::align::SkippedDate;

/// All computed outputs of a single chart run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    /// Population of the selected country, when the directory knows it.
    pub population: Option<u64>,
    /// Chart-ready records: aligned, then range-filtered.
    pub records: Vec<AlignedRecord>,
    /// Number of aligned records before the range filter.
    pub aligned_len: usize,
    /// Raw date keys dropped during alignment.
    pub skipped: Vec<SkippedDate>,
    pub metrics: Metrics,
    pub totals: Vec<SummaryTotal>,
}

/// Fetch both sources and execute the full pipeline.
pub fn run_chart(config: &ChartConfig) -> Result<RunOutput, AppError> {
    let directory = DirectoryClient::from_env().fetch_directory()?;
    let population = directory.population_of(&config.country);

    let history = HistoryClient::from_env().fetch_history(&config.country, config.lastdays)?;

    run_chart_with_data(config, population, &history)
}

/// Execute the pipeline against pre-fetched data.
///
/// This is what the TUI calls on range changes, where recomputing must not
/// trigger a refetch. Every invocation builds fresh output from scratch;
/// nothing is updated incrementally.
pub fn run_chart_with_data(
    config: &ChartConfig,
    population: Option<u64>,
    history: &HistorySnapshot,
) -> Result<RunOutput, AppError> {
    let aligned = crate::series::align(&history.cases, &history.deaths, &history.recovered);
    for skip in &aligned.skipped {
        log::warn!("skipping history key: {}", skip.reason);
    }

    let records =
        crate::series::filter_range(&aligned.records, &config.start_date, &config.end_date);

    let metrics = crate::stats::compute_metrics(
        &history.cases,
        &history.deaths,
        &history.recovered,
        population,
        &config.refs,
    );
    let totals = crate::stats::aggregate(&records);

    Ok(RunOutput {
        population,
        aligned_len: aligned.records.len(),
        records,
        skipped: aligned.skipped,
        metrics,
        totals,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RawSeries, RefDates};

    fn series(entries: &[(&str, u64)]) -> RawSeries {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect()
    }

    fn config() -> ChartConfig {
        ChartConfig {
            country: "India".to_string(),
            start_date: "2021-01-01".to_string(),
            end_date: "2021-01-31".to_string(),
            lastdays: 1500,
            refs: RefDates {
                case_ref: "1/3/21".to_string(),
                death_ref: "1/3/21".to_string(),
                recover_ref: "1/2/21".to_string(),
            },
            rows: 20,
            plot: false,
            plot_width: 80,
            plot_height: 20,
            export_csv: None,
            export_json: None,
        }
    }

    fn snapshot() -> HistorySnapshot {
        HistorySnapshot {
            country: "India".to_string(),
            cases: series(&[("12/31/20", 90), ("1/1/21", 100), ("1/2/21", 110), ("1/3/21", 125)]),
            deaths: series(&[("1/1/21", 5), ("1/3/21", 6)]),
            recovered: series(&[("1/2/21", 50), ("bogus", 1)]),
        }
    }

    #[test]
    fn run_produces_filtered_records_and_totals() {
        let out = run_chart_with_data(&config(), Some(1_000), &snapshot()).unwrap();

        // 12/31/20 aligns but falls outside the range.
        assert_eq!(out.aligned_len, 4);
        assert_eq!(out.records.len(), 3);
        assert_eq!(out.records[0].date, "2021-01-01");
        assert_eq!(out.records[2].date, "2021-01-03");

        assert_eq!(out.skipped.len(), 1);
        assert_eq!(out.skipped[0].raw, "bogus");

        // Totals come from the last filtered record.
        assert_eq!(out.totals[0].value, 125);
        assert_eq!(out.totals[1].value, 6);
        assert_eq!(out.totals[2].value, 0);

        assert_eq!(out.metrics.case_total, Some(125));
        assert_eq!(out.metrics.case_pct, Some(12.5));
        assert_eq!(out.metrics.death_pct, Some(4.8));
        assert_eq!(out.metrics.recover_pct, Some(40.0));
    }

    #[test]
    fn unknown_population_leaves_metrics_undefined_but_chart_intact() {
        let out = run_chart_with_data(&config(), None, &snapshot()).unwrap();
        assert_eq!(out.metrics.case_pct, None);
        // Ratios over cases are still defined.
        assert_eq!(out.metrics.death_pct, Some(4.8));
        assert_eq!(out.records.len(), 3);
    }

    #[test]
    fn inverted_range_yields_empty_chart_not_an_error() {
        let mut cfg = config();
        cfg.start_date = "2021-02-01".to_string();
        cfg.end_date = "2021-01-01".to_string();
        let out = run_chart_with_data(&cfg, Some(1_000), &snapshot()).unwrap();
        assert!(out.records.is_empty());
        assert!(out.totals.iter().all(|t| t.value == 0));
    }
}
