//! Read/write dashboard JSON files.
//!
//! Dashboard JSON is the "portable" representation of one pipeline run:
//! - the selection (country, range, reference dates)
//! - derived scalars (metrics, totals)
//! - the chart-ready records, so `epi plot` can re-render offline
//!
//! The schema is defined by `domain::DashboardFile`.

use std::fs::File;
use std::path::Path;

use crate::app::pipeline::RunOutput;
use crate::domain::{ChartConfig, DashboardFile};
use crate::error::AppError;

/// Write a dashboard JSON file.
pub fn write_dashboard_json(
    path: &Path,
    run: &RunOutput,
    config: &ChartConfig,
) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::input(format!(
            "Failed to create dashboard JSON '{}': {e}",
            path.display()
        ))
    })?;

    let dashboard = DashboardFile {
        tool: "epi".to_string(),
        country: config.country.clone(),
        population: run.population,
        start_date: config.start_date.clone(),
        end_date: config.end_date.clone(),
        refs: config.refs.clone(),
        metrics: run.metrics.clone(),
        totals: run.totals.clone(),
        records: run.records.clone(),
    };

    serde_json::to_writer_pretty(file, &dashboard)
        .map_err(|e| AppError::input(format!("Failed to write dashboard JSON: {e}")))?;

    Ok(())
}

/// Read a dashboard JSON file.
pub fn read_dashboard_json(path: &Path) -> Result<DashboardFile, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::input(format!(
            "Failed to open dashboard JSON '{}': {e}",
            path.display()
        ))
    })?;
    let dashboard: DashboardFile = serde_json::from_reader(file)
        .map_err(|e| AppError::input(format!("Invalid dashboard JSON: {e}")))?;
    Ok(dashboard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AlignedRecord, Metrics, RefDates, SummaryTotal};

    #[test]
    fn dashboard_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.json");

        let config = ChartConfig {
            country: "India".to_string(),
            start_date: "2020-07-15".to_string(),
            end_date: "2021-07-24".to_string(),
            lastdays: 1500,
            refs: RefDates::default(),
            rows: 20,
            plot: false,
            plot_width: 80,
            plot_height: 20,
            export_csv: None,
            export_json: Some(path.clone()),
        };
        let run = RunOutput {
            population: Some(1_380_004_385),
            records: vec![AlignedRecord {
                date: "2020-07-15".to_string(),
                cases: Some(936_181),
                deaths: Some(24_309),
                recovered: None,
            }],
            aligned_len: 1,
            skipped: vec![],
            metrics: Metrics {
                case_pct: Some(3.2385),
                death_pct: Some(1.1876),
                recover_pct: None,
                case_total: Some(44_690_738),
                death_total: Some(530_779),
                recover_total: None,
            },
            totals: vec![SummaryTotal {
                label: "Total Cases".to_string(),
                value: 936_181,
            }],
        };

        write_dashboard_json(&path, &run, &config).unwrap();
        let loaded = read_dashboard_json(&path).unwrap();

        assert_eq!(loaded.tool, "epi");
        assert_eq!(loaded.country, "India");
        assert_eq!(loaded.population, Some(1_380_004_385));
        assert_eq!(loaded.records, run.records);
        assert_eq!(loaded.metrics, run.metrics);
        assert_eq!(loaded.totals, run.totals);
        // Undefined metrics survive as null, not as zero.
        assert_eq!(loaded.metrics.recover_pct, None);
    }

    #[test]
    fn reading_a_missing_file_is_an_input_error() {
        let err = read_dashboard_json(Path::new("/nonexistent/dashboard.json")).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
