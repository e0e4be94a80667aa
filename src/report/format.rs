//! Formatted terminal output: run summary, stat cards, totals, record table.
//!
//! We keep formatting code in one place so:
//! - the pipeline code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use crate::app::pipeline::RunOutput;
use crate::domain::{AlignedRecord, ChartConfig, CountryDirectory, Metrics, SummaryTotal};
use crate::stats::convert_to_millions;

/// Format the run header (selection + dataset shape).
pub fn format_run_summary(run: &RunOutput, config: &ChartConfig) -> String {
    let mut out = String::new();

    out.push_str("=== epi - COVID-19 country trends ===\n");
    out.push_str(&format!("Country: {}\n", config.country));
    out.push_str(&format!(
        "Population: {}\n",
        run.population
            .map(group_digits)
            .unwrap_or_else(|| "unknown".to_string())
    ));
    out.push_str(&format!(
        "Range: {} .. {} (inclusive)\n",
        config.start_date, config.end_date
    ));
    out.push_str(&format!(
        "Records: {} in range ({} aligned, {} skipped keys)\n",
        run.records.len(),
        run.aligned_len,
        run.skipped.len()
    ));

    out
}

/// Format the three stat cards (magnitude + percentage at the reference dates).
pub fn format_metrics(metrics: &Metrics) -> String {
    let mut out = String::new();

    out.push_str("Stat cards (at reference dates):\n");
    out.push_str(&format!(
        "- Total Cases      {:>8}  {}\n",
        fmt_millions(metrics.case_total),
        fmt_pct(metrics.case_pct)
    ));
    out.push_str(&format!(
        "- Recoveries       {:>8}  {}\n",
        fmt_millions(metrics.recover_total),
        fmt_pct(metrics.recover_pct)
    ));
    out.push_str(&format!(
        "- Deaths           {:>8}  {}\n",
        fmt_millions(metrics.death_total),
        fmt_pct(metrics.death_pct)
    ));

    out
}

/// Format the labeled totals of the filtered range.
pub fn format_totals(totals: &[SummaryTotal]) -> String {
    let mut out = String::new();
    out.push_str("Range totals (last record in range):\n");
    for t in totals {
        out.push_str(&format!("- {:<16} {:>14}\n", t.label, group_digits(t.value)));
    }
    out
}

/// Format the trailing `rows` records as a table.
pub fn format_table(records: &[AlignedRecord], rows: usize) -> String {
    let mut out = String::new();

    if records.is_empty() {
        out.push_str("No records in range.\n");
        return out;
    }

    let shown = records.len().min(rows.max(1));
    out.push_str(&format!(
        "Last {shown} of {} record(s):\n",
        records.len()
    ));

    out.push_str(
        format!(
            "{:<12} {:>14} {:>12} {:>14}\n",
            "date", "cases", "deaths", "recovered"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!("{:-<12} {:-<14} {:-<12} {:-<14}\n", "", "", "", "").trim_end(),
    );
    out.push('\n');

    for r in &records[records.len() - shown..] {
        out.push_str(
            format!(
                "{:<12} {:>14} {:>12} {:>14}\n",
                r.date,
                fmt_count(r.cases),
                fmt_count(r.deaths),
                fmt_count(r.recovered),
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

/// Format the country directory listing, optionally filtered by substring.
pub fn format_directory(directory: &CountryDirectory, filter: Option<&str>) -> String {
    let needle = filter.map(str::to_lowercase);
    let mut out = String::new();
    let mut shown = 0usize;

    out.push_str(format!("{:<40} {:>14}\n", "country", "population").trim_end());
    out.push('\n');

    for c in directory.countries() {
        if let Some(needle) = &needle {
            if !c.name.to_lowercase().contains(needle) {
                continue;
            }
        }
        shown += 1;
        out.push_str(
            format!("{:<40} {:>14}\n", c.name, group_digits(c.population)).trim_end(),
        );
        out.push('\n');
    }

    out.push_str(&format!("{shown} of {} countries\n", directory.len()));
    out
}

fn fmt_count(v: Option<u64>) -> String {
    match v {
        Some(v) => group_digits(v),
        None => "-".to_string(),
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

/// Group digits with commas (display only).
fn group_digits(v: u64) -> String {
    let digits = v.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RefDates;

    fn record(date: &str, cases: Option<u64>) -> AlignedRecord {
        AlignedRecord {
            date: date.to_string(),
            cases,
            deaths: None,
            recovered: None,
        }
    }

    #[test]
    fn group_digits_inserts_commas() {
        assert_eq!(group_digits(0), "0");
        assert_eq!(group_digits(999), "999");
        assert_eq!(group_digits(1_000), "1,000");
        assert_eq!(group_digits(44_690_738), "44,690,738");
    }

    #[test]
    fn metrics_render_undefined_as_dash() {
        let metrics = Metrics {
            case_pct: Some(1.0),
            death_pct: None,
            recover_pct: None,
            case_total: Some(1_234_567),
            death_total: None,
            recover_total: None,
        };
        let text = format_metrics(&metrics);
        assert!(text.contains("1.23M"));
        assert!(text.contains("1.0000%"));
        assert!(text.contains('-'));
    }

    #[test]
    fn table_shows_trailing_rows() {
        let records = vec![
            record("2021-01-01", Some(1)),
            record("2021-01-02", Some(2)),
            record("2021-01-03", Some(3)),
        ];
        let text = format_table(&records, 2);
        assert!(!text.contains("2021-01-01"));
        assert!(text.contains("2021-01-02"));
        assert!(text.contains("2021-01-03"));
        assert!(text.contains("Last 2 of 3"));
    }

    #[test]
    fn empty_table_has_a_message() {
        assert!(format_table(&[], 10).contains("No records in range."));
    }

    #[test]
    fn run_summary_names_the_selection() {
        let config = ChartConfig {
            country: "Brazil".to_string(),
            start_date: "2020-07-15".to_string(),
            end_date: "2021-07-24".to_string(),
            lastdays: 1500,
            refs: RefDates::default(),
            rows: 20,
            plot: false,
            plot_width: 80,
            plot_height: 20,
            export_csv: None,
            export_json: None,
        };
        let run = RunOutput {
            population: Some(212_559_409),
            records: vec![record("2020-07-15", Some(1))],
            aligned_len: 10,
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
        let text = format_run_summary(&run, &config);
        assert!(text.contains("Brazil"));
        assert!(text.contains("212,559,409"));
        assert!(text.contains("1 in range (10 aligned, 0 skipped keys)"));
    }
}
