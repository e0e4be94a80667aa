//! Labeled totals for categorical display.

use crate::domain::{AlignedRecord, SummaryTotal};

/// Reduce the filtered records to three labeled totals.
//
// The totals are the metric fields of the LAST record in the sequence
// (missing fields count as 0), not a sum across it: the series are cumulative
// counters, so the final filtered date already holds the running total.
// Summing would double-count and change the displayed semantics.
pub fn aggregate(records: &[AlignedRecord]) -> Vec<SummaryTotal> {
    let last = records.last();
    let total = |value: Option<Option<u64>>| value.flatten().unwrap_or(0);

    vec![
        SummaryTotal {
            label: "Total Cases".to_string(),
            value: total(last.map(|r| r.cases)),
        },
        SummaryTotal {
            label: "Total Deaths".to_string(),
            value: total(last.map(|r| r.deaths)),
        },
        SummaryTotal {
            label: "Total Recoveries".to_string(),
            value: total(last.map(|r| r.recovered)),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str, cases: Option<u64>, deaths: Option<u64>, recovered: Option<u64>) -> AlignedRecord {
        AlignedRecord {
            date: date.to_string(),
            cases,
            deaths,
            recovered,
        }
    }

    #[test]
    fn last_record_wins_not_the_sum() {
        let records = vec![
            record("2021-01-01", Some(10), None, None),
            record("2021-01-02", Some(25), Some(3), Some(2)),
        ];
        let totals = aggregate(&records);
        assert_eq!(totals.len(), 3);
        assert_eq!(totals[0].label, "Total Cases");
        // 25, not 10 + 25 = 35.
        assert_eq!(totals[0].value, 25);
        assert_eq!(totals[1].value, 3);
        assert_eq!(totals[2].value, 2);
    }

    #[test]
    fn missing_metrics_in_last_record_count_as_zero() {
        let records = vec![record("2021-01-01", Some(7), None, None)];
        let totals = aggregate(&records);
        assert_eq!(totals[0].value, 7);
        assert_eq!(totals[1].value, 0);
        assert_eq!(totals[2].value, 0);
    }

    #[test]
    fn empty_sequence_yields_labeled_zeros() {
        let totals = aggregate(&[]);
        let labels: Vec<&str> = totals.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["Total Cases", "Total Deaths", "Total Recoveries"]);
        assert!(totals.iter().all(|t| t.value == 0));
    }
}
