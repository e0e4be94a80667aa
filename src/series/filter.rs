//! Date-range filtering of aligned records.

use crate::domain::AlignedRecord;

/// Select the records whose canonical date lies in `[start, end]`, both
/// inclusive, preserving input order.
///
/// Lexicographic comparison is correct for `YYYY-MM-DD` strings. An inverted
/// range (`start > end`) or bounds outside the data's span simply yield an
/// empty vec; that is a defined result, not an error.
pub fn filter_range(records: &[AlignedRecord], start: &str, end: &str) -> Vec<AlignedRecord> {
    records
        .iter()
        .filter(|r| r.date.as_str() >= start && r.date.as_str() <= end)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str) -> AlignedRecord {
        AlignedRecord {
            date: date.to_string(),
            cases: Some(1),
            deaths: None,
            recovered: None,
        }
    }

    fn dates(records: &[AlignedRecord]) -> Vec<&str> {
        records.iter().map(|r| r.date.as_str()).collect()
    }

    #[test]
    fn bounds_are_inclusive() {
        let records = vec![
            record("2021-01-01"),
            record("2021-01-02"),
            record("2021-01-03"),
        ];
        let out = filter_range(&records, "2021-01-01", "2021-01-03");
        assert_eq!(dates(&out), vec!["2021-01-01", "2021-01-02", "2021-01-03"]);

        let out = filter_range(&records, "2021-01-02", "2021-01-02");
        assert_eq!(dates(&out), vec!["2021-01-02"]);
    }

    #[test]
    fn inverted_range_yields_empty() {
        let records = vec![record("2021-01-01"), record("2021-01-02")];
        assert!(filter_range(&records, "2021-01-02", "2021-01-01").is_empty());
    }

    #[test]
    fn out_of_span_bounds_yield_empty() {
        let records = vec![record("2021-01-01")];
        assert!(filter_range(&records, "2022-01-01", "2022-12-31").is_empty());
        assert!(filter_range(&records, "2019-01-01", "2019-12-31").is_empty());
    }

    #[test]
    fn widening_never_removes_records() {
        let records = vec![
            record("2021-01-01"),
            record("2021-02-01"),
            record("2021-03-01"),
        ];
        let narrow = filter_range(&records, "2021-01-15", "2021-02-15");
        let wide = filter_range(&records, "2021-01-01", "2021-03-01");
        for r in &narrow {
            assert!(wide.contains(r), "widening dropped {}", r.date);
        }
    }

    #[test]
    fn input_order_is_preserved() {
        let records = vec![
            record("2021-01-01"),
            record("2021-01-03"),
            record("2021-01-02"),
        ];
        let out = filter_range(&records, "2021-01-01", "2021-01-03");
        assert_eq!(dates(&out), vec!["2021-01-01", "2021-01-03", "2021-01-02"]);
    }
}
