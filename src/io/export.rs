//! Export filtered records to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::AlignedRecord;
use crate::error::AppError;

/// Write the chart-ready records to a CSV file.
///
/// Missing metrics are written as empty cells, not zeros, so consumers can
/// tell "no observation" from "observed zero".
pub fn write_records_csv(path: &Path, records: &[AlignedRecord]) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::input(format!(
            "Failed to create export CSV '{}': {e}",
            path.display()
        ))
    })?;

    writeln!(file, "date,cases,deaths,recovered")
        .map_err(|e| AppError::input(format!("Failed to write export CSV header: {e}")))?;

    for r in records {
        writeln!(
            file,
            "{},{},{},{}",
            r.date,
            fmt_cell(r.cases),
            fmt_cell(r.deaths),
            fmt_cell(r.recovered),
        )
        .map_err(|e| AppError::input(format!("Failed to write export CSV row: {e}")))?;
    }

    Ok(())
}

fn fmt_cell(v: Option<u64>) -> String {
    v.map(|v| v.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_header_rows_and_blank_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.csv");

        let records = vec![
            AlignedRecord {
                date: "2021-01-01".to_string(),
                cases: Some(100),
                deaths: Some(2),
                recovered: None,
            },
            AlignedRecord {
                date: "2021-01-02".to_string(),
                cases: Some(120),
                deaths: None,
                recovered: Some(50),
            },
        ];

        write_records_csv(&path, &records).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "date,cases,deaths,recovered");
        assert_eq!(lines[1], "2021-01-01,100,2,");
        assert_eq!(lines[2], "2021-01-02,120,,50");
    }
}
