//! Source-date normalization.
//!
//! The history source keys its series by `M/D/YY` strings (1- or 2-digit
//! month/day, 2-digit year meaning 2000+YY). Everything downstream compares
//! and sorts dates lexicographically, which only works in canonical
//! `YYYY-MM-DD` form, so normalization happens exactly once, at alignment.

use chrono::NaiveDate;

/// A raw date string that does not parse as `M/D/YY`.
///
/// This is a per-key condition: alignment skips the offending key and keeps
/// going, it never aborts the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFormatError {
    raw: String,
}

impl DateFormatError {
    pub fn raw(&self) -> &str {
        &self.raw
    }
}

impl std::fmt::Display for DateFormatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid source date '{}' (expected M/D/YY)", self.raw)
    }
}

impl std::error::Error for DateFormatError {}

/// Convert a source-format `M/D/YY` date to canonical `YYYY-MM-DD`.
///
/// Pure and deterministic: same input, same output, every call. Calendar
/// validity (month range, day-of-month, leap years) is enforced via chrono
/// rather than re-implemented here.
pub fn normalize_date(raw: &str) -> Result<String, DateFormatError> {
    let err = || DateFormatError {
        raw: raw.to_string(),
    };

    let mut parts = raw.split('/');
    let (Some(m), Some(d), Some(y), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(err());
    };

    let month: u32 = parse_component(m, 2).ok_or_else(err)?;
    let day: u32 = parse_component(d, 2).ok_or_else(err)?;
    let year: u32 = parse_component(y, 2).ok_or_else(err)?;

    let date =
        NaiveDate::from_ymd_opt(2000 + year as i32, month, day).ok_or_else(err)?;
    Ok(date.format("%Y-%m-%d").to_string())
}

/// Parse a 1..=`max_len` digit component. Signs, spaces, and empty strings
/// all fail here rather than deeper in date construction.
fn parse_component(s: &str, max_len: usize) -> Option<u32> {
    if s.is_empty() || s.len() > max_len || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
