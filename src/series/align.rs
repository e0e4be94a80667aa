//! Three-series alignment.
//!
//! The history source returns cases/deaths/recovered as separate date-keyed
//! maps whose key sets need not agree. Alignment takes the union of all keys,
//! normalizes each to canonical form, and produces one record per canonical
//! date with each metric filled from its own series when present.

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::{AlignedRecord, RawSeries};
use crate::series::normalize::normalize_date;

/// A raw date key dropped during alignment, with the reason.
///
/// Skips are local: the rest of the run proceeds without the offending key.
#[derive(Debug, Clone)]
pub struct SkippedDate {
    pub raw: String,
    pub reason: String,
}

/// Alignment output: ordered records plus the keys that were skipped.
#[derive(Debug, Clone)]
pub struct AlignedSeries {
    pub records: Vec<AlignedRecord>,
    pub skipped: Vec<SkippedDate>,
}

/// Align the three raw series into one ascending sequence of per-date records.
///
/// Collisions (two raw spellings normalizing to the same canonical date) are
/// resolved by processing keys in (canonical, raw) order, so the
/// later-processed spelling silently overwrites the metrics it carries. The
/// sort makes "later" deterministic; raw maps iterate in arbitrary order.
pub fn align(cases: &RawSeries, deaths: &RawSeries, recovered: &RawSeries) -> AlignedSeries {
    let union: BTreeSet<&str> = cases
        .keys()
        .chain(deaths.keys())
        .chain(recovered.keys())
        .map(String::as_str)
        .collect();

    let mut skipped = Vec::new();
    let mut keyed: Vec<(String, &str)> = Vec::with_capacity(union.len());
    for raw in union {
        match normalize_date(raw) {
            Ok(canonical) => keyed.push((canonical, raw)),
            Err(err) => skipped.push(SkippedDate {
                raw: raw.to_string(),
                reason: err.to_string(),
            }),
        }
    }
    keyed.sort();

    let mut merged: BTreeMap<String, AlignedRecord> = BTreeMap::new();
    for (canonical, raw) in keyed {
        let record = merged
            .entry(canonical.clone())
            .or_insert_with(|| AlignedRecord {
                date: canonical,
                cases: None,
                deaths: None,
                recovered: None,
            });
        if let Some(v) = cases.get(raw) {
            record.cases = Some(*v);
        }
        if let Some(v) = deaths.get(raw) {
            record.deaths = Some(*v);
        }
        if let Some(v) = recovered.get(raw) {
            record.recovered = Some(*v);
        }
    }

    AlignedSeries {
        records: merged.into_values().collect(),
        skipped,
    }
}
