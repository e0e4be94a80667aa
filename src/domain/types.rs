//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during a pipeline run
//! - exported to JSON/CSV dashboards
//! - reloaded later for plotting or comparisons

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Earliest selectable start date (first date in the upstream history).
pub const RANGE_FLOOR: &str = "2020-01-22";

/// Latest selectable end date (the upstream history stops here).
pub const RANGE_CEILING: &str = "2023-03-09";

/// A per-metric historical series as fetched: source-format `M/D/YY` date
/// string -> cumulative count. Key sets need not be aligned across metrics.
pub type RawSeries = HashMap<String, u64>;

/// One entry of the country directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountryRecord {
    pub name: String,
    pub population: u64,
}

/// The full country directory, sorted ascending by name.
///
/// Fetched once per selection and treated as immutable afterwards; population
/// lookups are exact-name matches against the current selection.
#[derive(Debug, Clone)]
pub struct CountryDirectory {
    countries: Vec<CountryRecord>,
}

impl CountryDirectory {
    /// Build a directory from unsorted entries.
    ///
    /// Sorting is case-insensitive by name, then by raw name so ties are
    /// deterministic. This stands in for the locale-aware collation the
    /// upstream UI used.
    pub fn from_records(mut countries: Vec<CountryRecord>) -> Self {
        countries.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.name.cmp(&b.name))
        });
        Self { countries }
    }

    pub fn countries(&self) -> &[CountryRecord] {
        &self.countries
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    /// Exact-name population lookup. `None` when the selection is not in the
    /// directory; the metrics layer turns that into undefined percentages.
    pub fn population_of(&self, name: &str) -> Option<u64> {
        self.countries
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.population)
    }

    /// Index of a country by exact name (for cycling in the TUI).
    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.countries.iter().position(|c| c.name == name)
    }
}

/// A fetched historical series for one country.
///
/// `country` records which selection the fetch was issued for, so stale
/// results from a superseded selection can be discarded instead of relying on
/// completion order.
#[derive(Debug, Clone)]
pub struct HistorySnapshot {
    pub country: String,
    pub cases: RawSeries,
    pub deaths: RawSeries,
    pub recovered: RawSeries,
}

/// A per-date record merging the three metrics after date normalization.
///
/// `date` is canonical `YYYY-MM-DD`; a `None` metric means the source series
/// had no entry for that date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignedRecord {
    pub date: String,
    pub cases: Option<u64>,
    pub deaths: Option<u64>,
    pub recovered: Option<u64>,
}

/// One labeled total for categorical display (e.g. the donut chart).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryTotal {
    pub label: String,
    pub value: u64,
}

/// Reference dates for the scalar metrics, in source format (`M/D/YY`)
/// because they index the raw series directly.
///
/// These are independent parameters: the recovery reference in particular
/// differs in calendar date from the others (the upstream source stopped
/// reporting recoveries earlier). Never assume they coincide.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefDates {
    pub case_ref: String,
    pub death_ref: String,
    pub recover_ref: String,
}

impl Default for RefDates {
    fn default() -> Self {
        Self {
            case_ref: "3/9/23".to_string(),
            death_ref: "3/9/23".to_string(),
            recover_ref: "8/4/21".to_string(),
        }
    }
}

/// Scalar derived statistics at the reference dates.
///
/// `None` is the "undefined metric" sentinel (zero/unknown denominator or a
/// missing reference observation); it renders as `-` in reports and `null`
/// in JSON, never as an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    /// Cases at `case_ref` as a percentage of population, rounded to 4dp.
    pub case_pct: Option<f64>,
    /// Deaths at `death_ref` as a percentage of cases at `case_ref`, 4dp.
    pub death_pct: Option<f64>,
    /// Recoveries at `recover_ref` as a percentage of cases at `case_ref`, 4dp.
    pub recover_pct: Option<f64>,
    /// Raw counts at the respective reference dates.
    pub case_total: Option<u64>,
    pub death_total: Option<u64>,
    pub recover_total: Option<u64>,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct ChartConfig {
    pub country: String,
    /// Canonical `YYYY-MM-DD` range bounds, both inclusive.
    pub start_date: String,
    pub end_date: String,
    /// Lookback window passed to the history source.
    pub lastdays: u32,
    pub refs: RefDates,

    /// Number of trailing rows shown in the record table.
    pub rows: usize,
    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub export_csv: Option<PathBuf>,
    pub export_json: Option<PathBuf>,
}

/// A saved dashboard file (JSON).
///
/// This is the "portable" representation of one pipeline run: selection,
/// derived scalars, and the chart-ready records, re-plottable offline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardFile {
    pub tool: String,
    pub country: String,
    pub population: Option<u64>,
    pub start_date: String,
    pub end_date: String,
    pub refs: RefDates,
    pub metrics: Metrics,
    pub totals: Vec<SummaryTotal>,
    pub records: Vec<AlignedRecord>,
}
