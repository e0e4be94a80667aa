//! Scalar reference-date metrics.
//!
//! The percentages and magnitude figures are computed from fixed reference
//! dates in the RAW series (not from the chart's display range), so shifting
//! the range filter never moves the stat cards.

use crate::domain::{Metrics, RawSeries, RefDates};

/// Compute the stat-card scalars.
///
/// Each metric is `None` ("undefined") when its numerator is absent or its
/// denominator is zero or unknown; undefined metrics render as blanks
/// downstream, they never abort a run.
pub fn compute_metrics(
    cases: &RawSeries,
    deaths: &RawSeries,
    recovered: &RawSeries,
    population: Option<u64>,
    refs: &RefDates,
) -> Metrics {
    let case_total = cases.get(&refs.case_ref).copied();
    let death_total = deaths.get(&refs.death_ref).copied();
    let recover_total = recovered.get(&refs.recover_ref).copied();

    Metrics {
        case_pct: percentage(case_total, population),
        death_pct: percentage(death_total, case_total),
        recover_pct: percentage(recover_total, case_total),
        case_total,
        death_total,
        recover_total,
    }
}

/// `numerator / denominator * 100`, rounded to 4 decimal places.
///
/// A zero or missing denominator means "undefined", not a division error.
fn percentage(numerator: Option<u64>, denominator: Option<u64>) -> Option<f64> {
    let n = numerator?;
    let d = denominator?;
    if d == 0 {
        return None;
    }
    Some(round4(n as f64 / d as f64 * 100.0))
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Format a magnitude figure in millions: `round(value) / 1_000_000` to two
/// decimal places, with a trailing `M`.
pub fn convert_to_millions(value: f64) -> String {
    format!("{:.2}M", value.round() / 1_000_000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(entries: &[(&str, u64)]) -> RawSeries {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect()
    }

    fn refs() -> RefDates {
        RefDates::default()
    }

    #[test]
    fn case_pct_rounds_to_four_places() {
        let cases = series(&[("3/9/23", 1_000_000)]);
        let m = compute_metrics(
            &cases,
            &RawSeries::new(),
            &RawSeries::new(),
            Some(100_000_000),
            &refs(),
        );
        assert_eq!(m.case_pct, Some(1.0));
        assert_eq!(format!("{:.4}", m.case_pct.unwrap()), "1.0000");
    }

    #[test]
    fn death_and_recover_pct_use_case_denominator() {
        let cases = series(&[("3/9/23", 2_000)]);
        let deaths = series(&[("3/9/23", 30)]);
        let recovered = series(&[("8/4/21", 500)]);
        let m = compute_metrics(&cases, &deaths, &recovered, Some(1_000_000), &refs());
        assert_eq!(m.death_pct, Some(1.5));
        assert_eq!(m.recover_pct, Some(25.0));
    }

    #[test]
    fn recover_ref_is_independent_of_case_ref() {
        // Recovery data stops earlier than case data; the recovery reference
        // must not be forced onto the case reference date.
        let cases = series(&[("3/9/23", 100)]);
        let recovered = series(&[("8/4/21", 50), ("3/9/23", 0)]);
        let m = compute_metrics(
            &cases,
            &RawSeries::new(),
            &recovered,
            Some(1_000),
            &refs(),
        );
        assert_eq!(m.recover_total, Some(50));
        assert_eq!(m.recover_pct, Some(50.0));
    }

    #[test]
    fn zero_or_missing_population_is_undefined_not_a_crash() {
        let cases = series(&[("3/9/23", 100)]);
        let m = compute_metrics(&cases, &RawSeries::new(), &RawSeries::new(), Some(0), &refs());
        assert_eq!(m.case_pct, None);
        assert_eq!(m.case_total, Some(100));

        let m = compute_metrics(&cases, &RawSeries::new(), &RawSeries::new(), None, &refs());
        assert_eq!(m.case_pct, None);
    }

    #[test]
    fn missing_reference_observation_is_undefined() {
        let cases = series(&[("1/1/21", 100)]);
        let deaths = series(&[("3/9/23", 5)]);
        let m = compute_metrics(&cases, &deaths, &RawSeries::new(), Some(1_000), &refs());
        // cases has no entry at the case reference date.
        assert_eq!(m.case_total, None);
        assert_eq!(m.case_pct, None);
        // ...so the death percentage's denominator is undefined too.
        assert_eq!(m.death_total, Some(5));
        assert_eq!(m.death_pct, None);
    }

    #[test]
    fn zero_cases_denominator_is_undefined() {
        let cases = series(&[("3/9/23", 0)]);
        let deaths = series(&[("3/9/23", 0)]);
        let m = compute_metrics(&cases, &deaths, &RawSeries::new(), Some(1_000), &refs());
        assert_eq!(m.case_pct, Some(0.0));
        assert_eq!(m.death_pct, None);
    }

    #[test]
    fn convert_to_millions_examples() {
        assert_eq!(convert_to_millions(1_234_567.0), "1.23M");
        assert_eq!(convert_to_millions(1_000_000.0), "1.00M");
        assert_eq!(convert_to_millions(44_690_738.0), "44.69M");
        assert_eq!(convert_to_millions(0.0), "0.00M");
    }
}
