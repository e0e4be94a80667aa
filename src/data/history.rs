//! Historical series fetch (disease.sh).

use reqwest::blocking::Client;
use serde::Deserialize;

use crate::domain::{HistorySnapshot, RawSeries};
use crate::error::AppError;

const DEFAULT_BASE_URL: &str = "https://disease.sh/v3/covid-19/historical";

/// Environment override for the history endpoint.
pub const COVID_API_ENV: &str = "EPI_COVID_API";

/// Lookback window covering the source's full reporting span.
pub const DEFAULT_LASTDAYS: u32 = 1500;

pub struct HistoryClient {
    client: Client,
    base_url: String,
}

impl HistoryClient {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let base_url =
            std::env::var(COVID_API_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self {
            client: Client::new(),
            base_url,
        }
    }

    /// Fetch the three raw series for one country.
    ///
    /// The returned snapshot is tagged with the requested country so callers
    /// can discard results from a superseded selection.
    pub fn fetch_history(&self, country: &str, lastdays: u32) -> Result<HistorySnapshot, AppError> {
        let url = format!("{}/{country}", self.base_url);
        log::debug!("fetching history for '{country}' (lastdays={lastdays})");

        let resp = self
            .client
            .get(&url)
            .query(&[("lastdays", lastdays.to_string())])
            .send()
            .map_err(|e| AppError::runtime(format!("History request failed: {e}")))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(AppError::runtime(format!(
                "No historical data found for '{country}'."
            )));
        }
        if !resp.status().is_success() {
            return Err(AppError::runtime(format!(
                "History request failed with status {}.",
                resp.status()
            )));
        }

        let body: ApiHistory = resp
            .json()
            .map_err(|e| AppError::runtime(format!("Failed to parse history response: {e}")))?;

        Ok(HistorySnapshot {
            country: country.to_string(),
            cases: body.timeline.cases,
            deaths: body.timeline.deaths,
            recovered: body.timeline.recovered,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ApiHistory {
    timeline: ApiTimeline,
}

#[derive(Debug, Deserialize)]
struct ApiTimeline {
    #[serde(default)]
    cases: RawSeries,
    #[serde(default)]
    deaths: RawSeries,
    #[serde(default)]
    recovered: RawSeries,
}
