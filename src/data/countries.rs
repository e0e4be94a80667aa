//! Country directory fetch (restcountries).

use reqwest::blocking::Client;
use serde::Deserialize;

use crate::domain::{CountryDirectory, CountryRecord};
use crate::error::AppError;

const DEFAULT_BASE_URL: &str = "https://restcountries.com/v3.1/all";

/// Environment override for the directory endpoint.
pub const COUNTRY_API_ENV: &str = "EPI_COUNTRY_API";

pub struct DirectoryClient {
    client: Client,
    base_url: String,
}

impl DirectoryClient {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let base_url =
            std::env::var(COUNTRY_API_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self {
            client: Client::new(),
            base_url,
        }
    }

    /// Fetch the full directory, sorted ascending by name.
    pub fn fetch_directory(&self) -> Result<CountryDirectory, AppError> {
        log::debug!("fetching country directory from {}", self.base_url);

        let resp = self
            .client
            .get(&self.base_url)
            // Current API versions reject unfiltered /all requests.
            .query(&[("fields", "name,population")])
            .send()
            .map_err(|e| AppError::runtime(format!("Country directory request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::runtime(format!(
                "Country directory request failed with status {}.",
                resp.status()
            )));
        }

        let body: Vec<ApiCountry> = resp.json().map_err(|e| {
            AppError::runtime(format!("Failed to parse country directory response: {e}"))
        })?;

        if body.is_empty() {
            return Err(AppError::runtime("Country directory response was empty."));
        }

        Ok(directory_from_api(body))
    }
}

#[derive(Debug, Deserialize)]
struct ApiCountry {
    name: ApiCountryName,
    #[serde(default)]
    population: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ApiCountryName {
    common: String,
}

fn directory_from_api(body: Vec<ApiCountry>) -> CountryDirectory {
    let records = body
        .into_iter()
        .map(|c| CountryRecord {
            name: c.name.common,
            population: c.population.unwrap_or(0),
        })
        .collect();
    CountryDirectory::from_records(records)
}
