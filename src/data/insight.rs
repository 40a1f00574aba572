//! Mars InSight weather feed client
//!
//! Fetches the InSight weather report, converts it into the configured units,
//! and keeps the result for an hour so repeated requests stay under the feed's
//! rate limit.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::{convert_report, ConversionError, Report, Sol};
use crate::cache::{CachedReport, ReportCache};
use crate::units::{UnitConfig, UnitError};

/// Base URL for the InSight weather feed
const INSIGHT_BASE_URL: &str = "https://mars.nasa.gov/rss/api/";

/// Query selecting the JSON weather feed, version 1.0
const FEED_QUERY: [(&str, &str); 4] = [
    ("feed", "weather"),
    ("category", "insight"),
    ("feedtype", "json"),
    ("ver", "1.0"),
];

/// Minimum time between two fetches
pub const RATE_LIMIT: Duration = Duration::from_secs(60 * 60);

/// Errors that can occur when requesting or reading weather reports
#[derive(Debug, Error)]
pub enum WeatherError {
    /// HTTP request failed before a response arrived
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// The feed answered with something other than 200 OK
    #[error("HTTP {status} from {url}")]
    Status {
        /// Response status code
        status: u16,
        /// URL that was requested
        url: String,
    },

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// A measurement that has to be converted is malformed
    #[error("Failed to convert report: {0}")]
    Conversion(#[from] ConversionError),

    /// A report was read before any request succeeded
    #[error("No weather report has been fetched yet")]
    NotFetched,

    /// The requested sol is not part of the cached report
    #[error("Sol {0} is not in the current report")]
    UnknownSol(String),

    /// The cached report lists no sols
    #[error("The current report contains no sols")]
    NoSols,
}

impl WeatherError {
    /// HTTP status code attached to this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            WeatherError::Status { status, .. } => Some(*status),
            WeatherError::RequestFailed(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Client for the InSight weather feed
///
/// Each client owns its own cache. Requests made within [`RATE_LIMIT`] of the
/// last successful fetch are answered from that cache without touching the
/// network.
///
/// Overlapping calls to [`InsightClient::request`] are not coalesced: each
/// checks the cache it sees when it starts, so two calls racing on a stale
/// cache both fetch and the one that finishes last is kept.
#[derive(Debug)]
pub struct InsightClient {
    http_client: Client,
    base_url: String,
    units: UnitConfig,
    rate_limit: Duration,
    cache: ReportCache,
}

impl Default for InsightClient {
    fn default() -> Self {
        Self::new(UnitConfig::default())
    }
}

impl InsightClient {
    /// Create a new InsightClient converting into `units`
    pub fn new(units: UnitConfig) -> Self {
        Self {
            http_client: Client::new(),
            base_url: INSIGHT_BASE_URL.to_string(),
            units,
            rate_limit: RATE_LIMIT,
            cache: ReportCache::new(),
        }
    }

    /// Create a new InsightClient from unit names
    ///
    /// Omitted names fall back to the feed units (C, Pa, m/s).
    ///
    /// # Returns
    /// * `Ok(InsightClient)` - Client ready to request
    /// * `Err(UnitError)` - If any unit name is unsupported
    pub fn from_unit_names(
        temperature: Option<&str>,
        pressure: Option<&str>,
        wind_speed: Option<&str>,
    ) -> Result<Self, UnitError> {
        UnitConfig::from_names(temperature, pressure, wind_speed).map(Self::new)
    }

    /// Use a custom HTTP client, e.g. one with a request timeout
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http_client = client;
        self
    }

    /// Point the client at a different feed URL (query parameters are appended)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Change the window during which cached reports are reused
    pub fn with_rate_limit(mut self, rate_limit: Duration) -> Self {
        self.rate_limit = rate_limit;
        self
    }

    /// Units reports are converted into
    pub fn units(&self) -> &UnitConfig {
        &self.units
    }

    /// When the cached report was fetched, if there is one
    pub fn last_fetched_at(&self) -> Option<DateTime<Utc>> {
        self.cache.read().map(|entry| entry.fetched_at)
    }

    /// Request the converted weather report
    ///
    /// Returns the cached report if the last successful fetch is younger than
    /// the rate limit. Otherwise fetches, converts, and caches a new report.
    /// A failed fetch leaves the cache untouched.
    ///
    /// # Returns
    /// * `Ok(Arc<Report>)` - The converted report
    /// * `Err(WeatherError)` - Transport, status, decode, or conversion failure
    pub async fn request(&self) -> Result<Arc<Report>, WeatherError> {
        if let Some(cached) = self.cache.fresh(Utc::now(), self.rate_limit) {
            debug!(fetched_at = %cached.fetched_at, "serving cached InSight report");
            return Ok(Arc::clone(&cached.converted));
        }

        debug!(url = %self.base_url, "fetching InSight report");
        let raw = match self.fetch_report().await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "InSight weather request failed");
                return Err(e);
            }
        };

        let converted = match convert_report(&raw, &self.units) {
            Ok(converted) => converted,
            Err(e) => {
                warn!(error = %e, units = %self.units, "InSight report could not be converted");
                return Err(e.into());
            }
        };
        let entry = self.cache.store(CachedReport::new(raw, converted, Utc::now()));
        info!(
            sols = entry.converted.sol_count(),
            latest = entry.converted.latest_sol_key().unwrap_or("-"),
            units = %self.units,
            "fetched InSight report"
        );

        Ok(Arc::clone(&entry.converted))
    }

    /// Request the converted report and hand the outcome to `callback`
    ///
    /// `callback` runs exactly once, after the request completes.
    pub async fn request_with<F>(&self, callback: F)
    where
        F: FnOnce(Result<Arc<Report>, WeatherError>),
    {
        callback(self.request().await);
    }

    /// Fetch and decode the report from the feed
    async fn fetch_report(&self) -> Result<Report, WeatherError> {
        let response = self
            .http_client
            .get(&self.base_url)
            .query(&FEED_QUERY)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(WeatherError::Status {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }

        let text = response.text().await?;
        let report: Report = serde_json::from_str(&text)?;
        Ok(report)
    }

    fn snapshot(&self) -> Result<Arc<CachedReport>, WeatherError> {
        self.cache.read().ok_or(WeatherError::NotFetched)
    }

    /// The report exactly as the feed sent it
    ///
    /// Requires a prior successful [`InsightClient::request`]; otherwise
    /// returns `WeatherError::NotFetched`. The same holds for every accessor
    /// below.
    pub fn raw_report(&self) -> Result<Arc<Report>, WeatherError> {
        Ok(Arc::clone(&self.snapshot()?.raw))
    }

    /// The report in the client's units
    pub fn converted_report(&self) -> Result<Arc<Report>, WeatherError> {
        Ok(Arc::clone(&self.snapshot()?.converted))
    }

    /// One converted sol record
    pub fn sol(&self, key: &str) -> Result<Sol, WeatherError> {
        self.snapshot()?
            .converted
            .sol(key)
            .cloned()
            .ok_or_else(|| WeatherError::UnknownSol(key.to_string()))
    }

    /// All sol keys, oldest first
    pub fn sol_keys(&self) -> Result<Vec<String>, WeatherError> {
        Ok(self.snapshot()?.converted.sol_keys().to_vec())
    }

    /// The most recent sol key
    pub fn latest_sol_key(&self) -> Result<String, WeatherError> {
        self.snapshot()?
            .converted
            .latest_sol_key()
            .map(str::to_string)
            .ok_or(WeatherError::NoSols)
    }

    /// The converted record for the most recent sol
    pub fn latest_sol(&self) -> Result<Sol, WeatherError> {
        let key = self.latest_sol_key()?;
        self.sol(&key)
    }
}
