//! Holiday source abstractions
//!
//! Provides a trait-based abstraction over the external holiday lookup,
//! enabling testable calendar logic through dependency injection. The
//! production implementation talks to a national-holidays HTTP API keyed
//! by year; any source honoring the same contract is substitutable.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HolidayFetchError {
    #[error("Holiday API request failed: {source}")]
    Request {
        #[from]
        source: reqwest::Error,
    },
    #[error("Holiday API returned HTTP {status} for year {year}")]
    Status { year: i32, status: u16 },
    #[error("Holiday API payload for year {year} is malformed: {message}")]
    MalformedPayload { year: i32, message: String },
}

/// Trait for external holiday lookups
///
/// A successful fetch yields the full set of holiday dates for the year; any
/// failure is a typed error so the caller can log why a year degraded to
/// holiday-free instead of swallowing the cause.
#[async_trait]
pub trait HolidaySource: Send + Sync {
    /// Fetch all holiday dates falling in `year`.
    async fn fetch_year(&self, year: i32) -> Result<BTreeSet<NaiveDate>, HolidayFetchError>;
}

/// One entry of the holiday API response. The API returns a JSON array of
/// objects; only the `date` field (`YYYY-MM-DD`) matters here.
#[derive(Debug, Deserialize)]
struct HolidayEntry {
    date: String,
}

/// HTTP client for the holiday API (`GET {base_url}/{year}`).
#[derive(Debug, Clone)]
pub struct HolidayApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl HolidayApiClient {
    /// Create a client with a bounded per-request timeout. The timeout is
    /// the only cancellation semantics the lookup carries; expiry surfaces
    /// as a `Request` error and degrades like any other failure.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, HolidayFetchError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    fn year_url(&self, year: i32) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), year)
    }
}

#[async_trait]
impl HolidaySource for HolidayApiClient {
    async fn fetch_year(&self, year: i32) -> Result<BTreeSet<NaiveDate>, HolidayFetchError> {
        let url = self.year_url(year);
        tracing::debug!(year, url = %url, "Fetching holiday calendar");

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(HolidayFetchError::Status {
                year,
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let entries: Vec<HolidayEntry> =
            serde_json::from_str(&body).map_err(|e| HolidayFetchError::MalformedPayload {
                year,
                message: e.to_string(),
            })?;

        let mut holidays = BTreeSet::new();
        for entry in entries {
            let date = NaiveDate::parse_from_str(&entry.date, "%Y-%m-%d").map_err(|e| {
                HolidayFetchError::MalformedPayload {
                    year,
                    message: format!("bad date {:?}: {}", entry.date, e),
                }
            })?;
            holidays.insert(date);
        }

        tracing::debug!(year, count = holidays.len(), "Holiday calendar fetched");
        Ok(holidays)
    }
}
