//! Cached holiday calendar provider
//!
//! Read-through cache in front of a [`HolidaySource`]. A year's holiday set
//! is fetched at most once per pipeline run and reused for every ticket
//! touching that year; concurrent misses may race to fetch but converge to
//! the same value since holiday sets for a year are deterministic.

use chrono::NaiveDate;
use moka::future::Cache;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, warn};

use super::source::HolidaySource;

/// Upper bound on cached years. Real ticket datasets span a handful of
/// years; the bound only guards against pathological inputs.
const MAX_CACHED_YEARS: u64 = 128;

pub struct HolidayProvider {
    source: Arc<dyn HolidaySource>,
    cache: Cache<i32, Arc<BTreeSet<NaiveDate>>>,
}

impl HolidayProvider {
    /// Create a provider owning an empty cache. The provider is constructed
    /// at pipeline start and dropped at pipeline end; nothing persists
    /// across runs.
    pub fn new(source: Arc<dyn HolidaySource>) -> Self {
        Self {
            source,
            cache: Cache::builder().max_capacity(MAX_CACHED_YEARS).build(),
        }
    }

    /// Pre-populate the cache for a year. Used by tests and by deployments
    /// that carry a static calendar instead of a live API.
    pub async fn seed(&self, year: i32, holidays: BTreeSet<NaiveDate>) {
        self.cache.insert(year, Arc::new(holidays)).await;
    }

    /// Whether a year is already cached (no fetch on lookup).
    pub async fn is_cached(&self, year: i32) -> bool {
        self.cache.contains_key(&year)
    }

    /// Resolve the holiday set for `year`.
    ///
    /// Cache hit: returns the cached set with no external call. Cache miss:
    /// fetches from the source and caches the result. A failed fetch is
    /// logged and degrades to an empty set for this call — the failure is
    /// not cached, so a later lookup may retry. The SLA computation then
    /// treats the year as holiday-free rather than aborting the run.
    pub async fn holidays_for(&self, year: i32) -> Arc<BTreeSet<NaiveDate>> {
        if let Some(cached) = self.cache.get(&year).await {
            debug!(year, "Holiday cache hit");
            return cached;
        }

        match self.source.fetch_year(year).await {
            Ok(holidays) => {
                let holidays = Arc::new(holidays);
                self.cache.insert(year, holidays.clone()).await;
                debug!(year, count = holidays.len(), "Holiday calendar cached");
                holidays
            }
            Err(error) => {
                warn!(year, %error, "Holiday lookup unavailable, treating year as holiday-free");
                Arc::new(BTreeSet::new())
            }
        }
    }
}
