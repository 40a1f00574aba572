//! Single-entry report cache
//!
//! Holds the most recent successful fetch as one immutable snapshot. A new
//! fetch replaces the whole snapshot; readers clone the `Arc` and never see a
//! raw report paired with a converted report from a different fetch.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::data::Report;

/// One successful fetch: the decoded report and its converted copy
#[derive(Debug)]
pub struct CachedReport {
    /// Report exactly as decoded from the feed
    pub raw: Arc<Report>,
    /// Report rewritten into the client's units
    pub converted: Arc<Report>,
    /// When the fetch completed
    pub fetched_at: DateTime<Utc>,
}

impl CachedReport {
    /// Bundles a fetch result with its completion time
    pub fn new(raw: Report, converted: Report, fetched_at: DateTime<Utc>) -> Self {
        Self {
            raw: Arc::new(raw),
            converted: Arc::new(converted),
            fetched_at,
        }
    }

    /// Fetch time in whole seconds since the Unix epoch
    pub fn timestamp(&self) -> i64 {
        self.fetched_at.timestamp()
    }

    /// Whether `ttl` has run out at `now`
    ///
    /// Elapsed time is measured in whole seconds, so an entry stays fresh for
    /// any elapsed time strictly below `ttl`. A zero `ttl` is always expired.
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        let elapsed = now.timestamp() - self.timestamp();
        let ttl_secs = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        elapsed >= ttl_secs
    }
}

/// Holds the latest [`CachedReport`], if any
///
/// The lock only guards the pointer swap and is never held across an await.
#[derive(Debug, Default)]
pub struct ReportCache {
    current: RwLock<Option<Arc<CachedReport>>>,
}

impl ReportCache {
    /// Creates an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current snapshot, fresh or not
    pub fn read(&self) -> Option<Arc<CachedReport>> {
        self.current.read().clone()
    }

    /// Returns the current snapshot only if it has not expired at `now`
    pub fn fresh(&self, now: DateTime<Utc>, ttl: Duration) -> Option<Arc<CachedReport>> {
        self.read().filter(|entry| !entry.is_expired(now, ttl))
    }

    /// Replaces the snapshot and returns the stored entry
    pub fn store(&self, entry: CachedReport) -> Arc<CachedReport> {
        let entry = Arc::new(entry);
        *self.current.write() = Some(Arc::clone(&entry));
        entry
    }
}
