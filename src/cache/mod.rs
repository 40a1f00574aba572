//! In-memory cache for the most recent InSight report
//!
//! The feed is rate limited, so the client keeps its last successful fetch and
//! serves it until the rate-limit window has passed. Only one fetch is ever
//! kept; the raw and converted reports travel together in one snapshot.

mod manager;

pub use manager::{CachedReport, ReportCache};
