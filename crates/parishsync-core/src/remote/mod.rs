//! Remote liturgical-day lookups with cache and local fallback.
//!
//! Two distinct integrations share the same discipline (24-hour TTL,
//! 8-second request timeout, fall back to the local engine on any
//! failure) but keep independent cache namespaces: the "today" lookup
//! is keyed by jurisdiction and date, the day-detail lookup by
//! `(year, month, day)`.

pub mod cache;
pub mod day_detail;
pub mod day_lookup;

pub use cache::TtlCache;
pub use day_detail::{DayDetail, DayDetailClient, DayEventDetail};
pub use day_lookup::{DayInfo, DayLookupClient, DaySource, Readings};

/// Cache entries older than this are treated as misses.
pub const CACHE_TTL_HOURS: i64 = 24;

/// Remote requests are aborted after this many seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 8;
