//! Caching layer for route query results.
//!
//! Next-train answers go stale within minutes of the queried window, while a
//! day's timetable stays good for the rest of that day. Both are cached under
//! keys built from the user's station selection, checked for freshness on
//! read (30 minutes by default) and evicted by age after every write.

mod clock;
mod config;
mod journey;
mod key;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::CacheConfig;
pub use journey::{CacheEntry, JourneyCache, TimetableEntry};
pub use key::{NextTrainKey, RoutePair, TimetableKey};
