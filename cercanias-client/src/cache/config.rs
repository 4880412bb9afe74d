//! Cache configuration.

use std::time::Duration;

/// Configuration for the journey and station caches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// How long an entry counts as fresh when the caller doesn't say.
    pub default_max_age: Duration,

    /// Timetable entries older than this are evicted after each write.
    pub timetable_retention: Duration,

    /// Next-train entries older than this are evicted after each write.
    pub next_train_retention: Duration,

    /// TTL for cached station lists.
    pub station_ttl: Duration,

    /// Maximum number of cached station lists (one per search query).
    pub station_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_max_age: Duration::from_secs(30 * 60),
            timetable_retention: Duration::from_secs(24 * 60 * 60),
            next_train_retention: Duration::from_secs(2 * 60 * 60),
            station_ttl: Duration::from_secs(24 * 60 * 60),
            station_capacity: 64,
        }
    }
}

impl CacheConfig {
    /// Set the default freshness window.
    pub fn with_default_max_age(mut self, max_age: Duration) -> Self {
        self.default_max_age = max_age;
        self
    }

    /// Set how long timetables and next trains are retained.
    pub fn with_retention(mut self, timetable: Duration, next_train: Duration) -> Self {
        self.timetable_retention = timetable;
        self.next_train_retention = next_train;
        self
    }

    /// Set the station list TTL.
    pub fn with_station_ttl(mut self, ttl: Duration) -> Self {
        self.station_ttl = ttl;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.default_max_age, Duration::from_secs(1800));
        assert_eq!(config.timetable_retention, Duration::from_secs(86_400));
        assert_eq!(config.next_train_retention, Duration::from_secs(7200));
        assert_eq!(config.station_ttl, Duration::from_secs(86_400));
        assert_eq!(config.station_capacity, 64);
    }

    #[test]
    fn builder_overrides() {
        let config = CacheConfig::default()
            .with_default_max_age(Duration::from_secs(60))
            .with_retention(Duration::from_secs(10), Duration::from_secs(5))
            .with_station_ttl(Duration::from_secs(1));

        assert_eq!(config.default_max_age, Duration::from_secs(60));
        assert_eq!(config.timetable_retention, Duration::from_secs(10));
        assert_eq!(config.next_train_retention, Duration::from_secs(5));
        assert_eq!(config.station_ttl, Duration::from_secs(1));
    }
}
