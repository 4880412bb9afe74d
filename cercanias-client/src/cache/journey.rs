//! In-memory cache of next-train and timetable results.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::domain::Train;

use super::clock::{Clock, SystemClock};
use super::config::CacheConfig;
use super::key::{NextTrainKey, RoutePair, TimetableKey};

/// Cached timetable payload.
pub type TimetableEntry = Arc<Vec<Train>>;

/// A cached payload and when it was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry<T> {
    payload: T,
    last_updated: DateTime<Utc>,
}

impl<T> CacheEntry<T> {
    pub fn payload(&self) -> &T {
        &self.payload
    }

    pub fn into_payload(self) -> T {
        self.payload
    }

    /// Wall-clock time of the write that produced this entry.
    pub fn last_updated(&self) -> DateTime<Utc> {
        self.last_updated
    }
}

/// Cache of route query results, keyed by normalized station names.
///
/// Entries are written by [`put_next_train`](Self::put_next_train) and
/// [`put_timetable`](Self::put_timetable), each of which then evicts entries
/// past their retention window (24 hours for timetables, 2 hours for next
/// trains by default). Reads never evict.
///
/// The cache is not synchronized; share it behind a mutex.
pub struct JourneyCache<C = SystemClock> {
    next_trains: HashMap<NextTrainKey, CacheEntry<Train>>,
    timetables: HashMap<TimetableKey, CacheEntry<TimetableEntry>>,
    config: CacheConfig,
    clock: C,
}

impl JourneyCache<SystemClock> {
    /// Create an empty cache on the system clock.
    pub fn new(config: &CacheConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> JourneyCache<C> {
    /// Create an empty cache reading time from `clock`.
    pub fn with_clock(config: &CacheConfig, clock: C) -> Self {
        Self {
            next_trains: HashMap::new(),
            timetables: HashMap::new(),
            config: config.clone(),
            clock,
        }
    }

    /// Look up a next-train entry. Sentinel keys always miss.
    pub fn next_train(&self, key: &NextTrainKey) -> Option<&CacheEntry<Train>> {
        self.next_trains.get(key)
    }

    /// Look up a timetable entry. Sentinel keys always miss.
    pub fn timetable(&self, key: &TimetableKey) -> Option<&CacheEntry<TimetableEntry>> {
        self.timetables.get(key)
    }

    /// Whether `entry` exists and is younger than `max_age`.
    ///
    /// `None` for `max_age` means [`CacheConfig::default_max_age`]
    /// (30 minutes by default).
    pub fn is_valid<T>(&self, entry: Option<&CacheEntry<T>>, max_age: Option<Duration>) -> bool {
        let max_age = max_age.unwrap_or(self.config.default_max_age);
        entry.is_some_and(|e| self.age(e.last_updated) < max_age)
    }

    /// Store the next train for a route, replacing any previous entry.
    pub fn put_next_train(&mut self, key: NextTrainKey, train: Train) {
        if key.is_sentinel() {
            debug!(%key, "not caching next train under sentinel key");
            return;
        }
        let entry = self.entry(train);
        debug!(%key, "cached next train");
        self.next_trains.insert(key, entry);
        self.evict_stale();
    }

    /// Store a timetable for a route and date, replacing any previous entry.
    pub fn put_timetable(&mut self, key: TimetableKey, trains: TimetableEntry) {
        if key.is_sentinel() {
            debug!(%key, "not caching timetable under sentinel key");
            return;
        }
        let entry = self.entry(trains);
        debug!(%key, trains = entry.payload.len(), "cached timetable");
        self.timetables.insert(key, entry);
        self.evict_stale();
    }

    /// Drop the next-train entry and every timetable (any date) for a route.
    ///
    /// Station names are normalized as in key construction. Returns how many
    /// entries were removed.
    pub fn invalidate_route(&mut self, departure: &str, arrival: &str) -> usize {
        let Some(pair) = RoutePair::new(departure, arrival) else {
            return 0;
        };

        let before = self.len();
        self.timetables.retain(|key, _| key.route() != Some(&pair));
        self.next_trains.remove(&NextTrainKey::from_pair(pair));
        let removed = before - self.len();

        debug!(departure, arrival, removed, "invalidated route");
        removed
    }

    /// Drop every entry.
    pub fn clear_all(&mut self) {
        self.next_trains.clear();
        self.timetables.clear();
    }

    pub fn next_train_count(&self) -> usize {
        self.next_trains.len()
    }

    pub fn timetable_count(&self) -> usize {
        self.timetables.len()
    }

    /// Total number of entries of both kinds.
    pub fn len(&self) -> usize {
        self.next_trains.len() + self.timetables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn entry<T>(&self, payload: T) -> CacheEntry<T> {
        CacheEntry {
            payload,
            last_updated: self.clock.now(),
        }
    }

    /// Time since `written`. A timestamp in the future counts as zero age.
    fn age(&self, written: DateTime<Utc>) -> Duration {
        (self.clock.now() - written).to_std().unwrap_or(Duration::ZERO)
    }

    fn evict_stale(&mut self) {
        let now = self.clock.now();
        let timetables = evict_older_than(&mut self.timetables, now, self.config.timetable_retention);
        let next_trains =
            evict_older_than(&mut self.next_trains, now, self.config.next_train_retention);

        if timetables + next_trains > 0 {
            debug!(timetables, next_trains, "evicted stale cache entries");
        }
    }
}

/// Remove entries written more than `retention` before `now`.
fn evict_older_than<K: Eq + Hash, T>(
    map: &mut HashMap<K, CacheEntry<T>>,
    now: DateTime<Utc>,
    retention: Duration,
) -> usize {
    let before = map.len();
    map.retain(|_, entry| {
        let age = (now - entry.last_updated).to_std().unwrap_or(Duration::ZERO);
        age <= retention
    });
    before - map.len()
}
