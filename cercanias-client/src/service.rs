//! Route query orchestration.
//!
//! `JourneyService` is what request flows talk to: it consults the journey
//! cache before going to the network, writes results back under the key it
//! fetched for, and drops a route's entries when the user changes stations.

use std::sync::Arc;

use chrono::NaiveDate;
use moka::future::Cache as MokaCache;
use tokio::sync::Mutex;
use tracing::debug;

use crate::api::{ApiError, JourneySource};
use crate::cache::{
    CacheConfig, Clock, JourneyCache, NextTrainKey, RoutePair, SystemClock, TimetableEntry,
    TimetableKey,
};
use crate::domain::{RouteDetail, Station, Train};

/// Whether a query may be answered from the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CachePolicy {
    /// Use a fresh cached entry if there is one.
    #[default]
    PreferCache,
    /// Always fetch, then update the cache (the manual refresh button).
    Refresh,
}

/// Cached station lists, keyed by the trimmed search query as sent ("" for all).
type StationsEntry = Arc<Vec<Station>>;

/// Journey source with caching.
///
/// Wraps a [`JourneySource`] and caches next-train and timetable answers in
/// a [`JourneyCache`], plus station lists in a TTL cache. The journey cache
/// sits behind a mutex that is never held across a network call: two
/// concurrent misses for the same key both fetch, and the last write wins.
pub struct JourneyService<S, C = SystemClock> {
    source: S,
    cache: Mutex<JourneyCache<C>>,
    stations: MokaCache<String, StationsEntry>,
}

impl<S: JourneySource> JourneyService<S, SystemClock> {
    /// Create a service with an empty cache on the system clock.
    pub fn new(source: S, config: &CacheConfig) -> Self {
        Self::with_cache(source, JourneyCache::new(config), config)
    }
}

impl<S: JourneySource, C: Clock> JourneyService<S, C> {
    /// Create a service around an existing journey cache.
    pub fn with_cache(source: S, cache: JourneyCache<C>, config: &CacheConfig) -> Self {
        let stations = MokaCache::builder()
            .time_to_live(config.station_ttl)
            .max_capacity(config.station_capacity)
            .build();

        Self {
            source,
            cache: Mutex::new(cache),
            stations,
        }
    }

    /// Next train from `departure` to `arrival`.
    pub async fn next_train(
        &self,
        departure: &str,
        arrival: &str,
        policy: CachePolicy,
    ) -> Result<Train, ApiError> {
        let route = checked_route(departure, arrival)?;
        let key = NextTrainKey::new(route.departure(), route.arrival());

        if policy == CachePolicy::PreferCache {
            let cache = self.cache.lock().await;
            let entry = cache.next_train(&key);
            if cache.is_valid(entry, None)
                && let Some(entry) = entry
            {
                debug!(%key, "next train cache hit");
                return Ok(entry.payload().clone());
            }
        }

        debug!(%key, ?policy, "fetching next train");
        let next = self
            .source
            .fetch_next_train(route.departure(), route.arrival())
            .await?;

        self.cache
            .lock()
            .await
            .put_next_train(key, next.train.clone());

        Ok(next.train)
    }

    /// All trains from `departure` to `arrival` on `date`, in departure order.
    ///
    /// An empty timetable is a valid answer and is cached like any other.
    pub async fn timetable(
        &self,
        departure: &str,
        arrival: &str,
        date: NaiveDate,
        policy: CachePolicy,
    ) -> Result<TimetableEntry, ApiError> {
        let route = checked_route(departure, arrival)?;
        let key = TimetableKey::for_date(route.departure(), route.arrival(), date);

        if policy == CachePolicy::PreferCache {
            let cache = self.cache.lock().await;
            let entry = cache.timetable(&key);
            if cache.is_valid(entry, None)
                && let Some(entry) = entry
            {
                debug!(%key, "timetable cache hit");
                return Ok(Arc::clone(entry.payload()));
            }
        }

        debug!(%key, ?policy, "fetching timetable");
        let timetable = self
            .source
            .fetch_timetable(route.departure(), route.arrival(), date)
            .await?;

        self.cache
            .lock()
            .await
            .put_timetable(key, Arc::clone(&timetable.trains));

        Ok(timetable.trains)
    }

    /// Next train and the day's timetable, fetched concurrently.
    pub async fn journey(
        &self,
        departure: &str,
        arrival: &str,
        date: NaiveDate,
        policy: CachePolicy,
    ) -> Result<(Train, TimetableEntry), ApiError> {
        futures::try_join!(
            self.next_train(departure, arrival, policy),
            self.timetable(departure, arrival, date, policy),
        )
    }

    /// The user moved away from a route: forget everything cached for it.
    ///
    /// Returns how many entries were dropped.
    pub async fn change_route(&self, departure: &str, arrival: &str) -> usize {
        self.cache.lock().await.invalidate_route(departure, arrival)
    }

    /// Drop all cached journeys and station lists.
    pub async fn clear_cache(&self) {
        self.cache.lock().await.clear_all();
        self.stations.invalidate_all();
    }

    /// Stations matching `query` (all stations for `None` or blank).
    pub async fn stations(&self, query: Option<&str>) -> Result<StationsEntry, ApiError> {
        let query = query.map(str::trim).filter(|q| !q.is_empty());
        let cache_key = query.unwrap_or_default().to_string();

        if let Some(cached) = self.stations.get(&cache_key).await {
            return Ok(cached);
        }

        let stations = Arc::new(self.source.fetch_all_stations(query).await?);
        self.stations.insert(cache_key, Arc::clone(&stations)).await;

        Ok(stations)
    }

    /// A line with its stops. Not cached.
    pub async fn route(&self, route_id: &str) -> Result<RouteDetail, ApiError> {
        self.source.fetch_route(route_id).await
    }

    /// Access the underlying source for operations that bypass the cache.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Number of cached journey entries (next trains plus timetables).
    pub async fn cache_entry_count(&self) -> usize {
        self.cache.lock().await.len()
    }
}

/// Validate a station selection before it reaches the cache or network.
fn checked_route(departure: &str, arrival: &str) -> Result<RoutePair, ApiError> {
    let route = RoutePair::new(departure, arrival).ok_or(ApiError::MissingStation)?;
    if route.departure() == route.arrival() {
        return Err(ApiError::SameStation);
    }
    Ok(route)
}
