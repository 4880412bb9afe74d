//! Cache keys derived from user-selected stations.
//!
//! Keys are built from trimmed station names (and a date, for timetables).
//! If any component is empty after trimming, the key is a sentinel carrying a
//! fresh token: it never equals another key, valid or not, and the cache
//! never stores anything under it.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::NaiveDate;

/// Separator used when rendering keys as text. Not expected in station names.
const SEPARATOR: char = '\u{1f}';

/// Source of sentinel tokens. Process-wide so no two sentinels ever collide.
static NEXT_SENTINEL: AtomicU64 = AtomicU64::new(0);

fn fresh_sentinel() -> u64 {
    NEXT_SENTINEL.fetch_add(1, Ordering::Relaxed)
}

/// A normalized (departure, arrival) pair of station names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoutePair {
    departure: String,
    arrival: String,
}

impl RoutePair {
    /// Trim both names. Returns `None` if either is empty afterwards.
    pub fn new(departure: &str, arrival: &str) -> Option<Self> {
        let departure = departure.trim();
        let arrival = arrival.trim();
        if departure.is_empty() || arrival.is_empty() {
            return None;
        }
        Some(Self {
            departure: departure.to_string(),
            arrival: arrival.to_string(),
        })
    }

    pub fn departure(&self) -> &str {
        &self.departure
    }

    pub fn arrival(&self) -> &str {
        &self.arrival
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Slot<T> {
    Valid(T),
    Sentinel(u64),
}

/// Key for a next-train lookup.
///
/// # Examples
///
/// ```
/// use cercanias_client::cache::NextTrainKey;
///
/// let a = NextTrainKey::new(" Madrid-Sol ", "Chamartín");
/// let b = NextTrainKey::new("Madrid-Sol", "Chamartín");
/// assert_eq!(a, b);
///
/// // Empty input never aliases anything, not even itself
/// assert_ne!(NextTrainKey::new("", "Chamartín"), NextTrainKey::new("", "Chamartín"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NextTrainKey(Slot<RoutePair>);

impl NextTrainKey {
    pub fn new(departure: &str, arrival: &str) -> Self {
        match RoutePair::new(departure, arrival) {
            Some(pair) => Self(Slot::Valid(pair)),
            None => Self(Slot::Sentinel(fresh_sentinel())),
        }
    }

    pub(crate) fn from_pair(pair: RoutePair) -> Self {
        Self(Slot::Valid(pair))
    }

    /// True if this key was built from empty input.
    pub fn is_sentinel(&self) -> bool {
        matches!(self.0, Slot::Sentinel(_))
    }

    /// The route this key refers to, unless it is a sentinel.
    pub fn route(&self) -> Option<&RoutePair> {
        match &self.0 {
            Slot::Valid(pair) => Some(pair),
            Slot::Sentinel(_) => None,
        }
    }
}

impl fmt::Display for NextTrainKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Slot::Valid(pair) => write!(f, "{}{SEPARATOR}{}", pair.departure, pair.arrival),
            Slot::Sentinel(token) => write!(f, "invalid_key_{token}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct DatedRoute {
    route: RoutePair,
    date: String,
}

/// Key for a full-day timetable lookup.
///
/// # Examples
///
/// ```
/// use cercanias_client::cache::TimetableKey;
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// assert_eq!(
///     TimetableKey::for_date("Madrid-Sol", "Chamartín", date),
///     TimetableKey::new("Madrid-Sol", "Chamartín", "2024-01-01"),
/// );
/// assert!(TimetableKey::new("Madrid-Sol", "Chamartín", "  ").is_sentinel());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TimetableKey(Slot<DatedRoute>);

impl TimetableKey {
    /// `date` is an ISO-8601 calendar date ("YYYY-MM-DD").
    pub fn new(departure: &str, arrival: &str, date: &str) -> Self {
        let date = date.trim();
        match RoutePair::new(departure, arrival) {
            Some(route) if !date.is_empty() => Self(Slot::Valid(DatedRoute {
                route,
                date: date.to_string(),
            })),
            _ => Self(Slot::Sentinel(fresh_sentinel())),
        }
    }

    pub fn for_date(departure: &str, arrival: &str, date: NaiveDate) -> Self {
        Self::new(departure, arrival, &date.format("%Y-%m-%d").to_string())
    }

    /// True if this key was built from empty input.
    pub fn is_sentinel(&self) -> bool {
        matches!(self.0, Slot::Sentinel(_))
    }

    /// The route this key refers to, unless it is a sentinel.
    pub fn route(&self) -> Option<&RoutePair> {
        match &self.0 {
            Slot::Valid(dated) => Some(&dated.route),
            Slot::Sentinel(_) => None,
        }
    }

    /// The timetable date, unless this key is a sentinel.
    pub fn date(&self) -> Option<&str> {
        match &self.0 {
            Slot::Valid(dated) => Some(&dated.date),
            Slot::Sentinel(_) => None,
        }
    }
}

impl fmt::Display for TimetableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Slot::Valid(d) => write!(
                f,
                "{}{SEPARATOR}{}{SEPARATOR}{}",
                d.route.departure, d.route.arrival, d.date
            ),
            Slot::Sentinel(token) => write!(f, "invalid_key_{token}"),
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Station-like names with at least one non-space character
    fn station_name() -> impl Strategy<Value = String> {
        "[A-Za-z][A-Za-z -]{0,20}"
    }

    proptest! {
        /// Distinct normalized pairs give distinct keys
        #[test]
        fn distinct_pairs_distinct_keys(
            a in station_name(), b in station_name(),
            c in station_name(), d in station_name(),
        ) {
            let same_pair = a.trim() == c.trim() && b.trim() == d.trim();
            let k1 = NextTrainKey::new(&a, &b);
            let k2 = NextTrainKey::new(&c, &d);
            prop_assert_eq!(k1 == k2, same_pair);
        }

        /// Key construction is deterministic for valid input
        #[test]
        fn deterministic(a in station_name(), b in station_name()) {
            prop_assert_eq!(NextTrainKey::new(&a, &b), NextTrainKey::new(&a, &b));
        }

        /// Whitespace-only input always yields a fresh sentinel
        #[test]
        fn blank_input_is_sentinel(blank in "[ \t\n]{0,5}", b in station_name()) {
            let k1 = NextTrainKey::new(&blank, &b);
            let k2 = NextTrainKey::new(&blank, &b);
            prop_assert!(k1.is_sentinel());
            prop_assert_ne!(k1.clone(), k2);
            prop_assert_ne!(k1, NextTrainKey::new(&b, &b));
        }
    }
}
