//! Results of timetable queries, with the metadata the API echoes back.

use std::sync::Arc;

use super::time::ServiceTime;
use super::train::Train;

/// What the API understood a station query to mean.
///
/// Station names are matched fuzzily on the server; `*_found` holds the
/// station it actually resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryEcho {
    pub departure_station_name_query: String,
    pub arrival_station_name_query: String,
    pub departure_station_found: String,
    pub arrival_station_found: String,
    /// Date the query ran for ("YYYY-MM-DD").
    pub date_queried: String,
}

/// Result of a next-train query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextTrain {
    pub query: QueryEcho,
    /// Server-side time the query ran at ("HH:MM:SS").
    pub time_queried: String,
    pub train: Train,
}

/// Result of a full-day timetable query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timetable {
    pub query: QueryEcho,
    /// Trains in departure order.
    pub trains: Arc<Vec<Train>>,
}

/// Departures board for one station.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationDepartures {
    pub station_found: String,
    pub station_id: String,
    pub date_queried: String,
    pub time_queried: String,
    pub departures: Vec<Departure>,
}

/// One departure on a station board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    pub route_short_name: String,
    pub route_long_name: String,
    pub trip_id: String,
    pub trip_headsign: String,
    pub departure_time: ServiceTime,
}

impl Departure {
    /// Departure time as "HH:MM".
    pub fn formatted_departure_time(&self) -> String {
        self.departure_time.to_hhmm()
    }
}

impl Timetable {
    /// Trains leaving at or after `time`, in order.
    pub fn departing_from(&self, time: ServiceTime) -> impl Iterator<Item = &Train> {
        self.trains
            .iter()
            .filter(move |t| t.departure_time() >= time)
    }
}
