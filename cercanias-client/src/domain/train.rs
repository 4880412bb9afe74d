//! A scheduled train between two stations.

use chrono::{Duration, NaiveDate, NaiveDateTime};

use super::time::ServiceTime;

/// Default time it takes the user to reach the departure station, in minutes.
pub const DEFAULT_MINUTES_TO_STATION: i64 = 15;

/// One scheduled service from a departure station to an arrival station.
///
/// Trains are immutable; a cache refresh replaces them wholesale.
///
/// # Examples
///
/// ```
/// use cercanias_client::domain::{ServiceTime, Train};
///
/// let train = Train::new(
///     "C3",
///     "Aranjuez-Chamartín - Clara Campoamor",
///     "1059D27001C3",
///     "",
///     "1059D",
///     ServiceTime::parse("07:35:00").unwrap(),
///     ServiceTime::parse("08:08:00").unwrap(),
/// );
///
/// assert_eq!(train.duration_in_minutes(), 33);
/// assert_eq!(train.formatted_arrival_time(), "08:08");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Train {
    route_short_name: String,
    route_long_name: String,
    trip_id: String,
    trip_headsign: String,
    service_id: String,
    departure: ServiceTime,
    arrival: ServiceTime,
}

impl Train {
    /// Create a new train.
    pub fn new(
        route_short_name: impl Into<String>,
        route_long_name: impl Into<String>,
        trip_id: impl Into<String>,
        trip_headsign: impl Into<String>,
        service_id: impl Into<String>,
        departure: ServiceTime,
        arrival: ServiceTime,
    ) -> Self {
        Self {
            route_short_name: route_short_name.into(),
            route_long_name: route_long_name.into(),
            trip_id: trip_id.into(),
            trip_headsign: trip_headsign.into(),
            service_id: service_id.into(),
            departure,
            arrival,
        }
    }

    /// Line name, e.g. "C3".
    pub fn route_short_name(&self) -> &str {
        &self.route_short_name
    }

    pub fn route_long_name(&self) -> &str {
        &self.route_long_name
    }

    /// Trip identifier; unique within a timetable.
    pub fn trip_id(&self) -> &str {
        &self.trip_id
    }

    /// Destination sign. Often empty for Cercanías data.
    pub fn trip_headsign(&self) -> &str {
        &self.trip_headsign
    }

    pub fn service_id(&self) -> &str {
        &self.service_id
    }

    /// Departure time from the departure station.
    pub fn departure_time(&self) -> ServiceTime {
        self.departure
    }

    /// Arrival time at the arrival station.
    pub fn arrival_time(&self) -> ServiceTime {
        self.arrival
    }

    /// Departure time as "HH:MM".
    pub fn formatted_departure_time(&self) -> String {
        self.departure.to_hhmm()
    }

    /// Arrival time as "HH:MM".
    pub fn formatted_arrival_time(&self) -> String {
        self.arrival.to_hhmm()
    }

    /// Journey length in whole minutes (arrival minus departure).
    pub fn duration_in_minutes(&self) -> i64 {
        self.departure.minutes_until(self.arrival)
    }

    /// Departure as a full timestamp on the given date.
    pub fn departure_on(&self, date: NaiveDate) -> Option<NaiveDateTime> {
        self.departure.on(date)
    }

    /// Arrival as a full timestamp on the given date.
    pub fn arrival_on(&self, date: NaiveDate) -> Option<NaiveDateTime> {
        self.arrival.on(date)
    }

    /// When the user has to leave to catch this train on `date`, given how
    /// many minutes it takes them to reach the station.
    ///
    /// Returns `None` if the result is out of range.
    pub fn leave_by(&self, date: NaiveDate, minutes_to_station: i64) -> Option<NaiveDateTime> {
        let lead = Duration::try_minutes(minutes_to_station)?;
        self.departure_on(date)?.checked_sub_signed(lead)
    }
}
