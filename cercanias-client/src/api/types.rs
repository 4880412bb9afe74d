//! Rapi API response DTOs.
//!
//! These types map directly to the JSON the API returns. Field names are
//! snake_case on the wire. Times stay as strings here; conversion to domain
//! types validates them.

use serde::{Deserialize, Deserializer, de};

/// Response from `GET /timetable/{departure}/{arrival}/next`.
#[derive(Debug, Clone, Deserialize)]
pub struct NextTrainResponse {
    pub departure_station_name_query: String,
    pub arrival_station_name_query: String,
    pub departure_station_found: String,
    pub arrival_station_found: String,
    pub date_queried: String,
    pub time_queried: String,
    pub next_train: TrainDto,
}

/// Response from `GET /timetable/{departure}/{arrival}?date=YYYY-MM-DD`.
#[derive(Debug, Clone, Deserialize)]
pub struct TimetableResponse {
    pub departure_station_name_query: String,
    pub arrival_station_name_query: String,
    pub departure_station_found: String,
    pub arrival_station_found: String,
    pub date_queried: String,
    pub timetable: Vec<TrainDto>,
}

/// A train as embedded in timetable and next-train responses.
#[derive(Debug, Clone, Deserialize)]
pub struct TrainDto {
    pub route_short_name: String,
    pub route_long_name: String,
    pub trip_id: String,
    pub trip_headsign: String,
    pub service_id: String,
    /// "HH:MM:SS"
    pub departure_station_departure_time: String,
    /// "HH:MM:SS"
    pub arrival_station_arrival_time: String,
}

/// Station object from `GET /stations` and `GET /stations/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct StationDto {
    pub stop_id: String,
    pub stop_name: String,
    pub stop_lat: String,
    pub stop_lon: String,
}

/// Response from `GET /stations/{id}/departures`.
#[derive(Debug, Clone, Deserialize)]
pub struct StationDeparturesResponse {
    pub station_found: String,
    pub station_id: String,
    pub date_queried: String,
    pub time_queried: String,
    pub departures: Vec<DepartureDto>,
}

/// One row of a station departures board.
#[derive(Debug, Clone, Deserialize)]
pub struct DepartureDto {
    pub route_short_name: String,
    pub route_long_name: String,
    pub trip_id: String,
    pub trip_headsign: String,
    pub departure_time: String,
}

/// Entry of `GET /routes`.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteDto {
    pub route_id: String,
    pub route_short_name: String,
    pub route_long_name: String,
}

/// Response from `GET /routes/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteDetailDto {
    pub route_id: String,
    pub route_short_name: String,
    pub route_long_name: String,
    pub stops: Vec<RouteStopDto>,
}

/// A stop within a route detail.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteStopDto {
    pub stop_id: String,
    pub stop_name: String,
    /// Sent either as a JSON number or as a numeric string.
    #[serde(deserialize_with = "int_or_numeric_string")]
    pub stop_sequence: i64,
}

/// Error body the API sends with 4xx/5xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: String,
    pub details: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IntOrString {
    Int(i64),
    Str(String),
}

/// Accept `3` or `"3"`; anything else is a decode error.
fn int_or_numeric_string<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match IntOrString::deserialize(deserializer) {
        Ok(IntOrString::Int(n)) => Ok(n),
        Ok(IntOrString::Str(s)) => s.parse().map_err(|_| {
            de::Error::custom(format!(
                "stop_sequence {s:?} is not an integer or a string convertible to one"
            ))
        }),
        Err(_) => Err(de::Error::custom(
            "stop_sequence is not an integer or a string convertible to one",
        )),
    }
}
