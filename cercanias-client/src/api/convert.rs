//! Conversion from Rapi DTOs to domain types.
//!
//! Service times are validated here. A single malformed train inside a
//! timetable or departures board is logged and skipped rather than failing
//! the whole response; a malformed next train fails the request.

use std::sync::Arc;

use tracing::warn;

use crate::domain::{
    Departure, NextTrain, QueryEcho, RouteDetail, RouteStop, RouteSummary, ServiceTime, Station,
    StationDepartures, Timetable, Train,
};

use super::types::{
    DepartureDto, NextTrainResponse, RouteDetailDto, RouteDto, StationDeparturesResponse,
    StationDto, TimetableResponse, TrainDto,
};

/// Error during DTO to domain conversion.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConversionError {
    /// Failed to parse a time string
    #[error("invalid time in {field}: {source}")]
    InvalidTime {
        field: &'static str,
        source: crate::domain::TimeError,
    },
}

fn parse_time(field: &'static str, value: &str) -> Result<ServiceTime, ConversionError> {
    ServiceTime::parse(value).map_err(|source| ConversionError::InvalidTime { field, source })
}

/// Convert a single train.
pub fn convert_train(dto: &TrainDto) -> Result<Train, ConversionError> {
    let departure = parse_time(
        "departure_station_departure_time",
        &dto.departure_station_departure_time,
    )?;
    let arrival = parse_time(
        "arrival_station_arrival_time",
        &dto.arrival_station_arrival_time,
    )?;

    Ok(Train::new(
        dto.route_short_name.clone(),
        dto.route_long_name.clone(),
        dto.trip_id.clone(),
        dto.trip_headsign.clone(),
        dto.service_id.clone(),
        departure,
        arrival,
    ))
}

/// Convert a next-train response.
pub fn convert_next_train(response: &NextTrainResponse) -> Result<NextTrain, ConversionError> {
    Ok(NextTrain {
        query: QueryEcho {
            departure_station_name_query: response.departure_station_name_query.clone(),
            arrival_station_name_query: response.arrival_station_name_query.clone(),
            departure_station_found: response.departure_station_found.clone(),
            arrival_station_found: response.arrival_station_found.clone(),
            date_queried: response.date_queried.clone(),
        },
        time_queried: response.time_queried.clone(),
        train: convert_train(&response.next_train)?,
    })
}

/// Convert a timetable response, keeping the API's train order.
pub fn convert_timetable(response: &TimetableResponse) -> Timetable {
    let mut trains = Vec::with_capacity(response.timetable.len());

    for dto in &response.timetable {
        match convert_train(dto) {
            Ok(train) => trains.push(train),
            Err(e) => warn!(trip_id = %dto.trip_id, error = %e, "skipping timetable entry"),
        }
    }

    Timetable {
        query: QueryEcho {
            departure_station_name_query: response.departure_station_name_query.clone(),
            arrival_station_name_query: response.arrival_station_name_query.clone(),
            departure_station_found: response.departure_station_found.clone(),
            arrival_station_found: response.arrival_station_found.clone(),
            date_queried: response.date_queried.clone(),
        },
        trains: Arc::new(trains),
    }
}

/// Convert a station.
pub fn convert_station(dto: StationDto) -> Station {
    Station::new(dto.stop_id, dto.stop_name, dto.stop_lat, dto.stop_lon)
}

/// Convert a route list entry.
pub fn convert_route(dto: RouteDto) -> RouteSummary {
    RouteSummary {
        route_id: dto.route_id,
        route_short_name: dto.route_short_name,
        route_long_name: dto.route_long_name,
    }
}

/// Convert a route detail; stops come out ordered by sequence.
pub fn convert_route_detail(dto: RouteDetailDto) -> RouteDetail {
    let stops = dto
        .stops
        .into_iter()
        .map(|s| RouteStop {
            stop_id: s.stop_id,
            stop_name: s.stop_name,
            stop_sequence: s.stop_sequence,
        })
        .collect();

    RouteDetail::new(
        dto.route_id,
        dto.route_short_name,
        dto.route_long_name,
        stops,
    )
}

/// Convert a station departures board.
pub fn convert_station_departures(response: StationDeparturesResponse) -> StationDepartures {
    let departures = response
        .departures
        .iter()
        .filter_map(|d| match convert_departure(d) {
            Ok(departure) => Some(departure),
            Err(e) => {
                warn!(trip_id = %d.trip_id, error = %e, "skipping departure");
                None
            }
        })
        .collect();

    StationDepartures {
        station_found: response.station_found,
        station_id: response.station_id,
        date_queried: response.date_queried,
        time_queried: response.time_queried,
        departures,
    }
}

fn convert_departure(dto: &DepartureDto) -> Result<Departure, ConversionError> {
    Ok(Departure {
        route_short_name: dto.route_short_name.clone(),
        route_long_name: dto.route_long_name.clone(),
        trip_id: dto.trip_id.clone(),
        trip_headsign: dto.trip_headsign.clone(),
        departure_time: parse_time("departure_time", &dto.departure_time)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::RouteStopDto;

    fn make_train_dto(trip: &str, dep: &str, arr: &str) -> TrainDto {
        TrainDto {
            route_short_name: "C3".into(),
            route_long_name: "Aranjuez-Chamartín - Clara Campoamor".into(),
            trip_id: trip.into(),
            trip_headsign: "".into(),
            service_id: "1059D".into(),
            departure_station_departure_time: dep.into(),
            arrival_station_arrival_time: arr.into(),
        }
    }

    #[test]
    fn convert_simple_train() {
        let train = convert_train(&make_train_dto("T1", "07:35:00", "08:08:00")).unwrap();
        assert_eq!(train.trip_id(), "T1");
        assert_eq!(train.duration_in_minutes(), 33);
    }

    #[test]
    fn convert_train_rejects_bad_time() {
        let err = convert_train(&make_train_dto("T1", "7:35", "08:08:00")).unwrap_err();
        assert!(err.to_string().contains("departure_station_departure_time"));
    }

    #[test]
    fn timetable_skips_malformed_trains() {
        let response = TimetableResponse {
            departure_station_name_query: "Sol".into(),
            arrival_station_name_query: "Chamartín".into(),
            departure_station_found: "Madrid-Sol".into(),
            arrival_station_found: "Chamartín".into(),
            date_queried: "2024-01-01".into(),
            timetable: vec![
                make_train_dto("T1", "07:00:00", "07:30:00"),
                make_train_dto("BAD", "late", "07:45:00"),
                make_train_dto("T2", "08:00:00", "08:30:00"),
            ],
        };

        let timetable = convert_timetable(&response);
        let trips: Vec<_> = timetable.trains.iter().map(|t| t.trip_id()).collect();
        assert_eq!(trips, vec!["T1", "T2"]);
        assert_eq!(timetable.query.date_queried, "2024-01-01");
    }

    #[test]
    fn next_train_fails_on_bad_time() {
        let response = NextTrainResponse {
            departure_station_name_query: "Sol".into(),
            arrival_station_name_query: "Chamartín".into(),
            departure_station_found: "Madrid-Sol".into(),
            arrival_station_found: "Chamartín".into(),
            date_queried: "2024-01-01".into(),
            time_queried: "07:30:00".into(),
            next_train: make_train_dto("T1", "07:35:00", "??"),
        };

        assert!(convert_next_train(&response).is_err());
    }

    #[test]
    fn route_detail_orders_stops() {
        let dto = RouteDetailDto {
            route_id: "C3".into(),
            route_short_name: "C3".into(),
            route_long_name: "Aranjuez - Chamartín".into(),
            stops: vec![
                RouteStopDto {
                    stop_id: "17000".into(),
                    stop_name: "Chamartín".into(),
                    stop_sequence: 2,
                },
                RouteStopDto {
                    stop_id: "18000".into(),
                    stop_name: "Atocha".into(),
                    stop_sequence: 1,
                },
            ],
        };

        let route = convert_route_detail(dto);
        assert_eq!(route.stops[0].stop_id, "18000");
        assert_eq!(route.stops[1].stop_id, "17000");
    }

    #[test]
    fn departures_skip_malformed_rows() {
        let response = StationDeparturesResponse {
            station_found: "Madrid-Sol".into(),
            station_id: "SOL".into(),
            date_queried: "2024-01-01".into(),
            time_queried: "10:00:00".into(),
            departures: vec![
                DepartureDto {
                    route_short_name: "C3".into(),
                    route_long_name: "Aranjuez - Chamartín".into(),
                    trip_id: "A".into(),
                    trip_headsign: "Chamartín".into(),
                    departure_time: "10:05:00".into(),
                },
                DepartureDto {
                    route_short_name: "C4".into(),
                    route_long_name: "Parla - Colmenar".into(),
                    trip_id: "B".into(),
                    trip_headsign: "Parla".into(),
                    departure_time: "".into(),
                },
            ],
        };

        let board = convert_station_departures(response);
        assert_eq!(board.departures.len(), 1);
        assert_eq!(board.departures[0].trip_id, "A");
    }
}
