//! Domain types for the Cercanías client.
//!
//! These are validated values built from API responses. Service times are
//! parsed once at conversion time, so code holding a `Train` can rely on its
//! times being well formed.

mod query;
mod route;
mod station;
mod time;
mod train;

pub use query::{Departure, NextTrain, QueryEcho, StationDepartures, Timetable};
pub use route::{RouteDetail, RouteStop, RouteSummary};
pub use station::Station;
pub use time::{ServiceTime, TimeError};
pub use train::{DEFAULT_MINUTES_TO_STATION, Train};
