//! Rapi API client.
//!
//! HTTP client for the read-only Cercanías timetable API:
//! - stations are listed and searched by name, timetables are queried by
//!   station *name* (the server resolves fuzzy matches and echoes what it found)
//! - times are "HH:MM:SS" strings measured from the start of the service day
//! - `stop_sequence` in route details may arrive as a number or a string

mod client;
mod convert;
mod error;
mod source;
mod types;

pub use client::{BASE_URL_ENV, RapiClient, RapiConfig, TIMEOUT_ENV};
pub use convert::ConversionError;
pub use error::ApiError;
pub use source::JourneySource;
pub use types::{
    ApiErrorResponse, DepartureDto, NextTrainResponse, RouteDetailDto, RouteDto, RouteStopDto,
    StationDeparturesResponse, StationDto, TimetableResponse, TrainDto,
};
