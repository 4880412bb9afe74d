//! Client library for a Madrid Cercanías commuter-rail app.
//!
//! Answers "when is my next train between these two stations, and what does
//! the rest of today look like?" against a remote timetable API, with a
//! time-bounded in-memory cache in front of it so repeated lookups of the
//! same route stay cheap.

pub mod api;
pub mod cache;
pub mod domain;
pub mod preferences;
pub mod service;
pub mod telemetry;

pub use api::{ApiError, RapiClient, RapiConfig};
pub use cache::{CacheConfig, JourneyCache};
pub use service::{CachePolicy, JourneyService};
