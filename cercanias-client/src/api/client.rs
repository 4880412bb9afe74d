//! Rapi HTTP client.
//!
//! Provides async methods for querying the Cercanías timetable API.
//! Handles URL construction, bounded concurrency, status mapping and
//! conversion to domain types.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::domain::{
    NextTrain, RouteDetail, RouteSummary, Station, StationDepartures, Timetable,
};

use super::convert::{
    convert_next_train, convert_route, convert_route_detail, convert_station,
    convert_station_departures, convert_timetable,
};
use super::error::ApiError;
use super::types::{
    ApiErrorResponse, NextTrainResponse, RouteDetailDto, RouteDto, StationDeparturesResponse,
    StationDto, TimetableResponse,
};

/// Default base URL for the Rapi API.
const DEFAULT_BASE_URL: &str = "https://project-polaris-proud-voice-5352.fly.dev";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 4;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// How much of an unparseable body to keep in decode errors.
const BODY_SNIPPET_CHARS: usize = 500;

/// Environment variable overriding the base URL.
pub const BASE_URL_ENV: &str = "RAPI_BASE_URL";

/// Environment variable overriding the request timeout (seconds).
pub const TIMEOUT_ENV: &str = "RAPI_TIMEOUT_SECS";

/// Configuration for the Rapi client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RapiConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for RapiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl RapiConfig {
    /// Defaults, overridden by `RAPI_BASE_URL` and `RAPI_TIMEOUT_SECS` when set.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup(BASE_URL_ENV).filter(|u| !u.trim().is_empty()) {
            config.base_url = url.trim().to_string();
        }

        if let Some(raw) = lookup(TIMEOUT_ENV) {
            match raw.trim().parse() {
                Ok(secs) => config.timeout_secs = secs,
                Err(_) => warn!(value = %raw, "ignoring invalid {TIMEOUT_ENV}"),
            }
        }

        config
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Rapi API client.
///
/// Uses a semaphore to limit concurrent requests. Failed requests are not
/// retried; retry is up to the caller.
#[derive(Debug, Clone)]
pub struct RapiClient {
    http: reqwest::Client,
    base_url: Url,
    semaphore: Arc<Semaphore>,
}

impl RapiClient {
    /// Create a new client with the given configuration.
    pub fn new(config: RapiConfig) -> Result<Self, ApiError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {e}", config.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(format!(
                "{} cannot be used as a base URL",
                config.base_url
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        })
    }

    /// Build an endpoint URL from path segments. Segments are percent-encoded,
    /// so station names with spaces or slashes are safe.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Issue a GET and decode the JSON body.
    ///
    /// `resource` describes what was requested, for 404 messages when the
    /// server doesn't send an error body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, String)],
        resource: &str,
    ) -> Result<T, ApiError> {
        let body = self.get_text(url, query, resource).await?;

        serde_json::from_str(&body).map_err(|e| ApiError::Decode {
            message: e.to_string(),
            body: Some(body.chars().take(BODY_SNIPPET_CHARS).collect()),
        })
    }

    async fn get_text(
        &self,
        url: Url,
        query: &[(&str, String)],
        resource: &str,
    ) -> Result<String, ApiError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| ApiError::Shutdown)?;

        debug!(%url, "GET");
        let response = self.http.get(url.clone()).query(query).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let api_message = serde_json::from_str::<ApiErrorResponse>(&body)
                .ok()
                .map(|e| e.error);
            warn!(%url, status = status.as_u16(), "request failed");

            if status == StatusCode::NOT_FOUND {
                return Err(ApiError::NotFound {
                    message: api_message.unwrap_or_else(|| format!("{resource} not found.")),
                });
            }

            return Err(ApiError::Server {
                status: status.as_u16(),
                message: api_message.unwrap_or(body),
            });
        }

        Ok(response.text().await?)
    }

    /// Fetch the API's root greeting, to check it's reachable.
    pub async fn health_check(&self) -> Result<String, ApiError> {
        self.get_text(self.base_url.clone(), &[], "API root").await
    }

    /// Fetch all stations, optionally filtered by a search query.
    pub async fn fetch_all_stations(&self, query: Option<&str>) -> Result<Vec<Station>, ApiError> {
        let url = self.endpoint(&["stations"])?;
        let params: Vec<(&str, String)> = match query.map(str::trim) {
            Some(q) if !q.is_empty() => vec![("q", q.to_string())],
            _ => Vec::new(),
        };

        let stations: Vec<StationDto> = self.get_json(url, &params, "Stations").await?;
        Ok(stations.into_iter().map(convert_station).collect())
    }

    /// Fetch a single station by stop id.
    pub async fn fetch_station(&self, station_id: &str) -> Result<Station, ApiError> {
        let station_id = station_id.trim();
        let url = self.endpoint(&["stations", station_id])?;
        let resource = format!("Station with ID '{station_id}'");

        let station: StationDto = self.get_json(url, &[], &resource).await?;
        Ok(convert_station(station))
    }

    /// Fetch upcoming departures from a station.
    ///
    /// `date` and `time` default to "now" on the server when omitted.
    pub async fn fetch_station_departures(
        &self,
        station_id: &str,
        date: Option<NaiveDate>,
        time: Option<&str>,
    ) -> Result<StationDepartures, ApiError> {
        let station_id = station_id.trim();
        let url = self.endpoint(&["stations", station_id, "departures"])?;

        let mut params = Vec::new();
        if let Some(date) = date {
            params.push(("date", date.format("%Y-%m-%d").to_string()));
        }
        if let Some(time) = time {
            params.push(("time", time.to_string()));
        }

        let resource = format!("Station with ID '{station_id}'");
        let response: StationDeparturesResponse = self.get_json(url, &params, &resource).await?;
        Ok(convert_station_departures(response))
    }

    /// Fetch all lines.
    pub async fn fetch_all_routes(&self) -> Result<Vec<RouteSummary>, ApiError> {
        let url = self.endpoint(&["routes"])?;
        let routes: Vec<RouteDto> = self.get_json(url, &[], "Routes").await?;
        Ok(routes.into_iter().map(convert_route).collect())
    }

    /// Fetch a line with its stops.
    ///
    /// Returns [`ApiError::NotFound`] if the route id is unknown.
    pub async fn fetch_route(&self, route_id: &str) -> Result<RouteDetail, ApiError> {
        let route_id = route_id.trim();
        let url = self.endpoint(&["routes", route_id])?;
        let resource = format!("Route with ID '{route_id}'");

        let route: RouteDetailDto = self.get_json(url, &[], &resource).await?;
        debug!(route_id, stops = route.stops.len(), "decoded route");
        Ok(convert_route_detail(route))
    }

    /// Fetch the timetable between two stations (by name).
    ///
    /// The server uses today's date when `date` is `None`.
    pub async fn fetch_timetable(
        &self,
        departure: &str,
        arrival: &str,
        date: Option<NaiveDate>,
    ) -> Result<Timetable, ApiError> {
        let (departure, arrival) = station_pair(departure, arrival)?;
        let url = self.endpoint(&["timetable", departure, arrival])?;
        let params: Vec<(&str, String)> = date
            .map(|d| vec![("date", d.format("%Y-%m-%d").to_string())])
            .unwrap_or_default();

        let response: TimetableResponse = self.get_json(url, &params, "Timetable").await?;
        Ok(convert_timetable(&response))
    }

    /// Fetch the next train between two stations (by name).
    pub async fn fetch_next_train(
        &self,
        departure: &str,
        arrival: &str,
    ) -> Result<NextTrain, ApiError> {
        let (departure, arrival) = station_pair(departure, arrival)?;
        let url = self.endpoint(&["timetable", departure, arrival, "next"])?;
        let response: NextTrainResponse = self.get_json(url, &[], "Next train").await?;

        convert_next_train(&response).map_err(|e| ApiError::Decode {
            message: e.to_string(),
            body: None,
        })
    }
}

/// Trim both station names, rejecting blanks.
fn station_pair<'a>(departure: &'a str, arrival: &'a str) -> Result<(&'a str, &'a str), ApiError> {
    let (departure, arrival) = (departure.trim(), arrival.trim());
    if departure.is_empty() || arrival.is_empty() {
        return Err(ApiError::MissingStation);
    }
    Ok((departure, arrival))
}
