//! The fetch contract the journey cache is populated from.

use std::future::Future;

use chrono::NaiveDate;

use crate::domain::{NextTrain, RouteDetail, Station, Timetable};

use super::client::RapiClient;
use super::error::ApiError;

/// Remote source of timetable data.
///
/// All operations are asynchronous and fallible. [`RapiClient`] is the
/// production implementation; tests supply their own.
pub trait JourneySource: Send + Sync {
    /// Next train from `departure` to `arrival` (station names).
    fn fetch_next_train(
        &self,
        departure: &str,
        arrival: &str,
    ) -> impl Future<Output = Result<NextTrain, ApiError>> + Send;

    /// All trains from `departure` to `arrival` on `date`, in departure order.
    fn fetch_timetable(
        &self,
        departure: &str,
        arrival: &str,
        date: NaiveDate,
    ) -> impl Future<Output = Result<Timetable, ApiError>> + Send;

    /// Stations, optionally filtered by a search query.
    fn fetch_all_stations(
        &self,
        query: Option<&str>,
    ) -> impl Future<Output = Result<Vec<Station>, ApiError>> + Send;

    /// A line with its stops. Unknown ids fail with [`ApiError::NotFound`].
    fn fetch_route(
        &self,
        route_id: &str,
    ) -> impl Future<Output = Result<RouteDetail, ApiError>> + Send;
}

impl JourneySource for RapiClient {
    async fn fetch_next_train(&self, departure: &str, arrival: &str) -> Result<NextTrain, ApiError> {
        RapiClient::fetch_next_train(self, departure, arrival).await
    }

    async fn fetch_timetable(
        &self,
        departure: &str,
        arrival: &str,
        date: NaiveDate,
    ) -> Result<Timetable, ApiError> {
        RapiClient::fetch_timetable(self, departure, arrival, Some(date)).await
    }

    async fn fetch_all_stations(&self, query: Option<&str>) -> Result<Vec<Station>, ApiError> {
        RapiClient::fetch_all_stations(self, query).await
    }

    async fn fetch_route(&self, route_id: &str) -> Result<RouteDetail, ApiError> {
        RapiClient::fetch_route(self, route_id).await
    }
}
