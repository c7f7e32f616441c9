//! Traits describing slot lookup backends and their shared error type.

use async_trait::async_trait;
use reqwest::{Error as ReqwestError, StatusCode};
use serde_json::Error as JsonError;

use crate::model::{CenterMap, CenterRecord, LocationQuery};

#[derive(thiserror::Error, Debug)]
/// Errors that can occur while talking to the appointment API.
pub enum PortError {
    /// Network layer failed.
    #[error("Network error: {0}")]
    Network(#[from] ReqwestError),
    /// The API answered with a non-success status.
    #[error("HTTP status code {0}")]
    Status(StatusCode),
    /// The response body was not valid JSON of the expected shape.
    #[error("Decode error: {0}")]
    Decode(#[from] JsonError),
}

#[async_trait]
/// Trait for backends answering slot lookups.
///
/// Lookups are best effort: a backend logs its failures and answers with an empty result
/// instead of returning an error.
pub trait SlotPort: Send + Sync {
    /// Centers with sessions in the week starting at `date` for a PIN code.
    async fn by_pincode(&self, date: &str, pincode: &str) -> CenterMap;

    /// Centers with sessions in the week starting at `date` for a district.
    async fn by_district(&self, date: &str, district_id: i64) -> CenterMap;

    /// A single center's sessions in the week starting at `date`.
    async fn by_center(&self, date: &str, center_id: i64) -> Option<CenterRecord>;

    /// Run any configured lookup, keying a single-center answer by the requested id.
    async fn lookup(&self, date: &str, query: &LocationQuery) -> CenterMap {
        match query {
            LocationQuery::Pincode(pincode) => self.by_pincode(date, pincode).await,
            LocationQuery::District(district_id) => self.by_district(date, *district_id).await,
            LocationQuery::Center(center_id) => self
                .by_center(date, *center_id)
                .await
                .map(|center| CenterMap::from([(*center_id, center)]))
                .unwrap_or_default(),
        }
    }
}
