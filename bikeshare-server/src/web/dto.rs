//! Data transfer objects for web responses.

use chrono::DateTime;
use serde::Serialize;

use crate::gbfs::{CombinedStation, StationInfo, percent_full};

/// Name reported by the health endpoint.
pub const SERVICE_NAME: &str = "bikeshare-server";

/// Root endpoint banner.
#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub message: &'static str,
    pub health: &'static str,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

/// Response for the station list.
#[derive(Debug, Serialize)]
pub struct StationsResponse {
    /// Allow-listed station metadata
    pub stations: Vec<StationInfo>,

    /// Number of stations
    pub count: usize,
}

impl StationsResponse {
    pub fn new(stations: Vec<StationInfo>) -> Self {
        Self {
            count: stations.len(),
            stations,
        }
    }
}

/// Totals across all returned stations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusSummary {
    pub total_stations: usize,
    pub total_bikes_available: u64,
    pub total_docks_available: u64,
    pub total_capacity: u64,
    pub overall_percent_full: f64,
}

impl StatusSummary {
    pub fn from_stations(stations: &[CombinedStation]) -> Self {
        let total_bikes_available: u64 = stations
            .iter()
            .map(|s| u64::from(s.num_bikes_available))
            .sum();
        let total_docks_available: u64 = stations
            .iter()
            .map(|s| u64::from(s.num_docks_available))
            .sum();
        let total_capacity: u64 = stations.iter().map(|s| u64::from(s.capacity)).sum();

        let overall_percent_full = percent_full(total_bikes_available, total_capacity);

        Self {
            total_stations: stations.len(),
            total_bikes_available,
            total_docks_available,
            total_capacity,
            overall_percent_full,
        }
    }
}

/// Response for live station status.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// Allow-listed stations joined with their status
    pub stations: Vec<CombinedStation>,

    /// Totals across `stations`
    pub summary: StatusSummary,

    /// Most recent `last_reported` timestamp, 0 if there are no stations
    pub last_updated: i64,

    /// `last_updated` as an RFC 3339 string, absent when it is 0
    pub last_updated_at: Option<String>,
}

impl StatusResponse {
    pub fn new(stations: Vec<CombinedStation>) -> Self {
        let summary = StatusSummary::from_stations(&stations);
        let last_updated = stations
            .iter()
            .map(|s| s.last_reported)
            .max()
            .unwrap_or(0);
        let last_updated_at = (last_updated > 0)
            .then(|| DateTime::from_timestamp(last_updated, 0))
            .flatten()
            .map(|t| t.to_rfc3339());

        Self {
            stations,
            summary,
            last_updated,
            last_updated_at,
        }
    }
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}
