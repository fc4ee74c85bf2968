//! Filtering and joining of station information and status.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use super::types::{StationInfo, StationStatus};

/// A station's metadata joined with its current availability.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombinedStation {
    pub station_id: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub capacity: u32,
    pub num_bikes_available: u32,
    pub num_ebikes_available: u32,
    pub num_classic_bikes_available: u32,
    pub num_docks_available: u32,
    pub is_installed: u8,
    pub is_renting: u8,
    pub is_returning: u8,
    pub last_reported: i64,
    pub percent_full: f64,
}

impl CombinedStation {
    /// Join one info row with its status, if any.
    ///
    /// A missing status yields zeroed availability rather than an error,
    /// which covers stations that have been added but not yet polled.
    pub fn new(info: &StationInfo, status: Option<&StationStatus>) -> Self {
        let status = status.cloned().unwrap_or_default();

        Self {
            station_id: info.station_id.clone(),
            name: info.name.clone(),
            lat: info.lat,
            lon: info.lon,
            capacity: info.capacity,
            num_bikes_available: status.num_bikes_available,
            num_ebikes_available: status.num_ebikes_available,
            // Saturating: some feeds briefly report more e-bikes than bikes
            num_classic_bikes_available: status
                .num_bikes_available
                .saturating_sub(status.num_ebikes_available),
            num_docks_available: status.num_docks_available,
            is_installed: status.is_installed,
            is_renting: status.is_renting,
            is_returning: status.is_returning,
            last_reported: status.last_reported,
            percent_full: percent_full(
                u64::from(status.num_bikes_available),
                u64::from(info.capacity),
            ),
        }
    }
}

/// Bikes as a percentage of capacity, rounded to one decimal place.
///
/// Halfway cases round to the even digit, so 6.25 becomes 6.2. Zero
/// capacity gives 0.
pub fn percent_full(bikes: u64, capacity: u64) -> f64 {
    if capacity == 0 {
        return 0.0;
    }
    let pct = bikes as f64 / capacity as f64 * 100.0;
    (pct * 10.0).round_ties_even() / 10.0
}

/// Keep only stations whose short name is in the allow-list.
pub fn filter_by_allow_list(
    stations: Vec<StationInfo>,
    allow_list: &HashSet<String>,
) -> Vec<StationInfo> {
    stations
        .into_iter()
        .filter(|s| {
            s.short_name
                .as_ref()
                .is_some_and(|short| allow_list.contains(short))
        })
        .collect()
}

/// Keep only status rows for the given station ids.
pub fn filter_by_ids(statuses: &[StationStatus], ids: &HashSet<String>) -> Vec<StationStatus> {
    statuses
        .iter()
        .filter(|s| ids.contains(&s.station_id))
        .cloned()
        .collect()
}

/// Left join of info and status on `station_id`.
///
/// Every info row appears exactly once, in input order. Status rows with no
/// matching info are dropped.
pub fn combine(info: &[StationInfo], statuses: &[StationStatus]) -> Vec<CombinedStation> {
    let by_id: HashMap<&str, &StationStatus> = statuses
        .iter()
        .map(|s| (s.station_id.as_str(), s))
        .collect();

    info.iter()
        .map(|i| CombinedStation::new(i, by_id.get(i.station_id.as_str()).copied()))
        .collect()
}
