//! GBFS feed DTOs.
//!
//! These map to the `station_information.json` and `station_status.json`
//! documents. Fields not listed here are ignored. Counts default to zero
//! because feeds omit them for stations that are not yet reporting.
//!
//! Rows are decoded one at a time with [`parse_rows`], so a single bad
//! station does not take the rest of the document down with it.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Top-level GBFS document: `{"data": {"stations": [...]}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedResponse<T> {
    pub data: FeedData<T>,
}

/// The `data` object of a GBFS document.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedData<T> {
    pub stations: Vec<T>,
}

/// Static station metadata from `station_information.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationInfo {
    /// Stable external identifier, the join key for status rows.
    pub station_id: String,

    /// Local display code, matched against the allow-list.
    #[serde(default)]
    pub short_name: Option<String>,

    #[serde(default = "unknown_name")]
    pub name: String,

    pub lat: f64,

    pub lon: f64,

    /// Total number of docks.
    #[serde(default)]
    pub capacity: u32,
}

/// Point-in-time availability from `station_status.json`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StationStatus {
    pub station_id: String,

    #[serde(default)]
    pub num_bikes_available: u32,

    #[serde(default)]
    pub num_ebikes_available: u32,

    #[serde(default)]
    pub num_docks_available: u32,

    #[serde(default, deserialize_with = "flag")]
    pub is_installed: u8,

    #[serde(default, deserialize_with = "flag")]
    pub is_renting: u8,

    #[serde(default, deserialize_with = "flag")]
    pub is_returning: u8,

    /// Unix timestamp of the station's last report.
    #[serde(default)]
    pub last_reported: i64,
}

fn unknown_name() -> String {
    "Unknown".to_string()
}

/// Decode each raw row as `T`, skipping rows that do not fit.
///
/// Returns the decoded rows in input order and the number skipped.
pub fn parse_rows<T: DeserializeOwned>(rows: Vec<Value>) -> (Vec<T>, usize) {
    let total = rows.len();
    let parsed: Vec<T> = rows
        .into_iter()
        .filter_map(|row| serde_json::from_value(row).ok())
        .collect();
    let skipped = total - parsed.len();
    (parsed, skipped)
}

/// Accept GBFS 1.x integer flags as well as 2.x booleans, normalised to 0/1.
fn flag<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(u64),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => u8::from(b),
        Flag::Int(n) => u8::from(n != 0),
    })
}
