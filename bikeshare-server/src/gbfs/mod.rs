//! GBFS (General Bikeshare Feed Specification) client.
//!
//! Two documents are consumed:
//! - `station_information.json`: slow-changing metadata (name, location,
//!   capacity), filtered to an allow-list of short names
//! - `station_status.json`: live availability for every station
//!
//! Both are cached in memory for a fixed TTL and joined on `station_id`.

mod client;
mod combine;
mod error;
mod types;

pub use client::{
    CacheKey, DEFAULT_BASE_URL, DEFAULT_STATIONS, DEFAULT_TTL, FeedClient, FeedConfig,
};
pub use combine::{CombinedStation, combine, filter_by_allow_list, filter_by_ids, percent_full};
pub use error::FeedError;
pub use types::{FeedData, FeedResponse, StationInfo, StationStatus};
