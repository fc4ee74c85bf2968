//! GBFS HTTP client with response caching.
//!
//! Fetches station information and station status, restricts information to
//! the configured allow-list, and caches both feeds under separate keys.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::cache::{Clock, SystemClock, TtlCache};

use super::combine::{CombinedStation, combine, filter_by_allow_list, filter_by_ids};
use super::error::FeedError;
use super::types::{FeedResponse, StationInfo, StationStatus, parse_rows};

/// Default base URL for the Citi Bike GBFS feed.
pub const DEFAULT_BASE_URL: &str = "https://gbfs.citibikenyc.com/gbfs/en";

/// Short names of the stations around Columbia University.
pub const DEFAULT_STATIONS: &[&str] = &[
    "7783.18", // Broadway & W 122 St
    "7741.04", // Morningside Dr & Amsterdam Ave
    "7745.07", // W 120 St & Claremont Ave
    "7727.07", // Amsterdam Ave & W 119 St
    "7713.11", // W 116 St & Broadway
    "7692.11", // W 116 St & Amsterdam Ave
    "7713.01", // W 113 St & Broadway
];

/// Default time-to-live for both cached feeds.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Longest body excerpt kept on a parse error.
const ERROR_BODY_LIMIT: usize = 500;

/// Configuration for the feed client.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Base URL; `station_information.json` and `station_status.json` are
    /// resolved relative to it.
    pub base_url: String,
    /// Short names of the stations to serve.
    pub allow_list: HashSet<String>,
    /// How long fetched feeds stay cached.
    pub ttl: Duration,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl FeedConfig {
    /// Create a config for the default feed and station set.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            allow_list: DEFAULT_STATIONS.iter().map(|s| s.to_string()).collect(),
            ttl: DEFAULT_TTL,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Replace the station allow-list.
    pub fn with_allow_list<I, S>(mut self, short_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allow_list = short_names.into_iter().map(Into::into).collect();
        self
    }

    /// Set the cache TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    fn url(&self, document: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), document)
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Keys of the two cached feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Allow-listed station information.
    StationInfo,
    /// The full, unfiltered status feed.
    StationStatusAll,
}

impl CacheKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheKey::StationInfo => "station_info",
            CacheKey::StationStatusAll => "station_status_all",
        }
    }
}

/// A cached feed body.
#[derive(Debug, Clone)]
enum CachedFeed {
    Info(Arc<Vec<StationInfo>>),
    Status(Arc<Vec<StationStatus>>),
}

/// Client for a GBFS feed.
pub struct FeedClient {
    http: reqwest::Client,
    config: FeedConfig,
    cache: TtlCache<CacheKey, CachedFeed>,
}

impl FeedClient {
    /// Create a new feed client using the system clock for cache expiry.
    pub fn new(config: FeedConfig) -> Result<Self, FeedError> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a new feed client whose cache reads time from `clock`.
    pub fn with_clock(config: FeedConfig, clock: Arc<dyn Clock>) -> Result<Self, FeedError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| FeedError::Config {
                message: e.to_string(),
            })?;

        Ok(Self {
            http,
            config,
            cache: TtlCache::with_clock(clock),
        })
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    /// Fetch information for the allow-listed stations.
    pub async fn fetch_station_information(&self) -> Result<Vec<StationInfo>, FeedError> {
        if let Some(CachedFeed::Info(cached)) = self.cache.get(&CacheKey::StationInfo) {
            debug!(key = CacheKey::StationInfo.as_str(), "cache hit");
            return Ok(cached.to_vec());
        }

        let all: Vec<StationInfo> = self
            .fetch_feed(&self.config.url("station_information.json"))
            .await?;
        let total = all.len();
        let stations = filter_by_allow_list(all, &self.config.allow_list);
        info!(total, kept = stations.len(), "fetched station information");

        self.cache.set(
            CacheKey::StationInfo,
            CachedFeed::Info(Arc::new(stations.clone())),
            self.config.ttl,
        );
        Ok(stations)
    }

    /// Fetch station status, optionally restricted to the given station ids.
    ///
    /// The whole feed is cached regardless of `ids`, so later calls with a
    /// different id set are served from the same entry.
    pub async fn fetch_station_status(
        &self,
        ids: Option<&HashSet<String>>,
    ) -> Result<Vec<StationStatus>, FeedError> {
        let all = match self.cache.get(&CacheKey::StationStatusAll) {
            Some(CachedFeed::Status(cached)) => {
                debug!(key = CacheKey::StationStatusAll.as_str(), "cache hit");
                cached
            }
            _ => {
                let statuses: Vec<StationStatus> = self
                    .fetch_feed(&self.config.url("station_status.json"))
                    .await?;
                info!(total = statuses.len(), "fetched station status");

                let statuses = Arc::new(statuses);
                self.cache.set(
                    CacheKey::StationStatusAll,
                    CachedFeed::Status(statuses.clone()),
                    self.config.ttl,
                );
                statuses
            }
        };

        Ok(match ids {
            Some(ids) => filter_by_ids(&all, ids),
            None => all.to_vec(),
        })
    }

    /// Allow-listed stations joined with their current status.
    pub async fn get_combined_station_data(&self) -> Result<Vec<CombinedStation>, FeedError> {
        let info = self.fetch_station_information().await?;
        let ids: HashSet<String> = info.iter().map(|s| s.station_id.clone()).collect();
        let statuses = self.fetch_station_status(Some(&ids)).await?;

        Ok(combine(&info, &statuses))
    }

    /// Drop one cached feed.
    pub fn invalidate(&self, key: CacheKey) {
        self.cache.remove(&key);
    }

    /// Drop both cached feeds.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// GET a GBFS document and return its `data.stations` array.
    ///
    /// The envelope must parse; individual rows that do not are dropped
    /// with a warning.
    async fn fetch_feed<T: DeserializeOwned>(&self, url: &str) -> Result<Vec<T>, FeedError> {
        debug!(url, "requesting feed");
        let response = self.http.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FeedError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        let feed: FeedResponse<Value> =
            serde_json::from_str(&body).map_err(|e| FeedError::Json {
                message: e.to_string(),
                body: Some(body.chars().take(ERROR_BODY_LIMIT).collect()),
            })?;

        let (rows, skipped) = parse_rows(feed.data.stations);
        if skipped > 0 {
            warn!(url, skipped, "skipped malformed station rows");
        }
        Ok(rows)
    }
}
