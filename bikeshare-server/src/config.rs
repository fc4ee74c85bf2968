//! Process configuration from environment variables.
//!
//! Everything is read once at startup; there is no reload.

use std::net::SocketAddr;
use std::time::Duration;

use crate::gbfs::FeedConfig;

/// Default listen address.
const DEFAULT_BIND: &str = "127.0.0.1:8000";

/// Origins allowed to call the API from a browser by default.
const DEFAULT_ALLOWED_ORIGINS: &[&str] = &[
    "http://localhost:3000",
    "http://127.0.0.1:3000",
    "http://localhost:3001",
    "http://127.0.0.1:3001",
];

/// An environment variable held a value that could not be used.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid value for {var}: {message}")]
pub struct ConfigError {
    var: &'static str,
    message: String,
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Upstream feed and cache settings.
    pub feed: FeedConfig,
    /// Address to listen on.
    pub bind: SocketAddr,
    /// Origins given CORS access.
    pub allowed_origins: Vec<String>,
}

impl ServerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    ///
    /// Unset and empty variables fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let mut feed = FeedConfig::new();

        if let Some(url) = get("BIKESHARE_FEED_URL") {
            feed = feed.with_base_url(url.trim());
        }

        if let Some(stations) = get("BIKESHARE_STATIONS") {
            feed = feed.with_allow_list(split_list(&stations));
        }

        if let Some(ttl) = get("BIKESHARE_CACHE_TTL_SECS") {
            let secs = parse_secs("BIKESHARE_CACHE_TTL_SECS", &ttl)?;
            feed = feed.with_ttl(Duration::from_secs(secs));
        }

        if let Some(timeout) = get("BIKESHARE_TIMEOUT_SECS") {
            let secs = parse_secs("BIKESHARE_TIMEOUT_SECS", &timeout)?;
            if secs == 0 {
                return Err(ConfigError {
                    var: "BIKESHARE_TIMEOUT_SECS",
                    message: "must be at least 1".to_string(),
                });
            }
            feed = feed.with_timeout(secs);
        }

        let bind = get("BIKESHARE_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind: SocketAddr = bind.trim().parse().map_err(|e| ConfigError {
            var: "BIKESHARE_BIND",
            message: format!("{e}"),
        })?;

        let allowed_origins = match get("BIKESHARE_ALLOWED_ORIGINS") {
            Some(origins) => split_list(&origins),
            None => DEFAULT_ALLOWED_ORIGINS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        };

        Ok(Self {
            feed,
            bind,
            allowed_origins,
        })
    }
}

/// Split a comma-separated list, dropping blanks.
fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_secs(var: &'static str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError {
        var,
        message: format!("expected a whole number of seconds, got {value:?}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k: &str| map.get(k).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.bind, "127.0.0.1:8000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.allowed_origins.len(), 4);
        assert_eq!(config.feed.ttl, Duration::from_secs(300));
        assert_eq!(config.feed.timeout_secs, 10);
        assert_eq!(config.feed.allow_list.len(), 7);
    }

    #[test]
    fn overrides_from_environment() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("BIKESHARE_FEED_URL", "http://localhost:9000/gbfs"),
            ("BIKESHARE_STATIONS", "1.01, 2.02,,3.03"),
            ("BIKESHARE_CACHE_TTL_SECS", "60"),
            ("BIKESHARE_TIMEOUT_SECS", "3"),
            ("BIKESHARE_BIND", "0.0.0.0:9999"),
            ("BIKESHARE_ALLOWED_ORIGINS", "https://example.org"),
        ]))
        .unwrap();

        assert_eq!(config.feed.base_url, "http://localhost:9000/gbfs");
        assert_eq!(config.feed.allow_list.len(), 3);
        assert!(config.feed.allow_list.contains("2.02"));
        assert_eq!(config.feed.ttl, Duration::from_secs(60));
        assert_eq!(config.feed.timeout_secs, 3);
        assert_eq!(config.bind.port(), 9999);
        assert_eq!(config.allowed_origins, vec!["https://example.org"]);
    }

    #[test]
    fn empty_values_use_defaults() {
        let config =
            ServerConfig::from_lookup(lookup(&[("BIKESHARE_CACHE_TTL_SECS", "  ")])).unwrap();
        assert_eq!(config.feed.ttl, Duration::from_secs(300));
    }

    #[test]
    fn rejects_bad_numbers() {
        let err = ServerConfig::from_lookup(lookup(&[("BIKESHARE_CACHE_TTL_SECS", "five")]))
            .unwrap_err();
        assert!(err.to_string().contains("BIKESHARE_CACHE_TTL_SECS"));

        let err =
            ServerConfig::from_lookup(lookup(&[("BIKESHARE_TIMEOUT_SECS", "0")])).unwrap_err();
        assert!(err.to_string().contains("at least 1"));
    }

    #[test]
    fn rejects_bad_bind_address() {
        let err = ServerConfig::from_lookup(lookup(&[("BIKESHARE_BIND", "nowhere")])).unwrap_err();
        assert!(err.to_string().contains("BIKESHARE_BIND"));
    }
}
