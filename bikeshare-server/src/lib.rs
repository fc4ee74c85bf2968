//! Bike share station availability server.
//!
//! Proxies a public GBFS feed: station metadata is filtered to an
//! allow-list, joined with live status, and cached in memory.

pub mod cache;
pub mod config;
pub mod gbfs;
pub mod web;
