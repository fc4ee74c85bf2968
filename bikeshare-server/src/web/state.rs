//! Application state for the web layer.

use std::sync::Arc;

use crate::gbfs::FeedClient;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Cached GBFS feed client
    pub feed: Arc<FeedClient>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(feed: FeedClient) -> Self {
        Self {
            feed: Arc::new(feed),
        }
    }
}
