//! Web layer for the station availability API.
//!
//! Provides HTTP endpoints for the allow-listed stations and their live
//! status.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
