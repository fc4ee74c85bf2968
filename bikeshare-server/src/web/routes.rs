//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::get,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{error, warn};

use crate::gbfs::FeedError;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
///
/// `allowed_origins` are the browser origins given CORS access to the API.
pub fn create_router(state: AppState, allowed_origins: &[String]) -> Router {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET])
        .allow_headers(Any);

    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/stations", get(list_stations))
        // Path the Columbia-area frontend requests
        .route("/api/stations/columbia", get(list_stations))
        .route("/api/stations/status", get(station_status))
        .layer(cors)
        .with_state(state)
}

/// Service banner.
async fn index() -> Json<IndexResponse> {
    Json(IndexResponse {
        message: "Bike share station availability API",
        health: "/health",
    })
}

/// Health check endpoint.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: SERVICE_NAME,
    })
}

/// Metadata for the allow-listed stations.
async fn list_stations(State(state): State<AppState>) -> Result<Json<StationsResponse>, AppError> {
    let stations = state.feed.fetch_station_information().await?;
    Ok(Json(StationsResponse::new(stations)))
}

/// Current availability for the allow-listed stations, with totals.
async fn station_status(State(state): State<AppState>) -> Result<Json<StatusResponse>, AppError> {
    let stations = state.feed.get_combined_station_data().await?;
    Ok(Json(StatusResponse::new(stations)))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// The upstream feed could not be reached or refused the request.
    ServiceUnavailable { message: String },
    Internal { message: String },
}

impl From<FeedError> for AppError {
    fn from(e: FeedError) -> Self {
        if e.is_transport() {
            AppError::ServiceUnavailable {
                message: format!("Error fetching station data: {e}"),
            }
        } else {
            AppError::Internal {
                message: format!("Internal server error: {e}"),
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::ServiceUnavailable { message } => (StatusCode::SERVICE_UNAVAILABLE, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        error!(%status, "{message}");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
