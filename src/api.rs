//! HTTP API surface for the hostel search backend
//!
//! All routes are GET and return JSON. Errors cross this boundary only
//! as mapped, human-readable messages; upstream payloads stay inside.

use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::HostelError;
use crate::models::PointOfInterest;
use crate::search::HostelSearchService;

/// Shared handler state, passed explicitly through the router
#[derive(Clone)]
pub struct AppState {
    pub search: Arc<HostelSearchService>,
}

/// Body of `GET /getlocation/{city}`
#[derive(Debug, Serialize, Deserialize)]
pub struct LocationResponse {
    pub latitude: f64,
    pub longitude: f64,
}

/// Error body shape shared by every failing route
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

/// Build the API router over the given state
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/getlocation/{city}", get(get_location))
        .route("/gethostels/{city}/{radius}", get(get_hostels))
        .route("/gethostel/{id}", get(get_hostel))
        .route("/health", get(health))
        .with_state(state)
}

async fn get_location(
    State(state): State<AppState>,
    Path(city): Path<String>,
) -> Result<Json<LocationResponse>, ApiError> {
    let coordinate = state.search.locate(&city).await?;

    Ok(Json(LocationResponse {
        latitude: coordinate.latitude,
        longitude: coordinate.longitude,
    }))
}

async fn get_hostels(
    State(state): State<AppState>,
    Path((city, radius)): Path<(String, u32)>,
) -> Result<Json<Vec<PointOfInterest>>, ApiError> {
    info!("Searching hostels near {} within {}m", city, radius);

    let hostels = state.search.search(&city, radius).await?;

    Ok(Json(hostels))
}

async fn get_hostel(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<PointOfInterest>, ApiError> {
    let hostel = state.search.get_details(id).await?;

    Ok(Json(hostel))
}

async fn health() -> &'static str {
    "Server running"
}

/// Boundary wrapper translating the error taxonomy into HTTP responses
pub struct ApiError(HostelError);

impl From<HostelError> for ApiError {
    fn from(err: HostelError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            HostelError::Validation { .. } => StatusCode::BAD_REQUEST,
            HostelError::Geocode { .. } | HostelError::NotFound => StatusCode::NOT_FOUND,
            HostelError::QueryTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            HostelError::Query { .. } => StatusCode::BAD_GATEWAY,
            HostelError::Auth { .. } => StatusCode::UNAUTHORIZED,
            HostelError::Config { .. } | HostelError::Io { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = ErrorBody {
            message: self.0.user_message(),
        };

        (status, Json(body)).into_response()
    }
}
