//! Restaurant lookup and one-shot pick handlers.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use foodradar_core::{Coordinates, FetchSource, Restaurant};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use super::handlers::ErrorResponse;
use crate::state::AppState;

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
}

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct NearbyQuery {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Serialize)]
pub struct NearbyResponse {
    pub restaurants: Vec<Restaurant>,
    pub source: FetchSource,
}

#[derive(Debug, Deserialize)]
pub struct PickRequest {
    pub restaurants: Vec<Restaurant>,
}

#[derive(Debug, Serialize)]
pub struct PickResponse {
    pub winner: Restaurant,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/v1/restaurants?latitude=..&longitude=..
///
/// Fetch restaurants near a location. Under the strict policy a failed
/// fetch is reported as 502.
pub async fn list_nearby(
    State(state): State<Arc<AppState>>,
    Query(query): Query<NearbyQuery>,
) -> Result<Json<NearbyResponse>, ApiError> {
    let coords = Coordinates::new(query.latitude, query.longitude);
    coords
        .validate()
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, e))?;

    match state.fetcher().fetch(coords).await {
        Ok(outcome) => {
            info!(
                "Serving {} restaurants ({})",
                outcome.restaurants.len(),
                outcome.source.as_str()
            );
            Ok(Json(NearbyResponse {
                restaurants: outcome.restaurants,
                source: outcome.source,
            }))
        }
        Err(e) => {
            warn!("Restaurant lookup failed: {}", e);
            Err(api_error(StatusCode::BAD_GATEWAY, e.to_string()))
        }
    }
}

/// POST /api/v1/pick
///
/// Run a full spin over the given restaurants and return where it landed.
pub async fn pick(
    State(state): State<Arc<AppState>>,
    Json(body): Json<PickRequest>,
) -> Result<Json<PickResponse>, ApiError> {
    if body.restaurants.is_empty() {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "at least one restaurant is required",
        ));
    }

    let handle = state.picker().spin(body.restaurants, |_| {}, |_| {});
    match handle.finished().await {
        Some(winner) => Ok(Json(PickResponse { winner })),
        None => Err(api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "spin ended without a winner",
        )),
    }
}
