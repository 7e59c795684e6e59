use axum::{
    extract::{Extension, State},
    routing::post,
    Json, Router,
};
use serde_json::json;
use tracing::info;
use wayfare_planner::TripPlanRequest;

use crate::error::AppError;
use crate::middleware::auth::{customer_auth_middleware, CustomerClaims};
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/v1/planner/trip-plan", post(generate_trip_plan))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            customer_auth_middleware,
        ))
}

/// Generate an AI itinerary. The gateway call is synchronous and never
/// retried; failures map straight through to the caller.
async fn generate_trip_plan(
    State(state): State<AppState>,
    Extension(_claims): Extension<CustomerClaims>,
    Json(req): Json<TripPlanRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let planner = state
        .planner
        .as_ref()
        .ok_or(AppError::OpaqueError("Trip planner is not configured"))?;

    info!(
        from = %req.current_location,
        to = %req.destination,
        days = req.num_days(),
        "generating trip plan"
    );

    let plan = planner.generate_plan(&req).await?;

    Ok(Json(json!({ "plan": plan })))
}
