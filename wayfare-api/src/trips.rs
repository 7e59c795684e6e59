use axum::{
    extract::{Extension, Path, State},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;
use wayfare_core::validate::{check_booking_policy, validate_booking, BookingDraft, ValidBooking};
use wayfare_core::CoreError;
use wayfare_trips::{assemble_trip, layovers};

use crate::error::AppError;
use crate::middleware::auth::{customer_auth_middleware, CustomerClaims};
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/v1/trips", post(checkout_trip))
        .route("/v1/trips/{group_id}/segments", get(list_trip_segments))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            customer_auth_middleware,
        ))
}

#[derive(Debug, Deserialize)]
struct CheckoutRequest {
    items: Vec<BookingDraft>,
}

/// Multi-segment checkout: every cart item becomes one segment of a fresh
/// trip group, fronted by a master multi-segment booking, persisted in a
/// single transaction.
async fn checkout_trip(
    State(state): State<AppState>,
    Extension(claims): Extension<CustomerClaims>,
    Json(req): Json<CheckoutRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let user_id = claims.user_id()?;
    let now = Utc::now();
    let today = now.date_naive();

    let mut items: Vec<ValidBooking> = Vec::with_capacity(req.items.len());
    for draft in req.items {
        let valid = validate_booking(draft).map_err(|e| match e {
            CoreError::Validation(details) => {
                AppError::validation("Invalid booking data", details)
            }
            other => other.into(),
        })?;
        check_booking_policy(&valid, today, &state.policy)?;
        items.push(valid);
    }

    let (master, segments) = assemble_trip(items, user_id, &state.qr, &state.policy, now)?;

    state
        .bookings
        .insert_trip(&master, &segments)
        .await
        .map_err(|e| {
            error!(booking_id = %master.id, error = %e, "failed to persist trip");
            AppError::OpaqueError("Failed to create booking")
        })?;

    info!(
        booking_id = %master.id,
        trip_group_id = ?master.trip_group_id,
        segments = segments.len(),
        "multi-segment trip booked"
    );

    Ok(Json(json!({ "booking": master, "segments": segments })))
}

async fn list_trip_segments(
    State(state): State<AppState>,
    Extension(claims): Extension<CustomerClaims>,
    Path(group_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let user_id = claims.user_id()?;

    let segments = state
        .bookings
        .list_segments(group_id)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    if segments.is_empty() {
        return Err(AppError::NotFoundError("Booking not found".to_string()));
    }
    if segments[0].user_id != user_id {
        return Err(AppError::AuthorizationError(
            "Trip does not belong to you".to_string(),
        ));
    }

    let layovers = layovers(&segments);
    Ok(Json(json!({ "segments": segments, "layovers": layovers })))
}
