use axum::{
    extract::{Extension, Path, State},
    routing::post,
    Json, Router,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;
use wayfare_core::booking::{Booking, BookingStatus};
use wayfare_core::validate::{check_booking_policy, validate_booking, BookingDraft};
use wayfare_core::CoreError;
use wayfare_trips::{group_bookings, TripGroup};

use crate::error::AppError;
use crate::middleware::auth::{customer_auth_middleware, CustomerClaims};
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/v1/bookings", post(create_booking).get(list_bookings))
        .route("/v1/bookings/{id}/cancel", post(cancel_booking))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            customer_auth_middleware,
        ))
}

#[derive(Debug, Serialize)]
struct BookingResponse {
    booking: Booking,
}

#[derive(Debug, Serialize)]
struct TripGroupView {
    trip_group_id: Option<Uuid>,
    total_price_inr: i64,
    bookings: Vec<Booking>,
}

impl From<TripGroup> for TripGroupView {
    fn from(group: TripGroup) -> Self {
        Self {
            trip_group_id: group.trip_group_id,
            total_price_inr: group.total_price_inr(),
            bookings: group.bookings,
        }
    }
}

async fn create_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<CustomerClaims>,
    Json(draft): Json<BookingDraft>,
) -> Result<Json<BookingResponse>, AppError> {
    let user_id = claims.user_id()?;

    let valid = validate_booking(draft).map_err(|e| match e {
        CoreError::Validation(details) => AppError::validation("Invalid booking data", details),
        other => other.into(),
    })?;

    let now = Utc::now();
    check_booking_policy(&valid, now.date_naive(), &state.policy)?;

    let booking = Booking::issue(valid, user_id, &state.qr, now)?;

    state.bookings.insert_booking(&booking).await.map_err(|e| {
        // Full detail stays server-side; the caller gets a fixed message.
        error!(booking_id = %booking.id, error = %e, "failed to persist booking");
        AppError::OpaqueError("Failed to create booking")
    })?;

    info!(
        booking_id = %booking.id,
        booking_type = booking.booking_type.as_str(),
        "booking created"
    );

    Ok(Json(BookingResponse { booking }))
}

async fn list_bookings(
    State(state): State<AppState>,
    Extension(claims): Extension<CustomerClaims>,
) -> Result<Json<serde_json::Value>, AppError> {
    let user_id = claims.user_id()?;

    let bookings = state
        .bookings
        .list_bookings(user_id)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    let trips: Vec<TripGroupView> = group_bookings(bookings)
        .into_iter()
        .map(TripGroupView::from)
        .collect();

    Ok(Json(json!({ "trips": trips })))
}

/// Cancel a booking; when it belongs to a trip group, the whole group goes
/// with it.
async fn cancel_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<CustomerClaims>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let user_id = claims.user_id()?;

    let booking = state
        .bookings
        .get_booking(user_id, id)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
        .ok_or_else(|| AppError::NotFoundError("Booking not found".to_string()))?;

    if booking.status != BookingStatus::Confirmed {
        return Err(AppError::ConflictError(
            "Booking is already cancelled".to_string(),
        ));
    }

    let now = Utc::now();
    let affected = match booking.trip_group_id {
        Some(group) => state.bookings.cancel_group(user_id, group, now).await,
        None => state.bookings.cancel_booking(user_id, booking.id, now).await,
    }
    .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    if affected == 0 {
        return Err(AppError::ConflictError(
            "Booking is already cancelled".to_string(),
        ));
    }

    info!(booking_id = %id, affected, "booking cancelled");

    Ok(Json(json!({ "cancelled": affected })))
}
