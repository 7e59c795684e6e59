use axum::{
    extract::{Extension, Path, State},
    routing::{delete, get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;
use wayfare_core::share::{AccessLevel, ShareStatus, TripShare};
use wayfare_trips::check_share_request;

use crate::error::AppError;
use crate::middleware::auth::{customer_auth_middleware, CustomerClaims};
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/v1/trips/{group_id}/shares",
            post(create_share).get(list_shares),
        )
        .route("/v1/shares/{id}", delete(remove_share))
        .route("/v1/shares/{id}/respond", post(respond_to_share))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            customer_auth_middleware,
        ))
}

#[derive(Debug, Deserialize)]
struct CreateShareRequest {
    email: String,
    access_level: String,
}

/// Confirm the caller owns the trip group before touching its shares.
async fn ensure_group_owner(
    state: &AppState,
    group_id: Uuid,
    user_id: Uuid,
) -> Result<(), AppError> {
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
    Ok(())
}

async fn create_share(
    State(state): State<AppState>,
    Extension(claims): Extension<CustomerClaims>,
    Path(group_id): Path<Uuid>,
    Json(req): Json<CreateShareRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let user_id = claims.user_id()?;
    ensure_group_owner(&state, group_id, user_id).await?;

    let access_level = AccessLevel::parse(req.access_level.trim()).ok_or_else(|| {
        AppError::validation("Invalid share request", "Access level must be view or join")
    })?;

    let existing = state
        .shares
        .list_shares(group_id)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    check_share_request(&existing, &req.email, &state.policy)?;

    let share = TripShare::new(
        group_id,
        user_id,
        req.email.trim().to_string(),
        access_level,
        Utc::now(),
    );

    state
        .shares
        .insert_share(&share)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    info!(share_id = %share.id, trip_group_id = %group_id, "trip shared");

    Ok(Json(json!({ "share": share })))
}

async fn list_shares(
    State(state): State<AppState>,
    Extension(claims): Extension<CustomerClaims>,
    Path(group_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let user_id = claims.user_id()?;
    ensure_group_owner(&state, group_id, user_id).await?;

    let shares = state
        .shares
        .list_shares(group_id)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    Ok(Json(json!({ "shares": shares })))
}

async fn remove_share(
    State(state): State<AppState>,
    Extension(claims): Extension<CustomerClaims>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let user_id = claims.user_id()?;

    let removed = state
        .shares
        .delete_share(user_id, id)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    if removed == 0 {
        return Err(AppError::NotFoundError("Share not found".to_string()));
    }

    Ok(Json(json!({ "removed": removed })))
}

#[derive(Debug, Deserialize)]
struct RespondRequest {
    status: String,
}

/// Invitees accept or decline by the email on their token.
async fn respond_to_share(
    State(state): State<AppState>,
    Extension(claims): Extension<CustomerClaims>,
    Path(id): Path<Uuid>,
    Json(req): Json<RespondRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let status = match ShareStatus::parse(req.status.trim()) {
        Some(ShareStatus::Accepted) => ShareStatus::Accepted,
        Some(ShareStatus::Declined) => ShareStatus::Declined,
        _ => {
            return Err(AppError::validation(
                "Invalid share response",
                "Status must be accepted or declined",
            ))
        }
    };

    let share = state
        .shares
        .get_share(id)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
        .ok_or_else(|| AppError::NotFoundError("Share not found".to_string()))?;

    let caller_email = claims.email.as_deref().ok_or_else(|| {
        AppError::AuthorizationError("Share was not addressed to you".to_string())
    })?;
    if !share.shared_with_email.eq_ignore_ascii_case(caller_email) {
        return Err(AppError::AuthorizationError(
            "Share was not addressed to you".to_string(),
        ));
    }

    state
        .shares
        .update_share_status(id, status)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    Ok(Json(json!({ "status": status })))
}
