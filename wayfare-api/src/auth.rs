use axum::{extract::State, routing::post, Json, Router};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::Serialize;
use uuid::Uuid;

use crate::{error::AppError, middleware::auth::CustomerClaims, state::AppState};

#[derive(Debug, Serialize)]
struct AuthResponse {
    token: String,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/auth/guest", post(login_guest))
}

/// Issue a short-lived guest token. Guests are ordinary customers without a
/// stored profile; their subject is a fresh user id.
async fn login_guest(State(state): State<AppState>) -> Result<Json<AuthResponse>, AppError> {
    let my_claims = CustomerClaims {
        sub: Uuid::new_v4().to_string(),
        email: None,
        role: "CUSTOMER".to_owned(),
        exp: (Utc::now() + Duration::seconds(state.auth.expiration as i64)).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &my_claims,
        &EncodingKey::from_secret(state.auth.secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(format!("Token encoding failed: {}", e)))?;

    Ok(Json(AuthResponse { token }))
}
