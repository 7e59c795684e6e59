use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use wayfare_core::CoreError;
use wayfare_planner::PlannerError;
use wayfare_trips::TripError;

#[derive(Debug)]
pub enum AppError {
    AuthenticationError(String),
    AuthorizationError(String),
    ValidationError {
        message: String,
        details: Option<String>,
    },
    PolicyError(String),
    NotFoundError(String),
    ConflictError(String),
    RateLimitError(String),
    PaymentRequiredError(String),
    /// Upstream gateway failure. Detail is logged; callers see a fixed message.
    UpstreamError(String),
    /// 500 with a fixed, caller-safe message. Detail was logged at the call site.
    OpaqueError(&'static str),
    /// 500 whose message is internal only; the client gets a generic body.
    InternalServerError(String),
    Anyhow(anyhow::Error),
}

impl AppError {
    pub fn validation(message: impl Into<String>, details: impl Into<String>) -> Self {
        AppError::ValidationError {
            message: message.into(),
            details: Some(details.into()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message, details) = match self {
            AppError::AuthenticationError(msg) => (StatusCode::UNAUTHORIZED, msg, None),
            AppError::AuthorizationError(msg) => (StatusCode::FORBIDDEN, msg, None),
            AppError::ValidationError { message, details } => {
                (StatusCode::BAD_REQUEST, message, details)
            }
            AppError::PolicyError(msg) => (StatusCode::BAD_REQUEST, msg, None),
            AppError::NotFoundError(msg) => (StatusCode::NOT_FOUND, msg, None),
            AppError::ConflictError(msg) => (StatusCode::CONFLICT, msg, None),
            AppError::RateLimitError(msg) => (StatusCode::TOO_MANY_REQUESTS, msg, None),
            AppError::PaymentRequiredError(msg) => (StatusCode::PAYMENT_REQUIRED, msg, None),
            AppError::UpstreamError(detail) => {
                tracing::error!("Upstream gateway error: {}", detail);
                (StatusCode::BAD_GATEWAY, "AI service error".to_string(), None)
            }
            AppError::OpaqueError(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, msg.to_string(), None)
            }
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An error occurred".to_string(),
                    None,
                )
            }
            AppError::Anyhow(err) => {
                tracing::error!("Internal Server Error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An error occurred".to_string(),
                    None,
                )
            }
        };

        let mut body = json!({ "error": error_message });
        if let Some(details) = details {
            body["details"] = json!(details);
        }

        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Anyhow(err)
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(msg) => AppError::ValidationError {
                message: msg,
                details: None,
            },
            CoreError::Policy(msg) => AppError::PolicyError(msg),
            CoreError::NotFound => AppError::NotFoundError("Booking not found".to_string()),
            CoreError::Conflict(msg) => AppError::ConflictError(msg),
            CoreError::MalformedTicket => AppError::ValidationError {
                message: "Invalid QR code format".to_string(),
                details: None,
            },
            CoreError::SignatureMismatch => AppError::ValidationError {
                message: "Ticket verification failed".to_string(),
                details: None,
            },
            CoreError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl From<TripError> for AppError {
    fn from(err: TripError) -> Self {
        match err {
            TripError::Validation(msg) => AppError::ValidationError {
                message: msg,
                details: None,
            },
            TripError::Policy(msg) => AppError::PolicyError(msg),
            TripError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl From<PlannerError> for AppError {
    fn from(err: PlannerError) -> Self {
        match err {
            PlannerError::Validation(msg) => {
                AppError::validation("Invalid trip plan request", msg)
            }
            PlannerError::RateLimited => AppError::RateLimitError(
                "Rate limit exceeded. Please try again later.".to_string(),
            ),
            PlannerError::CreditsExhausted => AppError::PaymentRequiredError(
                "AI credits exhausted. Please add credits to continue.".to_string(),
            ),
            PlannerError::Upstream(detail) => AppError::UpstreamError(detail),
            PlannerError::BadItinerary => AppError::OpaqueError("Failed to parse trip plan"),
        }
    }
}
