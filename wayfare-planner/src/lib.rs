pub mod client;
pub mod models;
pub mod prompt;

pub use client::{PlannerClient, PlannerConfig};
pub use models::{PlanStep, StepCategory, TripPlan, TripPlanRequest};

#[derive(Debug, thiserror::Error)]
pub enum PlannerError {
    #[error("{0}")]
    Validation(String),
    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,
    #[error("AI credits exhausted. Please add credits to continue.")]
    CreditsExhausted,
    /// Gateway unreachable or returned a non-success status. Detail is logged
    /// server-side; the message here is what callers see.
    #[error("AI service error")]
    Upstream(String),
    #[error("Failed to parse trip plan")]
    BadItinerary,
}
