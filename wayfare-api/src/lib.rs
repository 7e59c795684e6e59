use axum::{http::Method, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod bookings;
pub mod error;
pub mod middleware;
pub mod planner;
pub mod search;
pub mod shares;
pub mod state;
pub mod tickets;
pub mod trips;

pub use state::AppState;

pub fn app(state: AppState) -> Router {
    // CORS Middleware
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::USER_AGENT,
        ]);

    Router::new()
        .merge(auth::routes())
        .merge(search::routes())
        .merge(tickets::routes())
        .merge(bookings::routes(state.clone()))
        .merge(trips::routes(state.clone()))
        .merge(shares::routes(state.clone()))
        .merge(planner::routes(state.clone()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
