use axum::{routing::post, Json, Router};
use serde_json::json;
use tracing::info;
use wayfare_catalog::{
    generate_buses, generate_flights, generate_trains, validate_search, CatalogError, SearchQuery,
};

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/flights/search", post(search_flights))
        .route("/v1/trains/search", post(search_trains))
        .route("/v1/buses/search", post(search_buses))
}

fn search_error(err: CatalogError) -> AppError {
    let CatalogError::Validation(details) = err;
    AppError::validation("Invalid search parameters", details)
}

async fn search_flights(
    Json(query): Json<SearchQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let search = validate_search(query).map_err(search_error)?;
    // Route and date only; no passenger data reaches the logs.
    info!("[Flight Search] route={}-{} date={}", search.from, search.to, search.date);

    let flights = generate_flights(&search, &mut rand::thread_rng());
    Ok(Json(json!({ "flights": flights })))
}

async fn search_trains(
    Json(query): Json<SearchQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let search = validate_search(query).map_err(search_error)?;
    info!("[Train Search] route={}-{} date={}", search.from, search.to, search.date);

    let trains = generate_trains(&search, &mut rand::thread_rng());
    Ok(Json(json!({ "trains": trains })))
}

async fn search_buses(
    Json(query): Json<SearchQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let search = validate_search(query).map_err(search_error)?;
    info!("[Bus Search] route={}-{} date={}", search.from, search.to, search.date);

    let buses = generate_buses(&search, &mut rand::thread_rng());
    Ok(Json(json!({ "buses": buses })))
}
