use axum::{extract::State, routing::post, Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use wayfare_core::booking::{Booking, TripSegment};
use wayfare_trips::current_segment;

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/tickets/scan", post(scan_ticket))
}

#[derive(Debug, Deserialize)]
struct ScanRequest {
    qr_code: String,
}

#[derive(Debug, Clone, Serialize)]
struct SegmentView {
    booking_type: String,
    service_name: String,
    service_number: String,
    from_location: String,
    to_location: String,
    departure_date: String,
    departure_time: String,
    arrival_time: String,
    seat_number: Option<String>,
    class_type: Option<String>,
    segment_order: u32,
    status: String,
}

impl SegmentView {
    fn from_segment(segment: &TripSegment) -> Self {
        Self {
            booking_type: segment.booking_type.as_str().to_string(),
            service_name: segment.service_name.clone(),
            service_number: segment.service_number.clone(),
            from_location: segment.from_location.clone(),
            to_location: segment.to_location.clone(),
            departure_date: segment.departure_date.to_string(),
            departure_time: segment.departure_time.format("%H:%M").to_string(),
            arrival_time: segment.arrival_time.format("%H:%M").to_string(),
            seat_number: segment.seat_number.clone(),
            class_type: segment.class_type.clone(),
            segment_order: segment.segment_order,
            status: segment.status.as_str().to_string(),
        }
    }

    /// A standalone booking renders as a one-leg trip.
    fn from_booking(booking: &Booking) -> Self {
        Self {
            booking_type: booking.booking_type.as_str().to_string(),
            service_name: booking.service_name.clone(),
            service_number: booking.service_number.clone(),
            from_location: booking.from_location.clone(),
            to_location: booking.to_location.clone(),
            departure_date: booking.departure_date.to_string(),
            departure_time: booking.departure_time.format("%H:%M").to_string(),
            arrival_time: booking.arrival_time.format("%H:%M").to_string(),
            seat_number: booking.seat_number.clone(),
            class_type: booking.class_type.clone(),
            segment_order: 1,
            status: booking.status.as_str().to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct TicketView {
    reference: Option<String>,
    authenticated: bool,
    segments: Vec<SegmentView>,
    current_segment: Option<SegmentView>,
    completed: bool,
}

/// Resolve a scanned QR payload to its ticket. Signed payloads are verified
/// before anything is looked up; the legacy unsigned form is resolved but
/// flagged unauthenticated.
async fn scan_ticket(
    State(state): State<AppState>,
    Json(req): Json<ScanRequest>,
) -> Result<Json<TicketView>, AppError> {
    let scanned = state.qr.decode(&req.qr_code)?;

    if let Some(group_id) = scanned.trip_group_id {
        let segments = state
            .bookings
            .list_segments(group_id)
            .await
            .map_err(|e| AppError::InternalServerError(e.to_string()))?;

        if segments.is_empty() {
            return Err(AppError::NotFoundError("Booking not found".to_string()));
        }

        let now = Utc::now().naive_utc();
        let current = current_segment(&segments, now).map(SegmentView::from_segment);
        let completed = current.is_none();

        return Ok(Json(TicketView {
            reference: scanned.reference,
            authenticated: scanned.authenticated,
            segments: segments.iter().map(SegmentView::from_segment).collect(),
            current_segment: current,
            completed,
        }));
    }

    let reference = scanned
        .reference
        .ok_or(AppError::ValidationError {
            message: "Invalid QR code format".to_string(),
            details: None,
        })?;

    let booking = state
        .bookings
        .find_by_reference(&reference)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
        .ok_or_else(|| AppError::NotFoundError("Booking not found".to_string()))?;

    let view = SegmentView::from_booking(&booking);
    Ok(Json(TicketView {
        reference: Some(booking.booking_reference.clone()),
        authenticated: scanned.authenticated,
        segments: vec![view.clone()],
        current_segment: Some(view),
        completed: false,
    }))
}
