use chrono::{DateTime, Utc};
use uuid::Uuid;
use wayfare_core::booking::{
    generate_booking_reference, Booking, BookingStatus, BookingType, PaymentStatus, TripSegment,
};
use wayfare_core::qr::{QrSigner, TicketClaim};
use wayfare_core::validate::{BookingPolicy, ValidBooking};
use wayfare_shared::Masked;

use crate::TripError;

/// Turn a validated cart into one trip group: ordered segments plus the
/// master multi-segment booking that fronts them.
///
/// Items are sorted by departure instant and given 1-based segment orders;
/// the master row spans first origin to last destination, carries the summed
/// price, and its QR claim embeds the fresh `trip_group_id`. The caller
/// persists master and segments in a single transaction.
pub fn assemble_trip(
    items: Vec<ValidBooking>,
    user_id: Uuid,
    signer: &QrSigner,
    policy: &BookingPolicy,
    now: DateTime<Utc>,
) -> Result<(Booking, Vec<TripSegment>), TripError> {
    if items.is_empty() {
        return Err(TripError::Validation(
            "Trip must contain at least one segment".into(),
        ));
    }
    if items.len() as u32 > policy.max_segments_per_trip {
        return Err(TripError::Policy(format!(
            "Trip cannot have more than {} segments",
            policy.max_segments_per_trip
        )));
    }

    let mut sorted = items;
    sorted.sort_by_key(|item| item.departure_date.and_time(item.departure_time));

    let trip_group_id = Uuid::new_v4();
    let booking_reference = generate_booking_reference(now);
    let claim = TicketClaim::new(booking_reference.clone(), Some(trip_group_id));
    let qr_code = signer
        .encode(&claim)
        .map_err(|e| TripError::Internal(e.to_string()))?;

    let first = &sorted[0];
    let last = &sorted[sorted.len() - 1];
    let total_price: i64 = sorted.iter().map(|item| item.price_inr).sum();

    let master = Booking {
        id: Uuid::new_v4(),
        user_id,
        booking_reference: booking_reference.clone(),
        trip_group_id: Some(trip_group_id),
        booking_type: BookingType::MultiSegment,
        passenger_name: first.passenger_name.clone(),
        passenger_email: Masked(first.passenger_email.clone()),
        passenger_phone: Masked(first.passenger_phone.clone()),
        from_location: first.from_location.clone(),
        to_location: last.to_location.clone(),
        departure_date: first.departure_date,
        departure_time: first.departure_time,
        arrival_date: last.arrival_date,
        arrival_time: last.arrival_time,
        service_name: format!("Multi-Segment Trip ({} legs)", sorted.len()),
        service_number: booking_reference,
        seat_number: None,
        class_type: None,
        price_inr: total_price,
        payment_status: PaymentStatus::Completed,
        status: BookingStatus::Confirmed,
        qr_code,
        created_at: now,
        cancelled_at: None,
    };

    let segments = sorted
        .into_iter()
        .enumerate()
        .map(|(i, item)| TripSegment {
            id: Uuid::new_v4(),
            trip_group_id,
            user_id,
            segment_order: i as u32 + 1,
            booking_type: item.booking_type,
            service_name: item.service_name,
            service_number: item.service_number,
            from_location: item.from_location,
            to_location: item.to_location,
            departure_date: item.departure_date,
            departure_time: item.departure_time,
            arrival_time: item.arrival_time,
            passenger_name: item.passenger_name,
            passenger_email: Masked(item.passenger_email),
            passenger_phone: Masked(item.passenger_phone),
            seat_number: item.seat_number,
            class_type: item.class_type,
            price_inr: item.price_inr,
            payment_status: PaymentStatus::Completed,
            status: BookingStatus::Confirmed,
            created_at: now,
        })
        .collect();

    Ok((master, segments))
}
