use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use wayfare_shared::Masked;

use crate::qr::{QrSigner, TicketClaim};
use crate::validate::ValidBooking;
use crate::{CoreError, CoreResult};

/// Kind of travel (or lodging) a booking covers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingType {
    Flight,
    Train,
    Bus,
    Hotel,
    #[serde(rename = "multi-segment")]
    MultiSegment,
}

impl BookingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingType::Flight => "flight",
            BookingType::Train => "train",
            BookingType::Bus => "bus",
            BookingType::Hotel => "hotel",
            BookingType::MultiSegment => "multi-segment",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "flight" => Some(BookingType::Flight),
            "train" => Some(BookingType::Train),
            "bus" => Some(BookingType::Bus),
            "hotel" => Some(BookingType::Hotel),
            "multi-segment" => Some(BookingType::MultiSegment),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "confirmed" => Some(BookingStatus::Confirmed),
            "cancelled" => Some(BookingStatus::Cancelled),
            "completed" => Some(BookingStatus::Completed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(PaymentStatus::Pending),
            "completed" => Some(PaymentStatus::Completed),
            "failed" => Some(PaymentStatus::Failed),
            _ => None,
        }
    }
}

/// One purchased leg of travel or lodging.
///
/// Created at checkout; the only in-place mutation a confirmed booking allows
/// is cancellation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub user_id: Uuid,
    pub booking_reference: String,
    pub trip_group_id: Option<Uuid>,
    pub booking_type: BookingType,
    pub passenger_name: String,
    pub passenger_email: Masked<String>,
    pub passenger_phone: Masked<String>,
    pub from_location: String,
    pub to_location: String,
    pub departure_date: NaiveDate,
    pub departure_time: NaiveTime,
    pub arrival_date: NaiveDate,
    pub arrival_time: NaiveTime,
    pub service_name: String,
    pub service_number: String,
    pub seat_number: Option<String>,
    pub class_type: Option<String>,
    pub price_inr: i64,
    pub payment_status: PaymentStatus,
    pub status: BookingStatus,
    pub qr_code: String,
    pub created_at: DateTime<Utc>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl Booking {
    /// Build a confirmed booking from validated input: stamps the reference
    /// code and the signed QR payload.
    pub fn issue(
        valid: ValidBooking,
        user_id: Uuid,
        signer: &QrSigner,
        now: DateTime<Utc>,
    ) -> CoreResult<Self> {
        let booking_reference = generate_booking_reference(now);
        let claim = TicketClaim::new(booking_reference.clone(), valid.trip_group_id);
        let qr_code = signer.encode(&claim)?;

        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            booking_reference,
            trip_group_id: valid.trip_group_id,
            booking_type: valid.booking_type,
            passenger_name: valid.passenger_name,
            passenger_email: Masked(valid.passenger_email),
            passenger_phone: Masked(valid.passenger_phone),
            from_location: valid.from_location,
            to_location: valid.to_location,
            departure_date: valid.departure_date,
            departure_time: valid.departure_time,
            arrival_date: valid.arrival_date,
            arrival_time: valid.arrival_time,
            service_name: valid.service_name,
            service_number: valid.service_number,
            seat_number: valid.seat_number,
            class_type: valid.class_type,
            price_inr: valid.price_inr,
            payment_status: PaymentStatus::Pending,
            status: BookingStatus::Confirmed,
            qr_code,
            created_at: now,
            cancelled_at: None,
        })
    }

    /// The instant the leg departs, for ordering and current-leg selection.
    pub fn departure_instant(&self) -> NaiveDateTime {
        self.departure_date.and_time(self.departure_time)
    }

    pub fn cancel(&mut self, at: DateTime<Utc>) -> CoreResult<()> {
        if self.status == BookingStatus::Cancelled {
            return Err(CoreError::Conflict("Booking is already cancelled".into()));
        }
        self.status = BookingStatus::Cancelled;
        self.cancelled_at = Some(at);
        Ok(())
    }
}

/// One leg of a multi-leg trip, always owned by a trip group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripSegment {
    pub id: Uuid,
    pub trip_group_id: Uuid,
    pub user_id: Uuid,
    /// 1-based position within the itinerary.
    pub segment_order: u32,
    pub booking_type: BookingType,
    pub service_name: String,
    pub service_number: String,
    pub from_location: String,
    pub to_location: String,
    pub departure_date: NaiveDate,
    pub departure_time: NaiveTime,
    pub arrival_time: NaiveTime,
    pub passenger_name: String,
    pub passenger_email: Masked<String>,
    pub passenger_phone: Masked<String>,
    pub seat_number: Option<String>,
    pub class_type: Option<String>,
    pub price_inr: i64,
    pub payment_status: PaymentStatus,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

impl TripSegment {
    pub fn departure_instant(&self) -> NaiveDateTime {
        self.departure_date.and_time(self.departure_time)
    }
}

const BASE36: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Human-facing reference code: `TRV` + millisecond epoch + 5 random base36
/// characters. Collisions are improbable rather than impossible, which is
/// acceptable here.
pub fn generate_booking_reference(now: DateTime<Utc>) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..5)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("TRV{}{}", now.timestamp_millis(), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_has_prefix_timestamp_and_suffix() {
        let now = Utc::now();
        let reference = generate_booking_reference(now);

        assert!(reference.starts_with("TRV"));
        let body = &reference[3..];
        // 13-digit millisecond epoch followed by 5 base36 characters.
        assert_eq!(body.len(), 13 + 5);
        assert!(body[..13].chars().all(|c| c.is_ascii_digit()));
        assert!(body[13..]
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }

    #[test]
    fn references_differ_across_calls() {
        let now = Utc::now();
        let a = generate_booking_reference(now);
        let b = generate_booking_reference(now);
        assert_ne!(a, b);
    }

    #[test]
    fn cancelling_twice_is_a_conflict() {
        let now = Utc::now();
        let valid = crate::validate::test_support::sample_valid_booking();
        let signer = QrSigner::new(b"test-secret", true);
        let mut booking = Booking::issue(valid, Uuid::new_v4(), &signer, now).unwrap();

        booking.cancel(now).unwrap();
        assert_eq!(booking.status, BookingStatus::Cancelled);
        assert!(booking.cancelled_at.is_some());
        assert!(booking.cancel(now).is_err());
    }
}
