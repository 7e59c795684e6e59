use chrono::{Duration, NaiveDate, NaiveTime};
use serde::Deserialize;
use uuid::Uuid;

use crate::booking::BookingType;
use crate::{CoreError, CoreResult};

/// Business limits applied on top of field validation. Loaded from
/// configuration; the defaults match the product rules.
#[derive(Debug, Clone)]
pub struct BookingPolicy {
    /// Furthest-out departure date accepted, in days from today.
    pub max_advance_days: i64,
    pub max_price_inr: i64,
    pub max_segments_per_trip: u32,
    pub max_shares_per_trip: u32,
}

impl Default for BookingPolicy {
    fn default() -> Self {
        Self {
            max_advance_days: 365,
            max_price_inr: 1_000_000,
            max_segments_per_trip: 10,
            max_shares_per_trip: 20,
        }
    }
}

/// Raw create-booking payload as received on the wire. Everything is kept
/// loose here; `validate_booking` turns it into a `ValidBooking` or rejects
/// it with the first offending field's message.
#[derive(Debug, Clone, Deserialize)]
pub struct BookingDraft {
    pub booking_type: String,
    pub passenger_name: String,
    pub passenger_email: String,
    pub passenger_phone: String,
    pub from_location: String,
    pub to_location: String,
    pub departure_date: String,
    pub departure_time: String,
    pub arrival_date: Option<String>,
    pub arrival_time: Option<String>,
    pub service_name: String,
    pub service_number: String,
    pub seat_number: Option<String>,
    pub class_type: Option<String>,
    pub price_inr: i64,
    pub trip_group_id: Option<Uuid>,
}

/// A booking request that passed field validation. Policy checks
/// (`check_departure_policy`) are a separate step so callers can distinguish
/// malformed input from out-of-policy input.
#[derive(Debug, Clone)]
pub struct ValidBooking {
    pub booking_type: BookingType,
    pub passenger_name: String,
    pub passenger_email: String,
    pub passenger_phone: String,
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
    pub trip_group_id: Option<Uuid>,
}

fn validation(msg: impl Into<String>) -> CoreError {
    CoreError::Validation(msg.into())
}

fn check_len(value: &str, min: usize, max: usize, field: &str) -> CoreResult<String> {
    let trimmed = value.trim();
    if trimmed.len() < min {
        return Err(validation(format!(
            "{field} must be at least {min} characters"
        )));
    }
    if trimmed.len() > max {
        return Err(validation(format!("{field} too long")));
    }
    Ok(trimmed.to_string())
}

fn check_optional_len(value: Option<String>, max: usize, field: &str) -> CoreResult<Option<String>> {
    match value {
        None => Ok(None),
        Some(v) => {
            let trimmed = v.trim().to_string();
            if trimmed.is_empty() {
                return Ok(None);
            }
            if trimmed.len() > max {
                return Err(validation(format!("{field} too long")));
            }
            Ok(Some(trimmed))
        }
    }
}

pub fn parse_date(value: &str, field: &str) -> CoreResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| validation(format!("Invalid {field}")))
}

pub fn parse_time(value: &str, field: &str) -> CoreResult<NaiveTime> {
    let trimmed = value.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .map_err(|_| validation(format!("Invalid {field}")))
}

fn is_valid_email(value: &str) -> bool {
    if value.len() > 255 || value.contains(char::is_whitespace) {
        return false;
    }
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

pub fn validate_booking(draft: BookingDraft) -> CoreResult<ValidBooking> {
    let booking_type = match BookingType::parse(draft.booking_type.trim()) {
        // Multi-segment master rows are only created by trip checkout.
        Some(BookingType::MultiSegment) | None => {
            return Err(validation("Invalid booking type"));
        }
        Some(t) => t,
    };

    let passenger_name = check_len(&draft.passenger_name, 2, 100, "Name")?;

    let passenger_email = draft.passenger_email.trim().to_string();
    if !is_valid_email(&passenger_email) {
        return Err(validation("Invalid email format"));
    }

    let passenger_phone = draft.passenger_phone.trim().to_string();
    if passenger_phone.len() < 10 {
        return Err(validation("Phone number too short"));
    }
    if passenger_phone.len() > 15 {
        return Err(validation("Phone number too long"));
    }

    let from_location = check_len(&draft.from_location, 2, 100, "Origin")?;
    let to_location = check_len(&draft.to_location, 2, 100, "Destination")?;

    let departure_date = parse_date(&draft.departure_date, "departure date")?;
    let departure_time = parse_time(&draft.departure_time, "departure time")?;
    let arrival_date = match draft.arrival_date.as_deref() {
        Some(d) if !d.trim().is_empty() => parse_date(d, "arrival date")?,
        _ => departure_date,
    };
    let arrival_time = match draft.arrival_time.as_deref() {
        Some(t) if !t.trim().is_empty() => parse_time(t, "arrival time")?,
        _ => departure_time,
    };

    let service_name = check_len(&draft.service_name, 1, 200, "Service name")?;
    let service_number = check_len(&draft.service_number, 1, 50, "Service number")?;
    let seat_number = check_optional_len(draft.seat_number, 20, "Seat number")?;
    let class_type = check_optional_len(draft.class_type, 50, "Class")?;

    if draft.price_inr <= 0 {
        return Err(validation("Price must be positive"));
    }

    Ok(ValidBooking {
        booking_type,
        passenger_name,
        passenger_email,
        passenger_phone,
        from_location,
        to_location,
        departure_date,
        departure_time,
        arrival_date,
        arrival_time,
        service_name,
        service_number,
        seat_number,
        class_type,
        price_inr: draft.price_inr,
        trip_group_id: draft.trip_group_id,
    })
}

/// Business-rule checks over an already well-formed booking. Violations are
/// `CoreError::Policy`, never `Validation`, so the API can report them with
/// the domain-specific message.
pub fn check_booking_policy(
    valid: &ValidBooking,
    today: NaiveDate,
    policy: &BookingPolicy,
) -> CoreResult<()> {
    if valid.departure_date < today {
        return Err(CoreError::Policy("Cannot book for past dates".into()));
    }
    if valid.departure_date > today + Duration::days(policy.max_advance_days) {
        return Err(CoreError::Policy(
            "Cannot book more than 1 year in advance".into(),
        ));
    }
    if valid.price_inr > policy.max_price_inr {
        return Err(CoreError::Policy("Price too high".into()));
    }
    Ok(())
}

#[cfg(any(test, feature = "test-support"))]
pub mod test_support {
    use super::*;

    pub fn sample_draft() -> BookingDraft {
        BookingDraft {
            booking_type: "flight".into(),
            passenger_name: "Asha Verma".into(),
            passenger_email: "asha@example.com".into(),
            passenger_phone: "9876543210".into(),
            from_location: "Mumbai".into(),
            to_location: "Goa".into(),
            departure_date: "2099-03-15".into(),
            departure_time: "08:30".into(),
            arrival_date: None,
            arrival_time: Some("10:05".into()),
            service_name: "IndiGo".into(),
            service_number: "6E 2341".into(),
            seat_number: Some("14A".into()),
            class_type: Some("Economy".into()),
            price_inr: 4500,
            trip_group_id: None,
        }
    }

    pub fn sample_valid_booking() -> ValidBooking {
        validate_booking(sample_draft()).expect("sample draft is valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_a_well_formed_draft() {
        let valid = validate_booking(test_support::sample_draft()).unwrap();
        assert_eq!(valid.booking_type, BookingType::Flight);
        assert_eq!(valid.arrival_date, valid.departure_date);
        assert_eq!(valid.departure_time.format("%H:%M").to_string(), "08:30");
    }

    #[test]
    fn rejects_bad_booking_type_and_multi_segment() {
        let mut draft = test_support::sample_draft();
        draft.booking_type = "rocket".into();
        assert!(matches!(
            validate_booking(draft),
            Err(CoreError::Validation(msg)) if msg == "Invalid booking type"
        ));

        let mut draft = test_support::sample_draft();
        draft.booking_type = "multi-segment".into();
        assert!(validate_booking(draft).is_err());
    }

    #[test]
    fn rejects_short_name_and_bad_email_and_phone() {
        let mut draft = test_support::sample_draft();
        draft.passenger_name = "A".into();
        assert!(matches!(
            validate_booking(draft),
            Err(CoreError::Validation(msg)) if msg == "Name must be at least 2 characters"
        ));

        let mut draft = test_support::sample_draft();
        draft.passenger_email = "not-an-email".into();
        assert!(matches!(
            validate_booking(draft),
            Err(CoreError::Validation(msg)) if msg == "Invalid email format"
        ));

        let mut draft = test_support::sample_draft();
        draft.passenger_phone = "12345".into();
        assert!(matches!(
            validate_booking(draft),
            Err(CoreError::Validation(msg)) if msg == "Phone number too short"
        ));
    }

    #[test]
    fn rejects_unparseable_dates_and_nonpositive_price() {
        let mut draft = test_support::sample_draft();
        draft.departure_date = "15-03-2099".into();
        assert!(validate_booking(draft).is_err());

        let mut draft = test_support::sample_draft();
        draft.price_inr = 0;
        assert!(matches!(
            validate_booking(draft),
            Err(CoreError::Validation(msg)) if msg == "Price must be positive"
        ));
    }

    #[test]
    fn policy_rejects_past_dates_but_not_today() {
        let policy = BookingPolicy::default();
        let mut valid = test_support::sample_valid_booking();
        valid.departure_date = NaiveDate::from_ymd_opt(2026, 3, 15).unwrap();

        let today = NaiveDate::from_ymd_opt(2026, 3, 16).unwrap();
        assert!(matches!(
            check_booking_policy(&valid, today, &policy),
            Err(CoreError::Policy(msg)) if msg == "Cannot book for past dates"
        ));

        let today = valid.departure_date;
        assert!(check_booking_policy(&valid, today, &policy).is_ok());
    }

    #[test]
    fn policy_rejects_departures_more_than_a_year_out() {
        let policy = BookingPolicy::default();
        let today = NaiveDate::from_ymd_opt(2026, 3, 15).unwrap();

        let mut valid = test_support::sample_valid_booking();
        valid.departure_date = today + Duration::days(365);
        assert!(check_booking_policy(&valid, today, &policy).is_ok());

        valid.departure_date = today + Duration::days(366);
        assert!(matches!(
            check_booking_policy(&valid, today, &policy),
            Err(CoreError::Policy(msg)) if msg == "Cannot book more than 1 year in advance"
        ));
    }

    #[test]
    fn policy_enforces_price_ceiling() {
        let policy = BookingPolicy::default();
        let today = NaiveDate::from_ymd_opt(2026, 3, 15).unwrap();

        let mut valid = test_support::sample_valid_booking();
        valid.departure_date = today;
        valid.price_inr = policy.max_price_inr + 1;
        assert!(matches!(
            check_booking_policy(&valid, today, &policy),
            Err(CoreError::Policy(_))
        ));
    }
}
