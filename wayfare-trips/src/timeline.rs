use chrono::NaiveDateTime;
use serde::Serialize;
use wayfare_core::TripSegment;

/// Idle time between two consecutive legs of a trip.
#[derive(Debug, Clone, Serialize)]
pub struct Layover {
    /// 1-based order of the leg being waited for.
    pub before_segment: u32,
    pub minutes: i64,
}

/// Select which leg of a trip is "current" at `now`.
///
/// Walks the segments in departure order: a leg whose departure is still
/// ahead is the current one; once a leg has departed, the next leg becomes
/// current (the traveller is in transit toward it). Past the last departure
/// the trip is complete and there is no current leg.
///
/// `now` is passed in explicitly; there is no hidden clock.
pub fn current_segment(segments: &[TripSegment], now: NaiveDateTime) -> Option<&TripSegment> {
    let mut ordered: Vec<&TripSegment> = segments.iter().collect();
    ordered.sort_by_key(|s| s.departure_instant());

    for (i, segment) in ordered.iter().enumerate() {
        let departure = segment.departure_instant();
        if now < departure {
            return Some(segment);
        }
        if let Some(next) = ordered.get(i + 1) {
            if now < next.departure_instant() {
                return Some(next);
            }
        }
    }
    None
}

/// Layovers between consecutive legs: arrival of leg i to departure of leg
/// i+1. Negative minutes mean the itinerary overlaps (data entry, not a
/// scheduling engine, so it is reported rather than rejected).
pub fn layovers(segments: &[TripSegment]) -> Vec<Layover> {
    let mut ordered: Vec<&TripSegment> = segments.iter().collect();
    ordered.sort_by_key(|s| s.departure_instant());

    ordered
        .windows(2)
        .map(|pair| {
            let arrival = pair[0].departure_date.and_time(pair[0].arrival_time);
            let departure = pair[1].departure_instant();
            Layover {
                before_segment: pair[1].segment_order,
                minutes: (departure - arrival).num_minutes(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, Utc};
    use uuid::Uuid;
    use wayfare_core::booking::{BookingStatus, BookingType, PaymentStatus};
    use wayfare_shared::Masked;

    fn segment(order: u32, departure: NaiveDateTime) -> TripSegment {
        TripSegment {
            id: Uuid::new_v4(),
            trip_group_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            segment_order: order,
            booking_type: BookingType::Train,
            service_name: "Rajdhani Express".into(),
            service_number: "12951".into(),
            from_location: "Mumbai".into(),
            to_location: "Delhi".into(),
            departure_date: departure.date(),
            departure_time: departure.time(),
            arrival_time: departure.time() + Duration::hours(2),
            passenger_name: "Asha Verma".into(),
            passenger_email: Masked("asha@example.com".into()),
            passenger_phone: Masked("9876543210".into()),
            seat_number: None,
            class_type: None,
            price_inr: 1200,
            payment_status: PaymentStatus::Completed,
            status: BookingStatus::Confirmed,
            created_at: Utc::now(),
        }
    }

    fn three_segments() -> (Vec<TripSegment>, NaiveDateTime, NaiveDateTime, NaiveDateTime) {
        let t0 = NaiveDate::from_ymd_opt(2026, 9, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        let t1 = t0 + Duration::hours(6);
        let t2 = t0 + Duration::hours(12);
        (
            vec![segment(1, t0), segment(2, t1), segment(3, t2)],
            t0,
            t1,
            t2,
        )
    }

    #[test]
    fn before_the_first_departure_the_first_leg_is_current() {
        let (segments, t0, _, _) = three_segments();
        let current = current_segment(&segments, t0 - Duration::minutes(1)).unwrap();
        assert_eq!(current.segment_order, 1);
    }

    #[test]
    fn after_a_departure_the_next_leg_is_current() {
        let (segments, t0, t1, _) = three_segments();
        let current = current_segment(&segments, t0 + Duration::minutes(1)).unwrap();
        assert_eq!(current.segment_order, 2);

        let current = current_segment(&segments, t1 + Duration::minutes(1)).unwrap();
        assert_eq!(current.segment_order, 3);
    }

    #[test]
    fn past_the_last_departure_the_trip_is_complete() {
        let (segments, _, _, t2) = three_segments();
        assert!(current_segment(&segments, t2 + Duration::minutes(1)).is_none());
    }

    #[test]
    fn selection_does_not_depend_on_input_order() {
        let (mut segments, t0, _, _) = three_segments();
        segments.reverse();
        let current = current_segment(&segments, t0 + Duration::minutes(1)).unwrap();
        assert_eq!(current.segment_order, 2);
    }

    #[test]
    fn empty_trips_have_no_current_leg() {
        let now = Utc::now().naive_utc();
        assert!(current_segment(&[], now).is_none());
    }

    #[test]
    fn layovers_span_arrival_to_next_departure() {
        let (segments, _, _, _) = three_segments();
        let gaps = layovers(&segments);
        assert_eq!(gaps.len(), 2);
        // Each leg lasts 2h and the next departs 6h after the previous one.
        assert_eq!(gaps[0].before_segment, 2);
        assert_eq!(gaps[0].minutes, 4 * 60);
        assert_eq!(gaps[1].minutes, 4 * 60);
    }
}
