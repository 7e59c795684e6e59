use std::collections::HashMap;

use uuid::Uuid;
use wayfare_core::Booking;

/// The unit the ticket wall renders: either one whole multi-leg trip or a
/// singleton wrapper around an ungrouped booking.
#[derive(Debug, Clone)]
pub struct TripGroup {
    /// Partition key: the shared `trip_group_id`, or the booking's own id for
    /// ungrouped bookings.
    pub key: Uuid,
    /// Set only for genuine multi-leg groups.
    pub trip_group_id: Option<Uuid>,
    /// Members ordered by departure instant.
    pub bookings: Vec<Booking>,
}

impl TripGroup {
    pub fn total_price_inr(&self) -> i64 {
        self.bookings.iter().map(|b| b.price_inr).sum()
    }
}

/// Partition bookings into trip groups by `trip_group_id ?? id`.
///
/// The partition is a disjoint cover of the input: every booking lands in
/// exactly one group. Within a group, legs sort by departure instant; groups
/// themselves sort by their earliest departure, newest first.
pub fn group_bookings(bookings: Vec<Booking>) -> Vec<TripGroup> {
    let mut by_key: HashMap<Uuid, Vec<Booking>> = HashMap::new();
    let mut key_order: Vec<Uuid> = Vec::new();

    for booking in bookings {
        let key = booking.trip_group_id.unwrap_or(booking.id);
        if !by_key.contains_key(&key) {
            key_order.push(key);
        }
        by_key.entry(key).or_default().push(booking);
    }

    let mut groups: Vec<TripGroup> = key_order
        .into_iter()
        .filter_map(|key| by_key.remove(&key).map(|members| (key, members)))
        .map(|(key, mut members)| {
            members.sort_by_key(|b| b.departure_instant());
            TripGroup {
                key,
                trip_group_id: members[0].trip_group_id,
                bookings: members,
            }
        })
        .collect();

    groups.sort_by_key(|g| std::cmp::Reverse(g.bookings[0].departure_instant()));
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use std::collections::HashSet;
    use wayfare_core::qr::QrSigner;
    use wayfare_core::validate::test_support::sample_valid_booking;

    fn booking(trip_group_id: Option<Uuid>, date: &str) -> Booking {
        let mut valid = sample_valid_booking();
        valid.trip_group_id = trip_group_id;
        valid.departure_date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
        let signer = QrSigner::new(b"test", true);
        Booking::issue(valid, Uuid::new_v4(), &signer, Utc::now()).unwrap()
    }

    #[test]
    fn partition_is_a_disjoint_cover() {
        let shared = Uuid::new_v4();
        let input = vec![
            booking(Some(shared), "2026-09-01"),
            booking(None, "2026-09-02"),
            booking(Some(shared), "2026-09-03"),
            booking(None, "2026-09-04"),
            booking(Some(Uuid::new_v4()), "2026-09-05"),
        ];
        let input_ids: HashSet<Uuid> = input.iter().map(|b| b.id).collect();

        let groups = group_bookings(input);

        let mut seen = HashSet::new();
        for group in &groups {
            for b in &group.bookings {
                assert!(seen.insert(b.id), "booking appeared in two groups");
            }
        }
        assert_eq!(seen, input_ids);
        assert_eq!(groups.len(), 4);
    }

    #[test]
    fn grouped_bookings_share_a_key_and_sort_by_departure() {
        let shared = Uuid::new_v4();
        let groups = group_bookings(vec![
            booking(Some(shared), "2026-09-03"),
            booking(Some(shared), "2026-09-01"),
            booking(Some(shared), "2026-09-02"),
        ]);

        assert_eq!(groups.len(), 1);
        let group = &groups[0];
        assert_eq!(group.key, shared);
        assert_eq!(group.trip_group_id, Some(shared));
        let dates: Vec<_> = group
            .bookings
            .iter()
            .map(|b| b.departure_date.to_string())
            .collect();
        assert_eq!(dates, ["2026-09-01", "2026-09-02", "2026-09-03"]);
    }

    #[test]
    fn ungrouped_bookings_become_singletons_keyed_by_their_own_id() {
        let b = booking(None, "2026-09-01");
        let id = b.id;
        let groups = group_bookings(vec![b]);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].key, id);
        assert!(groups[0].trip_group_id.is_none());
    }

    #[test]
    fn totals_sum_over_the_group() {
        let shared = Uuid::new_v4();
        let groups = group_bookings(vec![
            booking(Some(shared), "2026-09-01"),
            booking(Some(shared), "2026-09-02"),
        ]);
        assert_eq!(groups[0].total_price_inr(), 9_000);
    }
}
