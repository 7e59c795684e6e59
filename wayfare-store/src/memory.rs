use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use wayfare_core::booking::{Booking, BookingStatus, TripSegment};
use wayfare_core::repository::{BookingStore, RepoError, ShareStore};
use wayfare_core::share::{ShareStatus, TripShare};

/// HashMap-backed store used by tests and local development. Mirrors the
/// Postgres implementation's semantics, including all-or-nothing group
/// cancellation.
#[derive(Default)]
pub struct MemoryStore {
    bookings: RwLock<HashMap<Uuid, Booking>>,
    segments: RwLock<HashMap<Uuid, TripSegment>>,
    shares: RwLock<HashMap<Uuid, TripShare>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error() -> RepoError {
    "store lock poisoned".into()
}

#[async_trait]
impl BookingStore for MemoryStore {
    async fn insert_booking(&self, booking: &Booking) -> Result<(), RepoError> {
        let mut bookings = self.bookings.write().map_err(|_| lock_error())?;
        bookings.insert(booking.id, booking.clone());
        Ok(())
    }

    async fn insert_trip(
        &self,
        master: &Booking,
        segments: &[TripSegment],
    ) -> Result<(), RepoError> {
        // Both maps are written under locks held together so a concurrent
        // reader never observes a half-inserted trip.
        let mut bookings = self.bookings.write().map_err(|_| lock_error())?;
        let mut segment_map = self.segments.write().map_err(|_| lock_error())?;
        bookings.insert(master.id, master.clone());
        for segment in segments {
            segment_map.insert(segment.id, segment.clone());
        }
        Ok(())
    }

    async fn list_bookings(&self, user_id: Uuid) -> Result<Vec<Booking>, RepoError> {
        let bookings = self.bookings.read().map_err(|_| lock_error())?;
        let mut result: Vec<Booking> = bookings
            .values()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect();
        result.sort_by_key(|b| std::cmp::Reverse(b.created_at));
        Ok(result)
    }

    async fn get_booking(&self, user_id: Uuid, id: Uuid) -> Result<Option<Booking>, RepoError> {
        let bookings = self.bookings.read().map_err(|_| lock_error())?;
        Ok(bookings
            .get(&id)
            .filter(|b| b.user_id == user_id)
            .cloned())
    }

    async fn find_by_reference(&self, reference: &str) -> Result<Option<Booking>, RepoError> {
        let bookings = self.bookings.read().map_err(|_| lock_error())?;
        Ok(bookings
            .values()
            .find(|b| b.booking_reference == reference)
            .cloned())
    }

    async fn list_segments(&self, trip_group_id: Uuid) -> Result<Vec<TripSegment>, RepoError> {
        let segments = self.segments.read().map_err(|_| lock_error())?;
        let mut result: Vec<TripSegment> = segments
            .values()
            .filter(|s| s.trip_group_id == trip_group_id)
            .cloned()
            .collect();
        result.sort_by_key(|s| s.segment_order);
        Ok(result)
    }

    async fn cancel_booking(
        &self,
        user_id: Uuid,
        id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<u64, RepoError> {
        let mut bookings = self.bookings.write().map_err(|_| lock_error())?;
        match bookings.get_mut(&id) {
            Some(b) if b.user_id == user_id && b.status == BookingStatus::Confirmed => {
                b.status = BookingStatus::Cancelled;
                b.cancelled_at = Some(at);
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    async fn cancel_group(
        &self,
        user_id: Uuid,
        trip_group_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<u64, RepoError> {
        let mut bookings = self.bookings.write().map_err(|_| lock_error())?;
        let mut segments = self.segments.write().map_err(|_| lock_error())?;

        let mut affected = 0;
        for b in bookings.values_mut() {
            if b.trip_group_id == Some(trip_group_id)
                && b.user_id == user_id
                && b.status == BookingStatus::Confirmed
            {
                b.status = BookingStatus::Cancelled;
                b.cancelled_at = Some(at);
                affected += 1;
            }
        }
        for s in segments.values_mut() {
            if s.trip_group_id == trip_group_id
                && s.user_id == user_id
                && s.status == BookingStatus::Confirmed
            {
                s.status = BookingStatus::Cancelled;
                affected += 1;
            }
        }
        Ok(affected)
    }
}

#[async_trait]
impl ShareStore for MemoryStore {
    async fn insert_share(&self, share: &TripShare) -> Result<(), RepoError> {
        let mut shares = self.shares.write().map_err(|_| lock_error())?;
        shares.insert(share.id, share.clone());
        Ok(())
    }

    async fn list_shares(&self, trip_group_id: Uuid) -> Result<Vec<TripShare>, RepoError> {
        let shares = self.shares.read().map_err(|_| lock_error())?;
        let mut result: Vec<TripShare> = shares
            .values()
            .filter(|s| s.trip_group_id == trip_group_id)
            .cloned()
            .collect();
        result.sort_by_key(|s| std::cmp::Reverse(s.created_at));
        Ok(result)
    }

    async fn get_share(&self, id: Uuid) -> Result<Option<TripShare>, RepoError> {
        let shares = self.shares.read().map_err(|_| lock_error())?;
        Ok(shares.get(&id).cloned())
    }

    async fn delete_share(&self, owner_id: Uuid, id: Uuid) -> Result<u64, RepoError> {
        let mut shares = self.shares.write().map_err(|_| lock_error())?;
        match shares.get(&id) {
            Some(s) if s.owner_id == owner_id => {
                shares.remove(&id);
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    async fn update_share_status(&self, id: Uuid, status: ShareStatus) -> Result<u64, RepoError> {
        let mut shares = self.shares.write().map_err(|_| lock_error())?;
        match shares.get_mut(&id) {
            Some(s) => {
                s.status = status;
                Ok(1)
            }
            None => Ok(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfare_core::qr::QrSigner;
    use wayfare_core::validate::test_support::sample_valid_booking;

    fn booking_for(user_id: Uuid, trip_group_id: Option<Uuid>) -> Booking {
        let mut valid = sample_valid_booking();
        valid.trip_group_id = trip_group_id;
        let signer = QrSigner::new(b"memory-test", true);
        Booking::issue(valid, user_id, &signer, Utc::now()).unwrap()
    }

    #[tokio::test]
    async fn bookings_round_trip_by_user_and_reference() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        let booking = booking_for(user, None);
        let reference = booking.booking_reference.clone();

        store.insert_booking(&booking).await.unwrap();

        assert_eq!(store.list_bookings(user).await.unwrap().len(), 1);
        assert!(store.list_bookings(Uuid::new_v4()).await.unwrap().is_empty());
        assert!(store
            .find_by_reference(&reference)
            .await
            .unwrap()
            .is_some());
        assert!(store.find_by_reference("TRV0NOPE").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn cancelling_a_group_hits_every_confirmed_member_once() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        let group = Uuid::new_v4();

        let master = booking_for(user, Some(group));
        store.insert_trip(&master, &[]).await.unwrap();
        let other = booking_for(user, Some(group));
        store.insert_booking(&other).await.unwrap();

        let affected = store
            .cancel_group(user, group, Utc::now())
            .await
            .unwrap();
        assert_eq!(affected, 2);

        // Idempotent: nothing left in the confirmed state.
        let affected = store
            .cancel_group(user, group, Utc::now())
            .await
            .unwrap();
        assert_eq!(affected, 0);
    }

    #[tokio::test]
    async fn cancellation_is_scoped_to_the_owner() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let booking = booking_for(owner, None);
        let id = booking.id;
        store.insert_booking(&booking).await.unwrap();

        let stranger = Uuid::new_v4();
        assert_eq!(
            store.cancel_booking(stranger, id, Utc::now()).await.unwrap(),
            0
        );
        assert_eq!(
            store.cancel_booking(owner, id, Utc::now()).await.unwrap(),
            1
        );
    }
}
