use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::booking::{Booking, TripSegment};
use crate::share::{ShareStatus, TripShare};

pub type RepoError = Box<dyn std::error::Error + Send + Sync>;

/// Repository trait for booking and trip-segment persistence.
#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn insert_booking(&self, booking: &Booking) -> Result<(), RepoError>;

    /// Persist a multi-segment checkout atomically: the master booking and
    /// every segment land together or not at all.
    async fn insert_trip(&self, master: &Booking, segments: &[TripSegment])
        -> Result<(), RepoError>;

    async fn list_bookings(&self, user_id: Uuid) -> Result<Vec<Booking>, RepoError>;

    async fn get_booking(&self, user_id: Uuid, id: Uuid) -> Result<Option<Booking>, RepoError>;

    async fn find_by_reference(&self, reference: &str) -> Result<Option<Booking>, RepoError>;

    /// All segments of a trip group, ordered by `segment_order`.
    async fn list_segments(&self, trip_group_id: Uuid) -> Result<Vec<TripSegment>, RepoError>;

    /// Cancel one ungrouped booking. Returns the number of rows transitioned
    /// (0 when the booking was not confirmed or not owned by the caller).
    async fn cancel_booking(
        &self,
        user_id: Uuid,
        id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<u64, RepoError>;

    /// Cancel every booking and segment sharing a trip group id, as one
    /// batched conditional update. All-or-nothing.
    async fn cancel_group(
        &self,
        user_id: Uuid,
        trip_group_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<u64, RepoError>;
}

/// Repository trait for trip-share invitations.
#[async_trait]
pub trait ShareStore: Send + Sync {
    async fn insert_share(&self, share: &TripShare) -> Result<(), RepoError>;

    async fn list_shares(&self, trip_group_id: Uuid) -> Result<Vec<TripShare>, RepoError>;

    async fn get_share(&self, id: Uuid) -> Result<Option<TripShare>, RepoError>;

    /// Returns the number of rows removed (0 when not owned by the caller).
    async fn delete_share(&self, owner_id: Uuid, id: Uuid) -> Result<u64, RepoError>;

    async fn update_share_status(&self, id: Uuid, status: ShareStatus) -> Result<u64, RepoError>;
}
