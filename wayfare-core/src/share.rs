use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    /// Read-only access to the trip.
    View,
    /// May participate in the trip.
    Join,
}

impl AccessLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::View => "view",
            AccessLevel::Join => "join",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "view" => Some(AccessLevel::View),
            "join" => Some(AccessLevel::Join),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ShareStatus {
    Pending,
    Accepted,
    Declined,
}

impl ShareStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShareStatus::Pending => "pending",
            ShareStatus::Accepted => "accepted",
            ShareStatus::Declined => "declined",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(ShareStatus::Pending),
            "accepted" => Some(ShareStatus::Accepted),
            "declined" => Some(ShareStatus::Declined),
            _ => None,
        }
    }
}

/// An invitation to view or join a trip group, addressed by email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripShare {
    pub id: Uuid,
    pub trip_group_id: Uuid,
    pub owner_id: Uuid,
    pub shared_with_email: String,
    pub access_level: AccessLevel,
    pub status: ShareStatus,
    pub created_at: DateTime<Utc>,
}

impl TripShare {
    pub fn new(
        trip_group_id: Uuid,
        owner_id: Uuid,
        shared_with_email: String,
        access_level: AccessLevel,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            trip_group_id,
            owner_id,
            shared_with_email,
            access_level,
            status: ShareStatus::Pending,
            created_at: now,
        }
    }

    /// A share still stands in the way of a re-invite unless it was declined.
    pub fn is_live(&self) -> bool {
        matches!(self.status, ShareStatus::Pending | ShareStatus::Accepted)
    }
}
