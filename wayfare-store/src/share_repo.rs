use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use wayfare_core::repository::{RepoError, ShareStore};
use wayfare_core::share::{AccessLevel, ShareStatus, TripShare};

pub struct PgShareStore {
    pool: PgPool,
}

impl PgShareStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ShareRow {
    id: Uuid,
    trip_group_id: Uuid,
    owner_id: Uuid,
    shared_with_email: String,
    access_level: String,
    status: String,
    created_at: DateTime<Utc>,
}

impl ShareRow {
    fn into_share(self) -> Result<TripShare, RepoError> {
        Ok(TripShare {
            id: self.id,
            trip_group_id: self.trip_group_id,
            owner_id: self.owner_id,
            shared_with_email: self.shared_with_email,
            access_level: AccessLevel::parse(&self.access_level)
                .ok_or_else(|| format!("unknown access level: {}", self.access_level))?,
            status: ShareStatus::parse(&self.status)
                .ok_or_else(|| format!("unknown share status: {}", self.status))?,
            created_at: self.created_at,
        })
    }
}

const SHARE_COLUMNS: &str =
    "id, trip_group_id, owner_id, shared_with_email, access_level, status, created_at";

#[async_trait]
impl ShareStore for PgShareStore {
    async fn insert_share(&self, share: &TripShare) -> Result<(), RepoError> {
        sqlx::query(
            "INSERT INTO trip_shares (id, trip_group_id, owner_id, shared_with_email, \
             access_level, status, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(share.id)
        .bind(share.trip_group_id)
        .bind(share.owner_id)
        .bind(&share.shared_with_email)
        .bind(share.access_level.as_str())
        .bind(share.status.as_str())
        .bind(share.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_shares(&self, trip_group_id: Uuid) -> Result<Vec<TripShare>, RepoError> {
        let rows: Vec<ShareRow> = sqlx::query_as(&format!(
            "SELECT {SHARE_COLUMNS} FROM trip_shares WHERE trip_group_id = $1 \
             ORDER BY created_at DESC"
        ))
        .bind(trip_group_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ShareRow::into_share).collect()
    }

    async fn get_share(&self, id: Uuid) -> Result<Option<TripShare>, RepoError> {
        let row: Option<ShareRow> =
            sqlx::query_as(&format!("SELECT {SHARE_COLUMNS} FROM trip_shares WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(ShareRow::into_share).transpose()
    }

    async fn delete_share(&self, owner_id: Uuid, id: Uuid) -> Result<u64, RepoError> {
        let result = sqlx::query("DELETE FROM trip_shares WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn update_share_status(&self, id: Uuid, status: ShareStatus) -> Result<u64, RepoError> {
        let result = sqlx::query("UPDATE trip_shares SET status = $1 WHERE id = $2")
            .bind(status.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
