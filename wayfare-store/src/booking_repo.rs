use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use wayfare_core::booking::{Booking, BookingStatus, BookingType, PaymentStatus, TripSegment};
use wayfare_core::repository::{BookingStore, RepoError};
use wayfare_shared::Masked;

pub struct PgBookingStore {
    pool: PgPool,
}

impl PgBookingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal structs for type-safe querying
#[derive(sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    user_id: Uuid,
    booking_reference: String,
    trip_group_id: Option<Uuid>,
    booking_type: String,
    passenger_name: String,
    passenger_email: String,
    passenger_phone: String,
    from_location: String,
    to_location: String,
    departure_date: NaiveDate,
    departure_time: NaiveTime,
    arrival_date: NaiveDate,
    arrival_time: NaiveTime,
    service_name: String,
    service_number: String,
    seat_number: Option<String>,
    class_type: Option<String>,
    price_inr: i64,
    payment_status: String,
    status: String,
    qr_code: String,
    created_at: DateTime<Utc>,
    cancelled_at: Option<DateTime<Utc>>,
}

#[derive(sqlx::FromRow)]
struct SegmentRow {
    id: Uuid,
    trip_group_id: Uuid,
    user_id: Uuid,
    segment_order: i32,
    booking_type: String,
    service_name: String,
    service_number: String,
    from_location: String,
    to_location: String,
    departure_date: NaiveDate,
    departure_time: NaiveTime,
    arrival_time: NaiveTime,
    passenger_name: String,
    passenger_email: String,
    passenger_phone: String,
    seat_number: Option<String>,
    class_type: Option<String>,
    price_inr: i64,
    payment_status: String,
    status: String,
    created_at: DateTime<Utc>,
}

fn parse_booking_type(s: &str) -> Result<BookingType, RepoError> {
    BookingType::parse(s).ok_or_else(|| format!("unknown booking type: {s}").into())
}

fn parse_status(s: &str) -> Result<BookingStatus, RepoError> {
    BookingStatus::parse(s).ok_or_else(|| format!("unknown booking status: {s}").into())
}

fn parse_payment_status(s: &str) -> Result<PaymentStatus, RepoError> {
    PaymentStatus::parse(s).ok_or_else(|| format!("unknown payment status: {s}").into())
}

impl BookingRow {
    fn into_booking(self) -> Result<Booking, RepoError> {
        Ok(Booking {
            id: self.id,
            user_id: self.user_id,
            booking_reference: self.booking_reference,
            trip_group_id: self.trip_group_id,
            booking_type: parse_booking_type(&self.booking_type)?,
            passenger_name: self.passenger_name,
            passenger_email: Masked(self.passenger_email),
            passenger_phone: Masked(self.passenger_phone),
            from_location: self.from_location,
            to_location: self.to_location,
            departure_date: self.departure_date,
            departure_time: self.departure_time,
            arrival_date: self.arrival_date,
            arrival_time: self.arrival_time,
            service_name: self.service_name,
            service_number: self.service_number,
            seat_number: self.seat_number,
            class_type: self.class_type,
            price_inr: self.price_inr,
            payment_status: parse_payment_status(&self.payment_status)?,
            status: parse_status(&self.status)?,
            qr_code: self.qr_code,
            created_at: self.created_at,
            cancelled_at: self.cancelled_at,
        })
    }
}

impl SegmentRow {
    fn into_segment(self) -> Result<TripSegment, RepoError> {
        Ok(TripSegment {
            id: self.id,
            trip_group_id: self.trip_group_id,
            user_id: self.user_id,
            segment_order: self.segment_order as u32,
            booking_type: parse_booking_type(&self.booking_type)?,
            service_name: self.service_name,
            service_number: self.service_number,
            from_location: self.from_location,
            to_location: self.to_location,
            departure_date: self.departure_date,
            departure_time: self.departure_time,
            arrival_time: self.arrival_time,
            passenger_name: self.passenger_name,
            passenger_email: Masked(self.passenger_email),
            passenger_phone: Masked(self.passenger_phone),
            seat_number: self.seat_number,
            class_type: self.class_type,
            price_inr: self.price_inr,
            payment_status: parse_payment_status(&self.payment_status)?,
            status: parse_status(&self.status)?,
            created_at: self.created_at,
        })
    }
}

const BOOKING_COLUMNS: &str = "id, user_id, booking_reference, trip_group_id, booking_type, \
     passenger_name, passenger_email, passenger_phone, from_location, to_location, \
     departure_date, departure_time, arrival_date, arrival_time, service_name, service_number, \
     seat_number, class_type, price_inr, payment_status, status, qr_code, created_at, cancelled_at";

const SEGMENT_COLUMNS: &str = "id, trip_group_id, user_id, segment_order, booking_type, \
     service_name, service_number, from_location, to_location, departure_date, departure_time, \
     arrival_time, passenger_name, passenger_email, passenger_phone, seat_number, class_type, \
     price_inr, payment_status, status, created_at";

async fn insert_booking_row<'e, E>(executor: E, booking: &Booking) -> Result<(), sqlx::Error>
where
    E: sqlx::Executor<'e, Database = sqlx::Postgres>,
{
    sqlx::query(
        "INSERT INTO bookings (id, user_id, booking_reference, trip_group_id, booking_type, \
         passenger_name, passenger_email, passenger_phone, from_location, to_location, \
         departure_date, departure_time, arrival_date, arrival_time, service_name, \
         service_number, seat_number, class_type, price_inr, payment_status, status, qr_code, \
         created_at, cancelled_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, \
         $18, $19, $20, $21, $22, $23, $24)",
    )
    .bind(booking.id)
    .bind(booking.user_id)
    .bind(&booking.booking_reference)
    .bind(booking.trip_group_id)
    .bind(booking.booking_type.as_str())
    .bind(&booking.passenger_name)
    .bind(booking.passenger_email.as_inner())
    .bind(booking.passenger_phone.as_inner())
    .bind(&booking.from_location)
    .bind(&booking.to_location)
    .bind(booking.departure_date)
    .bind(booking.departure_time)
    .bind(booking.arrival_date)
    .bind(booking.arrival_time)
    .bind(&booking.service_name)
    .bind(&booking.service_number)
    .bind(booking.seat_number.as_deref())
    .bind(booking.class_type.as_deref())
    .bind(booking.price_inr)
    .bind(booking.payment_status.as_str())
    .bind(booking.status.as_str())
    .bind(&booking.qr_code)
    .bind(booking.created_at)
    .bind(booking.cancelled_at)
    .execute(executor)
    .await?;
    Ok(())
}

async fn insert_segment_row<'e, E>(executor: E, segment: &TripSegment) -> Result<(), sqlx::Error>
where
    E: sqlx::Executor<'e, Database = sqlx::Postgres>,
{
    sqlx::query(
        "INSERT INTO trip_segments (id, trip_group_id, user_id, segment_order, booking_type, \
         service_name, service_number, from_location, to_location, departure_date, \
         departure_time, arrival_time, passenger_name, passenger_email, passenger_phone, \
         seat_number, class_type, price_inr, payment_status, status, created_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, \
         $18, $19, $20, $21)",
    )
    .bind(segment.id)
    .bind(segment.trip_group_id)
    .bind(segment.user_id)
    .bind(segment.segment_order as i32)
    .bind(segment.booking_type.as_str())
    .bind(&segment.service_name)
    .bind(&segment.service_number)
    .bind(&segment.from_location)
    .bind(&segment.to_location)
    .bind(segment.departure_date)
    .bind(segment.departure_time)
    .bind(segment.arrival_time)
    .bind(&segment.passenger_name)
    .bind(segment.passenger_email.as_inner())
    .bind(segment.passenger_phone.as_inner())
    .bind(segment.seat_number.as_deref())
    .bind(segment.class_type.as_deref())
    .bind(segment.price_inr)
    .bind(segment.payment_status.as_str())
    .bind(segment.status.as_str())
    .bind(segment.created_at)
    .execute(executor)
    .await?;
    Ok(())
}

#[async_trait]
impl BookingStore for PgBookingStore {
    async fn insert_booking(&self, booking: &Booking) -> Result<(), RepoError> {
        insert_booking_row(&self.pool, booking).await?;
        Ok(())
    }

    async fn insert_trip(
        &self,
        master: &Booking,
        segments: &[TripSegment],
    ) -> Result<(), RepoError> {
        let mut tx = self.pool.begin().await?;
        insert_booking_row(&mut *tx, master).await?;
        for segment in segments {
            insert_segment_row(&mut *tx, segment).await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn list_bookings(&self, user_id: Uuid) -> Result<Vec<Booking>, RepoError> {
        let rows: Vec<BookingRow> = sqlx::query_as(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(BookingRow::into_booking).collect()
    }

    async fn get_booking(&self, user_id: Uuid, id: Uuid) -> Result<Option<Booking>, RepoError> {
        let row: Option<BookingRow> = sqlx::query_as(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(BookingRow::into_booking).transpose()
    }

    async fn find_by_reference(&self, reference: &str) -> Result<Option<Booking>, RepoError> {
        let row: Option<BookingRow> = sqlx::query_as(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE booking_reference = $1"
        ))
        .bind(reference)
        .fetch_optional(&self.pool)
        .await?;

        row.map(BookingRow::into_booking).transpose()
    }

    async fn list_segments(&self, trip_group_id: Uuid) -> Result<Vec<TripSegment>, RepoError> {
        let rows: Vec<SegmentRow> = sqlx::query_as(&format!(
            "SELECT {SEGMENT_COLUMNS} FROM trip_segments WHERE trip_group_id = $1 \
             ORDER BY segment_order"
        ))
        .bind(trip_group_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(SegmentRow::into_segment).collect()
    }

    async fn cancel_booking(
        &self,
        user_id: Uuid,
        id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<u64, RepoError> {
        let result = sqlx::query(
            "UPDATE bookings SET status = 'cancelled', cancelled_at = $1 \
             WHERE id = $2 AND user_id = $3 AND status = 'confirmed'",
        )
        .bind(at)
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn cancel_group(
        &self,
        user_id: Uuid,
        trip_group_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<u64, RepoError> {
        // One transaction, one batched conditional update per table: a group
        // is cancelled in full or not at all.
        let mut tx = self.pool.begin().await?;

        let bookings = sqlx::query(
            "UPDATE bookings SET status = 'cancelled', cancelled_at = $1 \
             WHERE trip_group_id = $2 AND user_id = $3 AND status = 'confirmed'",
        )
        .bind(at)
        .bind(trip_group_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        let segments = sqlx::query(
            "UPDATE trip_segments SET status = 'cancelled' \
             WHERE trip_group_id = $1 AND user_id = $2 AND status = 'confirmed'",
        )
        .bind(trip_group_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(bookings.rows_affected() + segments.rows_affected())
    }
}
