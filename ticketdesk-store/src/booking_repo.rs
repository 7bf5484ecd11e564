use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;
use ticketdesk_core::booking::{Booking, NewBooking, TicketType};
use ticketdesk_core::repository::{BookingRepository, StoreError};

const SELECT_BOOKING: &str = "SELECT id, name, number_of_tickets, ticket_type, booking_date, booking_number, phone_number FROM bookings";

pub struct PgBookingRepository {
    pool: PgPool,
}

impl PgBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal struct for type-safe querying
#[derive(sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    name: String,
    number_of_tickets: i32,
    ticket_type: String,
    booking_date: DateTime<Utc>,
    booking_number: String,
    phone_number: Option<String>,
}

impl TryFrom<BookingRow> for Booking {
    type Error = StoreError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        let ticket_type: TicketType = row.ticket_type.parse().map_err(StoreError::backend)?;
        Ok(Booking {
            id: row.id,
            name: row.name,
            number_of_tickets: row.number_of_tickets,
            ticket_type,
            booking_date: row.booking_date,
            booking_number: row.booking_number,
            phone_number: row.phone_number,
        })
    }
}

fn map_insert_error(err: sqlx::Error, booking_number: &str) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            StoreError::DuplicateBookingNumber(booking_number.to_string())
        }
        _ => StoreError::backend(err),
    }
}

#[async_trait]
impl BookingRepository for PgBookingRepository {
    async fn insert(&self, booking: NewBooking) -> Result<Booking, StoreError> {
        let id = Uuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO bookings (id, name, number_of_tickets, ticket_type, booking_date, booking_number, phone_number)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(id)
        .bind(&booking.name)
        .bind(booking.number_of_tickets)
        .bind(booking.ticket_type.code())
        .bind(booking.booking_date)
        .bind(&booking.booking_number)
        .bind(&booking.phone_number)
        .execute(&self.pool)
        .await
        .map_err(|e| map_insert_error(e, &booking.booking_number))?;

        Ok(booking.into_booking(id))
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Booking>, StoreError> {
        let row = sqlx::query_as::<_, BookingRow>(&format!("{} WHERE id = $1", SELECT_BOOKING))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::backend)?;

        row.map(Booking::try_from).transpose()
    }

    async fn get_by_booking_number(
        &self,
        booking_number: &str,
    ) -> Result<Option<Booking>, StoreError> {
        let row = sqlx::query_as::<_, BookingRow>(&format!(
            "{} WHERE booking_number = $1",
            SELECT_BOOKING
        ))
        .bind(booking_number)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        row.map(Booking::try_from).transpose()
    }

    async fn list_all(&self) -> Result<Vec<Booking>, StoreError> {
        let rows = sqlx::query_as::<_, BookingRow>(&format!(
            "{} ORDER BY booking_date DESC, id ASC",
            SELECT_BOOKING
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        rows.into_iter().map(Booking::try_from).collect()
    }

    async fn exists_by_booking_number(&self, booking_number: &str) -> Result<bool, StoreError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM bookings WHERE booking_number = $1)",
        )
        .bind(booking_number)
        .fetch_one(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        Ok(exists)
    }

    async fn delete_by_booking_number(&self, booking_number: &str) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM bookings WHERE booking_number = $1")
            .bind(booking_number)
            .execute(&self.pool)
            .await
            .map_err(StoreError::backend)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
