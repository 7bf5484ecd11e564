use async_trait::async_trait;
use uuid::Uuid;
use crate::booking::{Booking, NewBooking};

/// Failures surfaced by a booking store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Booking number already taken: {0}")]
    DuplicateBookingNumber(String),

    #[error("Booking not found")]
    NotFound,

    #[error("Storage backend failure: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    pub fn backend<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::Backend(err.into())
    }
}

/// Repository trait for booking data access.
///
/// Implementations must reject an insert whose `booking_number` is already
/// stored with [`StoreError::DuplicateBookingNumber`]; the service relies on
/// that to resolve concurrent creations racing for the same number.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Persist a new booking and return it with its assigned `id`.
    async fn insert(&self, booking: NewBooking) -> Result<Booking, StoreError>;

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Booking>, StoreError>;

    async fn get_by_booking_number(
        &self,
        booking_number: &str,
    ) -> Result<Option<Booking>, StoreError>;

    /// All bookings, newest `booking_date` first, ties by ascending `id`.
    async fn list_all(&self) -> Result<Vec<Booking>, StoreError>;

    async fn exists_by_booking_number(&self, booking_number: &str) -> Result<bool, StoreError>;

    /// Remove the booking with this number, or fail with [`StoreError::NotFound`].
    async fn delete_by_booking_number(&self, booking_number: &str) -> Result<(), StoreError>;
}
