pub mod booking;
pub mod export;
pub mod memory;
pub mod number;
pub mod repository;
pub mod service;

pub use booking::{Booking, CreateBookingRequest, NewBooking, TicketType};
pub use export::ExportFile;
pub use memory::InMemoryBookingRepository;
pub use number::{BookingNumberGenerator, NumberSource, SharedRng};
pub use repository::{BookingRepository, StoreError};
pub use service::BookingService;

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("Booking not found: {0}")]
    NotFound(String),

    #[error("Booking conflict: {0}")]
    Conflict(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Export failed: {0}")]
    Export(String),
}

pub type BookingResult<T> = Result<T, BookingError>;

impl From<StoreError> for BookingError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateBookingNumber(number) => {
                BookingError::Conflict(format!("booking number {} already exists", number))
            }
            StoreError::NotFound => BookingError::NotFound("booking".to_string()),
            StoreError::Backend(source) => BookingError::Storage(source.to_string()),
        }
    }
}
