use std::sync::Arc;

use chrono::{DateTime, SubsecRound, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::booking::{Booking, CreateBookingRequest, NewBooking, TicketType};
use crate::export::{self, ExportFile};
use crate::number::BookingNumberGenerator;
use crate::repository::{BookingRepository, StoreError};
use crate::{BookingError, BookingResult};

pub const DEFAULT_INSERT_ATTEMPTS: u32 = 3;
pub const MAX_PHONE_NUMBER_LEN: usize = 20;
/// Matches the `name` column width; well under a spreadsheet cell's capacity.
pub const MAX_NAME_LEN: usize = 200;

/// Create/read/delete orchestration over a [`BookingRepository`].
#[derive(Clone)]
pub struct BookingService {
    repo: Arc<dyn BookingRepository>,
    numbers: BookingNumberGenerator,
    insert_attempts: u32,
}

#[derive(Debug, Clone)]
struct ValidatedBooking {
    name: String,
    number_of_tickets: i32,
    ticket_type: TicketType,
    phone_number: Option<String>,
}

fn validate(req: CreateBookingRequest) -> BookingResult<ValidatedBooking> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(BookingError::Validation("name must not be empty".to_string()));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(BookingError::Validation(format!(
            "name must be at most {} characters",
            MAX_NAME_LEN
        )));
    }

    if req.number_of_tickets <= 0 {
        return Err(BookingError::Validation(
            "numberOfTickets must be greater than zero".to_string(),
        ));
    }

    let phone_number = req
        .phone_number
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty());
    if let Some(phone) = &phone_number {
        if phone.chars().count() > MAX_PHONE_NUMBER_LEN {
            return Err(BookingError::Validation(format!(
                "phoneNumber must be at most {} characters",
                MAX_PHONE_NUMBER_LEN
            )));
        }
    }

    Ok(ValidatedBooking {
        name: name.to_string(),
        number_of_tickets: req.number_of_tickets,
        ticket_type: req.ticket_type,
        phone_number,
    })
}

/// Server clock at the precision the database keeps.
fn booking_timestamp() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

impl BookingService {
    pub fn new(repo: Arc<dyn BookingRepository>, numbers: BookingNumberGenerator) -> Self {
        Self {
            repo,
            numbers,
            insert_attempts: DEFAULT_INSERT_ATTEMPTS,
        }
    }

    /// How many times an insert is retried with a fresh number after a
    /// booking-number collision. Values below 1 are treated as 1.
    pub fn with_insert_attempts(mut self, attempts: u32) -> Self {
        self.insert_attempts = attempts.max(1);
        self
    }

    pub async fn create_booking(&self, req: CreateBookingRequest) -> BookingResult<Booking> {
        let fields = validate(req)?;

        for attempt in 1..=self.insert_attempts {
            let booking_number = self.numbers.generate(self.repo.as_ref()).await?;
            let new_booking = NewBooking {
                name: fields.name.clone(),
                number_of_tickets: fields.number_of_tickets,
                ticket_type: fields.ticket_type,
                booking_date: booking_timestamp(),
                booking_number,
                phone_number: fields.phone_number.clone(),
            };

            match self.repo.insert(new_booking).await {
                Ok(booking) => {
                    info!(
                        id = %booking.id,
                        booking_number = %booking.booking_number,
                        ticket_type = %booking.ticket_type,
                        "Booking created"
                    );
                    return Ok(booking);
                }
                Err(StoreError::DuplicateBookingNumber(number)) => {
                    warn!(
                        attempt,
                        booking_number = %number,
                        "Booking number taken between probe and insert, retrying"
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(BookingError::Conflict(format!(
            "could not allocate a unique booking number after {} attempts",
            self.insert_attempts
        )))
    }

    pub async fn list_bookings(&self) -> BookingResult<Vec<Booking>> {
        Ok(self.repo.list_all().await?)
    }

    pub async fn get_booking(&self, id: Uuid) -> BookingResult<Booking> {
        self.repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| BookingError::NotFound(id.to_string()))
    }

    pub async fn get_booking_by_number(&self, booking_number: &str) -> BookingResult<Booking> {
        self.repo
            .get_by_booking_number(booking_number)
            .await?
            .ok_or_else(|| BookingError::NotFound(booking_number.to_string()))
    }

    pub async fn delete_booking_by_number(&self, booking_number: &str) -> BookingResult<()> {
        match self.repo.delete_by_booking_number(booking_number).await {
            Ok(()) => {
                info!(booking_number, "Booking deleted");
                Ok(())
            }
            Err(StoreError::NotFound) => Err(BookingError::NotFound(booking_number.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    /// Spreadsheet of every booking in listing order.
    pub async fn export_bookings(&self) -> BookingResult<ExportFile> {
        let bookings = self.list_bookings().await?;
        let file = export::export_bookings(&bookings, Utc::now())
            .map_err(|e| BookingError::Export(e.to_string()))?;
        info!(rows = file.row_count, filename = %file.filename, "Bookings exported");
        Ok(file)
    }
}
