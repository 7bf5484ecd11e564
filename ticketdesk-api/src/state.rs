use std::sync::Arc;
use ticketdesk_core::BookingService;

#[derive(Clone)]
pub struct AppState {
    pub bookings: Arc<BookingService>,
}

impl AppState {
    pub fn new(bookings: BookingService) -> Self {
        Self {
            bookings: Arc::new(bookings),
        }
    }
}
