use std::sync::{Arc, Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::repository::{BookingRepository, StoreError};

pub const MIN_BOOKING_NUMBER: u32 = 100_000;
pub const MAX_BOOKING_NUMBER: u32 = 999_999;
pub const BOOKING_NUMBER_LEN: usize = 6;

/// Supplies candidate booking numbers.
pub trait NumberSource: Send + Sync {
    /// A value in `MIN_BOOKING_NUMBER..=MAX_BOOKING_NUMBER`.
    fn next_candidate(&self) -> u32;
}

/// One random generator shared by every request.
pub struct SharedRng {
    rng: Mutex<StdRng>,
}

impl SharedRng {
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic sequence, for tests and reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for SharedRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl NumberSource for SharedRng {
    fn next_candidate(&self) -> u32 {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.gen_range(MIN_BOOKING_NUMBER..=MAX_BOOKING_NUMBER)
    }
}

/// `true` for exactly six ASCII digits.
pub fn is_valid_booking_number(candidate: &str) -> bool {
    candidate.len() == BOOKING_NUMBER_LEN && candidate.bytes().all(|b| b.is_ascii_digit())
}

fn format_candidate(value: u32) -> String {
    let span = MAX_BOOKING_NUMBER - MIN_BOOKING_NUMBER + 1;
    let value = if (MIN_BOOKING_NUMBER..=MAX_BOOKING_NUMBER).contains(&value) {
        value
    } else {
        MIN_BOOKING_NUMBER + value % span
    };
    value.to_string()
}

/// Draws candidates until one is not present in the store.
///
/// The existence probe and the later insert are not atomic. Callers must
/// still handle [`StoreError::DuplicateBookingNumber`] from the insert.
#[derive(Clone)]
pub struct BookingNumberGenerator {
    source: Arc<dyn NumberSource>,
}

impl BookingNumberGenerator {
    pub fn new(source: Arc<dyn NumberSource>) -> Self {
        Self { source }
    }

    pub async fn generate(&self, repo: &dyn BookingRepository) -> Result<String, StoreError> {
        loop {
            let candidate = format_candidate(self.source.next_candidate());
            if !repo.exists_by_booking_number(&candidate).await? {
                return Ok(candidate);
            }
            debug!(booking_number = %candidate, "Booking number already in use, drawing again");
        }
    }
}

impl Default for BookingNumberGenerator {
    fn default() -> Self {
        Self::new(Arc::new(SharedRng::from_entropy()))
    }
}
