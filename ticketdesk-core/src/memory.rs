use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::booking::{newest_first, Booking, NewBooking};
use crate::repository::{BookingRepository, StoreError};

/// Process-local booking store.
///
/// Enforces the same unique booking-number constraint as the Postgres table,
/// checked under the write lock.
#[derive(Default)]
pub struct InMemoryBookingRepository {
    bookings: RwLock<HashMap<Uuid, Booking>>,
}

impl InMemoryBookingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.bookings.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.bookings.read().await.is_empty()
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn insert(&self, booking: NewBooking) -> Result<Booking, StoreError> {
        let mut bookings = self.bookings.write().await;

        if bookings
            .values()
            .any(|b| b.booking_number == booking.booking_number)
        {
            return Err(StoreError::DuplicateBookingNumber(booking.booking_number));
        }

        let mut id = Uuid::new_v4();
        while bookings.contains_key(&id) {
            id = Uuid::new_v4();
        }

        let stored = booking.into_booking(id);
        bookings.insert(id, stored.clone());
        Ok(stored)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Booking>, StoreError> {
        Ok(self.bookings.read().await.get(&id).cloned())
    }

    async fn get_by_booking_number(
        &self,
        booking_number: &str,
    ) -> Result<Option<Booking>, StoreError> {
        Ok(self
            .bookings
            .read()
            .await
            .values()
            .find(|b| b.booking_number == booking_number)
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<Booking>, StoreError> {
        let mut all: Vec<Booking> = self.bookings.read().await.values().cloned().collect();
        all.sort_by(newest_first);
        Ok(all)
    }

    async fn exists_by_booking_number(&self, booking_number: &str) -> Result<bool, StoreError> {
        Ok(self
            .bookings
            .read()
            .await
            .values()
            .any(|b| b.booking_number == booking_number))
    }

    async fn delete_by_booking_number(&self, booking_number: &str) -> Result<(), StoreError> {
        let mut bookings = self.bookings.write().await;
        let id = bookings
            .values()
            .find(|b| b.booking_number == booking_number)
            .map(|b| b.id)
            .ok_or(StoreError::NotFound)?;
        bookings.remove(&id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::TicketType;
    use chrono::{Duration, Utc};

    fn new_booking(number: &str, minutes_ago: i64) -> NewBooking {
        NewBooking {
            name: "Test".to_string(),
            number_of_tickets: 1,
            ticket_type: TicketType::Silver,
            booking_date: Utc::now() - Duration::minutes(minutes_ago),
            booking_number: number.to_string(),
            phone_number: None,
        }
    }

    #[tokio::test]
    async fn test_insert_and_lookup() {
        let repo = InMemoryBookingRepository::new();
        let stored = repo.insert(new_booking("111111", 0)).await.unwrap();

        assert_eq!(repo.get_by_id(stored.id).await.unwrap(), Some(stored.clone()));
        assert_eq!(
            repo.get_by_booking_number("111111").await.unwrap(),
            Some(stored)
        );
        assert!(repo.exists_by_booking_number("111111").await.unwrap());
        assert!(!repo.exists_by_booking_number("222222").await.unwrap());
        assert!(repo.get_by_id(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_number_rejected() {
        let repo = InMemoryBookingRepository::new();
        repo.insert(new_booking("333333", 0)).await.unwrap();

        let err = repo.insert(new_booking("333333", 0)).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateBookingNumber(n) if n == "333333"));
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_list_all_newest_first() {
        let repo = InMemoryBookingRepository::new();
        for (number, age) in [("100001", 5), ("100002", 1), ("100003", 30), ("100004", 2)] {
            repo.insert(new_booking(number, age)).await.unwrap();
        }

        let numbers: Vec<String> = repo
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.booking_number)
            .collect();
        assert_eq!(numbers, vec!["100002", "100004", "100001", "100003"]);
    }

    #[tokio::test]
    async fn test_delete_by_number() {
        let repo = InMemoryBookingRepository::new();
        repo.insert(new_booking("444444", 0)).await.unwrap();
        repo.insert(new_booking("555555", 0)).await.unwrap();

        repo.delete_by_booking_number("444444").await.unwrap();
        assert!(repo.get_by_booking_number("444444").await.unwrap().is_none());
        assert_eq!(repo.len().await, 1);

        let err = repo.delete_by_booking_number("444444").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
        assert_eq!(repo.len().await, 1);
    }
}
