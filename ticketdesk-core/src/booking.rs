use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// Ticket tiers offered at the box office.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TicketType {
    Stag = 0,
    Silver = 1,
    Gold = 2,
    Platinum = 3,
}

/// Variant, wire/storage code, display name, legacy ordinal.
static TICKET_TYPES: [(TicketType, &str, &str, u64); 4] = [
    (TicketType::Stag, "stag", "Stag", 0),
    (TicketType::Silver, "silver", "Silver", 1),
    (TicketType::Gold, "gold", "Gold", 2),
    (TicketType::Platinum, "platinum", "Platinum", 3),
];

impl TicketType {
    pub const ALL: [TicketType; 4] = [
        TicketType::Stag,
        TicketType::Silver,
        TicketType::Gold,
        TicketType::Platinum,
    ];

    fn entry(self) -> &'static (TicketType, &'static str, &'static str, u64) {
        // Table rows are laid out in discriminant order.
        &TICKET_TYPES[self as usize]
    }

    /// Code used on the wire and in the `ticket_type` column.
    pub fn code(self) -> &'static str {
        self.entry().1
    }

    /// Human-facing name, used by the spreadsheet export.
    pub fn display_name(self) -> &'static str {
        self.entry().2
    }

    /// Numeric code accepted from older clients.
    pub fn from_ordinal(ordinal: u64) -> Option<Self> {
        TICKET_TYPES
            .iter()
            .find(|(_, _, _, o)| *o == ordinal)
            .map(|(t, _, _, _)| *t)
    }
}

impl fmt::Display for TicketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("Unknown ticket type: {0}")]
pub struct UnknownTicketType(pub String);

impl FromStr for TicketType {
    type Err = UnknownTicketType;

    /// Case-insensitive: `"Gold"`, `"gold"` and `"GOLD"` are all accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        TICKET_TYPES
            .iter()
            .find(|(_, code, _, _)| code.eq_ignore_ascii_case(trimmed))
            .map(|(t, _, _, _)| *t)
            .ok_or_else(|| UnknownTicketType(s.to_string()))
    }
}

impl Serialize for TicketType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

struct TicketTypeVisitor;

impl<'de> Visitor<'de> for TicketTypeVisitor {
    type Value = TicketType;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("one of stag, silver, gold, platinum (or 0-3)")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        v.parse().map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        TicketType::from_ordinal(v).ok_or_else(|| E::invalid_value(de::Unexpected::Unsigned(v), &self))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        u64::try_from(v)
            .ok()
            .and_then(TicketType::from_ordinal)
            .ok_or_else(|| E::invalid_value(de::Unexpected::Signed(v), &self))
    }
}

impl<'de> Deserialize<'de> for TicketType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(TicketTypeVisitor)
    }
}

/// A persisted booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub name: String,
    pub number_of_tickets: i32,
    pub ticket_type: TicketType,
    pub booking_date: DateTime<Utc>,
    pub booking_number: String,
    pub phone_number: Option<String>,
}

/// A booking that has been validated and stamped but not yet stored.
/// The store assigns the `id` on insert.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub name: String,
    pub number_of_tickets: i32,
    pub ticket_type: TicketType,
    pub booking_date: DateTime<Utc>,
    pub booking_number: String,
    pub phone_number: Option<String>,
}

impl NewBooking {
    pub fn into_booking(self, id: Uuid) -> Booking {
        Booking {
            id,
            name: self.name,
            number_of_tickets: self.number_of_tickets,
            ticket_type: self.ticket_type,
            booking_date: self.booking_date,
            booking_number: self.booking_number,
            phone_number: self.phone_number,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub name: String,
    pub number_of_tickets: i32,
    pub ticket_type: TicketType,
    #[serde(default)]
    pub phone_number: Option<String>,
}

/// Listing order: newest `booking_date` first, then ascending `id`.
pub fn newest_first(a: &Booking, b: &Booking) -> Ordering {
    b.booking_date
        .cmp(&a.booking_date)
        .then_with(|| a.id.cmp(&b.id))
}
