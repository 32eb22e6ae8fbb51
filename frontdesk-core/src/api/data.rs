use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::Entity;

/// A bookable room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomData {
    pub id: String,
    pub room_number: String,
    #[serde(rename = "type")]
    pub kind: RoomType,
    pub price: f64,
    pub status: RoomStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomType {
    Single,
    Double,
    Suite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    Available,
    Occupied,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Active,
    Cancelled,
}

/// A room reservation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingData {
    pub id: String,
    pub guest_name: String,
    /// The room as the server last embedded it
    #[serde(default)]
    pub room: RoomRef,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub status: BookingStatus,
}

/// The room a booking points at. The server usually embeds a full snapshot,
/// but the reference can dangle when the room no longer resolves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoomRef {
    Room(RoomData),
    Dangling(serde_json::Value),
}

impl RoomRef {
    /// Returns the embedded room, degrading to the invalid-room sentinel
    /// instead of failing when the reference dangles
    pub fn resolve(&self) -> RoomData {
        match self {
            Self::Room(room) => room.clone(),
            Self::Dangling(_) => RoomData::invalid(),
        }
    }
}

impl Default for RoomRef {
    fn default() -> Self {
        Self::Dangling(serde_json::Value::Null)
    }
}

impl RoomData {
    /// The id carried by the invalid-room sentinel
    pub const INVALID_ID: &'static str = "invalid";

    /// Sentinel shown when a booking references a room that no longer exists
    pub fn invalid() -> Self {
        Self {
            id: Self::INVALID_ID.to_string(),
            room_number: "invalid".to_string(),
            kind: RoomType::Single,
            price: 0.,
            status: RoomStatus::Available,
        }
    }
}

/// Payload of `POST /bookings`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBooking {
    pub guest_name: String,
    pub room_id: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

/// Payload of `PUT /bookings/:id`
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_in: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_out: Option<NaiveDate>,
}

impl BookingUpdate {
    /// Applies the update to an existing row, for the provisional display
    pub fn apply_to(&self, booking: &mut BookingData) {
        if let Some(guest_name) = &self.guest_name {
            booking.guest_name = guest_name.clone();
        }

        if let Some(check_in) = self.check_in {
            booking.check_in = check_in;
        }

        if let Some(check_out) = self.check_out {
            booking.check_out = check_out;
        }
    }
}

/// Payload of `POST /rooms`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRoom {
    pub room_number: String,
    #[serde(rename = "type")]
    pub kind: RoomType,
    pub price: f64,
    pub status: RoomStatus,
}

impl Entity for RoomData {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for BookingData {
    fn id(&self) -> &str {
        &self.id
    }
}
