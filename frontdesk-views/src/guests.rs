use chrono::NaiveDate;
use serde::Serialize;

use frontdesk_core::{BookingData, BookingStatus};

/// A row of the guest management table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GuestRow {
    /// The booking backing this row, the edit action targets it
    pub booking_id: String,
    pub guest_name: String,
    pub room_number: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

/// Guest profiles derived from the booking store. Cancelled bookings no
/// longer represent a staying guest and are filtered out.
pub fn guest_rows(bookings: &[BookingData]) -> Vec<GuestRow> {
    bookings
        .iter()
        .filter(|booking| booking.status != BookingStatus::Cancelled)
        .map(|booking| GuestRow {
            booking_id: booking.id.clone(),
            guest_name: booking.guest_name.clone(),
            room_number: booking.room.resolve().room_number,
            check_in: booking.check_in,
            check_out: booking.check_out,
        })
        .collect()
}
