use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use frontdesk_core::{BookingData, BookingStatus, MutationIntent, NewBooking};

/// The date format the booking form produces
const FORM_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Error, PartialEq)]
pub enum FormError {
    #[error("{field} must be a date in YYYY-MM-DD form")]
    BadDate { field: &'static str },
}

/// A single row of the bookings table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingRow {
    pub id: String,
    pub guest_name: String,
    pub room_number: String,
    pub check_in: String,
    pub check_out: String,
    pub status: BookingStatus,
}

/// Presentation rows for the bookings page, in store order
pub fn booking_rows(bookings: &[BookingData]) -> Vec<BookingRow> {
    bookings
        .iter()
        .map(|booking| BookingRow {
            id: booking.id.clone(),
            guest_name: booking.guest_name.clone(),
            room_number: booking.room.resolve().room_number,
            check_in: booking.check_in.format(FORM_DATE_FORMAT).to_string(),
            check_out: booking.check_out.format(FORM_DATE_FORMAT).to_string(),
            status: booking.status,
        })
        .collect()
}

/// Builds a create intent from the raw form fields. Date ordering is not
/// checked anywhere, check-out may precede check-in.
pub fn book_room_intent(
    guest_name: &str,
    room_id: &str,
    check_in: &str,
    check_out: &str,
) -> Result<MutationIntent, FormError> {
    Ok(MutationIntent::CreateBooking(NewBooking {
        guest_name: guest_name.to_string(),
        room_id: room_id.to_string(),
        check_in: parse_form_date("check-in", check_in)?,
        check_out: parse_form_date("check-out", check_out)?,
    }))
}

pub fn cancel_booking_intent(id: &str) -> MutationIntent {
    MutationIntent::CancelBooking { id: id.to_string() }
}

fn parse_form_date(field: &'static str, value: &str) -> Result<NaiveDate, FormError> {
    NaiveDate::parse_from_str(value, FORM_DATE_FORMAT).map_err(|_| FormError::BadDate { field })
}
