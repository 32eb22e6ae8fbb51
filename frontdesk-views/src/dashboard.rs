use chrono::NaiveDate;
use serde::Serialize;

use frontdesk_core::{BookingData, BookingStatus, RoomData, RoomStatus};

/// The aggregates shown on the dashboard cards
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    /// Percentage of rooms currently occupied
    pub occupancy_percent: u32,
    pub available_percent: u32,
    /// Bookings whose stay includes the given day
    pub bookings_today: usize,
    /// Price sum of the rooms booked for the given day
    pub revenue_today: f64,
}

pub fn summarize(bookings: &[BookingData], rooms: &[RoomData], today: NaiveDate) -> DashboardSummary {
    let occupied = rooms
        .iter()
        .filter(|room| room.status == RoomStatus::Occupied)
        .count();

    let occupancy_percent = if rooms.is_empty() {
        0
    } else {
        (occupied * 100 / rooms.len()) as u32
    };

    let staying_today: Vec<_> = bookings
        .iter()
        .filter(|booking| booking.status != BookingStatus::Cancelled)
        .filter(|booking| booking.check_in <= today && today < booking.check_out)
        .collect();

    let revenue_today = staying_today
        .iter()
        .map(|booking| booking.room.resolve().price)
        .sum();

    DashboardSummary {
        occupancy_percent,
        available_percent: 100 - occupancy_percent,
        bookings_today: staying_today.len(),
        revenue_today,
    }
}
