use crossbeam::channel::{Receiver, Sender};

use crate::{BookingData, RoomData, SessionStatus};

pub type EventSender = Sender<ConsoleEvent>;
pub type EventReceiver = Receiver<ConsoleEvent>;

/// Events emitted by the console core
#[derive(Debug, Clone)]
pub enum ConsoleEvent {
    /// The booking collection changed
    BookingsUpdate { bookings: Vec<BookingData> },
    /// The room collection changed
    RoomsUpdate { rooms: Vec<RoomData> },
    /// The session status flipped
    SessionUpdate { status: SessionStatus },
    /// A mutation failed and its provisional state was rolled back
    MutationFailed {
        /// The id the mutation targeted, temporary for creations
        entity_id: String,
        /// The error, in user-presentable form
        message: String,
    },
}
