use std::sync::Arc;

use crossbeam::atomic::AtomicCell;
use dashmap::DashMap;
use log::warn;
use thiserror::Error;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::{
    BookingData, BookingStatus, BookingUpdate, ConsoleEvent, FrontdeskContext, HotelApi,
    NewBooking, NewRoom, RoomData, RoomRef, RoomStatus, SessionError, SessionStatus,
};

/// Counter backing temporary ids. It only moves forward, so an id handed to a
/// provisional row is never reused by a later mutation.
static TEMP_ID_COUNTER: AtomicCell<u64> = AtomicCell::new(1);

/// The prefix keeping temporary ids distinct from any server-assigned id
const TEMP_ID_PREFIX: &str = "local-";

fn next_temp_id() -> String {
    format!("{}{}", TEMP_ID_PREFIX, TEMP_ID_COUNTER.fetch_add(1))
}

#[derive(Debug, Error, PartialEq)]
pub enum MutationError {
    /// The intent payload was malformed. Nothing was applied or sent.
    #[error("Invalid intent: {0}")]
    Validation(String),
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// A single requested state change, alive for one mutator invocation
#[derive(Debug, Clone)]
pub enum MutationIntent {
    CreateBooking(NewBooking),
    UpdateBooking { id: String, update: BookingUpdate },
    CancelBooking { id: String },
    CreateRoom(NewRoom),
}

/// Which dependent collection to refetch after a successful mutation.
///
/// Replaces the ad hoc whole-list refetches the pages used to issue after
/// every booking mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Refresh {
    #[default]
    None,
    Bookings,
    Rooms,
}

/// Applies mutations optimistically: provisional apply, remote confirmation
/// through the session gate, then reconcile or rollback.
pub struct Mutator<Api> {
    context: FrontdeskContext<Api>,
    /// One lock per entity id, serializing mutations that target the same row
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl<Api> Mutator<Api>
where
    Api: HotelApi,
{
    pub fn new(context: &FrontdeskContext<Api>) -> Self {
        Self {
            context: context.clone(),
            locks: DashMap::new(),
        }
    }

    /// Runs one intent through the three-phase protocol, resolving once it
    /// has been confirmed or rolled back
    pub async fn mutate(
        &self,
        intent: MutationIntent,
        refresh: Refresh,
    ) -> Result<(), MutationError> {
        Self::validate(&intent)?;

        // A missing session rejects the intent before any provisional apply
        if self.context.session.status() == SessionStatus::Unauthenticated {
            return Err(SessionError::NoSession.into());
        }

        match intent {
            MutationIntent::CreateBooking(new_booking) => self.create_booking(new_booking).await,
            MutationIntent::UpdateBooking { id, update } => self.update_booking(id, update).await,
            MutationIntent::CancelBooking { id } => self.cancel_booking(id).await,
            MutationIntent::CreateRoom(new_room) => self.create_room(new_room).await,
        }?;

        self.refresh_dependent(refresh).await;

        Ok(())
    }

    /// Creates a booking with a provisional pending row. The referenced room
    /// flips to occupied as part of the provisional display, so rollback
    /// restores both rows or neither.
    async fn create_booking(&self, new_booking: NewBooking) -> Result<(), MutationError> {
        // Fresh temp ids can't collide, so creations don't take a row lock
        let temp_id = next_temp_id();

        let stores = &self.context.stores;
        let prior_room = stores.rooms.get(&new_booking.room_id);

        stores
            .bookings
            .upsert(provisional_booking(&temp_id, &new_booking, &prior_room));

        if let Some(room) = &prior_room {
            let mut occupied = room.clone();
            occupied.status = RoomStatus::Occupied;

            stores.rooms.upsert(occupied);
            self.context.emit_rooms();
        }

        self.context.emit_bookings();

        let api = self.context.api.clone();
        let payload = new_booking.clone();

        let result = self
            .context
            .session
            .with_session(|token| async move { api.create_booking(&token, payload).await })
            .await;

        match result {
            Ok(confirmed) => {
                stores.bookings.replace(&temp_id, confirmed);
                self.context.emit_bookings();

                Ok(())
            }
            Err(error) => {
                stores.bookings.remove(&temp_id);

                if let Some(room) = prior_room {
                    stores.rooms.upsert(room);
                    self.context.emit_rooms();
                }

                self.context.emit_bookings();
                self.rolled_back(&temp_id, &error);

                Err(error.into())
            }
        }
    }

    /// Updates an existing booking in place. No temporary id is introduced,
    /// rollback restores the exact prior row.
    async fn update_booking(
        &self,
        id: String,
        update: BookingUpdate,
    ) -> Result<(), MutationError> {
        let _guard = self.lock(&id).await;

        let prior = self.existing_booking(&id)?;

        let mut provisional = prior.clone();
        update.apply_to(&mut provisional);

        self.context.stores.bookings.upsert(provisional);
        self.context.emit_bookings();

        let api = self.context.api.clone();
        let target = id.clone();
        let payload = update.clone();

        let result = self
            .context
            .session
            .with_session(|token| async move { api.update_booking(&token, &target, payload).await })
            .await;

        self.reconcile_row(&id, prior, result)
    }

    /// Cancellation is a status transition, not a deletion. The row flips to
    /// cancelled in place and flips back if the server refuses.
    async fn cancel_booking(&self, id: String) -> Result<(), MutationError> {
        let _guard = self.lock(&id).await;

        let prior = self.existing_booking(&id)?;

        let mut provisional = prior.clone();
        provisional.status = BookingStatus::Cancelled;

        self.context.stores.bookings.upsert(provisional);
        self.context.emit_bookings();

        let api = self.context.api.clone();
        let target = id.clone();

        let result = self
            .context
            .session
            .with_session(|token| async move { api.cancel_booking(&token, &target).await })
            .await;

        self.reconcile_row(&id, prior, result)
    }

    async fn create_room(&self, new_room: NewRoom) -> Result<(), MutationError> {
        let temp_id = next_temp_id();

        self.context
            .stores
            .rooms
            .upsert(provisional_room(&temp_id, &new_room));
        self.context.emit_rooms();

        let api = self.context.api.clone();
        let payload = new_room.clone();

        let result = self
            .context
            .session
            .with_session(|token| async move { api.create_room(&token, payload).await })
            .await;

        match result {
            Ok(confirmed) => {
                self.context.stores.rooms.replace(&temp_id, confirmed);
                self.context.emit_rooms();

                Ok(())
            }
            Err(error) => {
                self.context.stores.rooms.remove(&temp_id);
                self.context.emit_rooms();
                self.rolled_back(&temp_id, &error);

                Err(error.into())
            }
        }
    }

    /// Reconciles an in-place booking mutation, restoring only the targeted
    /// row on failure so unrelated in-flight mutations are unaffected
    fn reconcile_row(
        &self,
        id: &str,
        prior: BookingData,
        result: Result<BookingData, SessionError>,
    ) -> Result<(), MutationError> {
        match result {
            Ok(confirmed) => {
                self.context.stores.bookings.replace(id, confirmed);
                self.context.emit_bookings();

                Ok(())
            }
            Err(error) => {
                self.context.stores.bookings.upsert(prior);
                self.context.emit_bookings();
                self.rolled_back(id, &error);

                Err(error.into())
            }
        }
    }

    async fn refresh_dependent(&self, refresh: Refresh) {
        let result = match refresh {
            Refresh::None => return,
            Refresh::Bookings => {
                let api = self.context.api.clone();

                self.context
                    .session
                    .with_session(|token| async move { api.list_bookings(&token).await })
                    .await
                    .map(|bookings| {
                        self.context.stores.bookings.set_all(bookings);
                        self.context.emit_bookings();
                    })
            }
            Refresh::Rooms => {
                let api = self.context.api.clone();

                self.context
                    .session
                    .with_session(|token| async move { api.list_rooms(&token).await })
                    .await
                    .map(|rooms| {
                        self.context.stores.rooms.set_all(rooms);
                        self.context.emit_rooms();
                    })
            }
        };

        // The mutation itself already succeeded, a failed refresh only means
        // the dependent collection stays stale until the next fetch
        if let Err(error) = result {
            warn!("Dependent refresh failed: {}", error);
        }
    }

    fn existing_booking(&self, id: &str) -> Result<BookingData, MutationError> {
        self.context
            .stores
            .bookings
            .get(id)
            .ok_or_else(|| MutationError::Validation(format!("No booking with id {}", id)))
    }

    async fn lock(&self, id: &str) -> OwnedMutexGuard<()> {
        let lock = self.locks.entry(id.to_string()).or_default().clone();

        lock.lock_owned().await
    }

    fn rolled_back(&self, id: &str, error: &SessionError) {
        warn!("Mutation targeting {} rolled back: {}", id, error);

        self.context.emit(ConsoleEvent::MutationFailed {
            entity_id: id.to_string(),
            message: error.to_string(),
        });
    }

    fn validate(intent: &MutationIntent) -> Result<(), MutationError> {
        let failure = match intent {
            MutationIntent::CreateBooking(new_booking) => {
                if new_booking.guest_name.trim().is_empty() {
                    Some("Guest name must not be empty")
                } else if new_booking.room_id.is_empty() {
                    Some("A room must be selected")
                } else {
                    None
                }
            }
            MutationIntent::UpdateBooking { id, update } => {
                if id.is_empty() {
                    Some("A booking id is required")
                } else if update
                    .guest_name
                    .as_deref()
                    .is_some_and(|name| name.trim().is_empty())
                {
                    Some("Guest name must not be empty")
                } else {
                    None
                }
            }
            MutationIntent::CancelBooking { id } => {
                id.is_empty().then_some("A booking id is required")
            }
            MutationIntent::CreateRoom(new_room) => {
                if new_room.room_number.trim().is_empty() {
                    Some("Room number must not be empty")
                } else if !new_room.price.is_finite() || new_room.price < 0. {
                    Some("Price must be a non-negative number")
                } else {
                    None
                }
            }
        };

        match failure {
            Some(message) => Err(MutationError::Validation(message.to_string())),
            None => Ok(()),
        }
    }
}

/// The provisional row shown until the server confirms a new booking. It is
/// a display artifact only, the real payload goes over the wire.
fn provisional_booking(
    temp_id: &str,
    new_booking: &NewBooking,
    room: &Option<RoomData>,
) -> BookingData {
    let room = match room {
        Some(room) => RoomRef::Room(room.clone()),
        None => RoomRef::Dangling(serde_json::Value::String(new_booking.room_id.clone())),
    };

    BookingData {
        id: temp_id.to_string(),
        guest_name: new_booking.guest_name.clone(),
        room,
        check_in: new_booking.check_in,
        check_out: new_booking.check_out,
        status: BookingStatus::Pending,
    }
}

fn provisional_room(temp_id: &str, new_room: &NewRoom) -> RoomData {
    RoomData {
        id: temp_id.to_string(),
        room_number: new_room.room_number.clone(),
        kind: new_room.kind,
        price: new_room.price,
        status: new_room.status,
    }
}
