mod api;
mod config;
mod events;
mod logging;
mod mutation;
mod session;
mod store;

use std::sync::Arc;

use crossbeam::channel::unbounded;

pub use api::*;
pub use config::*;
pub use events::*;
pub use logging::*;
pub use mutation::*;
pub use session::*;
pub use store::*;

/// The console core, facilitating session handling, optimistic mutation, and
/// store synchronization against the remote booking API.
pub struct Frontdesk<Api> {
    context: FrontdeskContext<Api>,
    mutator: Mutator<Api>,

    event_receiver: EventReceiver,
}

/// A type passed to various components of the core, to access shared state and
/// emit events.
pub struct FrontdeskContext<Api> {
    pub api: Arc<Api>,
    pub session: Arc<SessionGate>,
    pub stores: Arc<Stores>,

    event_sender: EventSender,
}

impl<Api> Frontdesk<Api>
where
    Api: HotelApi,
{
    pub fn new(api: Api) -> Self {
        let (event_sender, event_receiver) = unbounded();

        let context = FrontdeskContext {
            api: Arc::new(api),
            session: Arc::new(SessionGate::new(event_sender.clone())),
            stores: Default::default(),

            event_sender,
        };

        let mutator = Mutator::new(&context);

        Self {
            context,
            mutator,
            event_receiver,
        }
    }

    /// Exchanges the access code for a bearer token and opens the session
    pub async fn login(&self, code: &str) -> Result<(), ApiError> {
        let token = self.context.api.validate_access(code).await?;
        self.context.session.authenticate(token);

        Ok(())
    }

    /// Closes the session explicitly
    pub fn logout(&self) {
        self.context.session.clear()
    }

    /// Fetches both collections through the session gate. If the second fetch
    /// fails, the first is rolled back so the stores are never half updated.
    pub async fn refresh(&self) -> Result<(), SessionError> {
        let snapshot = self.context.stores.snapshot();

        let api = self.context.api.clone();
        let bookings = self
            .context
            .session
            .with_session(|token| async move { api.list_bookings(&token).await })
            .await?;

        self.context.stores.bookings.set_all(bookings);

        let api = self.context.api.clone();
        let rooms = self
            .context
            .session
            .with_session(|token| async move { api.list_rooms(&token).await })
            .await;

        match rooms {
            Ok(rooms) => self.context.stores.rooms.set_all(rooms),
            Err(error) => {
                self.context.stores.restore(snapshot);
                return Err(error);
            }
        }

        self.context.emit_bookings();
        self.context.emit_rooms();

        Ok(())
    }

    /// Entry point for view intents, resolving once the mutation has been
    /// confirmed or rolled back
    pub async fn intent(
        &self,
        intent: MutationIntent,
        refresh: Refresh,
    ) -> Result<(), MutationError> {
        self.mutator.mutate(intent, refresh).await
    }

    /// Current contents of the booking store, in insertion order
    pub fn bookings(&self) -> Vec<BookingData> {
        self.context.stores.bookings.list()
    }

    /// Current contents of the room store, in insertion order
    pub fn rooms(&self) -> Vec<RoomData> {
        self.context.stores.rooms.list()
    }

    pub fn session_status(&self) -> SessionStatus {
        self.context.session.status()
    }

    /// Returns a receiver of core events, driving view re-renders
    pub fn events(&self) -> EventReceiver {
        self.event_receiver.clone()
    }

    /// Downloads a PDF report through the same gated primitives
    pub async fn fetch_report(&self, kind: ReportKind) -> Result<Vec<u8>, SessionError> {
        let api = self.context.api.clone();

        self.context
            .session
            .with_session(|token| async move { api.fetch_report(&token, kind).await })
            .await
    }
}

impl<Api> FrontdeskContext<Api> {
    pub(crate) fn emit(&self, event: ConsoleEvent) {
        self.event_sender.send(event).ok();
    }

    pub(crate) fn emit_bookings(&self) {
        self.emit(ConsoleEvent::BookingsUpdate {
            bookings: self.stores.bookings.list(),
        });
    }

    pub(crate) fn emit_rooms(&self) {
        self.emit(ConsoleEvent::RoomsUpdate {
            rooms: self.stores.rooms.list(),
        });
    }
}

impl<Api> Clone for FrontdeskContext<Api> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            session: self.session.clone(),
            stores: self.stores.clone(),

            event_sender: self.event_sender.clone(),
        }
    }
}

#[cfg(test)]
mod test {
    use async_trait::async_trait;

    use super::*;

    /// Serves fixed collections, with the room fetch optionally failing so
    /// partial refreshes can be exercised
    #[derive(Default)]
    struct ListsApi {
        fail_rooms: bool,
    }

    #[async_trait]
    impl HotelApi for ListsApi {
        async fn validate_access(&self, _code: &str) -> ApiResult<String> {
            Ok("token".to_string())
        }

        async fn list_bookings(&self, _token: &str) -> ApiResult<Vec<BookingData>> {
            Ok(vec![booking("b1")])
        }

        async fn list_rooms(&self, _token: &str) -> ApiResult<Vec<RoomData>> {
            if self.fail_rooms {
                return Err(ApiError::Network("timed out".to_string()));
            }

            Ok(vec![room("r1")])
        }

        async fn create_booking(
            &self,
            _token: &str,
            _new_booking: NewBooking,
        ) -> ApiResult<BookingData> {
            Err(unexpected())
        }

        async fn update_booking(
            &self,
            _token: &str,
            _id: &str,
            _update: BookingUpdate,
        ) -> ApiResult<BookingData> {
            Err(unexpected())
        }

        async fn cancel_booking(&self, _token: &str, _id: &str) -> ApiResult<BookingData> {
            Err(unexpected())
        }

        async fn create_room(&self, _token: &str, _new_room: NewRoom) -> ApiResult<RoomData> {
            Err(unexpected())
        }

        async fn fetch_report(&self, _token: &str, _kind: ReportKind) -> ApiResult<Vec<u8>> {
            Err(unexpected())
        }
    }

    fn unexpected() -> ApiError {
        ApiError::Http {
            status: 500,
            message: "unexpected call".to_string(),
        }
    }

    fn room(id: &str) -> RoomData {
        RoomData {
            id: id.to_string(),
            room_number: "101".to_string(),
            kind: RoomType::Double,
            price: 120.,
            status: RoomStatus::Available,
        }
    }

    fn booking(id: &str) -> BookingData {
        BookingData {
            id: id.to_string(),
            guest_name: "Ada".to_string(),
            room: RoomRef::Room(room("r1")),
            check_in: "2025-01-01".parse().expect("date parses"),
            check_out: "2025-01-03".parse().expect("date parses"),
            status: BookingStatus::Active,
        }
    }

    #[tokio::test]
    async fn test_refresh_replaces_both_stores() {
        let desk = Frontdesk::new(ListsApi::default());
        desk.login("1234").await.expect("login succeeds");

        desk.context.stores.bookings.upsert(booking("stale"));
        desk.context.stores.rooms.upsert(room("stale"));

        desk.refresh().await.expect("refresh succeeds");

        assert_eq!(desk.bookings(), vec![booking("b1")]);
        assert_eq!(desk.rooms(), vec![room("r1")]);
    }

    #[tokio::test]
    async fn test_refresh_rolls_back_on_partial_failure() {
        let desk = Frontdesk::new(ListsApi { fail_rooms: true });
        desk.login("1234").await.expect("login succeeds");

        desk.context.stores.bookings.upsert(booking("stale"));
        desk.context.stores.rooms.upsert(room("stale"));

        let before_bookings = desk.bookings();
        let before_rooms = desk.rooms();

        let result = desk.refresh().await;

        assert!(matches!(result, Err(SessionError::Api(_))));

        // The booking fetch succeeded, but neither store keeps it
        assert_eq!(desk.bookings(), before_bookings);
        assert_eq!(desk.rooms(), before_rooms);
    }

    #[tokio::test]
    async fn test_refresh_requires_a_session() {
        let desk = Frontdesk::new(ListsApi::default());

        let result = desk.refresh().await;

        assert_eq!(result, Err(SessionError::NoSession));
    }
}
