use async_trait::async_trait;
use thiserror::Error;

mod data;
pub use data::*;

mod http;
pub use http::*;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Every transport and protocol failure, normalized into one shape
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    /// The request never produced a response
    #[error("Network error: {0}")]
    Network(String),
    /// The server answered with a 4xx or 5xx status
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },
    /// The response body did not match the expected shape
    #[error("Decode error: {0}")]
    Decode(String),
}

impl ApiError {
    /// True if the failure revokes the session. A 401 or 403 response is the
    /// only authorization-failure signal the console recognizes.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            Self::Http {
                status: 401 | 403,
                ..
            }
        )
    }
}

/// The kind of PDF report the report service can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Occupancy,
    Financial,
}

impl ReportKind {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Occupancy => "/reports/occupancy/pdf",
            Self::Financial => "/reports/financial/pdf",
        }
    }
}

/// The remote booking and room API, behind a trait so the core can be tested
/// against an in-memory implementation
#[async_trait]
pub trait HotelApi: Send + Sync + 'static {
    /// Exchanges the admin access code for a bearer token
    async fn validate_access(&self, code: &str) -> ApiResult<String>;

    async fn list_bookings(&self, token: &str) -> ApiResult<Vec<BookingData>>;
    async fn list_rooms(&self, token: &str) -> ApiResult<Vec<RoomData>>;

    async fn create_booking(&self, token: &str, new_booking: NewBooking)
        -> ApiResult<BookingData>;
    async fn update_booking(
        &self,
        token: &str,
        id: &str,
        update: BookingUpdate,
    ) -> ApiResult<BookingData>;
    async fn cancel_booking(&self, token: &str, id: &str) -> ApiResult<BookingData>;

    async fn create_room(&self, token: &str, new_room: NewRoom) -> ApiResult<RoomData>;

    /// Downloads a PDF report. Any non-PDF response is a decode error.
    async fn fetch_report(&self, token: &str, kind: ReportKind) -> ApiResult<Vec<u8>>;
}
