use frontdesk_core::{Frontdesk, HotelApi, ReportKind, SessionError};
use log::info;

/// A downloaded PDF report, ready to be handed to the browser
#[derive(Debug, Clone, PartialEq)]
pub struct ReportDownload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Fetches a report through the gated client primitives
pub async fn download<Api>(
    desk: &Frontdesk<Api>,
    kind: ReportKind,
) -> Result<ReportDownload, SessionError>
where
    Api: HotelApi,
{
    let bytes = desk.fetch_report(kind).await?;

    info!("Downloaded {} ({} bytes)", file_name(kind), bytes.len());

    Ok(ReportDownload {
        file_name: file_name(kind).to_string(),
        bytes,
    })
}

/// The file name suggested to the browser's save dialog
fn file_name(kind: ReportKind) -> &'static str {
    match kind {
        ReportKind::Occupancy => "occupancy-report.pdf",
        ReportKind::Financial => "financial-report.pdf",
    }
}

#[cfg(test)]
mod test {
    use async_trait::async_trait;
    use frontdesk_core::{
        ApiError, ApiResult, BookingData, BookingUpdate, NewBooking, NewRoom, RoomData,
    };

    use super::*;

    /// Serves a fixed PDF, refuses everything else
    struct ReportOnlyApi;

    #[async_trait]
    impl HotelApi for ReportOnlyApi {
        async fn validate_access(&self, _code: &str) -> ApiResult<String> {
            Ok("token".to_string())
        }

        async fn list_bookings(&self, _token: &str) -> ApiResult<Vec<BookingData>> {
            Err(unexpected())
        }

        async fn list_rooms(&self, _token: &str) -> ApiResult<Vec<RoomData>> {
            Err(unexpected())
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
            Ok(b"%PDF-1.7".to_vec())
        }
    }

    fn unexpected() -> ApiError {
        ApiError::Http {
            status: 500,
            message: "unexpected call".to_string(),
        }
    }

    #[tokio::test]
    async fn test_download_names_the_file_per_kind() {
        let desk = Frontdesk::new(ReportOnlyApi);
        desk.login("1234").await.expect("login succeeds");

        let report = download(&desk, ReportKind::Financial)
            .await
            .expect("report downloads");

        assert_eq!(report.file_name, "financial-report.pdf");
        assert_eq!(report.bytes, b"%PDF-1.7");
    }

    #[tokio::test]
    async fn test_download_requires_a_session() {
        let desk = Frontdesk::new(ReportOnlyApi);

        let result = download(&desk, ReportKind::Occupancy).await;

        assert!(matches!(result, Err(SessionError::NoSession)));
    }
}
