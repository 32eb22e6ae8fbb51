use async_trait::async_trait;
use reqwest::{header, Client, Method, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::json;

use super::{
    ApiError, ApiResult, BookingData, BookingUpdate, HotelApi, NewBooking, NewRoom, ReportKind,
    RoomData,
};
use crate::Config;

/// The reqwest-backed implementation of [HotelApi]
pub struct HttpApi {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct AccessResponse {
    token: String,
}

/// The error body the API responds with, when it bothers to
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl HttpApi {
    pub fn new(config: &Config) -> Self {
        let mut builder = Client::builder();

        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Self {
            client: builder.build().expect("http client is built"),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Sends a request, attaching the bearer token when one is supplied, and
    /// normalizes transport and status failures
    async fn send<B>(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<&B>,
    ) -> ApiResult<Response>
    where
        B: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.request(method, url);

        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(handle_unsuccessful_request(response, status).await);
        }

        Ok(response)
    }

    async fn request<T, B>(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<&B>,
    ) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.send(method, path, token, body).await?;

        response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl HotelApi for HttpApi {
    async fn validate_access(&self, code: &str) -> ApiResult<String> {
        let response: AccessResponse = self
            .request(
                Method::POST,
                "/access/validate",
                None,
                Some(&json!({ "code": code })),
            )
            .await?;

        Ok(response.token)
    }

    async fn list_bookings(&self, token: &str) -> ApiResult<Vec<BookingData>> {
        self.request(Method::GET, "/bookings", Some(token), None::<&()>)
            .await
    }

    async fn list_rooms(&self, token: &str) -> ApiResult<Vec<RoomData>> {
        self.request(Method::GET, "/rooms", Some(token), None::<&()>)
            .await
    }

    async fn create_booking(
        &self,
        token: &str,
        new_booking: NewBooking,
    ) -> ApiResult<BookingData> {
        self.request(Method::POST, "/bookings", Some(token), Some(&new_booking))
            .await
    }

    async fn update_booking(
        &self,
        token: &str,
        id: &str,
        update: BookingUpdate,
    ) -> ApiResult<BookingData> {
        let path = format!("/bookings/{}", id);

        self.request(Method::PUT, &path, Some(token), Some(&update))
            .await
    }

    async fn cancel_booking(&self, token: &str, id: &str) -> ApiResult<BookingData> {
        let path = format!("/bookings/{}/cancel", id);

        self.request(Method::PUT, &path, Some(token), None::<&()>)
            .await
    }

    async fn create_room(&self, token: &str, new_room: NewRoom) -> ApiResult<RoomData> {
        self.request(Method::POST, "/rooms", Some(token), Some(&new_room))
            .await
    }

    async fn fetch_report(&self, token: &str, kind: ReportKind) -> ApiResult<Vec<u8>> {
        let response = self
            .send(Method::GET, kind.path(), Some(token), None::<&()>)
            .await?;

        // A report endpoint answering with anything but a PDF, like an HTML
        // error page, is a decode failure rather than a report
        if !is_pdf_content_type(response.headers()) {
            return Err(ApiError::Decode(
                "Report endpoint did not return application/pdf".to_string(),
            ));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(bytes.to_vec())
    }
}

fn is_pdf_content_type(headers: &header::HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.starts_with("application/pdf"))
        .unwrap_or(false)
}

async fn handle_unsuccessful_request(response: Response, status: StatusCode) -> ApiError {
    let message = match response.text().await {
        // Prefer the message field of a structured error body
        Ok(text) => serde_json::from_str::<ErrorBody>(&text)
            .map(|body| body.message)
            .unwrap_or(text),
        Err(e) => e.to_string(),
    };

    ApiError::Http {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
mod test {
    use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};

    use super::*;

    fn headers_with_content_type(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_str(value).expect("header value is valid"),
        );

        headers
    }

    #[test]
    fn test_pdf_content_type_is_accepted() {
        let headers = headers_with_content_type("application/pdf");
        assert!(is_pdf_content_type(&headers));

        // Parameters after the media type don't matter
        let headers = headers_with_content_type("application/pdf; charset=binary");
        assert!(is_pdf_content_type(&headers));
    }

    #[test]
    fn test_html_error_page_is_rejected() {
        let headers = headers_with_content_type("text/html; charset=utf-8");
        assert!(!is_pdf_content_type(&headers));
    }

    #[test]
    fn test_missing_content_type_is_rejected() {
        assert!(!is_pdf_content_type(&HeaderMap::new()));
    }
}
