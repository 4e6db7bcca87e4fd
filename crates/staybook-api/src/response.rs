//! Response envelopes
//!
//! Every response body, success or failure, is wrapped in an envelope that
//! repeats the status code, the request path and an RFC 3339 timestamp.

use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use staybook_core::{Booking, Hotel, User};
use utoipa::ToSchema;

use crate::auth::jwt::TokenPair;

tokio::task_local! {
    static REQUEST_PATH: String;
}

/// Make the request path available to envelopes built while handling it
pub async fn track_request_path(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_owned();
    REQUEST_PATH.scope(path, next.run(request)).await
}

/// Path of the request being handled, empty outside of a request scope
pub fn current_path() -> String {
    REQUEST_PATH.try_with(Clone::clone).unwrap_or_default()
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Success envelope
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[aliases(
    UserResponse = ApiResponse<User>,
    UserListResponse = ApiResponse<Vec<User>>,
    HotelResponse = ApiResponse<Hotel>,
    HotelListResponse = ApiResponse<Vec<Hotel>>,
    BookingResponse = ApiResponse<Booking>,
    BookingListResponse = ApiResponse<Vec<Booking>>,
    TokenResponse = ApiResponse<TokenPair>
)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub status: u16,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub path: String,
    pub timestamp: String,
}

impl<T: Serialize> ApiResponse<T> {
    fn with_status(status: StatusCode, message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            status: status.as_u16(),
            path: current_path(),
            timestamp: timestamp(),
        }
    }

    /// 200 OK
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self::with_status(StatusCode::OK, message, data)
    }

    /// 201 Created
    pub fn created(message: impl Into<String>, data: T) -> Self {
        Self::with_status(StatusCode::CREATED, message, data)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::OK);
        (status, Json(self)).into_response()
    }
}

/// Failure envelope
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    /// Machine-readable error code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub path: String,
    pub status: u16,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(status: StatusCode, message: impl Into<String>, error: Option<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            error,
            path: current_path(),
            status: status.as_u16(),
            timestamp: timestamp(),
        }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}
