//! API error handling
//!
//! One table maps every error kind to its HTTP status and error code.
//!
//! Author: hephaex@gmail.com

use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, FromRequest, FromRequestParts},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use staybook_core::StaybookError;
use thiserror::Error;

use crate::auth::jwt::JwtError;
use crate::auth::password::PasswordError;
use crate::response::ErrorResponse;

/// Error categories exposed to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    InvalidDateRange,
    InvalidCredentials,
    Unauthorized,
    Forbidden,
    NotFound,
    RoomNotFound,
    DuplicateEntry,
    RoomUnavailable,
    Configuration,
    Database,
    Internal,
}

impl ErrorKind {
    pub fn status_code(self) -> StatusCode {
        match self {
            ErrorKind::Validation | ErrorKind::InvalidDateRange => StatusCode::BAD_REQUEST,
            ErrorKind::InvalidCredentials | ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::Forbidden => StatusCode::FORBIDDEN,
            ErrorKind::NotFound | ErrorKind::RoomNotFound => StatusCode::NOT_FOUND,
            ErrorKind::DuplicateEntry | ErrorKind::RoomUnavailable => StatusCode::CONFLICT,
            ErrorKind::Configuration | ErrorKind::Database | ErrorKind::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::Validation => "VALIDATION_ERROR",
            ErrorKind::InvalidDateRange => "INVALID_DATE_RANGE",
            ErrorKind::InvalidCredentials => "INVALID_CREDENTIALS",
            ErrorKind::Unauthorized => "UNAUTHORIZED",
            ErrorKind::Forbidden => "FORBIDDEN",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::RoomNotFound => "ROOM_NOT_FOUND",
            ErrorKind::DuplicateEntry => "DUPLICATE_ENTRY",
            ErrorKind::RoomUnavailable => "ROOM_UNAVAILABLE",
            ErrorKind::Configuration => "CONFIGURATION_ERROR",
            ErrorKind::Database => "DATABASE_ERROR",
            ErrorKind::Internal => "INTERNAL_ERROR",
        }
    }
}

/// Application error type
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] StaybookError),

    #[error(transparent)]
    Token(#[from] JwtError),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error("{0}")]
    Validation(String),

    #[error("invalid password")]
    InvalidCredentials,

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Core(err) => match err {
                StaybookError::NotFound { .. } => ErrorKind::NotFound,
                StaybookError::RoomNotFound => ErrorKind::RoomNotFound,
                StaybookError::RoomUnavailable => ErrorKind::RoomUnavailable,
                StaybookError::InvalidDateRange => ErrorKind::InvalidDateRange,
                StaybookError::DuplicateEntry(_) => ErrorKind::DuplicateEntry,
                StaybookError::ValidationError(_) => ErrorKind::Validation,
                StaybookError::DatabaseError(_) => ErrorKind::Database,
                StaybookError::Config(_) => ErrorKind::Configuration,
                StaybookError::Other(_) => ErrorKind::Internal,
            },
            AppError::Token(err) => match err {
                JwtError::MissingSecret => ErrorKind::Configuration,
                JwtError::EncodingError(_) => ErrorKind::Internal,
                _ => ErrorKind::Unauthorized,
            },
            AppError::Password(_) => ErrorKind::Internal,
            AppError::Validation(_) => ErrorKind::Validation,
            AppError::InvalidCredentials => ErrorKind::InvalidCredentials,
            AppError::Unauthorized(_) => ErrorKind::Unauthorized,
            AppError::Forbidden(_) => ErrorKind::Forbidden,
            AppError::Internal(_) => ErrorKind::Internal,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        self.kind().status_code()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        let status = kind.status_code();

        // Server-side failures are logged in full but reported generically
        let message = if status.is_server_error() {
            tracing::error!(error = %self, code = kind.code(), "Request failed");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        ErrorResponse::new(status, message, Some(kind.code().to_string())).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, field_errors)| {
                field_errors.iter().map(move |e| match &e.message {
                    Some(message) => format!("{field}: {message}"),
                    None => format!("{field}: invalid value"),
                })
            })
            .collect();
        messages.sort();
        AppError::Validation(messages.join("; "))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

/// JSON body extractor whose rejections use the error envelope
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

impl<T: Serialize> IntoResponse for AppJson<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

/// Path extractor whose rejections use the error envelope
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);
