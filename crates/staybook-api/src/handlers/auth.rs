//! Authentication API handlers
//!
//! Author: hephaex@gmail.com

use std::sync::Arc;

use axum::{extract::State, http::HeaderMap};
use staybook_core::User;
use validator::Validate;

use crate::audit::{audit_log, AuditEvent, ClientInfo};
use crate::auth::{LoginRequest, RefreshRequest, RegisterRequest, TokenPair};
use crate::error::{AppError, AppJson};
use crate::response::{ApiResponse, ErrorResponse, TokenResponse, UserResponse};
use crate::state::AppState;

/// Register a new user account
///
/// New accounts are never admins. Username and email must be unique.
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Registration successful", body = UserResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 409, description = "Username or email already taken", body = ErrorResponse),
    )
)]
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    AppJson(request): AppJson<RegisterRequest>,
) -> Result<ApiResponse<User>, AppError> {
    let email = request.email.clone();
    let client = ClientInfo::from_headers(&headers);

    match state.auth.register(request).await {
        Ok(user) => {
            audit_log(&AuditEvent::RegistrationSuccess {
                user_id: user.id,
                email: user.email.clone(),
                is_admin: user.is_admin,
                client,
            });
            Ok(ApiResponse::ok("Registration successful", user))
        }
        Err(e) => {
            audit_log(&AuditEvent::RegistrationFailure {
                email,
                reason: e.to_string(),
                client,
            });
            Err(e)
        }
    }
}

/// Log in with email and password
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Invalid password", body = ErrorResponse),
        (status = 404, description = "No account with this email", body = ErrorResponse),
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    AppJson(request): AppJson<LoginRequest>,
) -> Result<ApiResponse<TokenPair>, AppError> {
    let email = request.email.clone();
    let client = ClientInfo::from_headers(&headers);

    match state.auth.login(request).await {
        Ok((user, tokens)) => {
            audit_log(&AuditEvent::LoginSuccess {
                user_id: user.id,
                email: user.email,
                client,
            });
            Ok(ApiResponse::ok("Login successful", tokens))
        }
        Err(e) => {
            audit_log(&AuditEvent::LoginFailure {
                email,
                reason: e.to_string(),
                client,
            });
            Err(e)
        }
    }
}

/// Exchange a refresh token for a new token pair
#[utoipa::path(
    post,
    path = "/auth/refresh",
    tag = "auth",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "Tokens refreshed", body = TokenResponse),
        (status = 401, description = "Invalid, expired or wrong-type token", body = ErrorResponse),
    )
)]
pub async fn refresh_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    AppJson(request): AppJson<RefreshRequest>,
) -> Result<ApiResponse<TokenPair>, AppError> {
    request.validate()?;

    let (user, tokens) = state.auth.refresh(&request.refresh_token).await?;
    audit_log(&AuditEvent::TokenRefresh {
        user_id: user.id,
        client: ClientInfo::from_headers(&headers),
    });

    Ok(ApiResponse::ok("Token refreshed successfully", tokens))
}
