//! User management handlers

use std::sync::Arc;

use axum::extract::State;
use staybook_core::User;
use uuid::Uuid;

use crate::auth::CreateUserRequest;
use crate::error::{AppError, AppJson, AppPath};
use crate::response::{ApiResponse, ErrorResponse, UserListResponse, UserResponse};
use crate::state::AppState;

/// Create a user, optionally with the admin flag (admin only)
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    request_body = CreateUserRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse),
        (status = 403, description = "Not an admin", body = ErrorResponse),
        (status = 409, description = "Username or email already taken", body = ErrorResponse),
    )
)]
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    AppJson(request): AppJson<CreateUserRequest>,
) -> Result<ApiResponse<User>, AppError> {
    let user = state.auth.create_user(request).await?;
    Ok(ApiResponse::created("User created successfully", user))
}

#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    responses((status = 200, description = "Users fetched", body = UserListResponse))
)]
pub async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<ApiResponse<Vec<User>>, AppError> {
    let users = state.auth.list_users().await?;
    Ok(ApiResponse::ok("Users fetched successfully", users))
}

#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User fetched", body = UserResponse),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
    )
)]
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<Uuid>,
) -> Result<ApiResponse<User>, AppError> {
    let user = state.auth.get_user(id).await?;
    Ok(ApiResponse::ok("User fetched successfully", user))
}
