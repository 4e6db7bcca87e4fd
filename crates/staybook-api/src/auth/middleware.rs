//! Access-control middleware
//!
//! `require_login` accepts any valid access token; `require_admin` also
//! requires the admin flag. Both read the token issuer from application state
//! and add an [`AuthenticatedUser`] to the request extensions on success.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::jwt::{Claims, JwtError, TokenIssuer};
use crate::audit::{audit_log, AuditEvent, ClientInfo};
use crate::error::AppError;
use crate::state::AppState;

/// Caller identity taken from a validated access token
///
/// Handlers extract it with `Extension<AuthenticatedUser>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub is_admin: bool,
}

impl From<Claims> for AuthenticatedUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            is_admin: claims.is_admin,
        }
    }
}

/// Authentication middleware errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing Authorization header")]
    MissingAuthHeader,

    #[error("Invalid Authorization header format")]
    InvalidAuthHeader,

    #[error("Invalid token: {0}")]
    InvalidToken(#[from] JwtError),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            // A missing signing secret is a server fault, not a client one
            AuthError::InvalidToken(JwtError::MissingSecret) => {
                AppError::Token(JwtError::MissingSecret)
            }
            other => AppError::Unauthorized(other.to_string()),
        }
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader)?
        .strip_prefix("Bearer ")
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::InvalidAuthHeader)
}

fn authenticate(tokens: &TokenIssuer, request: &Request) -> Result<AuthenticatedUser, AuthError> {
    let result = bearer_token(request.headers())
        .and_then(|token| tokens.validate_access(token).map_err(AuthError::from));

    match result {
        Ok(claims) => Ok(AuthenticatedUser::from(claims)),
        Err(e) => {
            audit_log(&AuditEvent::InvalidToken {
                resource: request.uri().path().to_string(),
                reason: e.to_string(),
                client: ClientInfo::from_headers(request.headers()),
            });
            Err(e)
        }
    }
}

/// Reject requests without a valid access token (401)
pub async fn require_login(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = authenticate(state.auth.tokens(), &request)?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Reject requests without a valid access token (401) or without the admin flag (403)
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = authenticate(state.auth.tokens(), &request)?;

    if !user.is_admin {
        audit_log(&AuditEvent::AccessDenied {
            user_id: user.user_id,
            resource: request.uri().path().to_string(),
            client: ClientInfo::from_headers(request.headers()),
        });
        return Err(AppError::Forbidden("admin access required".to_string()));
    }

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}
