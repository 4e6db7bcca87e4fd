//! Authentication service layer
//!
//! Registration, login, token refresh and admin user management on top of a
//! user repository, the credential hasher and the token issuer.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use staybook_core::{StaybookError, User, UserRepository};
use tracing::{debug, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::jwt::{TokenIssuer, TokenPair};
use super::password::CredentialHasher;
use crate::error::AppError;

/// User registration request
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 50, message = "must be between 3 and 50 characters"))]
    pub username: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "must be at least 8 characters"))]
    pub password: String,
}

/// User login request
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub password: String,
}

/// Token refresh request
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct RefreshRequest {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub refresh_token: String,
}

/// Admin-only user creation request
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(length(min = 3, max = 50, message = "must be between 3 and 50 characters"))]
    pub username: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "must be at least 8 characters"))]
    pub password: String,
    #[serde(default)]
    pub is_admin: bool,
}

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    tokens: TokenIssuer,
    hasher: CredentialHasher,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, tokens: TokenIssuer) -> Self {
        Self {
            users,
            tokens,
            hasher: CredentialHasher::default(),
        }
    }

    /// Replace the credential hasher (e.g. cheaper parameters in tests)
    pub fn with_hasher(mut self, hasher: CredentialHasher) -> Self {
        self.hasher = hasher;
        self
    }

    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    // CPU-bound; runs on the blocking pool
    async fn hash_password(&self, password: String) -> Result<String, AppError> {
        let hasher = self.hasher.clone();
        let hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AppError::Internal(format!("Password hashing task failed: {e}")))??;
        Ok(hash)
    }

    async fn verify_password(&self, candidate: String, hash: String) -> Result<bool, AppError> {
        let hasher = self.hasher.clone();
        let matches = tokio::task::spawn_blocking(move || hasher.verify(&candidate, &hash))
            .await
            .map_err(|e| AppError::Internal(format!("Password verification task failed: {e}")))??;
        Ok(matches)
    }

    async fn insert_user(
        &self,
        username: String,
        email: String,
        password: String,
        is_admin: bool,
    ) -> Result<User, AppError> {
        let password_hash = self.hash_password(password).await?;
        let user = User::new(username, email, password_hash, is_admin);
        self.users.create_user(&user).await?;

        debug!(user_id = %user.id, is_admin, "User stored");
        Ok(user)
    }

    /// Register a regular (non-admin) user
    pub async fn register(&self, request: RegisterRequest) -> Result<User, AppError> {
        request.validate()?;
        self.insert_user(request.username, request.email, request.password, false)
            .await
    }

    /// Create a user on behalf of an admin; may grant the admin flag
    pub async fn create_user(&self, request: CreateUserRequest) -> Result<User, AppError> {
        request.validate()?;
        self.insert_user(
            request.username,
            request.email,
            request.password,
            request.is_admin,
        )
        .await
    }

    /// Authenticate by email and password and issue a token pair
    pub async fn login(&self, request: LoginRequest) -> Result<(User, TokenPair), AppError> {
        request.validate()?;

        let user = self
            .users
            .get_user_by_email(&request.email)
            .await?
            .ok_or_else(|| StaybookError::not_found("user", &request.email))?;

        if !self
            .verify_password(request.password, user.password_hash.clone())
            .await?
        {
            return Err(AppError::InvalidCredentials);
        }

        let tokens = self.tokens.issue(&user)?;
        Ok((user, tokens))
    }

    /// Exchange a refresh token for a new pair.
    ///
    /// The user is reloaded so the new tokens carry the current admin flag.
    pub async fn refresh(&self, refresh_token: &str) -> Result<(User, TokenPair), AppError> {
        let claims = self.tokens.validate_refresh(refresh_token)?;

        let user = match self.users.get_user(claims.sub).await? {
            Some(user) => user,
            None => {
                warn!(user_id = %claims.sub, "Refresh token for unknown user");
                return Err(AppError::Unauthorized("user no longer exists".to_string()));
            }
        };

        let tokens = self.tokens.issue(&user)?;
        Ok((user, tokens))
    }

    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        Ok(self.users.list_users().await?)
    }

    pub async fn get_user(&self, id: Uuid) -> Result<User, AppError> {
        self.users
            .get_user(id)
            .await?
            .ok_or_else(|| StaybookError::not_found("user", id).into())
    }
}
