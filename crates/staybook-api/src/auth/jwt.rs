//! JWT token issuance and validation
//!
//! Issues HMAC-SHA256 signed access and refresh tokens. Both carry the user
//! id (`sub`), the admin flag (`isAdmin`), issue/expiry timestamps and a
//! `type` claim that keeps the two kinds from being used interchangeably.

use std::fmt;

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use staybook_core::{AuthConfig, User};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

/// Kind of token, carried in the `type` claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JWT claims shared by access and refresh tokens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - user ID
    pub sub: Uuid,
    #[serde(rename = "isAdmin")]
    pub is_admin: bool,
    /// Issued at (Unix seconds)
    pub iat: i64,
    /// Expiration (Unix seconds)
    pub exp: i64,
    #[serde(rename = "type")]
    pub token_type: TokenType,
}

/// JWT token generation and validation errors
#[derive(Debug, Error)]
pub enum JwtError {
    #[error("token signing secret is not configured")]
    MissingSecret,

    #[error("Failed to encode JWT: {0}")]
    EncodingError(#[from] jsonwebtoken::errors::Error),

    #[error("Invalid token format")]
    InvalidToken,

    #[error("Token has expired")]
    ExpiredToken,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("invalid token type: {expected} token required")]
    WrongTokenType { expected: TokenType },

    #[error("malformed token claim: {0}")]
    MalformedClaims(&'static str),
}

/// Access/refresh token pair returned on login and refresh
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Signs and verifies tokens with the configured secret
#[derive(Clone)]
pub struct TokenIssuer {
    secret: Option<String>,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
}

impl fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .field("access_ttl_secs", &self.access_ttl_secs)
            .field("refresh_ttl_secs", &self.refresh_ttl_secs)
            .finish()
    }
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            secret: config.jwt_secret.clone().filter(|s| !s.is_empty()),
            access_ttl_secs: config.access_ttl_secs,
            refresh_ttl_secs: config.refresh_ttl_secs,
        }
    }

    /// Whether a signing secret is available
    pub fn is_configured(&self) -> bool {
        self.secret.is_some()
    }

    fn secret(&self) -> Result<&[u8], JwtError> {
        self.secret
            .as_deref()
            .map(str::as_bytes)
            .ok_or(JwtError::MissingSecret)
    }

    /// Issue a fresh access/refresh pair for `user`
    pub fn issue(&self, user: &User) -> Result<TokenPair, JwtError> {
        Ok(TokenPair {
            access_token: self.sign(user.id, user.is_admin, TokenType::Access)?,
            refresh_token: self.sign(user.id, user.is_admin, TokenType::Refresh)?,
        })
    }

    fn sign(&self, user_id: Uuid, is_admin: bool, token_type: TokenType) -> Result<String, JwtError> {
        let secret = self.secret()?;
        let now = Utc::now().timestamp();
        let ttl = match token_type {
            TokenType::Access => self.access_ttl_secs,
            TokenType::Refresh => self.refresh_ttl_secs,
        };

        let claims = Claims {
            sub: user_id,
            is_admin,
            iat: now,
            exp: now + ttl,
            token_type,
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret),
        )?;
        Ok(token)
    }

    /// Validate an access token
    pub fn validate_access(&self, token: &str) -> Result<Claims, JwtError> {
        self.validate(token, TokenType::Access)
    }

    /// Validate a refresh token
    pub fn validate_refresh(&self, token: &str) -> Result<Claims, JwtError> {
        self.validate(token, TokenType::Refresh)
    }

    fn validate(&self, token: &str, expected: TokenType) -> Result<Claims, JwtError> {
        let secret = self.secret()?;
        let validation = Validation::new(Algorithm::HS256);

        // Decode loosely so that claim problems can be told apart from bad tokens
        let token_data = decode::<Map<String, Value>>(
            token,
            &DecodingKey::from_secret(secret),
            &validation,
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
            jsonwebtoken::errors::ErrorKind::InvalidSignature => JwtError::InvalidSignature,
            _ => JwtError::InvalidToken,
        })?;
        let claims = token_data.claims;

        let token_type = claims
            .get("type")
            .and_then(Value::as_str)
            .ok_or(JwtError::MalformedClaims("type"))?;
        if token_type != expected.as_str() {
            return Err(JwtError::WrongTokenType { expected });
        }

        let sub = claims
            .get("sub")
            .and_then(Value::as_str)
            .and_then(|s| Uuid::parse_str(s).ok())
            .ok_or(JwtError::MalformedClaims("sub"))?;
        let is_admin = claims
            .get("isAdmin")
            .and_then(Value::as_bool)
            .ok_or(JwtError::MalformedClaims("isAdmin"))?;
        let exp = claims
            .get("exp")
            .and_then(Value::as_i64)
            .ok_or(JwtError::MalformedClaims("exp"))?;
        let iat = claims.get("iat").and_then(Value::as_i64).unwrap_or_default();

        Ok(Claims {
            sub,
            is_admin,
            iat,
            exp,
            token_type: expected,
        })
    }
}
