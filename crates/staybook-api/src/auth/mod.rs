//! Authentication and authorization module
//!
//! - Token issuance and validation (access + refresh)
//! - Password hashing with Argon2id
//! - Login/admin gate middleware
//! - Authentication service for registration, login and user management

pub mod jwt;
pub mod middleware;
pub mod password;
pub mod service;

pub use jwt::{Claims, JwtError, TokenIssuer, TokenPair, TokenType};
pub use middleware::{require_admin, require_login, AuthError, AuthenticatedUser};
pub use password::{hash_password, verify_password, CredentialHasher, PasswordError};
pub use service::{AuthService, CreateUserRequest, LoginRequest, RefreshRequest, RegisterRequest};
