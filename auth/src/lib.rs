//! Authentication utilities library
//!
//! Provides the credential primitives used by the credential service:
//! - Password hashing (Argon2id)
//! - Session token issuance and verification (HS256 JWT)
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Session Tokens
//! ```
//! use auth::{SigningKey, TokenIssuer};
//! use chrono::Duration;
//!
//! let key = SigningKey::new("secret_key_at_least_32_bytes_long!").unwrap();
//! let issuer = TokenIssuer::new(&key, Duration::hours(24));
//!
//! let token = issuer.issue("alice", "USER").unwrap();
//! let claims = issuer.verify(&token.access_token).unwrap();
//! assert_eq!(claims.username, "alice");
//! ```

pub mod issuer;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use issuer::SessionToken;
pub use issuer::TokenIssuer;
pub use issuer::DEFAULT_SESSION_WINDOW_HOURS;
pub use jwt::JwtError;
pub use jwt::SessionClaims;
pub use jwt::SigningKey;
pub use password::PasswordError;
pub use password::PasswordHasher;
