use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Claims carried by a session token.
///
/// Timestamps are Unix seconds, as RFC 7519 requires for `iat` and `exp`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionClaims {
    /// Account the token was issued to
    pub username: String,

    /// Flat role label of the account
    pub role: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl SessionClaims {
    /// Create claims valid for `window` starting at `issued_at`.
    ///
    /// # Arguments
    /// * `username` - Account username
    /// * `role` - Account role label
    /// * `issued_at` - Issuance instant
    /// * `window` - Validity window
    ///
    /// # Returns
    /// Claims with `exp = iat + window`
    pub fn new(
        username: impl Into<String>,
        role: impl Into<String>,
        issued_at: DateTime<Utc>,
        window: Duration,
    ) -> Self {
        Self {
            username: username.into(),
            role: role.into(),
            iat: issued_at.timestamp(),
            exp: (issued_at + window).timestamp(),
        }
    }

    /// Expiration as a UTC instant.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}
