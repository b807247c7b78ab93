use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::jwt::SessionClaims;
use crate::jwt::SigningKey;

/// Validity window used when none is configured.
pub const DEFAULT_SESSION_WINDOW_HOURS: i64 = 24;

/// Signed bearer token handed to a client after a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken {
    /// Encoded JWT
    pub access_token: String,

    pub expires_at: DateTime<Utc>,
}

/// Builds and signs session tokens.
///
/// Tokens are stateless: nothing is recorded server side, a token is valid
/// until its `exp` claim passes.
pub struct TokenIssuer {
    jwt_handler: JwtHandler,
    window: Duration,
}

impl TokenIssuer {
    /// Create a new token issuer.
    ///
    /// # Arguments
    /// * `key` - Process-wide signing key
    /// * `window` - Validity window applied to every issued token
    ///
    /// # Returns
    /// Configured TokenIssuer instance
    pub fn new(key: &SigningKey, window: Duration) -> Self {
        Self {
            jwt_handler: JwtHandler::new(key),
            window,
        }
    }

    /// Issue a token for an account, starting its validity window now.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token signing failed
    pub fn issue(&self, username: &str, role: &str) -> Result<SessionToken, JwtError> {
        self.issue_at(username, role, Utc::now())
    }

    /// Issue a token whose validity window starts at `issued_at`.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token signing failed
    pub fn issue_at(
        &self,
        username: &str,
        role: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<SessionToken, JwtError> {
        let claims = SessionClaims::new(username, role, issued_at, self.window);
        let access_token = self.jwt_handler.encode(&claims)?;

        Ok(SessionToken {
            access_token,
            expires_at: claims.expires_at(),
        })
    }

    /// Verify a presented token and return its claims.
    ///
    /// # Errors
    /// * `TokenExpired` - Token `exp` has passed
    /// * `InvalidToken` - Signature does not match this issuer's key
    /// * `DecodingFailed` - Token is malformed
    pub fn verify(&self, token: &str) -> Result<SessionClaims, JwtError> {
        self.jwt_handler.decode(token)
    }
}
