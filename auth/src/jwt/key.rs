use std::fmt;

use super::errors::JwtError;

/// Symmetric HMAC secret used to sign and verify session tokens.
///
/// Built once from configuration and handed to the issuer at construction.
#[derive(Clone)]
pub struct SigningKey(Vec<u8>);

impl SigningKey {
    /// Build a signing key from raw secret material.
    ///
    /// # Errors
    /// * `InvalidKey` - Secret is empty
    pub fn new(secret: impl AsRef<[u8]>) -> Result<Self, JwtError> {
        let secret = secret.as_ref();
        if secret.is_empty() {
            return Err(JwtError::InvalidKey("secret is empty".to_string()));
        }
        Ok(Self(secret.to_vec()))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningKey(<redacted>)")
    }
}
