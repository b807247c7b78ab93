use std::fmt;

use chrono::DateTime;
use chrono::Utc;

use crate::account::errors::ValidationError;

/// Registered account.
///
/// Created once at registration and never mutated afterwards.
#[derive(Clone, PartialEq, Eq)]
pub struct Account {
    pub username: Username,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Build a freshly registered account with the default role.
    pub fn new(username: Username, password_hash: String) -> Self {
        Self {
            username,
            password_hash,
            role: Role::default(),
            created_at: Utc::now(),
        }
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .field("role", &self.role)
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Username value type
///
/// Any non-empty string. Compared exactly, no case folding or trimming.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    /// Create a new valid username.
    ///
    /// # Errors
    /// * `EmptyUsername` - Username is the empty string
    pub fn new(username: String) -> Result<Self, ValidationError> {
        if username.is_empty() {
            return Err(ValidationError::EmptyUsername);
        }
        Ok(Self(username))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Plaintext password as received from the caller.
///
/// Only ever handed to the hasher; `Debug` never prints it.
#[derive(Clone)]
pub struct Password(String);

impl Password {
    /// # Errors
    /// * `EmptyPassword` - Password is the empty string
    pub fn new(password: String) -> Result<Self, ValidationError> {
        if password.is_empty() {
            return Err(ValidationError::EmptyPassword);
        }
        Ok(Self(password))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// Flat role label carried in session tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role(String);

impl Role {
    pub const DEFAULT: &'static str = "USER";

    /// Rebuild a role from its stored label.
    pub fn from_label(label: String) -> Self {
        Self(label)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Role {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Raw username and password pair from an inbound adapter.
///
/// Validation happens inside the flows, not at construction.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Validate both fields.
    ///
    /// # Errors
    /// * `EmptyUsername` - Username is empty
    /// * `EmptyPassword` - Password is empty
    pub fn validate(self) -> Result<(Username, Password), ValidationError> {
        let username = Username::new(self.username)?;
        let password = Password::new(self.password)?;
        Ok((username, password))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
