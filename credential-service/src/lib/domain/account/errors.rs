use thiserror::Error;

/// Error for malformed inbound credentials
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Username must not be empty")]
    EmptyUsername,

    #[error("Password must not be empty")]
    EmptyPassword,
}

/// Error reported by a credential store
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Username already exists: {0}")]
    DuplicateUsername(String),

    #[error("Credential store unavailable: {0}")]
    Unavailable(String),

    #[error("Stored account is corrupt: {0}")]
    CorruptRecord(String),
}

/// Outcome of a failed registration, as seen by inbound adapters
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("Invalid registration: {0}")]
    Validation(#[from] ValidationError),

    #[error("Username already exists: {0}")]
    Conflict(String),

    /// Detail is logged where the failure happens, never carried here
    #[error("Registration failed due to an internal error")]
    System,
}

/// Outcome of a failed login, as seen by inbound adapters.
///
/// `Denied` is returned identically for unknown usernames and wrong passwords.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    Denied,

    #[error("Authentication failed due to an internal error")]
    System,
}
