use async_trait::async_trait;
use auth::SessionToken;

use crate::account::errors::AuthenticationError;
use crate::account::errors::RegistrationError;
use crate::account::errors::StoreError;
use crate::account::models::Account;
use crate::account::models::Credentials;
use crate::account::models::Username;

/// Port for account use cases exposed to inbound adapters.
#[async_trait]
pub trait AccountServicePort: Send + Sync + 'static {
    /// Register a new account with the default role.
    ///
    /// # Arguments
    /// * `credentials` - Raw username and plaintext password
    ///
    /// # Returns
    /// Created account
    ///
    /// # Errors
    /// * `Validation` - Username or password is empty
    /// * `Conflict` - Username is already taken
    /// * `System` - Hashing or store failure
    async fn register(&self, credentials: Credentials) -> Result<Account, RegistrationError>;

    /// Check credentials and issue a signed session token.
    ///
    /// # Arguments
    /// * `credentials` - Raw username and plaintext password
    ///
    /// # Returns
    /// Signed session token
    ///
    /// # Errors
    /// * `Denied` - Unknown username or wrong password, indistinguishably
    /// * `System` - Store, hashing or signing failure
    async fn authenticate(
        &self,
        credentials: Credentials,
    ) -> Result<SessionToken, AuthenticationError>;
}

/// Durable mapping from username to stored account.
///
/// Implementations must enforce username uniqueness atomically in
/// `save_account`, whatever `is_username_available` reported earlier.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Persist a new account in a single atomic write.
    ///
    /// # Arguments
    /// * `account` - Account to create
    ///
    /// # Returns
    /// Created account
    ///
    /// # Errors
    /// * `DuplicateUsername` - Username is already taken
    /// * `Unavailable` - Store operation failed
    async fn save_account(&self, account: Account) -> Result<Account, StoreError>;

    /// Retrieve account by username.
    ///
    /// # Arguments
    /// * `username` - Exact username to look up
    ///
    /// # Returns
    /// Optional account (None if not found)
    ///
    /// # Errors
    /// * `Unavailable` - Store operation failed
    /// * `CorruptRecord` - Stored row cannot be turned back into an account
    async fn find_account(&self, username: &Username) -> Result<Option<Account>, StoreError>;

    /// Check whether a username is still free.
    ///
    /// Advisory only: the answer may be stale by the time `save_account` runs.
    ///
    /// # Errors
    /// * `Unavailable` - Store operation failed
    async fn is_username_available(&self, username: &Username) -> Result<bool, StoreError>;
}
