use std::sync::Arc;
use std::sync::OnceLock;

use async_trait::async_trait;
use auth::PasswordError;
use auth::PasswordHasher;
use auth::SessionToken;
use auth::TokenIssuer;
use tokio::task::JoinError;

use crate::account::errors::AuthenticationError;
use crate::account::errors::RegistrationError;
use crate::account::errors::StoreError;
use crate::account::models::Account;
use crate::account::models::Credentials;
use crate::account::models::Password;
use crate::account::models::Username;
use crate::account::ports::AccountServicePort;
use crate::account::ports::CredentialStore;

/// Domain service implementing registration and authentication.
///
/// Store and issuer are injected; neither is mutated after construction.
pub struct AccountService<S>
where
    S: CredentialStore,
{
    store: Arc<S>,
    token_issuer: Arc<TokenIssuer>,
    password_hasher: PasswordHasher,
}

impl<S> AccountService<S>
where
    S: CredentialStore,
{
    /// Create a new account service with injected dependencies.
    ///
    /// # Arguments
    /// * `store` - Credential store implementation
    /// * `token_issuer` - Session token issuer holding the signing key
    ///
    /// # Returns
    /// Configured account service instance
    pub fn new(store: Arc<S>, token_issuer: Arc<TokenIssuer>) -> Self {
        Self {
            store,
            token_issuer,
            password_hasher: PasswordHasher::new(),
        }
    }

    // Argon2 is CPU-bound, so both hashing paths run on the blocking pool.
    async fn hash_password(&self, password: Password) -> Result<String, PasswordError> {
        let hasher = self.password_hasher;
        tokio::task::spawn_blocking(move || hasher.hash(password.expose()))
            .await
            .map_err(|e| PasswordError::HashingFailed(format!("Hashing task failed: {}", e)))?
    }

    // The outer error is a failed blocking task, the inner one an unusable digest.
    async fn verify_password(
        &self,
        password: Password,
        password_hash: String,
    ) -> Result<Result<bool, PasswordError>, JoinError> {
        let hasher = self.password_hasher;
        tokio::task::spawn_blocking(move || hasher.verify(password.expose(), &password_hash))
            .await
    }

    // Unknown usernames pay the same Argon2 cost as a wrong password.
    async fn verify_against_dummy(&self, password: Password) {
        let hasher = self.password_hasher;
        let outcome = tokio::task::spawn_blocking(move || {
            let dummy_hash = DUMMY_PASSWORD_HASH
                .get_or_init(|| hasher.hash(DUMMY_PASSWORD).unwrap_or_default());
            hasher.verify(password.expose(), dummy_hash)
        })
        .await;

        if let Err(e) = outcome {
            tracing::warn!(error = %e, "Dummy password verification task failed");
        }
    }
}

const DUMMY_PASSWORD: &str = "dummy-password-for-unknown-accounts";

static DUMMY_PASSWORD_HASH: OnceLock<String> = OnceLock::new();

/// Collapse a verification result into the login outcome.
///
/// A mismatch and an unusable stored digest are both `Denied`; a failed
/// verification task is a system fault.
fn verification_outcome(
    username: &Username,
    result: Result<Result<bool, PasswordError>, JoinError>,
) -> Result<(), AuthenticationError> {
    match result {
        Ok(Ok(true)) => Ok(()),
        Ok(Ok(false)) => {
            tracing::info!(username = %username, reason = "password_mismatch", "Authentication denied");
            Err(AuthenticationError::Denied)
        }
        Ok(Err(e)) => {
            tracing::error!(username = %username, error = %e, "Stored password hash is unusable");
            Err(AuthenticationError::Denied)
        }
        Err(e) => {
            tracing::error!(username = %username, error = %e, "Password verification task failed");
            Err(AuthenticationError::System)
        }
    }
}

#[async_trait]
impl<S> AccountServicePort for AccountService<S>
where
    S: CredentialStore,
{
    async fn register(&self, credentials: Credentials) -> Result<Account, RegistrationError> {
        let (username, password) = credentials.validate()?;

        match self.store.is_username_available(&username).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::info!(username = %username, "Registration rejected: username taken");
                return Err(RegistrationError::Conflict(username.to_string()));
            }
            Err(e) => {
                tracing::error!(username = %username, error = %e, "Username availability check failed");
                return Err(RegistrationError::System);
            }
        }

        let password_hash = self.hash_password(password).await.map_err(|e| {
            tracing::error!(username = %username, error = %e, "Password hashing failed");
            RegistrationError::System
        })?;

        match self.store.save_account(Account::new(username, password_hash)).await {
            Ok(account) => {
                tracing::info!(username = %account.username, role = %account.role, "Account registered");
                Ok(account)
            }
            Err(StoreError::DuplicateUsername(username)) => {
                tracing::info!(username = %username, "Registration rejected: username taken");
                Err(RegistrationError::Conflict(username))
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to save account");
                Err(RegistrationError::System)
            }
        }
    }

    async fn authenticate(
        &self,
        credentials: Credentials,
    ) -> Result<SessionToken, AuthenticationError> {
        let Ok((username, password)) = credentials.validate() else {
            tracing::info!(reason = "empty_credentials", "Authentication denied");
            return Err(AuthenticationError::Denied);
        };

        let account = match self.store.find_account(&username).await {
            Ok(Some(account)) => account,
            Ok(None) => {
                self.verify_against_dummy(password).await;
                tracing::info!(username = %username, reason = "unknown_username", "Authentication denied");
                return Err(AuthenticationError::Denied);
            }
            Err(e) => {
                tracing::error!(username = %username, error = %e, "Account lookup failed");
                return Err(AuthenticationError::System);
            }
        };

        let verification = self
            .verify_password(password, account.password_hash.clone())
            .await;
        verification_outcome(&username, verification)?;

        let token = self
            .token_issuer
            .issue(account.username.as_str(), account.role.as_str())
            .map_err(|e| {
                tracing::error!(username = %username, error = %e, "Session token issuance failed");
                AuthenticationError::System
            })?;

        tracing::info!(username = %username, expires_at = %token.expires_at, "Account authenticated");
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use auth::SigningKey;
    use chrono::Duration;
    use chrono::Utc;
    use mockall::mock;

    use super::*;
    use crate::account::models::Role;
    use crate::outbound::repositories::InMemoryCredentialStore;

    mock! {
        pub TestCredentialStore {}

        #[async_trait]
        impl CredentialStore for TestCredentialStore {
            async fn save_account(&self, account: Account) -> Result<Account, StoreError>;
            async fn find_account(&self, username: &Username) -> Result<Option<Account>, StoreError>;
            async fn is_username_available(&self, username: &Username) -> Result<bool, StoreError>;
        }
    }

    const SECRET: &str = "test-secret-key-for-jwt-signing-at-least-32-bytes";

    fn token_issuer() -> Arc<TokenIssuer> {
        let key = SigningKey::new(SECRET).unwrap();
        Arc::new(TokenIssuer::new(&key, Duration::hours(24)))
    }

    fn stored_account(username: &str, password: &str) -> Account {
        Account {
            username: Username::new(username.to_string()).unwrap(),
            password_hash: PasswordHasher::new().hash(password).unwrap(),
            role: Role::default(),
            created_at: Utc::now(),
        }
    }

    fn in_memory_service() -> (Arc<InMemoryCredentialStore>, AccountService<InMemoryCredentialStore>) {
        let store = Arc::new(InMemoryCredentialStore::new());
        let service = AccountService::new(Arc::clone(&store), token_issuer());
        (store, service)
    }

    #[tokio::test]
    async fn test_register_success() {
        let mut store = MockTestCredentialStore::new();

        store
            .expect_is_username_available()
            .times(1)
            .returning(|_| Ok(true));
        store
            .expect_save_account()
            .withf(|account| {
                account.username.as_str() == "alice"
                    && account.role.as_str() == "USER"
                    && account.password_hash.starts_with("$argon2")
            })
            .times(1)
            .returning(|account| Ok(account));

        let service = AccountService::new(Arc::new(store), token_issuer());

        let account = service
            .register(Credentials::new("alice", "correcthorse"))
            .await
            .expect("Registration failed");

        assert_eq!(account.username.as_str(), "alice");
        assert_ne!(account.password_hash, "correcthorse");
    }

    #[tokio::test]
    async fn test_register_empty_fields_never_reach_store() {
        let mut store = MockTestCredentialStore::new();
        store.expect_is_username_available().times(0);
        store.expect_save_account().times(0);

        let service = AccountService::new(Arc::new(store), token_issuer());

        let result = service.register(Credentials::new("", "correcthorse")).await;
        assert!(matches!(result, Err(RegistrationError::Validation(_))));

        let result = service.register(Credentials::new("alice", "")).await;
        assert!(matches!(result, Err(RegistrationError::Validation(_))));
    }

    #[tokio::test]
    async fn test_register_taken_username_from_precheck() {
        let mut store = MockTestCredentialStore::new();
        store
            .expect_is_username_available()
            .times(1)
            .returning(|_| Ok(false));
        store.expect_save_account().times(0);

        let service = AccountService::new(Arc::new(store), token_issuer());

        let result = service.register(Credentials::new("alice", "correcthorse")).await;
        assert_eq!(
            result.unwrap_err(),
            RegistrationError::Conflict("alice".to_string())
        );
    }

    #[tokio::test]
    async fn test_register_conflict_detected_on_write() {
        let mut store = MockTestCredentialStore::new();
        store
            .expect_is_username_available()
            .times(1)
            .returning(|_| Ok(true));
        store.expect_save_account().times(1).returning(|account| {
            Err(StoreError::DuplicateUsername(
                account.username.as_str().to_string(),
            ))
        });

        let service = AccountService::new(Arc::new(store), token_issuer());

        let result = service.register(Credentials::new("alice", "correcthorse")).await;
        assert_eq!(
            result.unwrap_err(),
            RegistrationError::Conflict("alice".to_string())
        );
    }

    #[tokio::test]
    async fn test_register_store_failure_is_system_error() {
        let mut store = MockTestCredentialStore::new();
        store
            .expect_is_username_available()
            .times(1)
            .returning(|_| Ok(true));
        store
            .expect_save_account()
            .times(1)
            .returning(|_| Err(StoreError::Unavailable("connection refused".to_string())));

        let service = AccountService::new(Arc::new(store), token_issuer());

        let result = service.register(Credentials::new("alice", "correcthorse")).await;
        assert_eq!(result.unwrap_err(), RegistrationError::System);
    }

    #[tokio::test]
    async fn test_authenticate_success() {
        let mut store = MockTestCredentialStore::new();
        let account = stored_account("alice", "correcthorse");
        store
            .expect_find_account()
            .withf(|username| username.as_str() == "alice")
            .times(1)
            .returning(move |_| Ok(Some(account.clone())));

        let issuer = token_issuer();
        let service = AccountService::new(Arc::new(store), Arc::clone(&issuer));

        let issued_at = Utc::now();
        let token = service
            .authenticate(Credentials::new("alice", "correcthorse"))
            .await
            .expect("Authentication failed");

        let claims = issuer.verify(&token.access_token).unwrap();
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.role, "USER");

        let window = token.expires_at - issued_at;
        assert!((window - Duration::hours(24)).num_seconds().abs() <= 5);
    }

    #[tokio::test]
    async fn test_authenticate_wrong_password_is_denied() {
        let mut store = MockTestCredentialStore::new();
        let account = stored_account("alice", "correcthorse");
        store
            .expect_find_account()
            .times(1)
            .returning(move |_| Ok(Some(account.clone())));

        let service = AccountService::new(Arc::new(store), token_issuer());

        let result = service.authenticate(Credentials::new("alice", "wrong")).await;
        assert_eq!(result.unwrap_err(), AuthenticationError::Denied);
    }

    #[tokio::test]
    async fn test_authenticate_unknown_username_matches_wrong_password() {
        let mut store = MockTestCredentialStore::new();
        let account = stored_account("alice", "correcthorse");
        store
            .expect_find_account()
            .returning(move |username| {
                Ok((username.as_str() == "alice").then(|| account.clone()))
            });

        let service = AccountService::new(Arc::new(store), token_issuer());

        let unknown = service
            .authenticate(Credentials::new("bob", "anything"))
            .await
            .unwrap_err();
        let mismatch = service
            .authenticate(Credentials::new("alice", "wrong"))
            .await
            .unwrap_err();

        assert_eq!(unknown, mismatch);
        assert_eq!(unknown.to_string(), mismatch.to_string());
    }

    #[tokio::test]
    async fn test_authenticate_store_failure_is_system_error() {
        let mut store = MockTestCredentialStore::new();
        store
            .expect_find_account()
            .times(1)
            .returning(|_| Err(StoreError::Unavailable("timeout".to_string())));

        let service = AccountService::new(Arc::new(store), token_issuer());

        let result = service
            .authenticate(Credentials::new("alice", "correcthorse"))
            .await;
        assert_eq!(result.unwrap_err(), AuthenticationError::System);
    }

    #[tokio::test]
    async fn test_authenticate_corrupt_hash_is_denied() {
        let mut store = MockTestCredentialStore::new();
        store.expect_find_account().times(1).returning(|username| {
            Ok(Some(Account {
                username: username.clone(),
                password_hash: "not-a-phc-string".to_string(),
                role: Role::default(),
                created_at: Utc::now(),
            }))
        });

        let service = AccountService::new(Arc::new(store), token_issuer());

        let result = service
            .authenticate(Credentials::new("alice", "correcthorse"))
            .await;
        assert_eq!(result.unwrap_err(), AuthenticationError::Denied);
    }

    #[tokio::test]
    async fn test_unknown_username_still_runs_a_verification() {
        let mut store = MockTestCredentialStore::new();
        store.expect_find_account().times(1).returning(|_| Ok(None));

        let service = AccountService::new(Arc::new(store), token_issuer());

        let result = service
            .authenticate(Credentials::new("bob", "anything"))
            .await;
        assert_eq!(result.unwrap_err(), AuthenticationError::Denied);

        let dummy_hash = DUMMY_PASSWORD_HASH
            .get()
            .expect("Dummy hash was never computed");
        assert!(dummy_hash.starts_with("$argon2id$"));
        assert!(PasswordHasher::new().verify(DUMMY_PASSWORD, dummy_hash).unwrap());
    }

    #[tokio::test]
    async fn test_failed_verification_task_is_system_error() {
        let join_error = tokio::spawn(async { panic!("verification task crashed") })
            .await
            .unwrap_err();
        let username = Username::new("alice".to_string()).unwrap();

        assert_eq!(
            verification_outcome(&username, Err(join_error)),
            Err(AuthenticationError::System)
        );
    }

    #[test]
    fn test_verification_outcome_collapses_digest_failures() {
        let username = Username::new("alice".to_string()).unwrap();

        assert_eq!(verification_outcome(&username, Ok(Ok(true))), Ok(()));
        assert_eq!(
            verification_outcome(&username, Ok(Ok(false))),
            Err(AuthenticationError::Denied)
        );
        assert_eq!(
            verification_outcome(
                &username,
                Ok(Err(PasswordError::VerificationFailed(
                    "Invalid password hash".to_string()
                )))
            ),
            Err(AuthenticationError::Denied)
        );
    }

    #[tokio::test]
    async fn test_authenticate_empty_credentials_are_denied() {
        let mut store = MockTestCredentialStore::new();
        store.expect_find_account().times(0);

        let service = AccountService::new(Arc::new(store), token_issuer());

        let result = service.authenticate(Credentials::new("", "")).await;
        assert_eq!(result.unwrap_err(), AuthenticationError::Denied);
    }

    #[tokio::test]
    async fn test_register_then_authenticate_scenario() {
        let (_store, service) = in_memory_service();

        service
            .register(Credentials::new("alice", "correcthorse"))
            .await
            .expect("Registration failed");

        let token = service
            .authenticate(Credentials::new("alice", "correcthorse"))
            .await
            .expect("Authentication failed");
        let claims = token_issuer().verify(&token.access_token).unwrap();
        assert_eq!(claims.username, "alice");

        let wrong = service
            .authenticate(Credentials::new("alice", "wrong"))
            .await
            .unwrap_err();
        let unknown = service
            .authenticate(Credentials::new("bob", "anything"))
            .await
            .unwrap_err();

        assert_eq!(wrong, AuthenticationError::Denied);
        assert_eq!(unknown, wrong);
    }

    #[tokio::test]
    async fn test_duplicate_registration_keeps_first_hash() {
        let (store, service) = in_memory_service();

        service
            .register(Credentials::new("alice", "first-password"))
            .await
            .unwrap();

        let username = Username::new("alice".to_string()).unwrap();
        let original_hash = store
            .find_account(&username)
            .await
            .unwrap()
            .unwrap()
            .password_hash;

        let result = service
            .register(Credentials::new("alice", "second-password"))
            .await;
        assert_eq!(
            result.unwrap_err(),
            RegistrationError::Conflict("alice".to_string())
        );

        let stored_hash = store
            .find_account(&username)
            .await
            .unwrap()
            .unwrap()
            .password_hash;
        assert_eq!(stored_hash, original_hash);

        assert!(service
            .authenticate(Credentials::new("alice", "first-password"))
            .await
            .is_ok());
        assert_eq!(
            service
                .authenticate(Credentials::new("alice", "second-password"))
                .await
                .unwrap_err(),
            AuthenticationError::Denied
        );
    }

    #[tokio::test]
    async fn test_concurrent_registrations_admit_one_account() {
        let (_store, service) = in_memory_service();
        let service = Arc::new(service);

        let attempts: Vec<_> = (0..4)
            .map(|i| {
                let service = Arc::clone(&service);
                tokio::spawn(async move {
                    service
                        .register(Credentials::new("alice", format!("password-{}", i)))
                        .await
                })
            })
            .collect();

        let mut created = 0;
        let mut conflicts = 0;
        for attempt in attempts {
            match attempt.await.unwrap() {
                Ok(_) => created += 1,
                Err(RegistrationError::Conflict(_)) => conflicts += 1,
                Err(e) => panic!("unexpected error: {}", e),
            }
        }

        assert_eq!(created, 1);
        assert_eq!(conflicts, 3);
    }
}
