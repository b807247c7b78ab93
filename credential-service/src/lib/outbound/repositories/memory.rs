use std::collections::hash_map::Entry;
use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::account::errors::StoreError;
use crate::account::models::Account;
use crate::account::models::Username;
use crate::account::ports::CredentialStore;

/// Process-local credential store.
///
/// Uniqueness is enforced by checking and inserting under one write lock.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    accounts: RwLock<HashMap<String, Account>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn account_count(&self) -> usize {
        self.accounts.read().await.len()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn save_account(&self, account: Account) -> Result<Account, StoreError> {
        let mut accounts = self.accounts.write().await;

        match accounts.entry(account.username.as_str().to_string()) {
            Entry::Occupied(entry) => Err(StoreError::DuplicateUsername(entry.key().clone())),
            Entry::Vacant(entry) => Ok(entry.insert(account).clone()),
        }
    }

    async fn find_account(&self, username: &Username) -> Result<Option<Account>, StoreError> {
        Ok(self.accounts.read().await.get(username.as_str()).cloned())
    }

    async fn is_username_available(&self, username: &Username) -> Result<bool, StoreError> {
        Ok(!self.accounts.read().await.contains_key(username.as_str()))
    }
}
