use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;

use crate::account::errors::StoreError;
use crate::account::models::Account;
use crate::account::models::Role;
use crate::account::models::Username;
use crate::account::ports::CredentialStore;

pub struct PostgresCredentialStore {
    pool: PgPool,
}

impl PostgresCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct AccountRow {
    username: String,
    password_hash: String,
    role: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<AccountRow> for Account {
    type Error = StoreError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        let username =
            Username::new(row.username).map_err(|e| StoreError::CorruptRecord(e.to_string()))?;

        Ok(Account {
            username,
            password_hash: row.password_hash,
            role: Role::from_label(row.role),
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl CredentialStore for PostgresCredentialStore {
    async fn save_account(&self, account: Account) -> Result<Account, StoreError> {
        sqlx::query(
            r#"
            INSERT INTO accounts (username, password_hash, role, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(account.username.as_str())
        .bind(&account.password_hash)
        .bind(account.role.as_str())
        .bind(account.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return StoreError::DuplicateUsername(account.username.as_str().to_string());
                }
            }
            StoreError::Unavailable(format!("Failed to save account: {}", e))
        })?;

        Ok(account)
    }

    async fn find_account(&self, username: &Username) -> Result<Option<Account>, StoreError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT username, password_hash, role, created_at
            FROM accounts
            WHERE username = $1
            "#,
        )
        .bind(username.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Unavailable(format!("Failed to load account: {}", e)))?;

        row.map(Account::try_from).transpose()
    }

    async fn is_username_available(&self, username: &Username) -> Result<bool, StoreError> {
        let taken: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (SELECT 1 FROM accounts WHERE username = $1)
            "#,
        )
        .bind(username.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StoreError::Unavailable(format!("Failed to check username: {}", e)))?;

        Ok(!taken)
    }
}
