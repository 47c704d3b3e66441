//! # Account Repository
//!
//! Database operations for accounts: the credential store.
//!
//! ## Key Operations
//! - Insert at registration (duplicate email → typed UniqueViolation)
//! - Exact-match lookup at login and on every authenticated request
//!
//! Accounts are never updated or deleted; the table is append-only.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use sweetshop_core::{Account, Role};

// =============================================================================
// Row Type
// =============================================================================

/// Raw account row as stored in SQLite.
///
/// The role is stored as TEXT and parsed into [`Role`] on the way out; the
/// schema CHECK keeps the column inside the allowed set.
#[derive(Debug, sqlx::FromRow)]
struct AccountRow {
    email: String,
    password_hash: String,
    role: String,
    created_at: DateTime<Utc>,
}

impl AccountRow {
    fn into_account(self) -> DbResult<Account> {
        let role = Role::from_str(&self.role)
            .map_err(|e| DbError::Internal(format!("corrupt role column: {e}")))?;

        Ok(Account {
            email: self.email,
            password_hash: self.password_hash,
            role,
            created_at: self.created_at,
        })
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for account database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = AccountRepository::new(pool);
///
/// repo.insert(&account).await?;
/// let found = repo.get_by_email("alice@example.com").await?;
/// ```
#[derive(Debug, Clone)]
pub struct AccountRepository {
    pool: SqlitePool,
}

impl AccountRepository {
    /// Creates a new AccountRepository.
    pub fn new(pool: SqlitePool) -> Self {
        AccountRepository { pool }
    }

    /// Inserts a new account.
    ///
    /// ## Errors
    /// * `DbError::UniqueViolation` - An account with this email exists
    pub async fn insert(&self, account: &Account) -> DbResult<()> {
        debug!(email = %account.email, role = %account.role, "Inserting account");

        let result = sqlx::query(
            r#"
            INSERT INTO accounts (email, password_hash, role, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(account.role.as_str())
        .bind(account.created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                let db_err = DbError::from(e);
                // Re-shape the UNIQUE violation with the actual value for
                // caller-side logging; the raw message only has the column.
                if matches!(db_err, DbError::UniqueViolation { .. }) {
                    Err(DbError::duplicate("email", &account.email))
                } else {
                    Err(db_err)
                }
            }
        }
    }

    /// Gets an account by its email (exact, case-sensitive match).
    ///
    /// ## Returns
    /// * `Ok(Some(Account))` - Account found
    /// * `Ok(None)` - No account with this email
    pub async fn get_by_email(&self, email: &str) -> DbResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT email, password_hash, role, created_at
            FROM accounts
            WHERE email = ?1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(AccountRow::into_account).transpose()
    }

    /// Counts registered accounts.
    ///
    /// Used by startup seeding to decide whether the bootstrap admin is
    /// needed.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM accounts")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    fn test_account(email: &str, role: Role) -> Account {
        Account {
            email: email.to_string(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHQ$aGFzaGhhc2g".to_string(),
            role,
            created_at: Utc::now(),
        }
    }

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = test_db().await;
        let repo = db.accounts();

        let account = test_account("alice@example.com", Role::User);
        repo.insert(&account).await.unwrap();

        let found = repo.get_by_email("alice@example.com").await.unwrap().unwrap();
        assert_eq!(found.email, "alice@example.com");
        assert_eq!(found.role, Role::User);
        assert_eq!(found.password_hash, account.password_hash);
    }

    #[tokio::test]
    async fn test_lookup_is_case_sensitive() {
        let db = test_db().await;
        let repo = db.accounts();

        repo.insert(&test_account("Alice@example.com", Role::User))
            .await
            .unwrap();

        assert!(repo.get_by_email("alice@example.com").await.unwrap().is_none());
        assert!(repo
            .get_by_email("Alice@example.com")
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let db = test_db().await;
        let repo = db.accounts();

        repo.insert(&test_account("bob@example.com", Role::User))
            .await
            .unwrap();

        let err = repo
            .insert(&test_account("bob@example.com", Role::Admin))
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_count() {
        let db = test_db().await;
        let repo = db.accounts();

        assert_eq!(repo.count().await.unwrap(), 0);

        repo.insert(&test_account("a@example.com", Role::User))
            .await
            .unwrap();
        repo.insert(&test_account("b@example.com", Role::Admin))
            .await
            .unwrap();

        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_missing_account_is_none() {
        let db = test_db().await;
        let found = db.accounts().get_by_email("ghost@example.com").await.unwrap();
        assert!(found.is_none());
    }
}
