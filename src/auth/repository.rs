// Credential store: account and role persistence

use async_trait::async_trait;
use sqlx::PgPool;

use crate::auth::{
    error::AuthError,
    models::{Account, AccountRow, NewAccount, Role, RoleRow, RoleType},
};

/// Lookup and insert operations the authentication flows need
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Check whether an account with this login exists (soft-deleted included)
    async fn login_exists(&self, login: &str) -> Result<bool, AuthError>;

    /// Check whether an account with this email exists (soft-deleted included)
    async fn email_exists(&self, email: &str) -> Result<bool, AuthError>;

    /// Find an account by exact login, with its roles
    async fn find_by_login(&self, login: &str) -> Result<Option<Account>, AuthError>;

    /// Find the persisted role row for a role type
    async fn find_role(&self, role: RoleType) -> Result<Option<Role>, AuthError>;

    /// Insert a new account and its roles.
    ///
    /// A duplicate login is `AuthError::LoginTaken`; a duplicate email is
    /// `AuthError::EmailTaken`.
    async fn create_account(&self, account: NewAccount) -> Result<Account, AuthError>;
}

/// PostgreSQL-backed credential store
#[derive(Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    /// Create a new PgCredentialStore
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// The unique constraints are the authority for concurrent sign-ups
fn map_insert_error(e: sqlx::Error) -> AuthError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return match db_err.constraint() {
                Some("users_email_key") => AuthError::EmailTaken,
                _ => AuthError::LoginTaken,
            };
        }
    }
    AuthError::DatabaseError(e.to_string())
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn login_exists(&self, login: &str) -> Result<bool, AuthError> {
        let exists: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE login = $1)")
                .bind(login)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists.0)
    }

    async fn email_exists(&self, email: &str) -> Result<bool, AuthError> {
        let exists: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(email)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists.0)
    }

    async fn find_by_login(&self, login: &str) -> Result<Option<Account>, AuthError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, last_name, first_name, login, email, password_hash, deleted, created_at
            FROM users
            WHERE login = $1
            "#,
        )
        .bind(login)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let roles = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT r.id, r.role
            FROM roles r
            JOIN user_roles ur ON ur.role_id = r.id
            WHERE ur.user_id = $1
            ORDER BY r.id
            "#,
        )
        .bind(row.id)
        .fetch_all(&self.pool)
        .await?;

        row.with_roles(roles).map(Some)
    }

    async fn find_role(&self, role: RoleType) -> Result<Option<Role>, AuthError> {
        let row = sqlx::query_as::<_, RoleRow>("SELECT id, role FROM roles WHERE role = $1")
            .bind(role.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Role::try_from).transpose()
    }

    async fn create_account(&self, account: NewAccount) -> Result<Account, AuthError> {
        let mut tx = self.pool.begin().await?;

        let (id, created_at): (i64, chrono::DateTime<chrono::Utc>) = sqlx::query_as(
            r#"
            INSERT INTO users (last_name, first_name, login, email, password_hash, deleted)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, created_at
            "#,
        )
        .bind(&account.last_name)
        .bind(&account.first_name)
        .bind(&account.login)
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(account.deleted)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_insert_error)?;

        let role_ids: Vec<i64> = account.roles.iter().map(|r| r.id).collect();
        sqlx::query("INSERT INTO user_roles (user_id, role_id) SELECT $1, UNNEST($2::BIGINT[])")
            .bind(id)
            .bind(role_ids)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Account {
            id,
            last_name: account.last_name,
            first_name: account.first_name,
            login: account.login,
            email: account.email,
            password_hash: account.password_hash,
            deleted: account.deleted,
            roles: account.roles,
            created_at,
        })
    }
}

#[cfg(test)]
pub use memory::InMemoryCredentialStore;
