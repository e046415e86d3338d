//! # User Repository
//!
//! Accounts and password authentication.
//!
//! Passwords are stored as sha256 hex digests; the plaintext never reaches
//! the database and the [`cafe_core::User`] record never serializes the
//! digest. A default admin account is created on first run so a fresh
//! install is usable immediately.

use chrono::Utc;
use sha2::{Digest, Sha256};
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::error::{DbError, DbResult};
use cafe_core::{validation, Role, User, ValidationError};

/// Username of the account created on first run.
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";

/// Initial password of the default admin. Change it after first login.
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin";

/// Hashes a password for storage (sha256, lowercase hex).
fn hash_password(plaintext: &str) -> String {
    let digest = Sha256::digest(plaintext.as_bytes());
    hex::encode(digest)
}

/// Repository for user accounts.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Creates an account. The password is hashed before storage.
    ///
    /// ## Errors
    /// - [`DbError::Validation`] for an invalid username or empty password
    /// - [`DbError::UniqueViolation`] if username or email is taken
    pub async fn create(
        &self,
        username: &str,
        password: &str,
        role: Role,
        email: Option<&str>,
        phone: Option<&str>,
    ) -> DbResult<User> {
        validation::validate_username(username)?;
        if password.is_empty() {
            return Err(ValidationError::required("password").into());
        }

        let hashed = hash_password(password);
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO users (username, password, role, email, phone, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(username)
        .bind(&hashed)
        .bind(role)
        .bind(email)
        .bind(phone)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } if field.contains("email") => {
                DbError::duplicate("email", email.unwrap_or_default())
            }
            DbError::UniqueViolation { .. } => DbError::duplicate("username", username),
            other => other,
        })?;

        info!(username, ?role, "User created");

        Ok(User {
            id: result.last_insert_rowid(),
            username: username.to_string(),
            password: hashed,
            role,
            email: email.map(String::from),
            phone: phone.map(String::from),
            created_at: now,
        })
    }

    /// Verifies a username/password pair.
    ///
    /// Returns the account on success, `None` for an unknown username or a
    /// wrong password. The two failures are indistinguishable to the caller.
    pub async fn authenticate(&self, username: &str, password: &str) -> DbResult<Option<User>> {
        let user = self.get_by_username(username).await?;

        match user {
            Some(u) if u.password == hash_password(password) => {
                info!(username, "Login succeeded");
                Ok(Some(u))
            }
            _ => {
                warn!(username, "Login failed");
                Ok(None)
            }
        }
    }

    /// Gets a user by id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password, role, email, phone, created_at
            FROM users
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Gets a user by username.
    pub async fn get_by_username(&self, username: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password, role, email, phone, created_at
            FROM users
            WHERE username = ?1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Lists all accounts by username.
    pub async fn list(&self) -> DbResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password, role, email, phone, created_at
            FROM users
            ORDER BY username
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Changes a user's password.
    pub async fn change_password(&self, id: i64, new_password: &str) -> DbResult<()> {
        if new_password.is_empty() {
            return Err(ValidationError::required("password").into());
        }

        let result = sqlx::query("UPDATE users SET password = ?2 WHERE id = ?1")
            .bind(id)
            .bind(hash_password(new_password))
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }

        info!(id, "Password changed");
        Ok(())
    }

    /// Creates the default admin account if no admin exists yet.
    ///
    /// Idempotent; called on application startup.
    pub async fn ensure_default_admin(&self) -> DbResult<()> {
        let admins: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = 'admin'")
            .fetch_one(&self.pool)
            .await?;

        if admins > 0 {
            return Ok(());
        }

        warn!(
            username = DEFAULT_ADMIN_USERNAME,
            "No admin account found, creating the default one"
        );
        self.create(
            DEFAULT_ADMIN_USERNAME,
            DEFAULT_ADMIN_PASSWORD,
            Role::Admin,
            None,
            None,
        )
        .await?;

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
