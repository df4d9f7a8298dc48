//! Repository for the `users` table.

use formativa_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::user::{CreateUser, User, UserResponse};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, username, email, full_name, password_hash, role_id, tenant_id, \
    photo_url, is_active, last_login_at, failed_login_count, locked_until, \
    created_at, updated_at";

/// Column list for [`UserResponse`] queries (JOINs `roles` for the name).
const RESPONSE_COLUMNS: &str = "u.id, u.username, u.email, u.full_name, r.name AS role, \
    u.role_id, u.tenant_id, u.photo_url, u.is_active, u.last_login_at, u.created_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (username, email, full_name, password_hash, role_id, tenant_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.full_name)
            .bind(&input.password_hash)
            .bind(input.role_id)
            .bind(input.tenant_id)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by ID within the caller's tenant.
    ///
    /// A `None` tenant (superadmin) sees every tenant.
    pub async fn find_scoped(
        pool: &PgPool,
        id: DbId,
        tenant: Option<DbId>,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = match tenant {
            Some(_) => format!("SELECT {COLUMNS} FROM users WHERE id = $1 AND tenant_id = $2"),
            None => format!("SELECT {COLUMNS} FROM users WHERE id = $1"),
        };
        let mut q = sqlx::query_as::<_, User>(&query).bind(id);
        if let Some(t) = tenant {
            q = q.bind(t);
        }
        q.fetch_optional(pool).await
    }

    /// Find a user by username (case-sensitive).
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE username = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// List users in the caller's tenant as API-safe responses, most
    /// recently created first.
    pub async fn list_responses(
        pool: &PgPool,
        tenant: Option<DbId>,
    ) -> Result<Vec<UserResponse>, sqlx::Error> {
        let query = match tenant {
            Some(_) => format!(
                "SELECT {RESPONSE_COLUMNS} FROM users u
                 JOIN roles r ON r.id = u.role_id
                 WHERE u.tenant_id = $1
                 ORDER BY u.created_at DESC"
            ),
            None => format!(
                "SELECT {RESPONSE_COLUMNS} FROM users u
                 JOIN roles r ON r.id = u.role_id
                 ORDER BY u.created_at DESC"
            ),
        };
        let mut q = sqlx::query_as::<_, UserResponse>(&query);
        if let Some(t) = tenant {
            q = q.bind(t);
        }
        q.fetch_all(pool).await
    }

    /// Fetch one user as an API-safe response.
    pub async fn find_response(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<UserResponse>, sqlx::Error> {
        let query = format!(
            "SELECT {RESPONSE_COLUMNS} FROM users u
             JOIN roles r ON r.id = u.role_id
             WHERE u.id = $1"
        );
        sqlx::query_as::<_, UserResponse>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Reset the failed-login counter and stamp `last_login_at`.
    pub async fn record_successful_login(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE users SET failed_login_count = 0, locked_until = NULL,
                 last_login_at = now(), updated_at = now()
             WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await
        .map(|_| ())
    }

    /// Increment the failed-login counter.
    pub async fn increment_failed_login(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE users SET failed_login_count = failed_login_count + 1, updated_at = now()
             WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await
        .map(|_| ())
    }

    /// Lock the account until the given time.
    pub async fn lock_account(
        pool: &PgPool,
        id: DbId,
        until: Timestamp,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET locked_until = $2, updated_at = now() WHERE id = $1")
            .bind(id)
            .bind(until)
            .execute(pool)
            .await
            .map(|_| ())
    }
}
