//! User entity model and DTOs.

use formativa_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses
/// directly. Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
    pub role_id: DbId,
    pub tenant_id: Option<DbId>,
    pub photo_url: Option<String>,
    pub is_active: bool,
    pub last_login_at: Option<Timestamp>,
    pub failed_login_count: i32,
    pub locked_until: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe user representation for API responses (no password hash).
///
/// Fetched with a role-name JOIN so `role` is already resolved.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub full_name: String,
    /// Resolved role name (e.g. `"admin"`, `"formador"`).
    pub role: String,
    pub role_id: DbId,
    pub tenant_id: Option<DbId>,
    pub photo_url: Option<String>,
    pub is_active: bool,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// DTO for inserting a new user (password already hashed).
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
    pub role_id: DbId,
    pub tenant_id: Option<DbId>,
}

/// Request body for the admin create-user endpoint (plaintext password;
/// hashed in the handler before it reaches the repository).
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub password: String,
    /// Role name; must match a seeded role.
    pub role: String,
    pub tenant_id: Option<DbId>,
}
