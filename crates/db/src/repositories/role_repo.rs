//! Repository for the `roles` table.

use formativa_core::types::DbId;
use sqlx::PgPool;

use crate::models::role::Role;

/// Provides lookups against the seeded roles.
pub struct RoleRepo;

impl RoleRepo {
    /// Resolve a role id to its name.
    pub async fn resolve_name(pool: &PgPool, role_id: DbId) -> Result<String, sqlx::Error> {
        sqlx::query_scalar::<_, String>("SELECT name FROM roles WHERE id = $1")
            .bind(role_id)
            .fetch_one(pool)
            .await
    }

    /// Find a role by name.
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Role>, sqlx::Error> {
        sqlx::query_as::<_, Role>(
            "SELECT id, name, created_at, updated_at FROM roles WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(pool)
        .await
    }
}
