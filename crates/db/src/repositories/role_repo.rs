//! Repository for the `roles` lookup table.

use rats_core::types::DbId;
use sqlx::PgPool;

/// Provides lookups for roles.
pub struct RoleRepo;

impl RoleRepo {
    /// Resolve a role id to its name.
    ///
    /// Returns `RowNotFound` if the id does not exist.
    pub async fn resolve_name(pool: &PgPool, role_id: DbId) -> Result<String, sqlx::Error> {
        let (name,): (String,) = sqlx::query_as("SELECT name FROM roles WHERE id = $1")
            .bind(role_id)
            .fetch_one(pool)
            .await?;
        Ok(name)
    }

    /// Find a role id by name.
    pub async fn find_id_by_name(pool: &PgPool, name: &str) -> Result<Option<DbId>, sqlx::Error> {
        let row: Option<(DbId,)> = sqlx::query_as("SELECT id FROM roles WHERE name = $1")
            .bind(name)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(|(id,)| id))
    }
}
