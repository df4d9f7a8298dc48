//! Repository for the `formative_stages` table.

use formativa_core::types::DbId;
use sqlx::PgPool;

use crate::models::stage::{CreateStage, FormativeStage, StageListParams, UpdateStage};
use crate::{clamp_limit, clamp_offset};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, name, description, stage_order, estimated_duration, created_at, updated_at";

/// Provides CRUD operations for the stage catalog.
pub struct StageRepo;

impl StageRepo {
    /// Insert a new stage, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateStage) -> Result<FormativeStage, sqlx::Error> {
        let query = format!(
            "INSERT INTO formative_stages (name, description, stage_order, estimated_duration)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FormativeStage>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.stage_order)
            .bind(&input.estimated_duration)
            .fetch_one(pool)
            .await
    }

    /// Find a stage by ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<FormativeStage>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM formative_stages WHERE id = $1");
        sqlx::query_as::<_, FormativeStage>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List stages ordered by `stage_order` ascending.
    ///
    /// The catalog defines the progression sequence, so the ordering is
    /// part of the contract, not a display concern.
    pub async fn list(
        pool: &PgPool,
        params: &StageListParams,
    ) -> Result<Vec<FormativeStage>, sqlx::Error> {
        let limit = clamp_limit(params.limit);
        let offset = clamp_offset(params.offset);

        match &params.search {
            Some(search) => {
                let query = format!(
                    "SELECT {COLUMNS} FROM formative_stages
                     WHERE name ILIKE '%' || $1 || '%'
                     ORDER BY stage_order ASC
                     LIMIT $2 OFFSET $3"
                );
                sqlx::query_as::<_, FormativeStage>(&query)
                    .bind(search)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(pool)
                    .await
            }
            None => {
                let query = format!(
                    "SELECT {COLUMNS} FROM formative_stages
                     ORDER BY stage_order ASC
                     LIMIT $1 OFFSET $2"
                );
                sqlx::query_as::<_, FormativeStage>(&query)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(pool)
                    .await
            }
        }
    }

    /// Total number of stages in the catalog (the journey denominator).
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*)::BIGINT FROM formative_stages")
            .fetch_one(pool)
            .await
    }

    /// Update a stage. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateStage,
    ) -> Result<Option<FormativeStage>, sqlx::Error> {
        let query = format!(
            "UPDATE formative_stages SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                stage_order = COALESCE($4, stage_order),
                estimated_duration = COALESCE($5, estimated_duration),
                updated_at = now()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FormativeStage>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.stage_order)
            .bind(&input.estimated_duration)
            .fetch_optional(pool)
            .await
    }

    /// Delete a stage. Returns whether a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM formative_stages WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
