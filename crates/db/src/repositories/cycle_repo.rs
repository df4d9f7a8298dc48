//! Repository for the `stage_cycles` table.

use formativa_core::cycle;
use formativa_core::types::DbId;
use sqlx::PgPool;

use crate::models::cycle::{CreateCycle, CycleDetail, CycleListParams, StageCycle, UpdateCycle};
use crate::repositories::{bind_filter, Bind};
use crate::{clamp_limit, clamp_offset};

/// Column list for raw `stage_cycles` queries.
const COLUMNS: &str = "id, formative_stage_id, tenant_id, name, description, start_date, \
    end_date, status, max_participants, created_at, updated_at";

/// Column list for enriched [`CycleDetail`] queries.
const DETAIL_COLUMNS: &str = "c.id, c.formative_stage_id, c.tenant_id, c.name, c.description, \
    c.start_date, c.end_date, c.status, c.max_participants, \
    s.name AS stage_name, \
    (SELECT COUNT(*)::BIGINT FROM stage_participations p WHERE p.cycle_id = c.id) \
        AS participants_count, \
    c.created_at, c.updated_at";

/// FROM clause for enriched queries.
const DETAIL_FROM: &str =
    "FROM stage_cycles c JOIN formative_stages s ON s.id = c.formative_stage_id";

/// Provides CRUD operations for cycles.
pub struct CycleRepo;

impl CycleRepo {
    /// Insert a new cycle, returning the raw created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateCycle,
        status: &str,
        tenant: Option<DbId>,
    ) -> Result<StageCycle, sqlx::Error> {
        let query = format!(
            "INSERT INTO stage_cycles
                (formative_stage_id, tenant_id, name, description, start_date, end_date,
                 status, max_participants)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, StageCycle>(&query)
            .bind(input.formative_stage_id)
            .bind(tenant)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(status)
            .bind(input.max_participants)
            .fetch_one(pool)
            .await
    }

    /// Find a raw cycle row by ID within the caller's tenant.
    pub async fn find_scoped(
        pool: &PgPool,
        id: DbId,
        tenant: Option<DbId>,
    ) -> Result<Option<StageCycle>, sqlx::Error> {
        let query = match tenant {
            Some(_) => format!("SELECT {COLUMNS} FROM stage_cycles WHERE id = $1 AND tenant_id = $2"),
            None => format!("SELECT {COLUMNS} FROM stage_cycles WHERE id = $1"),
        };
        let mut q = sqlx::query_as::<_, StageCycle>(&query).bind(id);
        if let Some(t) = tenant {
            q = q.bind(t);
        }
        q.fetch_optional(pool).await
    }

    /// Fetch one enriched cycle by ID within the caller's tenant.
    pub async fn find_detail(
        pool: &PgPool,
        id: DbId,
        tenant: Option<DbId>,
    ) -> Result<Option<CycleDetail>, sqlx::Error> {
        let query = match tenant {
            Some(_) => {
                format!("SELECT {DETAIL_COLUMNS} {DETAIL_FROM} WHERE c.id = $1 AND c.tenant_id = $2")
            }
            None => format!("SELECT {DETAIL_COLUMNS} {DETAIL_FROM} WHERE c.id = $1"),
        };
        let mut q = sqlx::query_as::<_, CycleDetail>(&query).bind(id);
        if let Some(t) = tenant {
            q = q.bind(t);
        }
        q.fetch_optional(pool).await
    }

    /// List cycles with optional stage/status/search filters, ordered by
    /// stage then newest start date.
    pub async fn list(
        pool: &PgPool,
        params: &CycleListParams,
        tenant: Option<DbId>,
    ) -> Result<Vec<CycleDetail>, sqlx::Error> {
        let mut clauses: Vec<String> = Vec::new();
        let mut binds: Vec<Bind> = Vec::new();

        if let Some(t) = tenant {
            binds.push(Bind::Id(t));
            clauses.push(format!("c.tenant_id = ${}", binds.len()));
        }
        if let Some(stage_id) = params.stage_id {
            binds.push(Bind::Id(stage_id));
            clauses.push(format!("c.formative_stage_id = ${}", binds.len()));
        }
        if let Some(status) = &params.status {
            binds.push(Bind::Text(status.clone()));
            clauses.push(format!("c.status = ${}", binds.len()));
        }
        if let Some(search) = &params.search {
            binds.push(Bind::Text(search.clone()));
            clauses.push(format!("c.name ILIKE '%' || ${} || '%'", binds.len()));
        }

        let where_clause = if clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", clauses.join(" AND "))
        };

        let limit = clamp_limit(params.limit);
        let offset = clamp_offset(params.offset);
        let query = format!(
            "SELECT {DETAIL_COLUMNS} {DETAIL_FROM} {where_clause}
             ORDER BY c.formative_stage_id ASC, c.start_date DESC
             LIMIT ${} OFFSET ${}",
            binds.len() + 1,
            binds.len() + 2
        );

        let q = bind_filter(sqlx::query_as::<_, CycleDetail>(&query), &binds);
        q.bind(limit).bind(offset).fetch_all(pool).await
    }

    /// List active cycles (planned or in progress), soonest start first.
    pub async fn list_active(
        pool: &PgPool,
        tenant: Option<DbId>,
    ) -> Result<Vec<CycleDetail>, sqlx::Error> {
        let query = match tenant {
            Some(_) => format!(
                "SELECT {DETAIL_COLUMNS} {DETAIL_FROM}
                 WHERE c.status IN ($1, $2) AND c.tenant_id = $3
                 ORDER BY c.start_date ASC"
            ),
            None => format!(
                "SELECT {DETAIL_COLUMNS} {DETAIL_FROM}
                 WHERE c.status IN ($1, $2)
                 ORDER BY c.start_date ASC"
            ),
        };
        let mut q = sqlx::query_as::<_, CycleDetail>(&query)
            .bind(cycle::STATUS_PLANNED)
            .bind(cycle::STATUS_IN_PROGRESS);
        if let Some(t) = tenant {
            q = q.bind(t);
        }
        q.fetch_all(pool).await
    }

    /// List all cycles of one stage, newest start first.
    pub async fn list_by_stage(
        pool: &PgPool,
        stage_id: DbId,
        tenant: Option<DbId>,
    ) -> Result<Vec<CycleDetail>, sqlx::Error> {
        let query = match tenant {
            Some(_) => format!(
                "SELECT {DETAIL_COLUMNS} {DETAIL_FROM}
                 WHERE c.formative_stage_id = $1 AND c.tenant_id = $2
                 ORDER BY c.start_date DESC"
            ),
            None => format!(
                "SELECT {DETAIL_COLUMNS} {DETAIL_FROM}
                 WHERE c.formative_stage_id = $1
                 ORDER BY c.start_date DESC"
            ),
        };
        let mut q = sqlx::query_as::<_, CycleDetail>(&query).bind(stage_id);
        if let Some(t) = tenant {
            q = q.bind(t);
        }
        q.fetch_all(pool).await
    }

    /// Update a cycle. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCycle,
    ) -> Result<Option<StageCycle>, sqlx::Error> {
        let query = format!(
            "UPDATE stage_cycles SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                start_date = COALESCE($4, start_date),
                end_date = COALESCE($5, end_date),
                status = COALESCE($6, status),
                max_participants = COALESCE($7, max_participants),
                updated_at = now()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, StageCycle>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(&input.status)
            .bind(input.max_participants)
            .fetch_optional(pool)
            .await
    }

    /// Delete a cycle. Returns whether a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM stage_cycles WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Number of cycles referencing a stage.
    pub async fn count_by_stage(pool: &PgPool, stage_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*)::BIGINT FROM stage_cycles WHERE formative_stage_id = $1",
        )
        .bind(stage_id)
        .fetch_one(pool)
        .await
    }

    /// Number of participation rows referencing a cycle.
    pub async fn participants_count(pool: &PgPool, cycle_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*)::BIGINT FROM stage_participations WHERE cycle_id = $1",
        )
        .bind(cycle_id)
        .fetch_one(pool)
        .await
    }

    /// Number of active (planned or in-progress) cycles in the tenant.
    pub async fn count_active(pool: &PgPool, tenant: Option<DbId>) -> Result<i64, sqlx::Error> {
        let query = match tenant {
            Some(_) => "SELECT COUNT(*)::BIGINT FROM stage_cycles
                        WHERE status IN ($1, $2) AND tenant_id = $3",
            None => "SELECT COUNT(*)::BIGINT FROM stage_cycles WHERE status IN ($1, $2)",
        };
        let mut q = sqlx::query_scalar::<_, i64>(query)
            .bind(cycle::STATUS_PLANNED)
            .bind(cycle::STATUS_IN_PROGRESS);
        if let Some(t) = tenant {
            q = q.bind(t);
        }
        q.fetch_one(pool).await
    }
}
