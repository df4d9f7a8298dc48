//! Repository for the `stage_participations` table.

use formativa_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::participation::{
    CreateParticipation, Evaluation, ParticipationDetail, ParticipationListParams,
    StageParticipation, UpdateParticipation,
};
use crate::repositories::{bind_filter, bind_filter_scalar, Bind};
use crate::{clamp_limit, clamp_offset};

/// Column list for raw `stage_participations` queries.
const COLUMNS: &str = "id, user_id, cycle_id, tenant_id, enrollment_date, status, \
    completion_date, notes, evaluation_notes, evaluated_by_id, created_at, updated_at";

/// Column list for enriched [`ParticipationDetail`] queries.
const DETAIL_COLUMNS: &str = "p.id, p.user_id, p.cycle_id, p.tenant_id, p.enrollment_date, \
    p.status, p.completion_date, p.notes, p.evaluation_notes, p.evaluated_by_id, \
    ev.full_name AS evaluated_by_name, \
    u.full_name AS user_name, u.email AS user_email, u.photo_url AS user_photo_url, \
    c.name AS cycle_name, c.formative_stage_id AS stage_id, \
    s.name AS stage_name, s.stage_order, \
    p.created_at, p.updated_at";

/// FROM clause for enriched queries.
const DETAIL_FROM: &str = "FROM stage_participations p
    JOIN users u ON u.id = p.user_id
    JOIN stage_cycles c ON c.id = p.cycle_id
    JOIN formative_stages s ON s.id = c.formative_stage_id
    LEFT JOIN users ev ON ev.id = p.evaluated_by_id";

/// Provides CRUD and aggregation operations for the participation ledger.
pub struct ParticipationRepo;

impl ParticipationRepo {
    /// Insert a new participation with status `enrolled`.
    ///
    /// The `uq_stage_participations_user_cycle` constraint rejects
    /// duplicate enrollment; callers pre-check via [`Self::exists`] for a
    /// friendlier message and rely on the constraint as backstop.
    pub async fn create(
        pool: &PgPool,
        input: &CreateParticipation,
        enrollment_date: Timestamp,
        tenant: Option<DbId>,
    ) -> Result<StageParticipation, sqlx::Error> {
        let query = format!(
            "INSERT INTO stage_participations
                (user_id, cycle_id, tenant_id, enrollment_date, notes)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, StageParticipation>(&query)
            .bind(input.user_id)
            .bind(input.cycle_id)
            .bind(tenant)
            .bind(enrollment_date)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    /// Whether the user already has a participation in the cycle.
    pub async fn exists(
        pool: &PgPool,
        user_id: DbId,
        cycle_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM stage_participations
              WHERE user_id = $1 AND cycle_id = $2)",
        )
        .bind(user_id)
        .bind(cycle_id)
        .fetch_one(pool)
        .await
    }

    /// Find a raw participation row by ID within the caller's tenant.
    pub async fn find_scoped(
        pool: &PgPool,
        id: DbId,
        tenant: Option<DbId>,
    ) -> Result<Option<StageParticipation>, sqlx::Error> {
        let query = match tenant {
            Some(_) => {
                format!("SELECT {COLUMNS} FROM stage_participations WHERE id = $1 AND tenant_id = $2")
            }
            None => format!("SELECT {COLUMNS} FROM stage_participations WHERE id = $1"),
        };
        let mut q = sqlx::query_as::<_, StageParticipation>(&query).bind(id);
        if let Some(t) = tenant {
            q = q.bind(t);
        }
        q.fetch_optional(pool).await
    }

    /// Fetch one enriched participation by ID within the caller's tenant.
    pub async fn find_detail(
        pool: &PgPool,
        id: DbId,
        tenant: Option<DbId>,
    ) -> Result<Option<ParticipationDetail>, sqlx::Error> {
        let query = match tenant {
            Some(_) => {
                format!("SELECT {DETAIL_COLUMNS} {DETAIL_FROM} WHERE p.id = $1 AND p.tenant_id = $2")
            }
            None => format!("SELECT {DETAIL_COLUMNS} {DETAIL_FROM} WHERE p.id = $1"),
        };
        let mut q = sqlx::query_as::<_, ParticipationDetail>(&query).bind(id);
        if let Some(t) = tenant {
            q = q.bind(t);
        }
        q.fetch_optional(pool).await
    }

    /// List participations with optional cycle/user/status filters,
    /// newest enrollment first.
    pub async fn list(
        pool: &PgPool,
        params: &ParticipationListParams,
        tenant: Option<DbId>,
    ) -> Result<Vec<ParticipationDetail>, sqlx::Error> {
        let (where_clause, binds) = build_filter(params, tenant);

        let limit = clamp_limit(params.limit);
        let offset = clamp_offset(params.offset);
        let query = format!(
            "SELECT {DETAIL_COLUMNS} {DETAIL_FROM} {where_clause}
             ORDER BY p.enrollment_date DESC
             LIMIT ${} OFFSET ${}",
            binds.len() + 1,
            binds.len() + 2
        );

        let q = bind_filter(sqlx::query_as::<_, ParticipationDetail>(&query), &binds);
        q.bind(limit).bind(offset).fetch_all(pool).await
    }

    /// Count participations matching the given filter.
    pub async fn count(
        pool: &PgPool,
        params: &ParticipationListParams,
        tenant: Option<DbId>,
    ) -> Result<i64, sqlx::Error> {
        let (where_clause, binds) = build_filter(params, tenant);
        let query = format!(
            "SELECT COUNT(*)::BIGINT {DETAIL_FROM} {where_clause}"
        );
        let q = bind_filter_scalar(sqlx::query_scalar::<_, i64>(&query), &binds);
        q.fetch_one(pool).await
    }

    /// List all participants of one cycle, earliest enrollment first.
    pub async fn list_for_cycle(
        pool: &PgPool,
        cycle_id: DbId,
        status: Option<&str>,
        tenant: Option<DbId>,
    ) -> Result<Vec<ParticipationDetail>, sqlx::Error> {
        let mut clauses = vec!["p.cycle_id = $1".to_string()];
        let mut binds = vec![Bind::Id(cycle_id)];

        if let Some(t) = tenant {
            binds.push(Bind::Id(t));
            clauses.push(format!("p.tenant_id = ${}", binds.len()));
        }
        if let Some(status) = status {
            binds.push(Bind::Text(status.to_string()));
            clauses.push(format!("p.status = ${}", binds.len()));
        }

        let query = format!(
            "SELECT {DETAIL_COLUMNS} {DETAIL_FROM}
             WHERE {}
             ORDER BY p.enrollment_date ASC",
            clauses.join(" AND ")
        );
        let q = bind_filter(sqlx::query_as::<_, ParticipationDetail>(&query), &binds);
        q.fetch_all(pool).await
    }

    /// List one user's full participation history in journey order:
    /// stage order ascending, then enrollment date. This is the input
    /// ordering the journey fold expects.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        tenant: Option<DbId>,
    ) -> Result<Vec<ParticipationDetail>, sqlx::Error> {
        let query = match tenant {
            Some(_) => format!(
                "SELECT {DETAIL_COLUMNS} {DETAIL_FROM}
                 WHERE p.user_id = $1 AND p.tenant_id = $2
                 ORDER BY s.stage_order ASC, p.enrollment_date ASC"
            ),
            None => format!(
                "SELECT {DETAIL_COLUMNS} {DETAIL_FROM}
                 WHERE p.user_id = $1
                 ORDER BY s.stage_order ASC, p.enrollment_date ASC"
            ),
        };
        let mut q = sqlx::query_as::<_, ParticipationDetail>(&query).bind(user_id);
        if let Some(t) = tenant {
            q = q.bind(t);
        }
        q.fetch_all(pool).await
    }

    /// Apply a partial update. Only non-`None` fields are written.
    ///
    /// `completion_date` and `evaluated_by_id` are computed by the caller
    /// (set when the new status is an evaluation outcome); the transition
    /// itself must already have been validated.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateParticipation,
        completion_date: Option<Timestamp>,
        evaluated_by_id: Option<DbId>,
    ) -> Result<Option<StageParticipation>, sqlx::Error> {
        let query = format!(
            "UPDATE stage_participations SET
                status = COALESCE($2, status),
                completion_date = COALESCE($3, completion_date),
                notes = COALESCE($4, notes),
                evaluation_notes = COALESCE($5, evaluation_notes),
                evaluated_by_id = COALESCE($6, evaluated_by_id),
                updated_at = now()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, StageParticipation>(&query)
            .bind(id)
            .bind(&input.status)
            .bind(completion_date)
            .bind(&input.notes)
            .bind(&input.evaluation_notes)
            .bind(evaluated_by_id)
            .fetch_optional(pool)
            .await
    }

    /// Record an evaluation outcome (approve or reprove).
    pub async fn evaluate(
        pool: &PgPool,
        id: DbId,
        eval: &Evaluation,
    ) -> Result<Option<StageParticipation>, sqlx::Error> {
        let query = format!(
            "UPDATE stage_participations SET
                status = $2,
                completion_date = $3,
                evaluated_by_id = $4,
                evaluation_notes = COALESCE($5, evaluation_notes),
                updated_at = now()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, StageParticipation>(&query)
            .bind(id)
            .bind(&eval.status)
            .bind(eval.completion_date)
            .bind(eval.evaluated_by_id)
            .bind(&eval.evaluation_notes)
            .fetch_optional(pool)
            .await
    }

    /// Delete a participation. Returns whether a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM stage_participations WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count participations grouped by status within the tenant.
    ///
    /// Statuses with no rows are absent; callers zero-fill from the
    /// status enum.
    pub async fn count_by_status(
        pool: &PgPool,
        tenant: Option<DbId>,
    ) -> Result<Vec<(String, i64)>, sqlx::Error> {
        let query = match tenant {
            Some(_) => "SELECT status, COUNT(*)::BIGINT FROM stage_participations
                        WHERE tenant_id = $1 GROUP BY status",
            None => "SELECT status, COUNT(*)::BIGINT FROM stage_participations GROUP BY status",
        };
        let mut q = sqlx::query_as::<_, (String, i64)>(query);
        if let Some(t) = tenant {
            q = q.bind(t);
        }
        q.fetch_all(pool).await
    }

    /// Number of distinct users with at least one participation.
    pub async fn count_unique_users(
        pool: &PgPool,
        tenant: Option<DbId>,
    ) -> Result<i64, sqlx::Error> {
        let query = match tenant {
            Some(_) => "SELECT COUNT(DISTINCT user_id)::BIGINT FROM stage_participations
                        WHERE tenant_id = $1",
            None => "SELECT COUNT(DISTINCT user_id)::BIGINT FROM stage_participations",
        };
        let mut q = sqlx::query_scalar::<_, i64>(query);
        if let Some(t) = tenant {
            q = q.bind(t);
        }
        q.fetch_one(pool).await
    }
}

/// Assemble the WHERE clause and bind list shared by `list` and `count`.
fn build_filter(
    params: &ParticipationListParams,
    tenant: Option<DbId>,
) -> (String, Vec<Bind>) {
    let mut clauses: Vec<String> = Vec::new();
    let mut binds: Vec<Bind> = Vec::new();

    if let Some(t) = tenant {
        binds.push(Bind::Id(t));
        clauses.push(format!("p.tenant_id = ${}", binds.len()));
    }
    if let Some(cycle_id) = params.cycle_id {
        binds.push(Bind::Id(cycle_id));
        clauses.push(format!("p.cycle_id = ${}", binds.len()));
    }
    if let Some(user_id) = params.user_id {
        binds.push(Bind::Id(user_id));
        clauses.push(format!("p.user_id = ${}", binds.len()));
    }
    if let Some(status) = &params.status {
        binds.push(Bind::Text(status.clone()));
        clauses.push(format!("p.status = ${}", binds.len()));
    }

    let where_clause = if clauses.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", clauses.join(" AND "))
    };
    (where_clause, binds)
}
