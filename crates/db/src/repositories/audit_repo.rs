//! Repository for the append-only `audit_logs` table.

use sqlx::PgPool;

use crate::models::audit::{AuditLog, AuditQuery, CreateAuditLog};
use crate::repositories::{bind_filter, bind_filter_scalar, Bind};
use crate::{clamp_limit, clamp_offset};

/// Column list shared across queries.
const COLUMNS: &str =
    "id, user_id, user_name, action_type, entity_type, entity_id, details_json, created_at";

/// Provides insert and query operations for audit logs.
pub struct AuditLogRepo;

impl AuditLogRepo {
    /// Append a new audit entry, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateAuditLog) -> Result<AuditLog, sqlx::Error> {
        let query = format!(
            "INSERT INTO audit_logs
                (user_id, user_name, action_type, entity_type, entity_id, details_json)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AuditLog>(&query)
            .bind(input.user_id)
            .bind(&input.user_name)
            .bind(&input.action_type)
            .bind(&input.entity_type)
            .bind(input.entity_id)
            .bind(&input.details_json)
            .fetch_one(pool)
            .await
    }

    /// List audit entries matching the filter, newest first.
    pub async fn query(
        pool: &PgPool,
        params: &AuditQuery,
    ) -> Result<Vec<AuditLog>, sqlx::Error> {
        let (where_clause, binds) = build_filter(params);

        let limit = clamp_limit(params.limit);
        let offset = clamp_offset(params.offset);
        let query = format!(
            "SELECT {COLUMNS} FROM audit_logs {where_clause}
             ORDER BY created_at DESC
             LIMIT ${} OFFSET ${}",
            binds.len() + 1,
            binds.len() + 2
        );

        let q = bind_filter(sqlx::query_as::<_, AuditLog>(&query), &binds);
        q.bind(limit).bind(offset).fetch_all(pool).await
    }

    /// Count audit entries matching the filter.
    pub async fn count(pool: &PgPool, params: &AuditQuery) -> Result<i64, sqlx::Error> {
        let (where_clause, binds) = build_filter(params);
        let query = format!("SELECT COUNT(*)::BIGINT FROM audit_logs {where_clause}");
        let q = bind_filter_scalar(sqlx::query_scalar::<_, i64>(&query), &binds);
        q.fetch_one(pool).await
    }
}

/// Assemble the WHERE clause and bind list shared by `query` and `count`.
fn build_filter(params: &AuditQuery) -> (String, Vec<Bind>) {
    let mut clauses: Vec<String> = Vec::new();
    let mut binds: Vec<Bind> = Vec::new();

    if let Some(user_id) = params.user_id {
        binds.push(Bind::Id(user_id));
        clauses.push(format!("user_id = ${}", binds.len()));
    }
    if let Some(action_type) = &params.action_type {
        binds.push(Bind::Text(action_type.clone()));
        clauses.push(format!("action_type = ${}", binds.len()));
    }
    if let Some(entity_type) = &params.entity_type {
        binds.push(Bind::Text(entity_type.clone()));
        clauses.push(format!("entity_type = ${}", binds.len()));
    }
    if let Some(entity_id) = params.entity_id {
        binds.push(Bind::Id(entity_id));
        clauses.push(format!("entity_id = ${}", binds.len()));
    }

    let where_clause = if clauses.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", clauses.join(" AND "))
    };
    (where_clause, binds)
}
