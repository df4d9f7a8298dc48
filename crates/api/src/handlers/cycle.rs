//! Handlers for the `/stage-cycles` resource.
//!
//! Cycle status changes only move forward (planned, in_progress, finished);
//! the transition check lives in `formativa_core::cycle`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::NaiveDate;
use formativa_core::audit::{action_types, entity_types};
use formativa_core::cycle::CycleStatus;
use formativa_core::error::CoreError;
use formativa_core::types::DbId;
use formativa_db::models::cycle::{CreateCycle, CycleListParams, UpdateCycle};
use formativa_db::repositories::{CycleRepo, StageRepo};
use serde_json::json;

use crate::audit::log_action;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/stage-cycles
///
/// List cycles within the caller's tenant, with optional filters.
pub async fn list_cycles(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<CycleListParams>,
) -> AppResult<impl IntoResponse> {
    if let Some(status) = &params.status {
        CycleStatus::parse(status)?;
    }

    let cycles = CycleRepo::list(&state.pool, &params, auth.tenant_scope()).await?;

    Ok(Json(DataResponse { data: cycles }))
}

/// GET /api/v1/stage-cycles/active
///
/// List cycles still accepting activity (planned or in progress).
pub async fn list_active_cycles(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let cycles = CycleRepo::list_active(&state.pool, auth.tenant_scope()).await?;

    Ok(Json(DataResponse { data: cycles }))
}

/// GET /api/v1/stage-cycles/by-stage/{stage_id}
pub async fn list_cycles_by_stage(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(stage_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    StageRepo::find_by_id(&state.pool, stage_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "FormativeStage",
            id: stage_id,
        }))?;

    let cycles = CycleRepo::list_by_stage(&state.pool, stage_id, auth.tenant_scope()).await?;

    Ok(Json(DataResponse { data: cycles }))
}

/// GET /api/v1/stage-cycles/{id}
pub async fn get_cycle(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(cycle_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let cycle = CycleRepo::find_detail(&state.pool, cycle_id, auth.tenant_scope())
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "StageCycle",
            id: cycle_id,
        }))?;

    Ok(Json(DataResponse { data: cycle }))
}

/// POST /api/v1/stage-cycles
///
/// Create a cycle for an existing stage. Admin only.
pub async fn create_cycle(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateCycle>,
) -> AppResult<impl IntoResponse> {
    StageRepo::find_by_id(&state.pool, input.formative_stage_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "FormativeStage",
            id: input.formative_stage_id,
        }))?;

    validate_dates(input.start_date, input.end_date)?;

    if let Some(max) = input.max_participants {
        if max < 1 {
            return Err(AppError::Core(CoreError::Validation(
                "max_participants must be a positive integer".into(),
            )));
        }
    }

    let status = match &input.status {
        Some(s) => CycleStatus::parse(s)?,
        None => CycleStatus::Planned,
    };

    let cycle = CycleRepo::create(&state.pool, &input, status.as_str(), admin.tenant_id).await?;

    // Echo back the enriched row the way every read endpoint shapes it.
    let detail = CycleRepo::find_detail(&state.pool, cycle.id, admin.tenant_scope())
        .await?
        .ok_or_else(|| AppError::InternalError("Created cycle vanished".into()))?;

    tracing::info!(cycle_id = cycle.id, user_id = admin.user_id, "Cycle created");
    log_action(
        &state.pool,
        &admin,
        action_types::CREATE,
        entity_types::STAGE_CYCLE,
        Some(cycle.id),
        Some(json!({ "name": cycle.name, "stage_id": cycle.formative_stage_id })),
    )
    .await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: detail })))
}

/// PUT /api/v1/stage-cycles/{id}
///
/// Partial update. Status changes must respect forward-only ordering;
/// date changes are validated against the merged result.
pub async fn update_cycle(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(cycle_id): Path<DbId>,
    Json(input): Json<UpdateCycle>,
) -> AppResult<impl IntoResponse> {
    let existing = CycleRepo::find_scoped(&state.pool, cycle_id, admin.tenant_scope())
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "StageCycle",
            id: cycle_id,
        }))?;

    if let Some(new_status) = &input.status {
        let current = CycleStatus::parse(&existing.status)?;
        let next = CycleStatus::parse(new_status)?;
        current.ensure_transition(next)?;
    }

    let start = input.start_date.unwrap_or(existing.start_date);
    let end = input.end_date.unwrap_or(existing.end_date);
    validate_dates(start, end)?;

    if let Some(max) = input.max_participants {
        if max < 1 {
            return Err(AppError::Core(CoreError::Validation(
                "max_participants must be a positive integer".into(),
            )));
        }
    }

    CycleRepo::update(&state.pool, cycle_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "StageCycle",
            id: cycle_id,
        }))?;

    let detail = CycleRepo::find_detail(&state.pool, cycle_id, admin.tenant_scope())
        .await?
        .ok_or_else(|| AppError::InternalError("Updated cycle vanished".into()))?;

    tracing::info!(cycle_id, user_id = admin.user_id, "Cycle updated");
    log_action(
        &state.pool,
        &admin,
        action_types::UPDATE,
        entity_types::STAGE_CYCLE,
        Some(cycle_id),
        None,
    )
    .await;

    Ok(Json(DataResponse { data: detail }))
}

/// DELETE /api/v1/stage-cycles/{id}
///
/// Delete a cycle. Blocked while any participation references it, so the
/// ledger never loses history to a cascade.
pub async fn delete_cycle(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(cycle_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    CycleRepo::find_scoped(&state.pool, cycle_id, admin.tenant_scope())
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "StageCycle",
            id: cycle_id,
        }))?;

    let participants = CycleRepo::participants_count(&state.pool, cycle_id).await?;
    if participants > 0 {
        return Err(AppError::BadRequest(format!(
            "Cannot delete cycle with {participants} participant(s). Remove the participations first."
        )));
    }

    let deleted = CycleRepo::delete(&state.pool, cycle_id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "StageCycle",
            id: cycle_id,
        }));
    }

    tracing::info!(cycle_id, user_id = admin.user_id, "Cycle deleted");
    log_action(
        &state.pool,
        &admin,
        action_types::DELETE,
        entity_types::STAGE_CYCLE,
        Some(cycle_id),
        None,
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}

/// Reject inverted date ranges before they hit the CHECK constraint.
fn validate_dates(start: NaiveDate, end: NaiveDate) -> AppResult<()> {
    if start > end {
        return Err(AppError::Core(CoreError::Validation(
            "start_date must be on or before end_date".into(),
        )));
    }
    Ok(())
}
