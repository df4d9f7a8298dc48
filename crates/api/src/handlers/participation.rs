//! Handlers for the `/stage-participations` resource: the participation
//! ledger, evaluations, the journey aggregate, and the stats overview.

use std::collections::BTreeMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use formativa_core::audit::{action_types, entity_types};
use formativa_core::error::CoreError;
use formativa_core::journey::{self, ParticipationFact};
use formativa_core::participation::ParticipationStatus;
use formativa_core::types::DbId;
use formativa_db::models::participation::{
    CreateParticipation, CycleParticipantsParams, EvaluateRequest, Evaluation, JourneySummary,
    ParticipationListParams, ParticipationStats, UpdateParticipation,
};
use formativa_db::repositories::{CycleRepo, ParticipationRepo, StageRepo, UserRepo};
use serde_json::json;

use crate::audit::log_action;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAdmin, RequireFormador};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/stage-participations
///
/// List participations within the caller's tenant, newest enrollment first.
pub async fn list_participations(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ParticipationListParams>,
) -> AppResult<impl IntoResponse> {
    if let Some(status) = &params.status {
        ParticipationStatus::parse(status)?;
    }

    let items = ParticipationRepo::list(&state.pool, &params, auth.tenant_scope()).await?;

    Ok(Json(DataResponse { data: items }))
}

/// GET /api/v1/stage-participations/{id}
pub async fn get_participation(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(participation_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let detail = ParticipationRepo::find_detail(&state.pool, participation_id, auth.tenant_scope())
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "StageParticipation",
            id: participation_id,
        }))?;

    Ok(Json(DataResponse { data: detail }))
}

/// GET /api/v1/stage-participations/cycle/{cycle_id}
///
/// List participants of one cycle, earliest enrollment first.
pub async fn list_cycle_participants(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(cycle_id): Path<DbId>,
    Query(params): Query<CycleParticipantsParams>,
) -> AppResult<impl IntoResponse> {
    let tenant = auth.tenant_scope();

    CycleRepo::find_scoped(&state.pool, cycle_id, tenant)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "StageCycle",
            id: cycle_id,
        }))?;

    if let Some(status) = &params.status {
        ParticipationStatus::parse(status)?;
    }

    let items =
        ParticipationRepo::list_for_cycle(&state.pool, cycle_id, params.status.as_deref(), tenant)
            .await?;

    Ok(Json(DataResponse { data: items }))
}

/// POST /api/v1/stage-participations
///
/// Enroll a user into a cycle. Formador or admin.
///
/// Guards, in order: user exists in tenant (404), cycle exists in tenant
/// (404), no duplicate enrollment (409), capacity not exhausted (400).
pub async fn enroll(
    RequireFormador(actor): RequireFormador,
    State(state): State<AppState>,
    Json(input): Json<CreateParticipation>,
) -> AppResult<impl IntoResponse> {
    let tenant = actor.tenant_scope();

    let user = UserRepo::find_scoped(&state.pool, input.user_id, tenant)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: input.user_id,
        }))?;

    let cycle = CycleRepo::find_scoped(&state.pool, input.cycle_id, tenant)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "StageCycle",
            id: input.cycle_id,
        }))?;

    if ParticipationRepo::exists(&state.pool, input.user_id, input.cycle_id).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "User is already enrolled in this cycle".into(),
        )));
    }

    if let Some(max) = cycle.max_participants {
        let current = CycleRepo::participants_count(&state.pool, input.cycle_id).await?;
        if current >= max as i64 {
            return Err(AppError::BadRequest("Cycle is full".into()));
        }
    }

    let enrollment_date = input.enrollment_date.unwrap_or_else(Utc::now);
    let created =
        ParticipationRepo::create(&state.pool, &input, enrollment_date, user.tenant_id).await?;

    // Echo back the enriched row the way every read endpoint shapes it.
    let detail = ParticipationRepo::find_detail(&state.pool, created.id, tenant)
        .await?
        .ok_or_else(|| AppError::InternalError("Created participation vanished".into()))?;

    tracing::info!(
        participation_id = created.id,
        user_id = input.user_id,
        cycle_id = input.cycle_id,
        actor_id = actor.user_id,
        "Participation created"
    );
    log_action(
        &state.pool,
        &actor,
        action_types::CREATE,
        entity_types::STAGE_PARTICIPATION,
        Some(created.id),
        Some(json!({ "user_id": input.user_id, "cycle_id": input.cycle_id })),
    )
    .await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: detail })))
}

/// PUT /api/v1/stage-participations/{id}
///
/// Partial update. A status change must pass the transition table, and
/// moving into an evaluated status stamps `completion_date` plus the
/// evaluating admin.
pub async fn update_participation(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(participation_id): Path<DbId>,
    Json(input): Json<UpdateParticipation>,
) -> AppResult<impl IntoResponse> {
    let tenant = admin.tenant_scope();

    let existing = ParticipationRepo::find_scoped(&state.pool, participation_id, tenant)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "StageParticipation",
            id: participation_id,
        }))?;

    let mut completion_date = None;
    let mut evaluated_by_id = None;

    if let Some(new_status) = &input.status {
        let current = ParticipationStatus::parse(&existing.status)?;
        let next = ParticipationStatus::parse(new_status)?;
        current.ensure_transition(next)?;

        if next.is_evaluated() {
            completion_date = Some(Utc::now());
            evaluated_by_id = Some(admin.user_id);
        }
    }

    ParticipationRepo::update(
        &state.pool,
        participation_id,
        &input,
        completion_date,
        evaluated_by_id,
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound {
        entity: "StageParticipation",
        id: participation_id,
    }))?;

    let detail = ParticipationRepo::find_detail(&state.pool, participation_id, tenant)
        .await?
        .ok_or_else(|| AppError::InternalError("Updated participation vanished".into()))?;

    tracing::info!(participation_id, user_id = admin.user_id, "Participation updated");
    log_action(
        &state.pool,
        &admin,
        action_types::UPDATE,
        entity_types::STAGE_PARTICIPATION,
        Some(participation_id),
        input.status.as_ref().map(|s| json!({ "status": s })),
    )
    .await;

    Ok(Json(DataResponse { data: detail }))
}

/// POST /api/v1/stage-participations/{id}/approve
pub async fn approve(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(participation_id): Path<DbId>,
    Json(input): Json<EvaluateRequest>,
) -> AppResult<impl IntoResponse> {
    evaluate(
        state,
        admin,
        participation_id,
        ParticipationStatus::Approved,
        input,
    )
    .await
}

/// POST /api/v1/stage-participations/{id}/reprove
pub async fn reprove(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(participation_id): Path<DbId>,
    Json(input): Json<EvaluateRequest>,
) -> AppResult<impl IntoResponse> {
    evaluate(
        state,
        admin,
        participation_id,
        ParticipationStatus::Reproved,
        input,
    )
    .await
}

/// Shared evaluation path for approve and reprove.
async fn evaluate(
    state: AppState,
    admin: AuthUser,
    participation_id: DbId,
    outcome: ParticipationStatus,
    input: EvaluateRequest,
) -> AppResult<impl IntoResponse> {
    let tenant = admin.tenant_scope();

    let existing = ParticipationRepo::find_scoped(&state.pool, participation_id, tenant)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "StageParticipation",
            id: participation_id,
        }))?;

    let current = ParticipationStatus::parse(&existing.status)?;
    current.ensure_transition(outcome)?;

    let evaluation = Evaluation {
        status: outcome.as_str().to_string(),
        completion_date: Utc::now(),
        evaluated_by_id: admin.user_id,
        evaluation_notes: input.evaluation_notes,
    };

    ParticipationRepo::evaluate(&state.pool, participation_id, &evaluation)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "StageParticipation",
            id: participation_id,
        }))?;

    let detail = ParticipationRepo::find_detail(&state.pool, participation_id, tenant)
        .await?
        .ok_or_else(|| AppError::InternalError("Evaluated participation vanished".into()))?;

    let action = if outcome == ParticipationStatus::Approved {
        action_types::APPROVE
    } else {
        action_types::REPROVE
    };
    tracing::info!(
        participation_id,
        outcome = outcome.as_str(),
        user_id = admin.user_id,
        "Participation evaluated"
    );
    log_action(
        &state.pool,
        &admin,
        action,
        entity_types::STAGE_PARTICIPATION,
        Some(participation_id),
        None,
    )
    .await;

    Ok(Json(DataResponse { data: detail }))
}

/// DELETE /api/v1/stage-participations/{id}
pub async fn delete_participation(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(participation_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ParticipationRepo::find_scoped(&state.pool, participation_id, admin.tenant_scope())
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "StageParticipation",
            id: participation_id,
        }))?;

    ParticipationRepo::delete(&state.pool, participation_id).await?;

    tracing::info!(participation_id, user_id = admin.user_id, "Participation deleted");
    log_action(
        &state.pool,
        &admin,
        action_types::DELETE,
        entity_types::STAGE_PARTICIPATION,
        Some(participation_id),
        None,
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/stage-participations/user/{user_id}/journey
///
/// Fold the user's full participation history into a journey summary.
pub async fn get_user_journey(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let tenant = auth.tenant_scope();

    let user = UserRepo::find_scoped(&state.pool, user_id, tenant)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user_id,
        }))?;

    let participations = ParticipationRepo::list_for_user(&state.pool, user_id, tenant).await?;
    let total_catalog_stages = StageRepo::count(&state.pool).await?;

    let facts: Vec<ParticipationFact> = participations
        .iter()
        .map(|p| {
            Ok(ParticipationFact {
                stage_id: p.stage_id,
                stage_name: p.stage_name.clone(),
                cycle_name: p.cycle_name.clone(),
                status: ParticipationStatus::parse(&p.status)?,
            })
        })
        .collect::<Result<_, CoreError>>()?;

    let stats = journey::summarize(&facts, total_catalog_stages);

    let summary = JourneySummary {
        user_id,
        user_name: user.full_name,
        user_email: user.email,
        current_stage: stats.current_stage,
        current_cycle: stats.current_cycle,
        participations,
        total_stages_completed: stats.total_stages_completed,
        journey_progress_percent: stats.journey_progress_percent,
    };

    Ok(Json(DataResponse { data: summary }))
}

/// GET /api/v1/stage-participations/stats/overview
///
/// Tenant-wide participation statistics. Every status appears in
/// `by_status`, zero-filled when absent.
pub async fn stats_overview(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let tenant = auth.tenant_scope();

    let counts = ParticipationRepo::count_by_status(&state.pool, tenant).await?;

    let mut by_status: BTreeMap<String, i64> = ParticipationStatus::ALL
        .iter()
        .map(|s| (s.as_str().to_string(), 0))
        .collect();
    let mut total_participations = 0;
    for (status, count) in counts {
        total_participations += count;
        by_status.insert(status, count);
    }

    let unique_users_in_journey =
        ParticipationRepo::count_unique_users(&state.pool, tenant).await?;
    let active_cycles = CycleRepo::count_active(&state.pool, tenant).await?;

    let stats = ParticipationStats {
        by_status,
        unique_users_in_journey,
        active_cycles,
        total_participations,
    };

    Ok(Json(DataResponse { data: stats }))
}
