//! Handlers for the `/formative-stages` resource (the stage catalog).
//!
//! The catalog is global: stages define the progression sequence shared by
//! every tenant, so reads require authentication but no tenant filter.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use formativa_core::audit::{action_types, entity_types};
use formativa_core::error::CoreError;
use formativa_core::types::DbId;
use formativa_db::models::stage::{CreateStage, StageListParams, UpdateStage};
use formativa_db::repositories::{CycleRepo, StageRepo};
use serde_json::json;

use crate::audit::log_action;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/formative-stages
///
/// List the stage catalog in progression order.
pub async fn list_stages(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<StageListParams>,
) -> AppResult<impl IntoResponse> {
    let stages = StageRepo::list(&state.pool, &params).await?;

    Ok(Json(DataResponse { data: stages }))
}

/// GET /api/v1/formative-stages/{id}
pub async fn get_stage(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(stage_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let stage = StageRepo::find_by_id(&state.pool, stage_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "FormativeStage",
            id: stage_id,
        }))?;

    Ok(Json(DataResponse { data: stage }))
}

/// POST /api/v1/formative-stages
///
/// Create a catalog stage. Admin only. The `uq_formative_stages_order`
/// constraint rejects duplicate orders with 409.
pub async fn create_stage(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateStage>,
) -> AppResult<impl IntoResponse> {
    validate_stage_input(input.name.as_str(), input.stage_order)?;

    let stage = StageRepo::create(&state.pool, &input).await?;

    tracing::info!(stage_id = stage.id, user_id = admin.user_id, "Stage created");
    log_action(
        &state.pool,
        &admin,
        action_types::CREATE,
        entity_types::FORMATIVE_STAGE,
        Some(stage.id),
        Some(json!({ "name": stage.name })),
    )
    .await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: stage })))
}

/// PUT /api/v1/formative-stages/{id}
///
/// Partial update; omitted fields are left unchanged. Admin only.
pub async fn update_stage(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(stage_id): Path<DbId>,
    Json(input): Json<UpdateStage>,
) -> AppResult<impl IntoResponse> {
    if let Some(order) = input.stage_order {
        if order < 1 {
            return Err(AppError::Core(CoreError::Validation(
                "Stage order must be a positive integer".into(),
            )));
        }
    }
    if let Some(name) = &input.name {
        if name.trim().is_empty() {
            return Err(AppError::Core(CoreError::Validation(
                "Stage name must not be empty".into(),
            )));
        }
    }

    let stage = StageRepo::update(&state.pool, stage_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "FormativeStage",
            id: stage_id,
        }))?;

    tracing::info!(stage_id, user_id = admin.user_id, "Stage updated");
    log_action(
        &state.pool,
        &admin,
        action_types::UPDATE,
        entity_types::FORMATIVE_STAGE,
        Some(stage_id),
        None,
    )
    .await;

    Ok(Json(DataResponse { data: stage }))
}

/// DELETE /api/v1/formative-stages/{id}
///
/// Delete a catalog stage. Admin only. Blocked while any cycle still
/// references the stage.
pub async fn delete_stage(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(stage_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let cycle_count = CycleRepo::count_by_stage(&state.pool, stage_id).await?;
    if cycle_count > 0 {
        return Err(AppError::BadRequest(format!(
            "Cannot delete stage with {cycle_count} associated cycle(s). Delete the cycles first."
        )));
    }

    let deleted = StageRepo::delete(&state.pool, stage_id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "FormativeStage",
            id: stage_id,
        }));
    }

    tracing::info!(stage_id, user_id = admin.user_id, "Stage deleted");
    log_action(
        &state.pool,
        &admin,
        action_types::DELETE,
        entity_types::FORMATIVE_STAGE,
        Some(stage_id),
        None,
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}

/// Shared validation for stage create input.
fn validate_stage_input(name: &str, stage_order: i32) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Stage name must not be empty".into(),
        )));
    }
    if stage_order < 1 {
        return Err(AppError::Core(CoreError::Validation(
            "Stage order must be a positive integer".into(),
        )));
    }
    Ok(())
}
