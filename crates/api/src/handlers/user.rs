//! Handlers for the `/users` directory (enrollment choices).

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use formativa_core::error::CoreError;
use formativa_core::types::DbId;
use formativa_db::repositories::UserRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireFormador;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/users
///
/// List users in the caller's tenant. Formador or admin; this is the
/// directory enrollments pick from.
pub async fn list_users(
    RequireFormador(actor): RequireFormador,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let users = UserRepo::list_responses(&state.pool, actor.tenant_scope()).await?;

    Ok(Json(DataResponse { data: users }))
}

/// GET /api/v1/users/{id}
pub async fn get_user(
    RequireFormador(actor): RequireFormador,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    // Tenant check first so cross-tenant ids read as absent.
    UserRepo::find_scoped(&state.pool, user_id, actor.tenant_scope())
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user_id,
        }))?;

    let user = UserRepo::find_response(&state.pool, user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user_id,
        }))?;

    Ok(Json(DataResponse { data: user }))
}
