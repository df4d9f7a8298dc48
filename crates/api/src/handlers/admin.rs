//! Handlers for the `/admin` resource (user provisioning, audit log).

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use formativa_core::audit::{action_types, entity_types};
use formativa_core::error::CoreError;
use formativa_db::models::audit::AuditQuery;
use formativa_db::models::user::{CreateUser, CreateUserRequest};
use formativa_db::repositories::{AuditLogRepo, RoleRepo, UserRepo};
use serde_json::json;

use crate::audit::log_action;
use crate::auth::password::{hash_password, validate_password_strength};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Minimum password length for newly provisioned accounts.
const MIN_PASSWORD_LENGTH: usize = 8;

/// GET /api/v1/admin/users
///
/// List users in the admin's tenant.
pub async fn list_users(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let users = UserRepo::list_responses(&state.pool, admin.tenant_scope()).await?;

    Ok(Json(DataResponse { data: users }))
}

/// POST /api/v1/admin/users
///
/// Provision a user. The role must be one of the seeded role names; the
/// `uq_users_username` / `uq_users_email` constraints reject duplicates
/// with 409.
pub async fn create_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<impl IntoResponse> {
    if input.username.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Username must not be empty".into(),
        )));
    }

    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let role = RoleRepo::find_by_name(&state.pool, &input.role)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Validation(format!(
                "Unknown role: {}",
                input.role
            )))
        })?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    // Non-superadmins can only provision into their own tenant.
    let tenant_id = match admin.tenant_scope() {
        Some(t) => Some(t),
        None => input.tenant_id,
    };

    let create = CreateUser {
        username: input.username,
        email: input.email,
        full_name: input.full_name,
        password_hash,
        role_id: role.id,
        tenant_id,
    };
    let user = UserRepo::create(&state.pool, &create).await?;

    tracing::info!(new_user_id = user.id, admin_id = admin.user_id, "User created");
    log_action(
        &state.pool,
        &admin,
        action_types::CREATE,
        entity_types::USER,
        Some(user.id),
        Some(json!({ "username": user.username, "role": input.role })),
    )
    .await;

    let response = UserRepo::find_response(&state.pool, user.id)
        .await?
        .ok_or_else(|| AppError::InternalError("Created user vanished".into()))?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: response })))
}

/// GET /api/v1/admin/audit-logs
///
/// Query the audit trail with optional filters, newest first.
pub async fn list_audit_logs(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<AuditQuery>,
) -> AppResult<impl IntoResponse> {
    let entries = AuditLogRepo::query(&state.pool, &params).await?;
    let total = AuditLogRepo::count(&state.pool, &params).await?;

    Ok(Json(json!({ "data": entries, "total": total })))
}
