//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role does not
//! meet the minimum requirement. Use these in route handlers to enforce
//! authorization at the type level.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use formativa_core::error::CoreError;
use formativa_core::roles::{can_enroll, is_admin};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `admin` or `superadmin` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(user): RequireAdmin) -> AppResult<Json<()>> {
///     // user is guaranteed to be an admin here
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !is_admin(&user.role) {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin role required".into(),
            )));
        }
        Ok(RequireAdmin(user))
    }
}

/// Requires `formador` or an admin role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn formador_or_admin(RequireFormador(user): RequireFormador) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireFormador(pub AuthUser);

impl FromRequestParts<AppState> for RequireFormador {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !can_enroll(&user.role) {
            return Err(AppError::Core(CoreError::Forbidden(
                "Formador or Admin role required".into(),
            )));
        }
        Ok(RequireFormador(user))
    }
}
