//! Route definitions for admin-only endpoints.

use axum::routing::get;
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// GET  /users         -> list_users (admin)
/// POST /users         -> create_user (admin)
/// GET  /audit-logs    -> list_audit_logs (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(admin::list_users).post(admin::create_user))
        .route("/audit-logs", get(admin::list_audit_logs))
}
