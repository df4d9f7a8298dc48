pub mod admin;
pub mod auth;
pub mod cycle;
pub mod health;
pub mod participation;
pub mod stage;
pub mod user;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                      login (public)
/// /auth/refresh                                    refresh (public)
/// /auth/logout                                     logout (requires auth)
///
/// /formative-stages                                list, create
/// /formative-stages/{id}                           get, update, delete
///
/// /stage-cycles                                    list, create
/// /stage-cycles/active                             active cycles (GET)
/// /stage-cycles/by-stage/{stage_id}                cycles of one stage (GET)
/// /stage-cycles/{id}                               get, update, delete
///
/// /stage-participations                            list, enroll
/// /stage-participations/cycle/{cycle_id}           cycle participants (GET)
/// /stage-participations/user/{user_id}/journey     journey summary (GET)
/// /stage-participations/stats/overview             statistics (GET)
/// /stage-participations/{id}                       get, update, delete
/// /stage-participations/{id}/approve               approve (POST)
/// /stage-participations/{id}/reprove               reprove (POST)
///
/// /users                                           list (formador or admin)
/// /users/{id}                                      get
///
/// /admin/users                                     list, create (admin only)
/// /admin/audit-logs                                audit trail (admin only)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication routes (login, refresh, logout).
        .nest("/auth", auth::router())
        // Stage catalog.
        .nest("/formative-stages", stage::router())
        // Cycle registry.
        .nest("/stage-cycles", cycle::router())
        // Participation ledger, journeys, and stats.
        .nest("/stage-participations", participation::router())
        // User directory for enrollment.
        .nest("/users", user::router())
        // Admin: user provisioning + audit trail.
        .nest("/admin", admin::router())
}
