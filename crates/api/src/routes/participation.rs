//! Route definitions for the participation ledger.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::participation;
use crate::state::AppState;

/// Routes mounted at `/stage-participations`.
///
/// The static segments (`/cycle`, `/user`, `/stats`) are registered before
/// `/{id}` so axum never tries to parse them as ids.
///
/// ```text
/// GET    /                            -> list_participations
/// POST   /                            -> enroll (formador or admin)
/// GET    /cycle/{cycle_id}            -> list_cycle_participants
/// GET    /user/{user_id}/journey      -> get_user_journey
/// GET    /stats/overview              -> stats_overview
/// GET    /{id}                        -> get_participation
/// PUT    /{id}                        -> update_participation (admin)
/// DELETE /{id}                        -> delete_participation (admin)
/// POST   /{id}/approve                -> approve (admin)
/// POST   /{id}/reprove                -> reprove (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(participation::list_participations).post(participation::enroll),
        )
        .route(
            "/cycle/{cycle_id}",
            get(participation::list_cycle_participants),
        )
        .route(
            "/user/{user_id}/journey",
            get(participation::get_user_journey),
        )
        .route("/stats/overview", get(participation::stats_overview))
        .route(
            "/{id}",
            get(participation::get_participation)
                .put(participation::update_participation)
                .delete(participation::delete_participation),
        )
        .route("/{id}/approve", post(participation::approve))
        .route("/{id}/reprove", post(participation::reprove))
}
