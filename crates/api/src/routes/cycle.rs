//! Route definitions for the cycle registry.

use axum::routing::get;
use axum::Router;

use crate::handlers::cycle;
use crate::state::AppState;

/// Routes mounted at `/stage-cycles`.
///
/// ```text
/// GET    /                        -> list_cycles
/// POST   /                        -> create_cycle (admin)
/// GET    /active                  -> list_active_cycles
/// GET    /by-stage/{stage_id}     -> list_cycles_by_stage
/// GET    /{id}                    -> get_cycle
/// PUT    /{id}                    -> update_cycle (admin)
/// DELETE /{id}                    -> delete_cycle (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(cycle::list_cycles).post(cycle::create_cycle))
        .route("/active", get(cycle::list_active_cycles))
        .route("/by-stage/{stage_id}", get(cycle::list_cycles_by_stage))
        .route(
            "/{id}",
            get(cycle::get_cycle)
                .put(cycle::update_cycle)
                .delete(cycle::delete_cycle),
        )
}
