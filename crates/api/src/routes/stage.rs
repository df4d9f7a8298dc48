//! Route definitions for the stage catalog.

use axum::routing::get;
use axum::Router;

use crate::handlers::stage;
use crate::state::AppState;

/// Routes mounted at `/formative-stages`.
///
/// ```text
/// GET    /        -> list_stages
/// POST   /        -> create_stage (admin)
/// GET    /{id}    -> get_stage
/// PUT    /{id}    -> update_stage (admin)
/// DELETE /{id}    -> delete_stage (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(stage::list_stages).post(stage::create_stage))
        .route(
            "/{id}",
            get(stage::get_stage)
                .put(stage::update_stage)
                .delete(stage::delete_stage),
        )
}
