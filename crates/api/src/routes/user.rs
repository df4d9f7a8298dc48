//! Route definitions for the user directory.

use axum::routing::get;
use axum::Router;

use crate::handlers::user;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// GET /        -> list_users (formador or admin)
/// GET /{id}    -> get_user (formador or admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(user::list_users))
        .route("/{id}", get(user::get_user))
}
