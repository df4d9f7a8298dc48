//! Audit trail helper for mutation handlers.
//!
//! Every mutation records who did what to which entity. Audit writes must
//! never fail the request that triggered them; failures are logged and
//! swallowed.

use formativa_core::types::DbId;
use formativa_db::models::audit::CreateAuditLog;
use formativa_db::repositories::{AuditLogRepo, UserRepo};
use formativa_db::DbPool;

use crate::middleware::auth::AuthUser;

/// Record an audit entry for an action performed by `actor`.
///
/// The actor's display name is denormalized into the entry so the trail
/// stays readable after the user is deleted.
pub async fn log_action(
    pool: &DbPool,
    actor: &AuthUser,
    action_type: &str,
    entity_type: &str,
    entity_id: Option<DbId>,
    details: Option<serde_json::Value>,
) {
    let user_name = match UserRepo::find_by_id(pool, actor.user_id).await {
        Ok(user) => user.map(|u| u.full_name),
        Err(err) => {
            tracing::warn!(error = %err, user_id = actor.user_id, "Audit actor lookup failed");
            None
        }
    };

    let entry = CreateAuditLog {
        user_id: Some(actor.user_id),
        user_name,
        action_type: action_type.to_string(),
        entity_type: Some(entity_type.to_string()),
        entity_id,
        details_json: details,
    };

    if let Err(err) = AuditLogRepo::create(pool, &entry).await {
        tracing::warn!(error = %err, action_type, entity_type, "Failed to write audit log");
    }
}
