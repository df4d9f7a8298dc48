//! Participation ledger models and DTOs.

use formativa_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::BTreeMap;

/// A raw row from the `stage_participations` table.
#[derive(Debug, Clone, FromRow)]
pub struct StageParticipation {
    pub id: DbId,
    pub user_id: DbId,
    pub cycle_id: DbId,
    pub tenant_id: Option<DbId>,
    pub enrollment_date: Timestamp,
    pub status: String,
    pub completion_date: Option<Timestamp>,
    pub notes: Option<String>,
    pub evaluation_notes: Option<String>,
    pub evaluated_by_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A participation enriched with user, cycle, and stage data, as returned
/// by every read endpoint. Replaces the N+1 enrichment lookups the
/// frontend used to trigger with a single JOIN.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ParticipationDetail {
    pub id: DbId,
    pub user_id: DbId,
    pub cycle_id: DbId,
    pub tenant_id: Option<DbId>,
    pub enrollment_date: Timestamp,
    pub status: String,
    pub completion_date: Option<Timestamp>,
    pub notes: Option<String>,
    pub evaluation_notes: Option<String>,
    pub evaluated_by_id: Option<DbId>,
    pub evaluated_by_name: Option<String>,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    pub user_photo_url: Option<String>,
    pub cycle_name: Option<String>,
    pub stage_id: Option<DbId>,
    pub stage_name: Option<String>,
    pub stage_order: Option<i32>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for enrolling a user into a cycle.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateParticipation {
    pub user_id: DbId,
    pub cycle_id: DbId,
    /// Defaults to now when omitted.
    pub enrollment_date: Option<Timestamp>,
    pub notes: Option<String>,
}

/// Request body for the generic participation update endpoint.
///
/// Status changes submitted here are validated against the central
/// transition table before anything is written. `completion_date` is not
/// accepted here; it is stamped server-side when a participation moves
/// into an evaluated status, and stays null otherwise.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateParticipation {
    pub status: Option<String>,
    pub notes: Option<String>,
    pub evaluation_notes: Option<String>,
}

/// Request body for the approve / reprove endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EvaluateRequest {
    pub evaluation_notes: Option<String>,
}

/// Fields written when a participation is evaluated.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub status: String,
    pub completion_date: Timestamp,
    pub evaluated_by_id: DbId,
    pub evaluation_notes: Option<String>,
}

/// Query parameters for the participation listing.
#[derive(Debug, Deserialize)]
pub struct ParticipationListParams {
    pub cycle_id: Option<DbId>,
    pub user_id: Option<DbId>,
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Query parameter for the per-cycle participant listing.
#[derive(Debug, Deserialize)]
pub struct CycleParticipantsParams {
    pub status: Option<String>,
}

/// Aggregated participation statistics for the overview endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ParticipationStats {
    /// Count per status; every known status is present, zero-filled.
    pub by_status: BTreeMap<String, i64>,
    pub unique_users_in_journey: i64,
    pub active_cycles: i64,
    pub total_participations: i64,
}

/// A user's full journey: ordered participation history plus the
/// aggregated figures from the journey fold.
#[derive(Debug, Clone, Serialize)]
pub struct JourneySummary {
    pub user_id: DbId,
    pub user_name: String,
    pub user_email: String,
    pub current_stage: Option<String>,
    pub current_cycle: Option<String>,
    pub participations: Vec<ParticipationDetail>,
    pub total_stages_completed: i64,
    pub journey_progress_percent: i32,
}
