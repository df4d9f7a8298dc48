//! Stage cycle model and DTOs.

use chrono::NaiveDate;
use formativa_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A raw row from the `stage_cycles` table.
#[derive(Debug, Clone, FromRow)]
pub struct StageCycle {
    pub id: DbId,
    pub formative_stage_id: DbId,
    pub tenant_id: Option<DbId>,
    pub name: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: String,
    pub max_participants: Option<i32>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A cycle enriched with its stage name and participant count, as
/// returned by every read endpoint.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CycleDetail {
    pub id: DbId,
    pub formative_stage_id: DbId,
    pub tenant_id: Option<DbId>,
    pub name: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: String,
    pub max_participants: Option<i32>,
    pub stage_name: Option<String>,
    /// Derived: number of participation rows referencing this cycle.
    pub participants_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for creating a cycle.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCycle {
    pub formative_stage_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Defaults to `planned` when omitted.
    pub status: Option<String>,
    pub max_participants: Option<i32>,
}

/// Request body for updating a cycle. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCycle {
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: Option<String>,
    pub max_participants: Option<i32>,
}

/// Query parameters for the cycle listing.
#[derive(Debug, Deserialize)]
pub struct CycleListParams {
    pub stage_id: Option<DbId>,
    pub status: Option<String>,
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
