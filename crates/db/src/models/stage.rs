//! Formative stage (catalog) model and DTOs.

use formativa_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `formative_stages` table.
///
/// The column is `stage_order` (ORDER is awkward in SQL) but the wire
/// field stays `order`, matching the catalog's public contract.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FormativeStage {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "order")]
    pub stage_order: i32,
    pub estimated_duration: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for creating a stage.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateStage {
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "order")]
    pub stage_order: i32,
    pub estimated_duration: Option<String>,
}

/// Request body for updating a stage. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStage {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "order")]
    pub stage_order: Option<i32>,
    pub estimated_duration: Option<String>,
}

/// Query parameters for the stage listing.
#[derive(Debug, Deserialize)]
pub struct StageListParams {
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
