//! Domain-level error type shared across crates.

use crate::types::DbId;

/// Errors produced by domain logic and repositories.
///
/// The API layer maps each variant onto an HTTP status in its own
/// `AppError` type; nothing in this crate knows about HTTP.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// An entity lookup failed.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// Input failed a domain validation rule.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The request conflicts with current state (e.g. an illegal
    /// status transition or a duplicate enrollment).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Missing or invalid credentials.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated but not allowed.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Unexpected internal failure.
    #[error("internal error: {0}")]
    Internal(String),
}
