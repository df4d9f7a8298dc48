//! Audit logging constants.
//!
//! Lives in `core` (zero internal deps) so both the API layer and the
//! repository layer agree on the vocabulary written to `audit_logs`.

/// Known action types for audit log entries.
pub mod action_types {
    pub const LOGIN: &str = "login";
    pub const LOGOUT: &str = "logout";
    pub const CREATE: &str = "create";
    pub const UPDATE: &str = "update";
    pub const DELETE: &str = "delete";
    pub const APPROVE: &str = "approve";
    pub const REPROVE: &str = "reprove";
}

/// Known entity types referenced by audit log entries.
pub mod entity_types {
    pub const USER: &str = "user";
    pub const FORMATIVE_STAGE: &str = "formative_stage";
    pub const STAGE_CYCLE: &str = "stage_cycle";
    pub const STAGE_PARTICIPATION: &str = "stage_participation";
}
