//! Well-known role name constants.
//!
//! These must match the seed data in the roles migration.

pub const ROLE_SUPERADMIN: &str = "superadmin";
pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_FORMADOR: &str = "formador";
pub const ROLE_USER: &str = "user";

/// Whether a role may administer the stage catalog, cycle registry, and
/// participation evaluations.
pub fn is_admin(role: &str) -> bool {
    role == ROLE_ADMIN || role == ROLE_SUPERADMIN
}

/// Whether a role may enroll learners into cycles.
///
/// Formadores can enroll the learners they mentor; admins can enroll anyone.
pub fn can_enroll(role: &str) -> bool {
    is_admin(role) || role == ROLE_FORMADOR
}
