//! Request-scoped middleware: authentication and RBAC extractors.

pub mod auth;
pub mod rbac;
