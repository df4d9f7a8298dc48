//! HTTP handlers, one module per resource.

pub mod admin;
pub mod auth;
pub mod cycle;
pub mod participation;
pub mod stage;
pub mod user;
