//! Shared domain types for the formativa backend.
//!
//! This crate has no internal dependencies so it can be used by the
//! repository layer, the API, and any future CLI tooling alike. It holds
//! the things every other crate agrees on: id/timestamp aliases, the
//! domain error type, role and audit constants, and the participation /
//! cycle state machines together with the journey aggregation fold.

pub mod audit;
pub mod cycle;
pub mod error;
pub mod journey;
pub mod participation;
pub mod roles;
pub mod types;
