pub mod audit;
pub mod cycle;
pub mod participation;
pub mod role;
pub mod session;
pub mod stage;
pub mod user;
