//! Domain aggregates of the garden maintenance dashboard.

pub mod client;
pub mod crew;
pub mod types;
pub mod user;
pub mod visit;
