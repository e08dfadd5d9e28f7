//! Operations behind every dashboard action.
//!
//! Services are generic over the repository traits they need, so the same
//! code runs against [`crate::repository::InMemoryRepository`] and the mocks.

pub mod clients;
pub mod crews;
pub mod dashboard;
pub mod errors;
pub mod visits;

pub use errors::{ServiceError, ServiceResult};
