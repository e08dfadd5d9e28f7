use thiserror::Error;

use crate::forms::FormError;
use crate::repository::errors::RepositoryError;

/// Failures surfaced to the caller of a service operation.
///
/// None of them is fatal; the operation is aborted and the store keeps its
/// previous state.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Input rejected before any mutation.
    #[error("{0}")]
    Form(String),

    /// Referenced entity is not in the store.
    #[error("not found")]
    NotFound,

    #[error("type constraint violated: {0}")]
    TypeConstraint(String),

    /// Credentials did not match an active user.
    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("repository error: {0}")]
    Repository(RepositoryError),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound,
            other => ServiceError::Repository(other),
        }
    }
}

impl From<FormError> for ServiceError {
    fn from(err: FormError) -> Self {
        ServiceError::Form(err.to_string())
    }
}
