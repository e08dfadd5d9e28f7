//! Error conversion glue between the domain layer and the application layers.
//!
//! The domain layer must not depend on service/repository error types, so the
//! conversions live here.

use crate::domain::types::TypeConstraintError;
use crate::domain::visit::VisitRuleError;
use crate::repository::errors::RepositoryError;
use crate::services::errors::ServiceError;
use crate::session::StorageError;

impl From<TypeConstraintError> for ServiceError {
    fn from(val: TypeConstraintError) -> Self {
        ServiceError::TypeConstraint(val.to_string())
    }
}

impl From<TypeConstraintError> for RepositoryError {
    fn from(val: TypeConstraintError) -> Self {
        RepositoryError::ValidationError(val.to_string())
    }
}

impl From<VisitRuleError> for ServiceError {
    fn from(val: VisitRuleError) -> Self {
        ServiceError::Form(val.to_string())
    }
}

impl From<StorageError> for ServiceError {
    fn from(val: StorageError) -> Self {
        ServiceError::Internal(val.to_string())
    }
}
