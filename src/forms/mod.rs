//! Form definitions backing the dashboard actions.
//!
//! Forms carry raw user input. Each one validates with `validator` and is
//! converted into a typed payload before any service touches the store.

use thiserror::Error;
use validator::ValidationErrors;

use crate::domain::types::TypeConstraintError;

pub mod auth;
pub mod client;
pub mod crew;
pub mod visit;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("invalid email address")]
    InvalidEmail,

    #[error("invalid identifier")]
    InvalidId,

    #[error("invalid name")]
    InvalidName,

    #[error("invalid address")]
    InvalidAddress,

    #[error("invalid phone number")]
    InvalidPhoneNumber,

    #[error("invalid date")]
    InvalidDate,

    #[error("invalid value: {0}")]
    InvalidValue(String),

    #[error("csv error: {0}")]
    Csv(String),
}

impl From<csv::Error> for FormError {
    fn from(err: csv::Error) -> Self {
        FormError::Csv(err.to_string())
    }
}

/// Maps a constraint failure on a categorical field to [`FormError::InvalidValue`].
pub(crate) fn invalid_value(err: TypeConstraintError) -> FormError {
    FormError::InvalidValue(err.to_string())
}
