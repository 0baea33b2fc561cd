//! Error taxonomy shared by the core components.
//!
//! Every failure surfaces to the caller unchanged; the HTTP layer owns the
//! mapping to status codes and the core never retries.

use crate::auth::token::TokenError;
use crate::roster::store::StoreError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// Session validation failed. Checked strictly before any role check so a
    /// caller without a valid session never learns whether policy would have
    /// allowed the operation.
    #[error("authentication required: {0}")]
    Unauthenticated(#[from] TokenError),
    #[error("forbidden")]
    Forbidden,
    #[error("not found")]
    NotFound,
    #[error("identity already registered")]
    DuplicateIdentity,
    #[error("target account has the wrong role for this operation")]
    RoleMismatch,
    #[error("invalid input: {0}")]
    Validation(String),
    /// Unknown email and wrong password share this kind to avoid account
    /// enumeration.
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("storage unavailable")]
    StorageUnavailable,
}

impl From<StoreError> for Error {
    fn from(_: StoreError) -> Self {
        // The store has already exhausted its bounded retries by the time an
        // error reaches the core.
        Self::StorageUnavailable
    }
}
