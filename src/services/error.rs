//! Domain errors
//!
//! Messages are client-visible and keep the wording existing clients expect.

use thiserror::Error;

use crate::db::StoreError;

#[derive(Debug, Error)]
pub enum LibraryError {
    /// Missing or malformed fields
    #[error("{0}")]
    InvalidInput(String),

    /// Referenced entity does not exist
    #[error("{0}")]
    NotFound(String),

    /// Uniqueness or referential-integrity violation
    #[error("{0}")]
    Conflict(String),

    /// Backing store failure
    #[error("{0}")]
    StoreUnavailable(String),
}

impl LibraryError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        LibraryError::InvalidInput(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        LibraryError::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        LibraryError::Conflict(msg.into())
    }

    /// Short machine-readable tag, used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            LibraryError::InvalidInput(_) => "invalid_input",
            LibraryError::NotFound(_) => "not_found",
            LibraryError::Conflict(_) => "conflict",
            LibraryError::StoreUnavailable(_) => "store_unavailable",
        }
    }
}

/// Constraint violations that slip past the service checks (concurrent
/// writers) are still conflicts from the caller's point of view.
impl From<StoreError> for LibraryError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation(detail) | StoreError::ForeignKeyViolation(detail) => {
                tracing::warn!(%detail, "Store constraint rejected write");
                LibraryError::Conflict(
                    "La operación viola una restricción de integridad".to_string(),
                )
            }
            StoreError::Unavailable(detail) => {
                tracing::error!(%detail, "Store call failed");
                LibraryError::StoreUnavailable(detail)
            }
        }
    }
}

pub type LibraryResult<T> = Result<T, LibraryError>;
