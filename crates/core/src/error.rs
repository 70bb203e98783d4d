//! Error taxonomy shared by every service.
//!
//! Four failure classes cover the whole system: a referenced entity does
//! not exist, a business rule was violated, the request payload failed
//! field validation, or the storage layer failed. The HTTP mapping of
//! each class lives in `api-rest`.

/// Domain-level failure raised by repositories and services.
#[derive(Debug, thiserror::Error)]
pub enum HospitalError {
    /// A referenced entity id (or lookup key) does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// A business rule rejected the operation (status guard, uniqueness
    /// pre-check, referential guard).
    #[error("{0}")]
    Conflict(String),

    /// One or more request fields failed shape/format/range validation.
    /// Each entry is a `field: message` pair.
    #[error("validation failed")]
    Validation(Vec<String>),

    /// Anything the storage layer raised that no rule anticipated.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl HospitalError {
    /// Not-found error for an entity referenced by numeric id.
    pub fn not_found(entity: &str, id: i64) -> Self {
        Self::NotFound(format!("{entity} with id {id}"))
    }

    /// Not-found error for an entity referenced by an arbitrary key.
    pub fn not_found_by(entity: &str, key: &str, value: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("{entity} with {key} {value}"))
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }
}

pub type HospitalResult<T> = std::result::Result<T, HospitalError>;
