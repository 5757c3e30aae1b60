use thiserror::Error;

use crate::store::StoreError;

/// Failure conditions surfaced by the engine and request handlers.
///
/// Transport code decides how each variant is presented; nothing here knows
/// about status codes.
#[derive(Debug, Error)]
pub enum TriviaError {
    /// Malformed or missing input: page number, search term, create fields, quiz fields.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Unknown id, page beyond range, empty category, empty category list.
    #[error("not found: {0}")]
    NotFound(String),

    /// Well-formed request that failed against the store.
    #[error("unprocessable: {0}")]
    Unprocessable(#[from] StoreError),
}

impl TriviaError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        TriviaError::InvalidArgument(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        TriviaError::NotFound(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, TriviaError>;
