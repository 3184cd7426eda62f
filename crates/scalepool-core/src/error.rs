//! Error types for the pool's core data model.
//!
//! Plain enums implementing `Display` + `std::error::Error`, matching
//! `gvthread_core::error::SchedError` — the teacher ships no error-derive
//! dependency and neither do we.

use core::fmt;

/// Result type for core-layer operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised while building or validating the pool's core data model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// `initial_size` was zero or exceeded `MAX_WORKERS`.
    InvalidWorkerCount(usize),

    /// The controller-parameter string (§6) was malformed.
    MalformedParamString(String),

    /// A `submit` call carried a null function reference.
    NullFunction,
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::InvalidWorkerCount(n) => {
                write!(f, "invalid initial worker count: {n}")
            }
            CoreError::MalformedParamString(s) => {
                write!(f, "malformed controller-parameter string: {s:?}")
            }
            CoreError::NullFunction => write!(f, "submit called with a null function"),
        }
    }
}

impl std::error::Error for CoreError {}
