//! Errors raised while registering or reading a trace capability.

use core::fmt;

pub type TraceResult<T> = Result<T, TraceError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceError {
    /// The underlying tracing facility could not be reached (e.g. the
    /// kernel module's device node is missing, or `ptrace` attach failed).
    Unavailable(String),
    /// `register` was called with an empty syscall list or a target pid
    /// that does not exist.
    RegistrationFailed(String),
}

impl fmt::Display for TraceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceError::Unavailable(msg) => write!(f, "trace capability unavailable: {msg}"),
            TraceError::RegistrationFailed(msg) => write!(f, "trace registration failed: {msg}"),
        }
    }
}

impl std::error::Error for TraceError {}
