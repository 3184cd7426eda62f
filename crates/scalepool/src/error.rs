//! The facade's error type, folding `scalepool_core::CoreError` and
//! `scalepool_trace::TraceError` into one enum per crate-boundary, matching
//! `gvthread::SchedError`'s `From<MemoryError>` / `From<WorkerError>` style.

use core::fmt;
use scalepool_core::CoreError;
use scalepool_trace::TraceError;

pub type PoolResult<T> = Result<T, PoolError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    Core(CoreError),
    Trace(TraceError),
}

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolError::Core(e) => write!(f, "{e}"),
            PoolError::Trace(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for PoolError {}

impl From<CoreError> for PoolError {
    fn from(e: CoreError) -> Self {
        PoolError::Core(e)
    }
}

impl From<TraceError> for PoolError {
    fn from(e: TraceError) -> Self {
        PoolError::Trace(e)
    }
}
