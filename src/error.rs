//! Error types for the work-cache.
//!
//! Every fallible core operation returns [`CacheError`]. Each variant
//! implements [`ErrorClassification`] so callers and the scheduler's own
//! internal error handling can make retry/logging decisions without
//! matching on variants directly.

use std::fmt;

use thiserror::Error;

use crate::item::Id;

/// Standard result type for fallible cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Errors surfaced by the work-cache core.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// A construction option was out of its valid range, or the
    /// async-threads/max-size relation was violated.
    #[error("invalid cache configuration: {0}")]
    BadConfig(String),

    /// Admission rejected because an entry with the same id is currently
    /// executing.
    #[error("entry '{0}' collides with an in-flight execution")]
    CollidesWithInFlight(Id),

    /// Admission rejected because the incoming payload compares equal to
    /// the cached one.
    #[error("entry '{0}' already holds an identical payload")]
    DuplicatePayload(Id),

    /// Eviction found no entry eligible for removal.
    #[error("no cache entry is eligible for eviction")]
    NothingEvictable,
}

impl ErrorClassification for CacheError {
    fn is_retryable(&self) -> bool {
        matches!(self, Self::CollidesWithInFlight(_) | Self::NothingEvictable)
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::BadConfig(_) => ErrorSeverity::Error,
            Self::CollidesWithInFlight(_) => ErrorSeverity::Warning,
            Self::NothingEvictable => ErrorSeverity::Warning,
            Self::DuplicatePayload(_) => ErrorSeverity::Info,
        }
    }

    fn is_critical(&self) -> bool {
        false
    }
}

/// Standard interface for classifying errors by retryability and severity.
///
/// Scheduler-internal failures (admission during autonomous dispatch,
/// eviction failures) are logged at the level implied by `severity()` and
/// swallowed; caller-invoked operations return the error directly.
pub trait ErrorClassification {
    /// Whether retrying the same operation later could plausibly succeed.
    fn is_retryable(&self) -> bool;

    /// Severity bucket used to choose a `LogSink` level.
    fn severity(&self) -> ErrorSeverity;

    /// Whether this error indicates a broken invariant rather than an
    /// expected, recoverable condition.
    fn is_critical(&self) -> bool;
}

/// Severity levels used for monitoring and logging decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}
