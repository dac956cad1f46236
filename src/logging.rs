//! Logging collaborator consumed by the scheduler and executors.
//!
//! The core never owns a logging implementation; it is supplied at
//! construction via [`CacheConfig::with_logging`](crate::config::WorkCacheBuilder::with_logging)
//! and invoked only at the two severities the core ever needs.

/// Severity of a log write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Warning,
    Error,
}

/// Single-method logging capability the core consumes.
///
/// Implementations return `true` if the message was accepted for delivery.
/// The core never inspects the return value beyond propagating it through
/// `write`; a sink that always returns `false` is still safe to use.
pub trait LogSink: Send + Sync {
    fn write(&self, level: Level, message: &str) -> bool;
}

/// Default sink installed when no caller-supplied sink is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogSink;

impl LogSink for NoopLogSink {
    fn write(&self, _level: Level, _message: &str) -> bool {
        true
    }
}

/// Forwards writes to the `tracing` crate at the matching level.
#[cfg(feature = "observability")]
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogSink;

#[cfg(feature = "observability")]
impl LogSink for TracingLogSink {
    fn write(&self, level: Level, message: &str) -> bool {
        match level {
            Level::Warning => tracing::warn!("{}", message),
            Level::Error => tracing::error!("{}", message),
        }
        true
    }
}
