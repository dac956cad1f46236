//! Tick-driven control loop: drain async completions, sweep expiry,
//! evict to make room, then dispatch the configured executor.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc::unbounded_channel;
use tokio::sync::Notify;

use crate::cache::Cache;
use crate::clock::Clock;
use crate::config::CacheConfig;
use crate::error::ErrorClassification;
use crate::executor::{run_async_tick, run_sync_tick};
use crate::logging::{Level, LogSink};
use crate::queue::Queue;

/// Cooperative cancellation signal for [`run_scheduler`].
///
/// Cloning shares the same underlying flag and waker, so a caller keeps
/// one token and hands clones to whichever task drives the scheduler.
#[derive(Clone)]
pub(crate) struct CancelToken {
    cancelled: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl CancelToken {
    pub(crate) fn new() -> Self {
        Self { cancelled: Arc::new(AtomicBool::new(false)), notify: Arc::new(Notify::new()) }
    }

    pub(crate) fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    async fn cancelled(&self) {
        if self.is_cancelled() {
            return;
        }
        self.notify.notified().await;
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Drives ticks until `cancel` fires. Cancellation stops the ticker and
/// returns; any in-flight async handlers are left to finish on their own —
/// the scheduler never blocks waiting for them.
pub(crate) async fn run_scheduler<T, C>(
    cache: Arc<Cache<T, C>>,
    queue: Arc<Queue<T>>,
    config: Arc<CacheConfig>,
    log: Arc<dyn LogSink>,
    cancel: CancelToken,
) where
    C: Clock,
{
    let (completions_tx, mut completions_rx) = unbounded_channel();
    let mut ticker = tokio::time::interval(config.time_tick());
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {},
            _ = cancel.cancelled() => break,
        }

        while let Ok((id, success)) = completions_rx.try_recv() {
            cache.change_values(&id, success);
        }

        let expired = cache.sweep_expired();
        if expired > 0 {
            log.write(Level::Warning, &format!("sweep_expired removed {expired} entries"));
        }

        if cache.size() >= config.max_size() {
            let evictions = if config.is_async() { config.async_threads() } else { 1 };
            if let Err(err) = cache.evict_oldest(evictions) {
                log.write(err.severity().into(), &err.to_string());
                continue;
            }
        }

        if config.is_async() {
            run_async_tick(&cache, &queue, log.as_ref(), config.async_threads(), &completions_tx);
        } else {
            run_sync_tick(&cache, &queue, log.as_ref());
        }
    }
}

impl From<crate::error::ErrorSeverity> for Level {
    fn from(severity: crate::error::ErrorSeverity) -> Self {
        match severity {
            crate::error::ErrorSeverity::Info | crate::error::ErrorSeverity::Warning => {
                Level::Warning
            }
            crate::error::ErrorSeverity::Error | crate::error::ErrorSeverity::Critical => {
                Level::Error
            }
        }
    }
}
