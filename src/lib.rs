//! An in-process work-cache with a staging queue and an autonomous,
//! tick-driven execution loop.
//!
//! Producers enqueue uniquely-identified [`Item`]s, each carrying an
//! opaque payload and a handler. A background tick drains the queue into
//! a bounded cache, runs handlers one-at-a-time or with a bounded
//! concurrent pool, tracks per-item execution state, retries failures,
//! evicts stale or completed items, and enforces a hard TTL.
//!
//! # Feature Tiers
//!
//! - `foundation`: error types and the core data model (queue, cache,
//!   entries, comparator capability).
//! - `observability`: adds a [`logging::TracingLogSink`] on top of the
//!   no-op default.
//! - `runtime`: adds the tokio-driven executors and the autonomous
//!   scheduler behind [`WorkCache::start_automatic_execution`].

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

#[cfg(feature = "foundation")]
mod cache;
#[cfg(feature = "foundation")]
pub mod clock;
#[cfg(feature = "foundation")]
mod config;
#[cfg(feature = "foundation")]
mod entry;
#[cfg(feature = "foundation")]
pub mod error;
#[cfg(feature = "runtime")]
mod executor;
#[cfg(feature = "foundation")]
pub mod item;
#[cfg(feature = "foundation")]
pub mod logging;
#[cfg(feature = "foundation")]
mod queue;
#[cfg(feature = "runtime")]
mod scheduler;
#[cfg(feature = "foundation")]
mod stats;

#[cfg(feature = "foundation")]
pub use clock::{Clock, MockClock, SystemClock};
#[cfg(feature = "foundation")]
pub use error::{CacheError, CacheResult, ErrorClassification, ErrorSeverity};
#[cfg(feature = "foundation")]
pub use item::{Comparator, EqComparator, Handler, Id, Item};
#[cfg(feature = "foundation")]
pub use logging::{Level, LogSink, NoopLogSink};
#[cfg(feature = "observability")]
pub use logging::TracingLogSink;
#[cfg(feature = "foundation")]
pub use stats::CacheStatsSnapshot;

#[cfg(feature = "foundation")]
mod workcache {
    use std::marker::PhantomData;
    use std::sync::Arc;
    use std::time::Instant;

    use crate::cache::Cache;
    use crate::clock::{Clock, SystemClock};
    use crate::config::{CacheConfig, CacheConfigBuilder};
    use crate::error::CacheResult;
    use crate::item::{Handler, Id, Item};
    use crate::logging::{LogSink, NoopLogSink};
    use crate::queue::Queue;
    use crate::stats::CacheStatsSnapshot;

    /// The caller-facing handle: a staging queue, a bounded cache, and
    /// (when started) the tick loop that couples them.
    pub struct WorkCache<T, C: Clock = SystemClock> {
        cache: Arc<Cache<T, C>>,
        queue: Arc<Queue<T>>,
        config: Arc<CacheConfig>,
        log: Arc<dyn LogSink>,
    }

    impl<T> WorkCache<T, SystemClock> {
        /// Starts a builder with the documented defaults and the real
        /// wall clock.
        pub fn builder() -> WorkCacheBuilder<T, SystemClock> {
            WorkCacheBuilder::new()
        }
    }

    impl<T, C: Clock> WorkCache<T, C> {
        // --- Queue ---------------------------------------------------

        pub fn push_object_to_queue(&self, item: Item<T>) {
            self.queue.push(item);
        }

        /// Returns the popped item, and `true` iff the queue had nothing
        /// to pop.
        pub fn pull_object_from_queue(&self) -> (Option<Item<T>>, bool) {
            let item = self.queue.pull_one();
            let empty = item.is_none();
            (item, empty)
        }

        /// Pops up to `asyncThreads` items (or 1 in sync mode). Returns
        /// `true` only when the queue was empty before the call.
        pub fn pull_max_object_from_queue(&self) -> (Vec<Item<T>>, bool) {
            let budget = if self.config.is_async() { self.config.async_threads() } else { 1 };
            self.queue.pull_batch(budget)
        }

        pub fn get_size_object_to_queue(&self) -> usize {
            self.queue.size()
        }

        pub fn clean_queue(&self) {
            self.queue.clear();
        }

        // --- Cache inspection -----------------------------------------

        pub fn get_cache_size(&self) -> usize {
            self.cache.size()
        }

        pub fn get_object_from_cache_by_key(&self, key: &Id) -> (Option<T>, bool)
        where
            T: Clone,
        {
            let payload = self.cache.get_payload(key);
            let found = payload.is_some();
            (payload, found)
        }

        pub fn get_func_from_cache_by_key(&self, key: &Id) -> (Option<Handler>, bool) {
            let handler = self.cache.get_handler(key);
            let found = handler.is_some();
            (handler, found)
        }

        pub fn get_oldest_object_from_cache(&self) -> Option<Id> {
            self.cache.oldest_key()
        }

        pub fn get_object_from_cache_min_time_expiry(&self) -> Option<(Id, T)>
        where
            T: Clone,
        {
            let key = self.cache.oldest_key()?;
            let payload = self.cache.get_payload(&key)?;
            Some((key, payload))
        }

        pub fn get_func_from_cache_min_time_expiry(&self) -> Option<(Id, Handler)> {
            let key = self.cache.oldest_key()?;
            let handler = self.cache.get_handler(&key)?;
            Some((key, handler))
        }

        pub fn get_indexes_with_is_execution_status(&self) -> Vec<Id> {
            self.cache.indexes_with_is_execution()
        }

        pub fn get_indexes_with_is_completed_successfully(&self) -> Vec<Id> {
            self.cache.indexes_with_is_completed_successfully()
        }

        // --- Status mutation --------------------------------------------

        /// The current time as observed by this cache's clock, useful for
        /// computing a value to pass to [`Self::set_time_expiry`].
        pub fn now(&self) -> Instant {
            self.cache.now()
        }

        pub fn set_time_expiry(&self, key: &Id, expiry: Instant) {
            self.cache.set_time_expiry(key, expiry);
        }

        pub fn set_is_execution_true(&self, key: &Id) {
            self.cache.set_is_execution(key, true);
        }

        pub fn set_is_execution_false(&self, key: &Id) {
            self.cache.set_is_execution(key, false);
        }

        pub fn set_is_completed_successfully_true(&self, key: &Id) {
            self.cache.set_is_completed_successfully(key, true);
        }

        pub fn set_is_completed_successfully_false(&self, key: &Id) {
            self.cache.set_is_completed_successfully(key, false);
        }

        pub fn get_is_execution(&self, key: &Id) -> Option<bool> {
            self.cache.get_is_execution(key)
        }

        pub fn get_is_completed_successfully(&self, key: &Id) -> Option<bool> {
            self.cache.get_is_completed_successfully(key)
        }

        pub fn get_number_execution_attempts(&self, key: &Id) -> Option<u32> {
            self.cache.attempts(key)
        }

        /// Combined update: sets the success flag and clears the
        /// execution flag atomically.
        pub fn change_values(&self, key: &Id, success: bool) {
            self.cache.change_values(key, success);
        }

        pub fn add_object_to_cache(&self, item: Item<T>) -> CacheResult<()> {
            self.cache.admit(item)
        }

        /// Removes every entry past its TTL. Returns the number removed.
        pub fn delete_for_time_expiry_object_from_cache(&self) -> usize {
            self.cache.sweep_expired()
        }

        pub fn delete_oldest_object_from_cache(&self) -> CacheResult<Id> {
            self.cache.evict_one()
        }

        pub fn clean_cache(&self) {
            self.cache.clear();
        }

        pub fn stats(&self) -> CacheStatsSnapshot {
            self.cache.stats_snapshot()
        }
    }

    #[cfg(feature = "runtime")]
    impl<T, C> WorkCache<T, C>
    where
        T: Send + Sync + 'static,
        C: Clock,
    {
        /// Spawns the tick loop described in the scheduler design: sweep
        /// expiry, evict to make room, then dispatch the sync or async
        /// executor depending on configuration. Returns a handle whose
        /// [`AutomaticExecutionHandle::cancel`] stops the loop; in-flight
        /// async handlers are left to finish on their own.
        pub fn start_automatic_execution(&self) -> AutomaticExecutionHandle {
            let cancel = crate::scheduler::CancelToken::new();
            let join = tokio::spawn(crate::scheduler::run_scheduler(
                Arc::clone(&self.cache),
                Arc::clone(&self.queue),
                Arc::clone(&self.config),
                Arc::clone(&self.log),
                cancel.clone(),
            ));
            AutomaticExecutionHandle { cancel, join: Some(join) }
        }
    }

    /// Handle returned by [`WorkCache::start_automatic_execution`].
    #[cfg(feature = "runtime")]
    pub struct AutomaticExecutionHandle {
        cancel: crate::scheduler::CancelToken,
        join: Option<tokio::task::JoinHandle<()>>,
    }

    #[cfg(feature = "runtime")]
    impl AutomaticExecutionHandle {
        /// Requests the loop to stop. Does not wait for it.
        pub fn cancel(&self) {
            self.cancel.cancel();
        }

        /// Requests the loop to stop and waits for the tick task to
        /// return.
        pub async fn shutdown(mut self) {
            self.cancel.cancel();
            if let Some(join) = self.join.take() {
                let _ = join.await;
            }
        }
    }

    /// Fluent, validating constructor for [`WorkCache`], mirroring the
    /// option-style `newCache(options...)` constructor.
    pub struct WorkCacheBuilder<T, C: Clock = SystemClock> {
        config: CacheConfigBuilder,
        clock: C,
        log: Arc<dyn LogSink>,
        _payload: PhantomData<T>,
    }

    impl<T> WorkCacheBuilder<T, SystemClock> {
        pub fn new() -> Self {
            Self {
                config: CacheConfig::builder(),
                clock: SystemClock,
                log: Arc::new(NoopLogSink),
                _payload: PhantomData,
            }
        }
    }

    impl<T> Default for WorkCacheBuilder<T, SystemClock> {
        fn default() -> Self {
            Self::new()
        }
    }

    impl<T, C: Clock> WorkCacheBuilder<T, C> {
        /// Valid range: 60..=86400 seconds.
        pub fn with_max_ttl(mut self, seconds: u64) -> Self {
            self.config = self.config.with_max_ttl(seconds);
            self
        }

        /// Valid range: 1..=120 seconds.
        pub fn with_time_tick(mut self, seconds: u64) -> Self {
            self.config = self.config.with_time_tick(seconds);
            self
        }

        /// Valid range: 3..=1000.
        pub fn with_max_size(mut self, n: usize) -> Self {
            self.config = self.config.with_max_size(n);
            self
        }

        /// `n >= 2` enables async processing with `n` worker slots.
        pub fn with_enable_async_processing(mut self, n: usize) -> Self {
            self.config = self.config.with_enable_async_processing(n);
            self
        }

        pub fn with_logging(mut self, sink: Arc<dyn LogSink>) -> Self {
            self.log = sink;
            self
        }

        /// Swaps in a different time source, primarily for tests that
        /// need to advance time deterministically with [`crate::MockClock`].
        pub fn with_clock<C2: Clock>(self, clock: C2) -> WorkCacheBuilder<T, C2> {
            WorkCacheBuilder {
                config: self.config,
                clock,
                log: self.log,
                _payload: PhantomData,
            }
        }

        pub fn build(self) -> CacheResult<WorkCache<T, C>> {
            let config = self.config.build()?;
            let cache = Cache::new(config.max_size(), config.max_ttl(), Arc::new(self.clock));
            Ok(WorkCache {
                cache: Arc::new(cache),
                queue: Arc::new(Queue::new()),
                config: Arc::new(config),
                log: self.log,
            })
        }
    }
}

#[cfg(feature = "foundation")]
pub use workcache::WorkCacheBuilder;
#[cfg(feature = "foundation")]
pub use workcache::WorkCache;
#[cfg(feature = "runtime")]
pub use workcache::AutomaticExecutionHandle;
