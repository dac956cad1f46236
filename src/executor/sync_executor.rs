//! One handler in flight at a time.

use crate::cache::Cache;
use crate::clock::Clock;
use crate::logging::{Level, LogSink};
use crate::queue::Queue;

/// Runs one sync-mode tick: admits at most one queued item, then runs the
/// stalest pending handler to completion before returning.
///
/// Does nothing if an entry is already executing — sync mode never
/// overlaps handler invocations.
pub(crate) fn run_sync_tick<T, C: Clock>(
    cache: &Cache<T, C>,
    queue: &Queue<T>,
    log: &dyn LogSink,
) {
    if !cache.indexes_with_is_execution().is_empty() {
        return;
    }

    if let Some(item) = queue.pull_one() {
        let id = item.id().clone();
        if let Err(err) = cache.admit(item) {
            log.write(Level::Warning, &format!("admission failed for '{id}': {err}"));
        }
    }

    if cache.size() == 0 {
        return;
    }

    let Some((key, handler)) = cache.select_stalest_pending() else {
        return;
    };

    cache.begin_execution(&key);
    let success = handler(0);
    cache.change_values(&key, success);
}
