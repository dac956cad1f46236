//! Bounded concurrent dispatch: up to `asyncThreads` handlers in flight,
//! completions reported back through an unbounded channel instead of
//! being applied from inside the spawned task.

use tokio::sync::mpsc::UnboundedSender;

use crate::cache::Cache;
use crate::clock::Clock;
use crate::item::Id;
use crate::logging::{Level, LogSink};
use crate::queue::Queue;

/// `(id, success)` reported by a spawned handler once it returns.
pub(crate) type Completion = (Id, bool);

/// Runs one async-mode tick: tops up in-flight work to `async_threads` by
/// admitting from the queue, then spawns a task per newly admitted entry.
/// Each spawned task sends its `(id, success)` completion down `completions`
/// instead of mutating the cache directly, so the scheduler is the single
/// place that applies `changeValues`.
pub(crate) fn run_async_tick<T, C>(
    cache: &Cache<T, C>,
    queue: &Queue<T>,
    log: &dyn LogSink,
    async_threads: usize,
    completions: &UnboundedSender<Completion>,
) where
    C: Clock,
{
    let active = cache.indexes_with_is_execution().len();
    if active >= async_threads {
        return;
    }
    let budget = async_threads - active;

    let mut admitted = Vec::with_capacity(budget);
    for _ in 0..budget {
        if cache.size() >= cache.max_size() {
            break;
        }
        let Some(item) = queue.pull_one() else {
            break;
        };
        let id = item.id().clone();
        match cache.admit(item) {
            Ok(()) => admitted.push(id),
            Err(err) => log.write(Level::Warning, &format!("admission failed for '{id}': {err}")),
        };
    }

    for key in admitted {
        cache.begin_execution(&key);
        let Some(handler) = cache.get_handler(&key) else { continue };
        let completions = completions.clone();
        let key_for_task = key.clone();
        tokio::spawn(async move {
            let success = handler(0);
            let _ = completions.send((key_for_task, success));
        });
    }
}
