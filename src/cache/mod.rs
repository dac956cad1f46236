//! The bounded, keyed store of admitted work and its per-entry state
//! machine.
//!
//! Guarded by a single read/write lock: reads (`size`, `get_payload`,
//! `indexes_where`, ...) take the shared lock, mutations take the
//! exclusive lock. Handlers, comparators, and the logging sink are always
//! invoked outside the lock, never while holding it.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use crate::clock::{Clock, SystemClock};
use crate::config::MAX_ATTEMPTS;
use crate::entry::CacheEntry;
use crate::error::{CacheError, CacheResult};
use crate::item::{Handler, Id, Item};
use crate::stats::{CacheStats, CacheStatsSnapshot};

pub(crate) struct Cache<T, C: Clock = SystemClock> {
    entries: RwLock<HashMap<Id, CacheEntry<T>>>,
    max_size: usize,
    max_ttl: Duration,
    clock: Arc<C>,
    stats: Arc<CacheStats>,
}

impl<T, C: Clock> Cache<T, C> {
    pub(crate) fn new(max_size: usize, max_ttl: Duration, clock: Arc<C>) -> Self {
        Self { entries: RwLock::new(HashMap::new()), max_size, max_ttl, clock, stats: CacheStats::new() }
    }

    pub(crate) fn max_size(&self) -> usize {
        self.max_size
    }

    pub(crate) fn size(&self) -> usize {
        self.entries.read().expect("cache lock poisoned").len()
    }

    pub(crate) fn contains_key(&self, id: &Id) -> bool {
        self.entries.read().expect("cache lock poisoned").contains_key(id)
    }

    pub(crate) fn get_payload(&self, id: &Id) -> Option<T>
    where
        T: Clone,
    {
        self.entries.read().expect("cache lock poisoned").get(id).map(|e| e.payload.clone())
    }

    pub(crate) fn get_handler(&self, id: &Id) -> Option<Handler> {
        self.entries.read().expect("cache lock poisoned").get(id).map(|e| Arc::clone(&e.handler))
    }

    /// Key whose `time_expiry` is minimum. Ties are broken by id so the
    /// result is deterministic within one call, though callers must not
    /// rely on which id wins a tie.
    pub(crate) fn oldest_key(&self) -> Option<Id> {
        let guard = self.entries.read().expect("cache lock poisoned");
        Self::oldest_key_locked(&guard)
    }

    fn oldest_key_locked(guard: &HashMap<Id, CacheEntry<T>>) -> Option<Id> {
        guard
            .iter()
            .min_by(|(k1, e1), (k2, e2)| e1.time_expiry.cmp(&e2.time_expiry).then_with(|| k1.cmp(k2)))
            .map(|(k, _)| k.clone())
    }

    pub(crate) fn indexes_with_is_execution(&self) -> Vec<Id> {
        self.indexes_where(|e| e.is_execution)
    }

    pub(crate) fn indexes_with_is_completed_successfully(&self) -> Vec<Id> {
        self.indexes_where(|e| e.is_completed_successfully)
    }

    fn indexes_where(&self, predicate: impl Fn(&CacheEntry<T>) -> bool) -> Vec<Id> {
        self.entries
            .read()
            .expect("cache lock poisoned")
            .iter()
            .filter(|(_, e)| predicate(e))
            .map(|(k, _)| k.clone())
            .collect()
    }

    pub(crate) fn attempts(&self, id: &Id) -> Option<u32> {
        self.entries.read().expect("cache lock poisoned").get(id).map(|e| e.number_execution_attempts)
    }

    pub(crate) fn get_is_execution(&self, id: &Id) -> Option<bool> {
        self.entries.read().expect("cache lock poisoned").get(id).map(|e| e.is_execution)
    }

    pub(crate) fn get_is_completed_successfully(&self, id: &Id) -> Option<bool> {
        self.entries.read().expect("cache lock poisoned").get(id).map(|e| e.is_completed_successfully)
    }

    pub(crate) fn set_time_expiry(&self, id: &Id, expiry: Instant) {
        if let Some(e) = self.entries.write().expect("cache lock poisoned").get_mut(id) {
            e.time_expiry = expiry;
        }
    }

    pub(crate) fn set_is_execution(&self, id: &Id, value: bool) {
        if let Some(e) = self.entries.write().expect("cache lock poisoned").get_mut(id) {
            e.is_execution = value;
        }
    }

    pub(crate) fn set_is_completed_successfully(&self, id: &Id, value: bool) {
        if let Some(e) = self.entries.write().expect("cache lock poisoned").get_mut(id) {
            e.is_completed_successfully = value;
        }
    }

    /// Marks an entry as executing and increments its attempt counter.
    /// No-op on an absent key.
    pub(crate) fn begin_execution(&self, id: &Id) {
        if let Some(e) = self.entries.write().expect("cache lock poisoned").get_mut(id) {
            e.is_execution = true;
            e.number_execution_attempts += 1;
        }
    }

    /// Combined setter used by the scheduler after a handler returns:
    /// records the result and clears the in-flight flag atomically under
    /// the cache lock.
    pub(crate) fn change_values(&self, id: &Id, success: bool) {
        if let Some(e) = self.entries.write().expect("cache lock poisoned").get_mut(id) {
            e.is_completed_successfully = success;
            e.is_execution = false;
        }
        if success {
            self.stats.record_handler_success();
        } else {
            self.stats.record_handler_failure();
        }
    }

    /// The single insertion path: absent entries are created fresh; an
    /// in-flight collision is rejected; an equal-payload replacement is
    /// discarded as a duplicate; otherwise the entry is replaced, keeping
    /// its attempt counter.
    pub(crate) fn admit(&self, item: Item<T>) -> CacheResult<()> {
        let now = self.clock.now();
        let mut guard = self.entries.write().expect("cache lock poisoned");

        match guard.get(&item.id) {
            None => {
                guard.insert(
                    item.id.clone(),
                    CacheEntry {
                        payload: item.payload,
                        handler: item.handler,
                        time_created: now,
                        time_expiry: now + self.max_ttl,
                        is_execution: false,
                        is_completed_successfully: false,
                        number_execution_attempts: 0,
                    },
                );
                drop(guard);
                self.stats.record_admission();
                Ok(())
            }
            Some(existing) if existing.is_execution => {
                drop(guard);
                self.stats.record_collision();
                Err(CacheError::CollidesWithInFlight(item.id))
            }
            Some(existing) if item.comparator.equals(&item.payload, &existing.payload) => {
                drop(guard);
                self.stats.record_duplicate();
                Err(CacheError::DuplicatePayload(item.id))
            }
            Some(existing) => {
                let attempts = existing.number_execution_attempts;
                let merged = item.comparator.merge_onto(item.payload, &existing.payload);
                guard.insert(
                    item.id.clone(),
                    CacheEntry {
                        payload: merged,
                        handler: item.handler,
                        time_created: now,
                        time_expiry: now + self.max_ttl,
                        is_execution: false,
                        is_completed_successfully: false,
                        number_execution_attempts: attempts,
                    },
                );
                drop(guard);
                self.stats.record_replacement();
                Ok(())
            }
        }
    }

    /// Removes every entry whose `time_expiry` has passed, unconditionally
    /// — regardless of execution or success state. Returns the number of
    /// entries removed.
    pub(crate) fn sweep_expired(&self) -> usize {
        let now = self.clock.now();
        let mut guard = self.entries.write().expect("cache lock poisoned");
        let before = guard.len();
        guard.retain(|_, e| e.time_expiry >= now);
        let removed = before - guard.len();
        if removed > 0 {
            self.stats.record_expirations(removed as u64);
        }
        removed
    }

    /// Evicts up to `max_evictions` entries, repeatedly picking the
    /// current oldest and stopping the moment one is ineligible. Returns
    /// `NothingEvictable` only if zero entries were removed.
    pub(crate) fn evict_oldest(&self, max_evictions: usize) -> CacheResult<Vec<Id>> {
        let mut guard = self.entries.write().expect("cache lock poisoned");
        let mut evicted = Vec::new();
        for _ in 0..max_evictions.max(1) {
            let Some(key) = Self::oldest_key_locked(&guard) else {
                break;
            };
            let entry = guard.get(&key).expect("oldest_key_locked returned a present key");
            if !entry.is_eligible_for_eviction(MAX_ATTEMPTS) {
                break;
            }
            guard.remove(&key);
            evicted.push(key);
        }
        drop(guard);

        if evicted.is_empty() {
            Err(CacheError::NothingEvictable)
        } else {
            self.stats.record_evictions(evicted.len() as u64);
            Ok(evicted)
        }
    }

    /// Convenience wrapper evicting exactly one entry, matching the
    /// caller-facing `deleteOldestObjectFromCache` operation.
    pub(crate) fn evict_one(&self) -> CacheResult<Id> {
        self.evict_oldest(1).map(|mut ids| ids.remove(0))
    }

    /// The entry with minimum `time_expiry` among those neither in flight
    /// nor successfully completed.
    pub(crate) fn select_stalest_pending(&self) -> Option<(Id, Handler)> {
        let guard = self.entries.read().expect("cache lock poisoned");
        guard
            .iter()
            .filter(|(_, e)| !e.is_execution && !e.is_completed_successfully)
            .min_by(|(k1, e1), (k2, e2)| e1.time_expiry.cmp(&e2.time_expiry).then_with(|| k1.cmp(k2)))
            .map(|(k, e)| (k.clone(), Arc::clone(&e.handler)))
    }

    pub(crate) fn clear(&self) {
        self.entries.write().expect("cache lock poisoned").clear();
    }

    pub(crate) fn stats_snapshot(&self) -> CacheStatsSnapshot {
        self.stats.snapshot()
    }

    pub(crate) fn now(&self) -> Instant {
        self.clock.now()
    }
}
