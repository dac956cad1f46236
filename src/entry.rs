//! The admitted form of an [`Item`](crate::item::Item): a payload plus its
//! execution bookkeeping.

use std::time::Instant;

use crate::item::Handler;

pub(crate) struct CacheEntry<T> {
    pub(crate) payload: T,
    pub(crate) handler: Handler,
    pub(crate) time_created: Instant,
    pub(crate) time_expiry: Instant,
    pub(crate) is_execution: bool,
    pub(crate) is_completed_successfully: bool,
    pub(crate) number_execution_attempts: u32,
}

impl<T> CacheEntry<T> {
    /// `isExecution = false` and (`isCompletedSuccessfully = true` or
    /// `attempts >= maxAttempts`) — the union rule this crate adopted for
    /// the open question of whether attempt count alone should make an
    /// entry evictable.
    pub(crate) fn is_eligible_for_eviction(&self, max_attempts: u32) -> bool {
        !self.is_execution
            && (self.is_completed_successfully || self.number_execution_attempts >= max_attempts)
    }
}
