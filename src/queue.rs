//! FIFO staging queue of pending [`Item`]s.
//!
//! Guarded by a single exclusive mutex; all operations mutate, so there is
//! no separate read path to split out. No dedup happens here — collisions
//! are resolved at cache admission.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::item::Item;

pub(crate) struct Queue<T> {
    items: Mutex<VecDeque<Item<T>>>,
}

impl<T> Queue<T> {
    pub(crate) fn new() -> Self {
        Self { items: Mutex::new(VecDeque::new()) }
    }

    /// Appends an item. Never rejects.
    pub(crate) fn push(&self, item: Item<T>) {
        self.items.lock().expect("queue lock poisoned").push_back(item);
    }

    /// Pops the head item. `None` means the queue was empty.
    pub(crate) fn pull_one(&self) -> Option<Item<T>> {
        self.items.lock().expect("queue lock poisoned").pop_front()
    }

    /// Pops up to `n` head items. The returned `bool` is `true` only when
    /// the queue was already empty before this call.
    pub(crate) fn pull_batch(&self, n: usize) -> (Vec<Item<T>>, bool) {
        let mut guard = self.items.lock().expect("queue lock poisoned");
        let was_empty = guard.is_empty();
        let drained = guard.drain(..n.min(guard.len())).collect();
        (drained, was_empty)
    }

    pub(crate) fn size(&self) -> usize {
        self.items.lock().expect("queue lock poisoned").len()
    }

    pub(crate) fn clear(&self) {
        self.items.lock().expect("queue lock poisoned").clear();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::item::{EqComparator, Handler};

    fn item(id: &str) -> Item<i32> {
        let handler: Handler = Arc::new(|_| true);
        Item::new(id, 0, handler, Arc::new(EqComparator::new(|a: &i32, b: &i32| a == b)))
    }

    /// Validates `Queue::push` behavior for the push then pull one
    /// round trip scenario.
    ///
    /// Assertions:
    /// - Confirms `pulled.id()` equals `"X"`.
    /// - Ensures `queue.pull_one().is_none()` evaluates to true.
    #[test]
    fn test_push_then_pull_one_round_trip() {
        let queue = Queue::new();
        queue.push(item("X"));
        let pulled = queue.pull_one().expect("queue should yield the pushed item");
        assert_eq!(pulled.id(), "X");
        assert!(queue.pull_one().is_none());
    }

    /// Validates `Queue::pull_one` behavior for the fifo ordering scenario.
    ///
    /// Assertions:
    /// - Confirms `queue.pull_one().unwrap().id()` equals `"A"`.
    /// - Confirms `queue.pull_one().unwrap().id()` equals `"B"`.
    #[test]
    fn test_fifo_ordering() {
        let queue = Queue::new();
        queue.push(item("A"));
        queue.push(item("B"));
        assert_eq!(queue.pull_one().unwrap().id(), "A");
        assert_eq!(queue.pull_one().unwrap().id(), "B");
    }

    /// Validates `Queue::pull_batch` behavior for the pull batch respects
    /// limit scenario.
    ///
    /// Assertions:
    /// - Confirms `drained.len()` equals `2`.
    /// - Confirms `queue.size()` equals `1`.
    /// - Ensures `!was_empty` evaluates to true.
    #[test]
    fn test_pull_batch_respects_limit() {
        let queue = Queue::new();
        queue.push(item("A"));
        queue.push(item("B"));
        queue.push(item("C"));
        let (drained, was_empty) = queue.pull_batch(2);
        assert_eq!(drained.len(), 2);
        assert_eq!(queue.size(), 1);
        assert!(!was_empty);
    }

    /// Validates `Queue::pull_batch` behavior for the pull batch reports
    /// empty before call scenario.
    ///
    /// Assertions:
    /// - Ensures `drained.is_empty()` evaluates to true.
    /// - Ensures `was_empty` evaluates to true.
    #[test]
    fn test_pull_batch_reports_empty_before_call() {
        let queue: Queue<i32> = Queue::new();
        let (drained, was_empty) = queue.pull_batch(4);
        assert!(drained.is_empty());
        assert!(was_empty);
    }

    /// Validates `Queue::clear` behavior for the clear discards pending
    /// items scenario.
    ///
    /// Assertions:
    /// - Confirms `queue.size()` equals `0`.
    #[test]
    fn test_clear_discards_pending_items() {
        let queue = Queue::new();
        queue.push(item("A"));
        queue.push(item("B"));
        queue.clear();
        assert_eq!(queue.size(), 0);
    }
}
