//! The unit of work producers enqueue: an identified payload, a handler,
//! and a comparator capability.

use std::sync::Arc;

/// Opaque, caller-assigned identifier. Unique within a single cache.
pub type Id = String;

/// A handler invoked with the current attempt number, returning `true` on
/// success. The attempt argument is reserved for future attempt-aware
/// handlers; the current contract always passes `0`.
pub type Handler = Arc<dyn Fn(u32) -> bool + Send + Sync>;

/// Deep-equality and optional merge capability supplied by the caller for a
/// payload type. The core never inspects payloads directly; it only ever
/// calls through this trait.
pub trait Comparator<T>: Send + Sync {
    /// `true` iff `incoming` and `existing` are semantically identical.
    fn equals(&self, incoming: &T, existing: &T) -> bool;

    /// Produces the payload to install when admission replaces an existing,
    /// non-equal entry. The default performs no merge and simply keeps the
    /// incoming payload.
    fn merge_onto(&self, incoming: T, _existing: &T) -> T {
        incoming
    }
}

/// A caller-supplied unit of work awaiting execution.
pub struct Item<T> {
    pub(crate) id: Id,
    pub(crate) payload: T,
    pub(crate) handler: Handler,
    pub(crate) comparator: Arc<dyn Comparator<T>>,
}

impl<T> Item<T> {
    pub fn new(
        id: impl Into<Id>,
        payload: T,
        handler: Handler,
        comparator: Arc<dyn Comparator<T>>,
    ) -> Self {
        Self { id: id.into(), payload, handler, comparator }
    }

    pub fn id(&self) -> &Id {
        &self.id
    }

    pub fn payload(&self) -> &T {
        &self.payload
    }

    pub fn handler(&self) -> &Handler {
        &self.handler
    }
}

/// A `Comparator` built from a plain equality closure, for callers whose
/// payload already implements `PartialEq` or who only need ad hoc
/// comparisons.
pub struct EqComparator<F> {
    equals: F,
}

impl<F> EqComparator<F> {
    pub fn new(equals: F) -> Self {
        Self { equals }
    }
}

impl<T, F> Comparator<T> for EqComparator<F>
where
    F: Fn(&T, &T) -> bool + Send + Sync,
{
    fn equals(&self, incoming: &T, existing: &T) -> bool {
        (self.equals)(incoming, existing)
    }
}
