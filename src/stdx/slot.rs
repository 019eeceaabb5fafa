use parking_lot::RwLock;
use std::sync::Arc;

/// A shared, single-value slot that only accepts writes from its newest writer.
///
/// Each call to [`begin`](Slot::begin) replaces the value and hands back a
/// [`Ticket`]. A later [`settle`](Slot::settle) only lands if no newer ticket
/// has been issued since, and the slot hasn't been closed.
#[derive(Debug, Clone)]
pub struct Slot<T>(Arc<RwLock<Inner<T>>>);

#[derive(Debug)]
struct Inner<T> {
    value: T,
    generation: u64,
    closed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

impl<T> Slot<T> {
    #[inline]
    pub fn new(value: T) -> Self {
        Self(Arc::new(RwLock::new(Inner {
            value,
            generation: 0,
            closed: false,
        })))
    }

    /// Returns `None` once the slot is closed.
    pub fn begin(&self, value: T) -> Option<Ticket> {
        let mut inner = self.0.write();

        if inner.closed {
            return None;
        }

        inner.generation += 1;
        inner.value = value;

        Some(Ticket(inner.generation))
    }

    /// Returns whether `value` was stored.
    pub fn settle(&self, ticket: Ticket, value: T) -> bool {
        let mut inner = self.0.write();

        if inner.closed || inner.generation != ticket.0 {
            return false;
        }

        inner.value = value;
        true
    }

    #[inline]
    pub fn close(&self) {
        self.0.write().closed = true;
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.0.read().closed
    }

    #[inline]
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.0.read().value.clone()
    }
}
