//! Listener registry used for change notifications.
//!
//! # Responsibility
//! - Let UI collaborators subscribe to store and list changes.
//! - Deliver events synchronously, in subscription order.
//!
//! # Invariants
//! - Subscription ids are never reused within one hub.
//! - Unsubscribing an unknown id is a no-op.

/// Handle returned by `subscribe`, used to unsubscribe later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// Boxed listener callback.
pub type Listener<E> = Box<dyn FnMut(&E)>;

/// Ordered set of listeners for one event type.
pub struct EventHub<E> {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener<E>)>,
}

impl<E> EventHub<E> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            listeners: Vec::new(),
        }
    }

    /// Registers a listener and returns its handle.
    pub fn subscribe(&mut self, listener: impl FnMut(&E) + 'static) -> SubscriptionId {
        self.subscribe_boxed(Box::new(listener))
    }

    /// Registers an already boxed listener as is.
    pub fn subscribe_boxed(&mut self, listener: Listener<E>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    /// Removes a listener. Returns whether it was registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(current, _)| *current != id);
        self.listeners.len() != before
    }

    pub fn emit(&mut self, event: &E) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(event);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl<E> Default for EventHub<E> {
    fn default() -> Self {
        Self::new()
    }
}
