//! Typed notification channels with revocable subscriptions.
//!
//! The core is single-threaded and event-driven: change notifications run as
//! discrete handler invocations on the caller's stack. `Notifier<T>` holds
//! its subscribers behind `Rc<RefCell<_>>`; `emit` iterates a snapshot of the
//! subscriber list, so a handler may subscribe or unsubscribe (including
//! itself) without poisoning the iteration.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

type Callback<T> = Rc<dyn Fn(&T)>;

struct Registry<T> {
    next_id: u64,
    entries: Vec<(u64, Callback<T>)>,
}

/// A typed notification channel.
pub struct Notifier<T> {
    registry: Rc<RefCell<Registry<T>>>,
}

impl<T: 'static> Notifier<T> {
    /// Create a channel with no subscribers.
    pub fn new() -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry {
                next_id: 0,
                entries: Vec::new(),
            })),
        }
    }

    /// Register a callback; it runs on every subsequent `emit` until the
    /// returned `Subscription` is dropped or cancelled.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let id = {
            let mut registry = self.registry.borrow_mut();
            let id = registry.next_id;
            registry.next_id += 1;
            registry.entries.push((id, Rc::new(callback)));
            id
        };

        let weak: Weak<RefCell<Registry<T>>> = Rc::downgrade(&self.registry);
        Subscription {
            revoke: Some(Box::new(move || {
                if let Some(registry) = weak.upgrade() {
                    registry.borrow_mut().entries.retain(|(e, _)| *e != id);
                }
            })),
        }
    }

    /// Invoke every current subscriber with `event`.
    pub fn emit(&self, event: &T) {
        // Snapshot so callbacks may mutate the subscriber list.
        let callbacks: Vec<Callback<T>> = self
            .registry
            .borrow()
            .entries
            .iter()
            .map(|(_, cb)| cb.clone())
            .collect();
        for callback in callbacks {
            callback(event);
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.registry.borrow().entries.len()
    }
}

impl<T: 'static> Default for Notifier<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Notifier<T> {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
        }
    }
}

/// Revocable handle to a `Notifier` subscription.
///
/// Dropping the handle unsubscribes; `cancel` does the same eagerly.
pub struct Subscription {
    revoke: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Unsubscribe now instead of at drop time.
    pub fn cancel(mut self) {
        if let Some(revoke) = self.revoke.take() {
            revoke();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(revoke) = self.revoke.take() {
            revoke();
        }
    }
}
