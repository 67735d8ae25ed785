#![forbid(unsafe_code)]

//! RAII subscription guards.
//!
//! The binding contract for consumers is: register exactly one listener per
//! (consumer, path) pair, and remove it with the same handle on teardown,
//! guaranteed, so the listener tree never leaks nodes. [`Subscription`]
//! makes the teardown half automatic — dropping the guard unsubscribes —
//! and [`SubscriptionSet`] collects the guards of a logical scope (a
//! widget, a view, a task) so one drop tears the whole scope down.
//!
//! # Invariants
//!
//! 1. After a `Subscription` drops, its callback never fires again —
//!    except for a notification batch already gathered while it was live.
//! 2. A set releases its subscriptions in reverse registration order.
//! 3. `clear()` releases immediately; the set stays reusable.

use std::fmt;
use std::rc::Rc;

use pathtree_core::{Path, Selector};

use crate::store::{Store, StoreInner};
use crate::tree::{ListenerId, Stamp};

/// RAII guard for one listener registration.
///
/// Holds the store alive for as long as the subscription exists; dropping
/// the guard removes the registration (and prunes the tree branch if it
/// became empty).
pub struct Subscription {
    inner: Rc<StoreInner>,
    path: Path,
    id: ListenerId,
    active: bool,
}

impl Subscription {
    pub(crate) fn new(inner: Rc<StoreInner>, path: Path, id: ListenerId) -> Self {
        Self {
            inner,
            path,
            id,
            active: true,
        }
    }

    /// The registration handle.
    #[must_use]
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// The path the listener is registered at.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Drop the guard without unsubscribing: the listener stays registered
    /// for the store's lifetime. For deliberate fire-forever listeners.
    pub fn detach(mut self) {
        self.active = false;
    }

    /// Unsubscribe now. Equivalent to dropping the guard, spelled out.
    pub fn cancel(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if self.active {
            self.inner.remove_registration(&self.path, self.id);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("path", &self.path)
            .field("id", &self.id)
            .field("active", &self.active)
            .finish()
    }
}

/// Collects subscriptions for a logical scope.
///
/// When the set is dropped, all held subscriptions are released and no
/// callback from this scope fires again.
#[derive(Default)]
pub struct SubscriptionSet {
    subscriptions: Vec<Subscription>,
}

impl SubscriptionSet {
    /// An empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of an existing guard.
    pub fn hold(&mut self, subscription: Subscription) {
        self.subscriptions.push(subscription);
    }

    /// Subscribe on `store` and hold the guard in this set. Returns the
    /// set for chaining.
    pub fn subscribe(
        &mut self,
        store: &Store,
        selector: &Selector,
        listener: impl Fn(Stamp) + 'static,
    ) -> &mut Self {
        self.subscriptions.push(store.subscribe(selector, listener));
        self
    }

    /// Number of held subscriptions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    /// Whether the set holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Release everything now; the set stays usable.
    pub fn clear(&mut self) {
        while self.subscriptions.pop().is_some() {}
    }
}

impl Drop for SubscriptionSet {
    fn drop(&mut self) {
        self.clear();
    }
}

impl fmt::Debug for SubscriptionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriptionSet")
            .field("len", &self.subscriptions.len())
            .finish()
    }
}
