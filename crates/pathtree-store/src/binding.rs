#![forbid(unsafe_code)]

//! Value bindings over a store: lazy reads and memoized derivations.
//!
//! A [`Bound`] is the read half of a consumer binding — store plus selector
//! plus an optional transform, evaluated fresh on every `get()`, so it is
//! never stale. A [`Derived`] adds memoization: it caches the transformed
//! value and holds a subscription that marks the cache dirty whenever a
//! notification touches the selector's path, recomputing only on the next
//! `get()` after that.
//!
//! The [`bind_value!`] and [`bind_map!`] macros are sugar over the
//! constructor functions.
//!
//! # Invariants
//!
//! 1. `Bound::get()` always reflects the current root (no caching).
//! 2. `Derived::get()` never returns a value computed before the last
//!    notification that touched its path.
//! 3. A coarse [`replace`](crate::Store::replace) does not invalidate a
//!    `Derived` — by design it bypasses the listener tree; pair it with
//!    [`notify_all`](crate::Store::notify_all) to refresh derivations.
//! 4. Dropping a `Derived` drops its subscription; the tree does not leak.
//!
//! # Failure Modes
//!
//! - Transform panic: propagates to the `get()` caller.
//! - Unresolvable path: the transform receives `None` and decides.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use pathtree_core::Selector;
use serde_json::Value;

use crate::store::Store;
use crate::subscription::Subscription;

/// A read-only binding evaluated lazily on each `get()` call.
pub struct Bound<T> {
    eval: Rc<dyn Fn() -> T>,
}

impl<T> Clone for Bound<T> {
    fn clone(&self) -> Self {
        Self {
            eval: Rc::clone(&self.eval),
        }
    }
}

impl<T: fmt::Debug + 'static> fmt::Debug for Bound<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bound").field("value", &self.get()).finish()
    }
}

impl<T: 'static> Bound<T> {
    /// A binding that evaluates `f` on each `get()` call.
    pub fn new(f: impl Fn() -> T + 'static) -> Self {
        Self { eval: Rc::new(f) }
    }

    /// The current bound value.
    #[must_use]
    pub fn get(&self) -> T {
        (self.eval)()
    }

    /// Chain a further transform.
    pub fn map<U: 'static>(self, f: impl Fn(T) -> U + 'static) -> Bound<U> {
        Bound {
            eval: Rc::new(move || f((self.eval)())),
        }
    }
}

/// Bind a selector directly: `get()` clones the value at its path, `None`
/// while the path does not resolve.
pub fn bind_value(store: &Store, selector: &Selector) -> Bound<Option<Value>> {
    let store = store.clone();
    let selector = selector.clone();
    Bound::new(move || store.read(&selector))
}

/// Bind a selector through a transform over the (possibly unresolved)
/// value at its path.
pub fn bind_map<T: 'static>(
    store: &Store,
    selector: &Selector,
    map: impl Fn(Option<&Value>) -> T + 'static,
) -> Bound<T> {
    let store = store.clone();
    let selector = selector.clone();
    Bound::new(move || store.with(|root| map(selector.eval(root))))
}

/// Bind a selector directly. Sugar for [`bind_value`].
#[macro_export]
macro_rules! bind_value {
    ($store:expr, $selector:expr) => {
        $crate::binding::bind_value(&$store, &$selector)
    };
}

/// Bind a selector through a transform. Sugar for [`bind_map`].
#[macro_export]
macro_rules! bind_map {
    ($store:expr, $selector:expr, $map:expr) => {
        $crate::binding::bind_map(&$store, &$selector, $map)
    };
}

/// A memoized derivation of the value at a selector's path.
///
/// The held subscription marks the cache dirty on every notification
/// touching the path (exact, ancestor, or descendant); `get()` recomputes
/// only when dirty. This is the re-evaluate-on-notify half of the consumer
/// binding contract, with the re-evaluation deferred to the next read.
pub struct Derived<T> {
    store: Store,
    selector: Selector,
    map: Rc<dyn Fn(Option<&Value>) -> T>,
    cache: RefCell<Option<T>>,
    dirty: Rc<Cell<bool>>,
    _subscription: Subscription,
}

impl<T: Clone + 'static> Derived<T> {
    /// Derive from the value at `selector`, transformed by `map`.
    #[must_use]
    pub fn new(
        store: &Store,
        selector: Selector,
        map: impl Fn(Option<&Value>) -> T + 'static,
    ) -> Self {
        let dirty = Rc::new(Cell::new(true));
        let flag = Rc::clone(&dirty);
        let subscription = store.subscribe(&selector, move |_| flag.set(true));
        Self {
            store: store.clone(),
            selector,
            map: Rc::new(map),
            cache: RefCell::new(None),
            dirty,
            _subscription: subscription,
        }
    }

    /// The derived value, recomputed only if a notification touched the
    /// path since the last call.
    #[must_use]
    pub fn get(&self) -> T {
        let mut cache = self.cache.borrow_mut();
        if self.dirty.replace(false) {
            *cache = None;
        }
        cache
            .get_or_insert_with(|| self.store.with(|root| (self.map)(self.selector.eval(root))))
            .clone()
    }

    /// The selector this derivation watches.
    #[must_use]
    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Force the next `get()` to recompute.
    pub fn invalidate(&self) {
        self.dirty.set(true);
    }
}

impl<T: Clone + fmt::Debug + 'static> fmt::Debug for Derived<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Derived")
            .field("path", self.selector.path())
            .field("dirty", &self.dirty.get())
            .finish()
    }
}
