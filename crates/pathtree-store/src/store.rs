#![forbid(unsafe_code)]

//! The store: one root value, one listener tree, one update protocol.
//!
//! [`Store`] is a cheaply-cloneable handle to single-threaded shared state
//! (`Rc` + interior mutability); clones all address the same root. All
//! mutation funnels through the store — consumers never hold a raw `&mut`
//! to the root — which is what makes the notification protocol coherent:
//!
//! - **Coarse**: [`replace`](Store::replace) / [`replace_with`](Store::replace_with)
//!   swap the whole root. They bypass the listener tree entirely and only
//!   advance the revision; callers that want subscribers to observe a
//!   wholesale swap follow up with [`notify_all`](Store::notify_all).
//! - **Fine-grained**: [`set`](Store::set) / [`modify`](Store::modify)
//!   mutate at a selector's path and then notify that path — exact,
//!   ancestor, and descendant listeners, nobody else.
//!
//! # Invariants
//!
//! 1. The revision is monotonically non-decreasing and bumps on every
//!    mutation through the store, coarse or fine.
//! 2. A failed write mutates nothing and notifies nobody.
//! 3. Listeners never run while the tree or root is borrowed: dispatch
//!    gathers a snapshot batch first, so listeners are free to read the
//!    store, write back into it, and (un)subscribe.
//! 4. Re-entrant notifications are queued, not recursed: a listener that
//!    writes back into the store sees its mutation applied immediately,
//!    while the resulting fan-out runs after the current pass completes,
//!    in FIFO order.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Empty-path write | Selector over the root | `AccessError::EmptyPath`, nothing happens |
//! | Missing intermediate | No autovivification | `AccessError`, nothing happens |
//! | Listener panic | Consumer bug | Isolated and logged, fan-out continues |
//! | Unbounded cascade | Listener rewrites its own path | Cut off after `MAX_CASCADE` dispatches, logged, queue dropped |

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use pathtree_core::{AccessError, Path, Selector, read_at_mut, write_at};
use serde_json::Value;

use crate::subscription::Subscription;
use crate::tree::{ListenerId, ListenerTree, Stamp};

/// Hard ceiling on queued notification dispatches within one outermost
/// update. A cascade this deep means a listener is rewriting a path it
/// listens on; the remainder of the queue is dropped and reported.
const MAX_CASCADE: usize = 256;

enum Wakeup {
    Scoped(Path),
    Broadcast,
}

pub(crate) struct StoreInner {
    root: RefCell<Value>,
    tree: RefCell<ListenerTree>,
    revision: Cell<u64>,
    dispatching: Cell<bool>,
    queue: RefCell<VecDeque<Wakeup>>,
}

impl StoreInner {
    pub(crate) fn remove_registration(&self, path: &Path, id: ListenerId) -> bool {
        self.tree.borrow_mut().remove(path, id)
    }
}

/// Handle to a path-subscribable state root.
#[derive(Clone)]
pub struct Store {
    inner: Rc<StoreInner>,
}

impl Store {
    /// A store owning `root`.
    #[must_use]
    pub fn new(root: Value) -> Self {
        Self {
            inner: Rc::new(StoreInner {
                root: RefCell::new(root),
                tree: RefCell::new(ListenerTree::new()),
                revision: Cell::new(0),
                dispatching: Cell::new(false),
                queue: RefCell::new(VecDeque::new()),
            }),
        }
    }

    // ── Reading ─────────────────────────────────────────────────────

    /// Read the root under a closure. The borrow enforces the read-only
    /// contract; mutation goes through [`set`](Self::set) and friends.
    pub fn with<T>(&self, f: impl FnOnce(&Value) -> T) -> T {
        f(&self.inner.root.borrow())
    }

    /// A clone of the current root.
    #[must_use]
    pub fn snapshot(&self) -> Value {
        self.inner.root.borrow().clone()
    }

    /// Evaluate `selector` against the current root, cloning the result.
    /// `None` if the path does not resolve.
    #[must_use]
    pub fn read(&self, selector: &Selector) -> Option<Value> {
        self.with(|root| selector.eval(root).cloned())
    }

    /// Current revision: bumps on every mutation through the store.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.inner.revision.get()
    }

    // ── Coarse replacement ──────────────────────────────────────────

    /// Replace the whole root. Advances the revision; deliberately does
    /// not touch the listener tree — pair with
    /// [`notify_all`](Self::notify_all) when subscribers should observe
    /// the swap.
    pub fn replace(&self, root: Value) {
        *self.inner.root.borrow_mut() = root;
        self.bump();
    }

    /// Replace the root through a pure `old -> new` function.
    ///
    /// `f` must not touch the store: while it runs, the root is detached
    /// and reads would observe a placeholder.
    pub fn replace_with(&self, f: impl FnOnce(Value) -> Value) {
        let old = std::mem::take(&mut *self.inner.root.borrow_mut());
        let new = f(old);
        *self.inner.root.borrow_mut() = new;
        self.bump();
    }

    // ── Fine-grained mutation ───────────────────────────────────────

    /// Write `value` at the selector's path, then notify that path.
    ///
    /// Fails exactly as [`write_at`] fails — empty path, missing
    /// intermediate, shape mismatch — and a failed write performs no
    /// notification.
    pub fn set(&self, selector: &Selector, value: Value) -> Result<(), AccessError> {
        write_at(&mut self.inner.root.borrow_mut(), selector.path(), value)?;
        self.bump();
        self.dispatch(Wakeup::Scoped(selector.path().clone()));
        Ok(())
    }

    /// Mutate the **existing** value at the selector's path in place, then
    /// notify that path. Unlike [`set`](Self::set), the final value must
    /// already exist.
    pub fn modify(&self, selector: &Selector, f: impl FnOnce(&mut Value)) -> Result<(), AccessError> {
        {
            let mut root = self.inner.root.borrow_mut();
            f(read_at_mut(&mut root, selector.path())?);
        }
        self.bump();
        self.dispatch(Wakeup::Scoped(selector.path().clone()));
        Ok(())
    }

    // ── Listeners ───────────────────────────────────────────────────

    /// Register `listener` at the selector's path. The selector's id plays
    /// no role here — the tree is keyed by path alone, so path-equal
    /// selectors share a subscription point.
    ///
    /// Raw append semantics: callers deduplicate their own repeated
    /// registrations. Prefer [`subscribe`](Self::subscribe) for scoped
    /// teardown.
    pub fn add_listener(
        &self,
        selector: &Selector,
        listener: impl Fn(Stamp) + 'static,
    ) -> ListenerId {
        self.inner.tree.borrow_mut().add(selector.path(), listener)
    }

    /// Remove the registration `id` from the selector's path. Lenient:
    /// unknown paths and ids are a `false` no-op.
    pub fn remove_listener(&self, selector: &Selector, id: ListenerId) -> bool {
        self.inner.remove_registration(selector.path(), id)
    }

    /// Register `listener` and get an RAII guard that unsubscribes on drop.
    pub fn subscribe(
        &self,
        selector: &Selector,
        listener: impl Fn(Stamp) + 'static,
    ) -> Subscription {
        let id = self.add_listener(selector, listener);
        Subscription::new(Rc::clone(&self.inner), selector.path().clone(), id)
    }

    /// Notify every listener in the tree, stamped with the current
    /// revision. Queued like any other notification when called from
    /// inside a listener.
    pub fn notify_all(&self) {
        self.dispatch(Wakeup::Broadcast);
    }

    // ── Internals ───────────────────────────────────────────────────

    fn bump(&self) {
        self.inner.revision.set(self.inner.revision.get() + 1);
    }

    /// Queue `wakeup` and, unless a dispatch pass is already running,
    /// drain the queue. Listeners run with no borrows held, so re-entrant
    /// store calls land back here and enqueue behind the current pass.
    fn dispatch(&self, wakeup: Wakeup) {
        self.inner.queue.borrow_mut().push_back(wakeup);
        if self.inner.dispatching.get() {
            return;
        }
        self.inner.dispatching.set(true);
        let mut dispatched = 0usize;
        loop {
            let next = self.inner.queue.borrow_mut().pop_front();
            let Some(wakeup) = next else { break };
            if dispatched == MAX_CASCADE {
                let dropped = 1 + self.inner.queue.borrow_mut().drain(..).count();
                tracing::error!(
                    dropped,
                    limit = MAX_CASCADE,
                    "notification cascade exceeded the dispatch limit; dropping the rest"
                );
                break;
            }
            dispatched += 1;
            let batch = match &wakeup {
                Wakeup::Scoped(path) => self.inner.tree.borrow().gather(path),
                Wakeup::Broadcast => self.inner.tree.borrow().gather_all(),
            };
            batch.dispatch(Stamp::now(self.inner.revision.get()));
        }
        self.inner.dispatching.set(false);
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(Value::Null)
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("revision", &self.inner.revision.get())
            .field("tree", &*self.inner.tree.borrow())
            .finish()
    }
}
