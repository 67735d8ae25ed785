#![forbid(unsafe_code)]

//! Path-scoped listener tree and reactive state store for PathTree.
//!
//! This crate provides the publish/subscribe half of PathTree:
//!
//! - [`ListenerTree`]: a trie keyed by path segments; registrations live at
//!   exact locations, notifications fan out to the exact node, every
//!   ancestor, and every descendant, and the trie prunes itself back to
//!   live subscriptions on removal.
//! - [`Store`]: one root [`serde_json::Value`] plus one listener tree,
//!   composed into a coherent update protocol — coarse whole-root
//!   replacement vs. fine-grained path-scoped mutation-plus-notify.
//! - [`Subscription`] / [`SubscriptionSet`]: RAII registration guards for
//!   leak-free teardown.
//! - [`Bound`] / [`Derived`]: lazy and memoized value bindings fulfilling
//!   the consumer contract (read now, re-evaluate on notify, unsubscribe on
//!   drop).
//!
//! # Architecture
//!
//! Everything is single-threaded: the store hands out cheap `Rc` handles
//! and guards its internals with `RefCell`/`Cell`. Listeners run
//! synchronously but never under a borrow — dispatch snapshots the
//! listeners to invoke first — so a listener may freely read the store,
//! write back into it, and (un)subscribe. Re-entrant notifications queue
//! behind the running pass instead of recursing.
//!
//! # Example
//!
//! ```
//! use pathtree_store::{path, Selector, Store, SubscriptionSet};
//! use serde_json::json;
//!
//! let store = Store::new(json!({"user": {"name": "ada", "level": 3}}));
//! let level = Selector::new(path!["user", "level"]);
//!
//! let mut scope = SubscriptionSet::new();
//! scope.subscribe(&store, &Selector::new(path!["user"]), |stamp| {
//!     // Fires for any change at `user` or below.
//!     let _ = stamp.revision;
//! });
//!
//! store.set(&level, json!(4)).unwrap();
//! assert_eq!(store.read(&level), Some(json!(4)));
//! ```

pub mod binding;
pub mod store;
pub mod subscription;
pub mod tree;

pub use binding::{Bound, Derived, bind_map, bind_value};
pub use store::Store;
pub use subscription::{Subscription, SubscriptionSet};
pub use tree::{ListenerId, ListenerTree, NotifyBatch, Stamp};

pub use pathtree_core::{
    AccessError, Path, Segment, Selector, SelectorId, path, read_at, read_at_mut, write_at,
};
