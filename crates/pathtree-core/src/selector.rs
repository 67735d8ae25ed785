#![forbid(unsafe_code)]

//! Selectors: a path plus an opaque consumer identity.
//!
//! A [`Selector`] is what consumers hold to read a value out of a root and
//! to key their subscriptions. The identity ([`SelectorId`]) exists only to
//! tell consumers apart — subscription indexing is by path alone. Two
//! selectors built from the same path are distinct identities that share the
//! same subscription point: removing a registration made under one also
//! matches a path-equal registration key made under the other.
//!
//! # Invariants
//!
//! 1. Every `Selector::new` call yields a fresh id, process-wide.
//! 2. Cloning a selector preserves its id — a clone is the same consumer.
//! 3. A selector's path never changes after construction.

use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::Value;

use crate::access;
use crate::path::Path;

/// Opaque identity of a selector.
///
/// A monotonic token, not derived from the path. Comparable and hashable so
/// consumers can use it as a map key; never used for tree indexing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SelectorId(u64);

impl SelectorId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw token value.
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

/// An immutable path paired with a fresh opaque identity.
#[derive(Clone, Debug)]
pub struct Selector {
    id: SelectorId,
    path: Path,
}

impl Selector {
    /// Create a selector for `path` with a fresh identity.
    #[must_use]
    pub fn new(path: Path) -> Self {
        Self {
            id: SelectorId::next(),
            path,
        }
    }

    /// A selector for the root location (the empty path).
    ///
    /// Valid for reads and for subscribing to every change; rejected by
    /// writes with [`AccessError::EmptyPath`](crate::AccessError::EmptyPath).
    #[must_use]
    pub fn root() -> Self {
        Self::new(Path::new())
    }

    /// This selector's identity.
    #[must_use]
    pub fn id(&self) -> SelectorId {
        self.id
    }

    /// The path this selector addresses.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Consume the selector, keeping its path.
    #[must_use]
    pub fn into_path(self) -> Path {
        self.path
    }

    /// Evaluate against a root: safe navigation, `None` at the first
    /// missing link.
    #[must_use]
    pub fn eval<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        access::read_at(root, &self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path;
    use serde_json::json;

    #[test]
    fn same_path_distinct_identities() {
        let a = Selector::new(path!["user", "name"]);
        let b = Selector::new(path!["user", "name"]);
        assert_ne!(a.id(), b.id());
        assert_eq!(a.path(), b.path());
    }

    #[test]
    fn clone_preserves_identity() {
        let a = Selector::new(path!["user"]);
        let b = a.clone();
        assert_eq!(a.id(), b.id());
    }

    #[test]
    fn eval_reads_through_nesting() {
        let root = json!({"user": {"tags": ["admin", "ops"]}});
        let sel = Selector::new(path!["user", "tags", 1]);
        assert_eq!(sel.eval(&root), Some(&json!("ops")));
    }

    #[test]
    fn eval_stops_at_first_missing_link() {
        let root = json!({"user": {"name": "ada"}});
        assert_eq!(Selector::new(path!["user", "age"]).eval(&root), None);
        assert_eq!(Selector::new(path!["team", "name"]).eval(&root), None);
        assert_eq!(Selector::new(path!["user", "name", 0]).eval(&root), None);
    }

    #[test]
    fn root_selector_reads_whole_root() {
        let root = json!({"a": 1});
        assert_eq!(Selector::root().eval(&root), Some(&root));
    }
}
