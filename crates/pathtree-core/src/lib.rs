#![forbid(unsafe_code)]

//! Path, selector, and value-access primitives for PathTree.
//!
//! This crate defines where things live inside a nested [`serde_json::Value`]
//! and how to read and write them there:
//!
//! - [`Segment`] / [`Path`]: an ordered sequence of object keys and array
//!   indexes locating a value inside the root. The [`path!`] macro builds one
//!   from mixed literals.
//! - [`Selector`]: an immutable path paired with an opaque unique identity,
//!   used by consumers to read a value and to key subscriptions.
//! - [`read_at`] / [`write_at`] / [`read_at_mut`]: the value accessor. Reads
//!   navigate leniently and return `None` at the first missing link; writes
//!   are strict, never autovivify, and fail with [`AccessError`] leaving the
//!   root untouched.
//!
//! # Example
//!
//! ```
//! use pathtree_core::{path, read_at, write_at, Selector};
//! use serde_json::json;
//!
//! let mut root = json!({"user": {"name": "ada", "tags": ["admin"]}});
//!
//! let sel = Selector::new(path!["user", "tags", 0]);
//! assert_eq!(sel.eval(&root), Some(&json!("admin")));
//!
//! write_at(&mut root, sel.path(), json!("owner")).unwrap();
//! assert_eq!(read_at(&root, sel.path()), Some(&json!("owner")));
//!
//! // Reads are lenient; writes through a missing intermediate are not.
//! assert_eq!(read_at(&root, &path!["user", "missing", "x"]), None);
//! assert!(write_at(&mut root, &path!["user", "missing", "x"], json!(1)).is_err());
//! ```

pub mod access;
pub mod error;
pub mod path;
pub mod selector;

pub use access::{read_at, read_at_mut, write_at};
pub use error::AccessError;
pub use path::{Path, Segment};
pub use selector::{Selector, SelectorId};
