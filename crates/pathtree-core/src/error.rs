#![forbid(unsafe_code)]

//! Errors raised by strict value access.
//!
//! Only the mutating accessors ([`write_at`](crate::write_at),
//! [`read_at_mut`](crate::read_at_mut)) produce these. Lenient navigation
//! ([`read_at`](crate::read_at), [`Selector::eval`](crate::Selector::eval))
//! reports a missing link as `None` instead.

use core::fmt;

use crate::path::{Path, Segment};

/// A strict access into a nested value failed.
///
/// The root is always left untouched when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    /// A write was attempted through an empty path. Whole-root replacement
    /// goes through the store's coarse API, never through a path write.
    EmptyPath,
    /// An intermediate or final segment addressed an entry that does not
    /// exist. Writes never create missing intermediates.
    Missing {
        /// The full path being accessed.
        path: Path,
        /// Index of the offending segment within `path`.
        depth: usize,
    },
    /// A segment tried to index into a value that is not a container of the
    /// matching shape (a key into an array, an index into an object, or
    /// anything into a scalar).
    Unindexable {
        /// The full path being accessed.
        path: Path,
        /// Index of the offending segment within `path`.
        depth: usize,
    },
    /// An array index was out of bounds. On the final segment a write at
    /// exactly `len` appends instead of failing.
    OutOfBounds {
        /// The full path being accessed.
        path: Path,
        /// Index of the offending segment within `path`.
        depth: usize,
        /// Length of the array at that point.
        len: usize,
    },
}

impl AccessError {
    /// The segment the access tripped on, if any.
    #[must_use]
    pub fn segment(&self) -> Option<&Segment> {
        match self {
            Self::EmptyPath => None,
            Self::Missing { path, depth }
            | Self::Unindexable { path, depth }
            | Self::OutOfBounds { path, depth, .. } => path.segments().get(*depth),
        }
    }
}

impl fmt::Display for AccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPath => write!(f, "path required for write"),
            Self::Missing { path, depth } => match path.segments().get(*depth) {
                Some(segment) => write!(f, "missing segment `{segment}` in `{path}`"),
                None => write!(f, "missing segment at depth {depth} in `{path}`"),
            },
            Self::Unindexable { path, depth } => match path.segments().get(*depth) {
                Some(segment) => {
                    write!(f, "segment `{segment}` indexes a non-container value in `{path}`")
                }
                None => write!(f, "non-container value at depth {depth} in `{path}`"),
            },
            Self::OutOfBounds { path, depth, len } => match path.segments().get(*depth) {
                Some(segment) => {
                    write!(f, "index `{segment}` out of bounds (len {len}) in `{path}`")
                }
                None => write!(f, "index out of bounds (len {len}) at depth {depth} in `{path}`"),
            },
        }
    }
}

impl std::error::Error for AccessError {}
