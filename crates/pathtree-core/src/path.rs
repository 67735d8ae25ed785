#![forbid(unsafe_code)]

//! Segments and paths into a nested value.
//!
//! A [`Path`] is an ordered sequence of [`Segment`]s — object keys and array
//! indexes — locating a value inside a nested [`serde_json::Value`]. Paths
//! are plain data: two paths are equal iff they have the same length and
//! pairwise-equal segments, and a path never changes once a selector has
//! been built from it.
//!
//! # Invariants
//!
//! 1. Segment equality and ordering are structural and total; `Key` and
//!    `Index` never compare equal to each other.
//! 2. `parent()` of a non-empty path is that path minus its last segment;
//!    `parent()` of the empty path is `None`.
//! 3. `starts_with` is reflexive: every path is a prefix of itself.

use core::fmt;

/// One step into a nested value: an object key or an array index.
///
/// Keys and indexes are distinct — `Key("0".into())` addresses an object
/// entry named `"0"`, never element 0 of an array.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Segment {
    /// An object key.
    Key(String),
    /// An array index.
    Index(usize),
}

impl Segment {
    /// The key, if this segment is one.
    #[must_use]
    pub fn as_key(&self) -> Option<&str> {
        match self {
            Self::Key(k) => Some(k),
            Self::Index(_) => None,
        }
    }

    /// The index, if this segment is one.
    #[must_use]
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Self::Key(_) => None,
            Self::Index(i) => Some(*i),
        }
    }
}

impl From<&str> for Segment {
    fn from(key: &str) -> Self {
        Self::Key(key.to_owned())
    }
}

impl From<String> for Segment {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<usize> for Segment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(k) => write!(f, "{k}"),
            Self::Index(i) => write!(f, "[{i}]"),
        }
    }
}

/// An ordered sequence of segments locating a value inside a nested root.
///
/// The empty path addresses the root itself. `Display` renders keys
/// dot-separated and indexes bracketed (`user.tags[0]`); the empty path
/// renders as `$`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    /// The empty path (the root location).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a segment in place.
    pub fn push(&mut self, segment: impl Into<Segment>) {
        self.segments.push(segment.into());
    }

    /// The segments as a slice.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether this is the root location.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Iterate over the segments.
    pub fn iter(&self) -> core::slice::Iter<'_, Segment> {
        self.segments.iter()
    }

    /// The final segment and everything before it, or `None` for the root.
    #[must_use]
    pub fn split_last(&self) -> Option<(&Segment, &[Segment])> {
        self.segments.split_last()
    }

    /// The path one level up, or `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        let (_, init) = self.segments.split_last()?;
        Some(Self {
            segments: init.to_vec(),
        })
    }

    /// A new path extending this one by `segment`.
    #[must_use]
    pub fn child(&self, segment: impl Into<Segment>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self { segments }
    }

    /// Whether `prefix` is a (non-strict) prefix of this path.
    #[must_use]
    pub fn starts_with(&self, prefix: &Self) -> bool {
        self.segments.starts_with(&prefix.segments)
    }
}

impl From<Vec<Segment>> for Path {
    fn from(segments: Vec<Segment>) -> Self {
        Self { segments }
    }
}

impl FromIterator<Segment> for Path {
    fn from_iter<I: IntoIterator<Item = Segment>>(iter: I) -> Self {
        Self {
            segments: iter.into_iter().collect(),
        }
    }
}

impl Extend<Segment> for Path {
    fn extend<I: IntoIterator<Item = Segment>>(&mut self, iter: I) {
        self.segments.extend(iter);
    }
}

impl IntoIterator for Path {
    type Item = Segment;
    type IntoIter = std::vec::IntoIter<Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.into_iter()
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a Segment;
    type IntoIter = core::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "$");
        }
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Key(k) if i > 0 => write!(f, ".{k}")?,
                _ => write!(f, "{segment}")?,
            }
        }
        Ok(())
    }
}

/// Build a [`Path`] from mixed key/index literals.
///
/// ```
/// use pathtree_core::{path, Path, Segment};
///
/// let p = path!["user", "tags", 0];
/// assert_eq!(p.segments().len(), 3);
/// assert_eq!(p.segments()[2], Segment::Index(0));
/// assert_eq!(path!(), Path::new());
/// ```
#[macro_export]
macro_rules! path {
    () => {
        $crate::Path::new()
    };
    ($($segment:expr),+ $(,)?) => {{
        let mut p = $crate::Path::new();
        $(p.push($crate::Segment::from($segment));)+
        p
    }};
}
