#![forbid(unsafe_code)]

//! Reading and writing a nested value at a path.
//!
//! Two disciplines live here, deliberately asymmetric:
//!
//! - **Reads are lenient.** [`read_at`] navigates as far as the structure
//!   allows and returns `None` at the first missing key, out-of-range index,
//!   or scalar in the way. A subscriber may legitimately target a path that
//!   was never populated.
//! - **Writes are strict.** [`write_at`] and [`read_at_mut`] require every
//!   intermediate to exist already — there is no autovivification — and fail
//!   with [`AccessError`] before touching anything.
//!
//! # Invariants
//!
//! 1. A failed write leaves the root byte-for-byte unchanged.
//! 2. `write_at` inserts only at the final segment: a new object key, or an
//!    array append at exactly `len`. Everything before the final segment is
//!    navigation, never creation.
//! 3. `read_at(root, &Path::new())` is `Some(root)`; the empty path is a
//!    valid read target but never a valid write target.

use serde_json::Value;

use crate::error::AccessError;
use crate::path::{Path, Segment};

/// Navigate `root` along `path`, returning the value there if every link
/// exists.
#[must_use]
pub fn read_at<'a>(root: &'a Value, path: &Path) -> Option<&'a Value> {
    path.iter().try_fold(root, |node, segment| match (node, segment) {
        (Value::Object(map), Segment::Key(key)) => map.get(key),
        (Value::Array(items), Segment::Index(index)) => items.get(*index),
        _ => None,
    })
}

/// Navigate `root` along `path` to an **existing** value, mutably.
///
/// Strict counterpart of [`read_at`], used for in-place modification: every
/// segment must resolve, and the empty path is rejected so that whole-root
/// replacement stays on the coarse API.
pub fn read_at_mut<'a>(root: &'a mut Value, path: &Path) -> Result<&'a mut Value, AccessError> {
    if path.is_empty() {
        return Err(AccessError::EmptyPath);
    }
    let mut node = root;
    for (depth, segment) in path.iter().enumerate() {
        node = step_mut(node, segment, depth, path)?;
    }
    Ok(node)
}

/// Assign `value` at `path` inside `root`.
///
/// Navigates every segment but the last through existing containers only,
/// then assigns at the final segment: object keys insert or overwrite; array
/// indexes overwrite below `len` and append at exactly `len`.
pub fn write_at(root: &mut Value, path: &Path, value: Value) -> Result<(), AccessError> {
    let (last, init) = path.split_last().ok_or(AccessError::EmptyPath)?;
    let mut node = root;
    for (depth, segment) in init.iter().enumerate() {
        node = step_mut(node, segment, depth, path)?;
    }
    let depth = path.len() - 1;
    match (node, last) {
        (Value::Object(map), Segment::Key(key)) => {
            map.insert(key.clone(), value);
            Ok(())
        }
        (Value::Array(items), Segment::Index(index)) => {
            let len = items.len();
            if *index < len {
                items[*index] = value;
                Ok(())
            } else if *index == len {
                items.push(value);
                Ok(())
            } else {
                Err(AccessError::OutOfBounds {
                    path: path.clone(),
                    depth,
                    len,
                })
            }
        }
        _ => Err(AccessError::Unindexable {
            path: path.clone(),
            depth,
        }),
    }
}

fn step_mut<'a>(
    node: &'a mut Value,
    segment: &Segment,
    depth: usize,
    path: &Path,
) -> Result<&'a mut Value, AccessError> {
    match (node, segment) {
        (Value::Object(map), Segment::Key(key)) => map.get_mut(key).ok_or_else(|| {
            AccessError::Missing {
                path: path.clone(),
                depth,
            }
        }),
        (Value::Array(items), Segment::Index(index)) => {
            let len = items.len();
            items.get_mut(*index).ok_or(AccessError::OutOfBounds {
                path: path.clone(),
                depth,
                len,
            })
        }
        _ => Err(AccessError::Unindexable {
            path: path.clone(),
            depth,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path;
    use serde_json::json;

    #[test]
    fn read_at_navigates_nested_structure() {
        let root = json!({"a": {"b": [10, {"c": true}]}});
        assert_eq!(read_at(&root, &path!["a", "b", 0]), Some(&json!(10)));
        assert_eq!(read_at(&root, &path!["a", "b", 1, "c"]), Some(&json!(true)));
        assert_eq!(read_at(&root, &Path::new()), Some(&root));
    }

    #[test]
    fn read_at_is_lenient() {
        let root = json!({"a": {"b": 1}});
        assert_eq!(read_at(&root, &path!["a", "x"]), None);
        assert_eq!(read_at(&root, &path!["a", "b", "deeper"]), None);
        assert_eq!(read_at(&root, &path!["a", 0]), None);
        assert_eq!(read_at(&root, &path![5]), None);
    }

    #[test]
    fn write_at_overwrites_and_inserts_keys() {
        let mut root = json!({"a": {"b": 1}});
        write_at(&mut root, &path!["a", "b"], json!(2)).unwrap();
        write_at(&mut root, &path!["a", "new"], json!("x")).unwrap();
        assert_eq!(root, json!({"a": {"b": 2, "new": "x"}}));
    }

    #[test]
    fn write_at_array_overwrite_and_append() {
        let mut root = json!({"items": [1, 2]});
        write_at(&mut root, &path!["items", 0], json!(9)).unwrap();
        write_at(&mut root, &path!["items", 2], json!(3)).unwrap();
        assert_eq!(root, json!({"items": [9, 2, 3]}));
    }

    #[test]
    fn write_at_array_beyond_len_fails() {
        let mut root = json!({"items": [1, 2]});
        let err = write_at(&mut root, &path!["items", 5], json!(0)).unwrap_err();
        assert_eq!(
            err,
            AccessError::OutOfBounds {
                path: path!["items", 5],
                depth: 1,
                len: 2,
            }
        );
        assert_eq!(root, json!({"items": [1, 2]}));
    }

    #[test]
    fn write_at_empty_path_is_rejected() {
        let mut root = json!({"a": 1});
        let err = write_at(&mut root, &Path::new(), json!(2)).unwrap_err();
        assert_eq!(err, AccessError::EmptyPath);
        assert_eq!(root, json!({"a": 1}));
    }

    #[test]
    fn write_at_missing_intermediate_fails_without_mutation() {
        let mut root = json!({});
        let err = write_at(&mut root, &path!["x", "y"], json!(1)).unwrap_err();
        assert_eq!(
            err,
            AccessError::Missing {
                path: path!["x", "y"],
                depth: 0,
            }
        );
        assert_eq!(root, json!({}));
    }

    #[test]
    fn write_at_never_autovivifies() {
        let mut root = json!({"a": {}});
        assert!(write_at(&mut root, &path!["a", "b", "c"], json!(1)).is_err());
        assert_eq!(root, json!({"a": {}}));
    }

    #[test]
    fn write_at_through_scalar_fails() {
        let mut root = json!({"a": 1});
        let err = write_at(&mut root, &path!["a", "b"], json!(2)).unwrap_err();
        assert_eq!(
            err,
            AccessError::Unindexable {
                path: path!["a", "b"],
                depth: 0,
            }
        );
    }

    #[test]
    fn write_at_shape_mismatch_fails() {
        let mut root = json!({"list": [1], "map": {}});
        // Key into an array, index into an object.
        assert!(matches!(
            write_at(&mut root, &path!["list", "k"], json!(0)),
            Err(AccessError::Unindexable { .. })
        ));
        assert!(matches!(
            write_at(&mut root, &path!["map", 0], json!(0)),
            Err(AccessError::Unindexable { .. })
        ));
        assert_eq!(root, json!({"list": [1], "map": {}}));
    }

    #[test]
    fn read_at_mut_reaches_existing_values() {
        let mut root = json!({"a": {"b": [1, 2]}});
        *read_at_mut(&mut root, &path!["a", "b", 1]).unwrap() = json!(5);
        assert_eq!(root, json!({"a": {"b": [1, 5]}}));
    }

    #[test]
    fn read_at_mut_is_strict() {
        let mut root = json!({"a": {}});
        assert_eq!(
            read_at_mut(&mut root, &Path::new()).unwrap_err(),
            AccessError::EmptyPath
        );
        assert!(matches!(
            read_at_mut(&mut root, &path!["a", "b"]),
            Err(AccessError::Missing { .. })
        ));
    }
}
