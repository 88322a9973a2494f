//! Path-addressed lookup into untyped documents.

use super::{Document, Value};
use crate::core::ReleaseError;

/// Resolve `path` against `document`, returning the string found there.
///
/// Segments are consumed left to right. While the current value is a mapping a
/// segment is a key; when it is a list, the segment is parsed as a zero-based index
/// into it. The first string reached is returned immediately, even if segments
/// remain.
///
/// Returns `Ok(None)` when a key is absent or the path is exhausted without reaching
/// a string. Callers that need a value treat `None` as a mismatch.
///
/// # Errors
///
/// - [`ReleaseError::InvalidPath`] if a list index is not a non-negative integer or
///   is out of range
/// - [`ReleaseError::UnexpectedType`] if a segment has to be applied to a number,
///   boolean, null or other non-container scalar; the error names that segment
pub fn resolve<'a, S: AsRef<str>>(
    document: &'a Document,
    path: &[S],
) -> Result<Option<&'a str>, ReleaseError> {
    let mut cursor = Cursor::Map(document);

    for segment in path {
        let segment = segment.as_ref();

        let value = match cursor {
            Cursor::Map(map) => match map.get(segment) {
                Some(value) => value,
                None => return Ok(None),
            },
            Cursor::List(list) => {
                let index: usize = segment.parse().map_err(|_| invalid_path(segment, path))?;
                list.get(index).ok_or_else(|| invalid_path(segment, path))?
            }
            Cursor::Scalar(kind) => {
                return Err(ReleaseError::UnexpectedType {
                    segment: segment.to_string(),
                    path: join_path(path),
                    found: kind.to_string(),
                });
            }
        };

        cursor = match value {
            Value::Str(s) => return Ok(Some(s.as_str())),
            Value::Map(map) => Cursor::Map(map),
            Value::List(list) => Cursor::List(list.as_slice()),
            Value::Other(kind) => Cursor::Scalar(*kind),
        };
    }

    Ok(None)
}

/// Position of the traversal between segments.
#[derive(Clone, Copy)]
enum Cursor<'a> {
    Map(&'a Document),
    List(&'a [Value]),
    Scalar(&'static str),
}

/// Split a dotted prefix into path segments; an empty prefix has no segments.
pub fn split_prefix(prefix: &str) -> Vec<String> {
    if prefix.is_empty() {
        Vec::new()
    } else {
        prefix.split('.').map(str::to_string).collect()
    }
}

/// Build the `tag` and `hub` lookup paths under a dotted prefix.
///
/// `"global"` yields `(["global", "tag"], ["global", "hub"])`; an empty prefix yields
/// `(["tag"], ["hub"])`.
pub fn hub_tag_paths(prefix: &str) -> (Vec<String>, Vec<String>) {
    let base = split_prefix(prefix);

    let mut tag = base.clone();
    tag.push("tag".to_string());

    let mut hub = base;
    hub.push("hub".to_string());

    (tag, hub)
}

fn invalid_path<S: AsRef<str>>(segment: &str, path: &[S]) -> ReleaseError {
    ReleaseError::InvalidPath {
        segment: segment.to_string(),
        path: join_path(path),
    }
}

fn join_path<S: AsRef<str>>(path: &[S]) -> String {
    path.iter().map(|s| s.as_ref()).collect::<Vec<&str>>().join(".")
}
