//! Helpers for slash-delimited path manipulation.
//!
//! Paths are normalized by dropping empty segments, so `"/a//b/"`, `"a/b"`
//! and `"a/b/"` all address the same object.

/// Iterates over the non-empty segments of a slash-delimited path.
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Cumulative prefixes of the normalized path, shallowest first.
///
/// `"/a/b/c"` yields `["a", "a/b", "a/b/c"]`; a path with no segments (the
/// root) yields nothing.
pub fn prefixes(path: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut cur = String::with_capacity(path.len());
    for seg in segments(path) {
        if !cur.is_empty() {
            cur.push('/');
        }
        cur.push_str(seg);
        out.push(cur.clone());
    }
    out
}

/// The normalized path, or `None` when `path` has no segments.
pub fn normalize(path: &str) -> Option<String> {
    prefixes(path).pop()
}
