//! Path joining and normalization.

/// Returns `true` if `path` ends with a slash.
pub fn has_trailing_slash(path: &str) -> bool {
    path.ends_with('/')
}

/// Drops the last segment of a path, keeping everything before the final slash.
///
/// `a/b/c` becomes `a/b`, `foo/` becomes `foo` and `foo` becomes the empty string.
pub fn remove_last_segment(path: &str) -> String {
    match path.rfind('/') {
        Some(i) => path[..i].to_string(),
        None => String::new(),
    }
}

/// Resolves `path` against an optional base path.
///
/// Paths starting with `/` ignore the base. Empty and `.` segments are dropped,
/// `..` removes the previous segment (never climbing above the root), and the
/// result always starts with a single `/`.
///
/// # Arguments
///
/// * `path` - Caller path, absolute-from-root or relative
/// * `base` - Base path used for relative resolution
/// * `trailing_slash` - Append a slash to a non-root result
pub fn normalize_path(path: &str, base: Option<&str>, trailing_slash: bool) -> String {
    let joined = match base.filter(|b| !b.is_empty()) {
        Some(base) if !path.starts_with('/') => format!("{}/{}", base, path),
        _ => path.to_string(),
    };

    let mut segments: Vec<&str> = Vec::new();
    for segment in joined.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    let mut result = format!("/{}", segments.join("/"));
    if trailing_slash && !segments.is_empty() {
        result.push('/');
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_last_segment() {
        assert_eq!(remove_last_segment("a/b/c"), "a/b");
        assert_eq!(remove_last_segment("foo/"), "foo");
        assert_eq!(remove_last_segment("foo"), "");
    }

    #[test]
    fn test_normalize_relative_against_base() {
        assert_eq!(normalize_path("bar", Some("foo"), false), "/foo/bar");
        assert_eq!(normalize_path("bar", Some("foo/"), false), "/foo/bar");
        assert_eq!(normalize_path("bar", None, false), "/bar");
        assert_eq!(normalize_path("bar", Some(""), true), "/bar/");
    }

    #[test]
    fn test_normalize_absolute_ignores_base() {
        assert_eq!(normalize_path("/bar", Some("foo"), false), "/bar");
        assert_eq!(normalize_path("/bar/", Some("foo"), true), "/bar/");
    }

    #[test]
    fn test_normalize_dot_segments() {
        assert_eq!(normalize_path("a/./b/../c", None, false), "/a/c");
        assert_eq!(normalize_path("../../x", Some("foo"), false), "/x");
        assert_eq!(normalize_path("//a///b", None, false), "/a/b");
    }

    #[test]
    fn test_normalize_root() {
        assert_eq!(normalize_path("/", None, true), "/");
        assert_eq!(normalize_path("..", None, false), "/");
    }
}
