//! URL path utilities.
//!
//! Pure functions for request-path manipulation. No side effects.

use std::path::{Path, PathBuf};

/// Normalize a request base path to `""` (root) or `/seg[/seg...]`.
pub fn normalize_base(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

/// Strip a normalized base path from `path`, segment-aware and
/// ASCII-case-insensitive.
///
/// An empty base matches everything. `/app` matches `/app` and `/app/x`
/// but not `/apple`.
pub fn strip_base<'a>(base: &str, path: &'a str) -> Option<&'a str> {
    if base.is_empty() {
        return Some(path);
    }

    let head = path.get(..base.len())?;
    if !head.eq_ignore_ascii_case(base) {
        return None;
    }

    let rest = &path[base.len()..];
    (rest.is_empty() || rest.starts_with('/')).then_some(rest)
}

/// Normalize a raw request URL: strip query/fragment, decode, ensure leading `/`.
pub fn normalize_request_path(url: &str) -> String {
    use percent_encoding::percent_decode_str;

    let path = url.split(['?', '#']).next().unwrap_or(url);
    let decoded = percent_decode_str(path)
        .decode_utf8()
        .map(std::borrow::Cow::into_owned)
        .unwrap_or_else(|_| path.to_string());

    if decoded.starts_with('/') {
        decoded
    } else {
        format!("/{decoded}")
    }
}

/// Whether the last segment of `path` looks like a client-side route
/// rather than a file (no `.` in it).
pub fn is_route_like(path: &str) -> bool {
    let last = path.rsplit('/').next().unwrap_or(path);
    !last.contains('.')
}

/// Join `path` with `index.html`, treating `path` as a directory.
pub fn index_of(path: &str) -> String {
    format!("{}/index.html", path.trim_end_matches('/'))
}

/// Expand `~` and make `path` absolute relative to `root`.
pub fn resolve_against(path: &Path, root: &Path) -> PathBuf {
    let expanded = shellexpand::tilde(&path.to_string_lossy()).into_owned();
    let path = PathBuf::from(expanded);
    if path.is_relative() { root.join(path) } else { path }
}

/// Canonicalize if possible, otherwise make absolute against cwd.
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base() {
        assert_eq!(normalize_base("/"), "");
        assert_eq!(normalize_base(""), "");
        assert_eq!(normalize_base("  "), "");
        assert_eq!(normalize_base("spa1"), "/spa1");
        assert_eq!(normalize_base("/.private/spa1/"), "/.private/spa1");
    }

    #[test]
    fn test_strip_base_segments() {
        assert_eq!(strip_base("", "/a/b.js"), Some("/a/b.js"));
        assert_eq!(strip_base("/app", "/app"), Some(""));
        assert_eq!(strip_base("/app", "/app/x.js"), Some("/x.js"));
        assert_eq!(strip_base("/app", "/APP/x.js"), Some("/x.js"));
        assert_eq!(strip_base("/app", "/apple/x.js"), None);
        assert_eq!(strip_base("/app", "/ap"), None);
        assert_eq!(strip_base("/app", "/other/app"), None);
    }

    #[test]
    fn test_strip_base_non_ascii_boundary() {
        // base length falls inside a multi-byte char
        assert_eq!(strip_base("/ab", "/aé"), None);
    }

    #[test]
    fn test_normalize_request_path() {
        assert_eq!(normalize_request_path("/a%20b.js?v=1"), "/a b.js");
        assert_eq!(normalize_request_path("/x#frag"), "/x");
        assert_eq!(normalize_request_path("rel"), "/rel");
        assert_eq!(normalize_request_path("/dir/"), "/dir/");
    }

    #[test]
    fn test_is_route_like() {
        assert!(is_route_like("/counter"));
        assert!(is_route_like("/"));
        assert!(is_route_like("/v1.2/fetchdata"));
        assert!(!is_route_like("/css/site.css"));
    }

    #[test]
    fn test_index_of() {
        assert_eq!(index_of("/"), "/index.html");
        assert_eq!(index_of("/docs/"), "/docs/index.html");
        assert_eq!(index_of("/docs"), "/docs/index.html");
    }

    #[test]
    fn test_resolve_against() {
        let root = Path::new("/srv/app");
        assert_eq!(resolve_against(Path::new("wwwroot"), root), root.join("wwwroot"));
        assert_eq!(resolve_against(Path::new("/abs"), root), PathBuf::from("/abs"));
    }
}
