//! A single scoped content root.

use crate::utils::path::{normalize_base, strip_base};
use std::path::{Path, PathBuf};

/// Physical directory addressable under a request base path.
///
/// Lookups strip `request_base_path` from the logical path before touching
/// the filesystem; a path outside the base never belongs to this root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRoot {
    /// Normalized: `""` for root, else `/seg[/seg...]`.
    request_base_path: String,
    content_root: PathBuf,
}

impl ContentRoot {
    pub fn new(request_base_path: &str, content_root: impl Into<PathBuf>) -> Self {
        Self {
            request_base_path: normalize_base(request_base_path),
            content_root: content_root.into(),
        }
    }

    /// Request base path (`/` for the root scope).
    pub fn request_base_path(&self) -> &str {
        if self.request_base_path.is_empty() {
            "/"
        } else {
            &self.request_base_path
        }
    }

    pub fn content_root(&self) -> &Path {
        &self.content_root
    }

    /// The part of `logical` below the base path, if it is inside it.
    pub fn relative<'a>(&self, logical: &'a str) -> Option<&'a str> {
        strip_base(&self.request_base_path, logical)
    }

    /// Physical file backing `logical`, if it exists and is a regular file.
    pub fn locate(&self, logical: &str) -> Option<PathBuf> {
        let rest = self.relative(logical)?;
        let physical = self.physical_path(rest)?;
        physical.is_file().then_some(physical)
    }

    /// Map a base-relative path onto the content root.
    ///
    /// Rejects traversal, hidden segments and separators the platform could
    /// reinterpret. Returns `None` for the root itself.
    fn physical_path(&self, rest: &str) -> Option<PathBuf> {
        let mut physical = self.content_root.clone();
        let mut depth = 0;

        for segment in rest.split('/').filter(|s| !s.is_empty()) {
            if segment.starts_with('.') || segment.contains(['\\', '\0', ':']) {
                return None;
            }
            physical.push(segment);
            depth += 1;
        }

        (depth > 0).then_some(physical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn root_with(files: &[&str]) -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        for file in files {
            let path = dir.path().join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, file.as_bytes()).unwrap();
        }
        let root = dir.path().to_path_buf();
        (dir, root)
    }

    #[test]
    fn test_locate_under_base() {
        let (_dir, path) = root_with(&["index.html", "_framework/app.js"]);
        let root = ContentRoot::new("/spa", &path);

        assert_eq!(root.locate("/spa/index.html"), Some(path.join("index.html")));
        assert_eq!(
            root.locate("/SPA/_framework/app.js"),
            Some(path.join("_framework").join("app.js"))
        );
        assert_eq!(root.locate("/index.html"), None);
        assert_eq!(root.locate("/spa2/index.html"), None);
    }

    #[test]
    fn test_root_base_matches_everything() {
        let (_dir, path) = root_with(&["index.html"]);
        for base in ["/", ""] {
            let root = ContentRoot::new(base, &path);
            assert_eq!(root.request_base_path(), "/");
            assert!(root.locate("/index.html").is_some());
        }
    }

    #[test]
    fn test_directories_and_root_not_files() {
        let (_dir, path) = root_with(&["css/site.css"]);
        let root = ContentRoot::new("/", &path);

        assert_eq!(root.locate("/css"), None);
        assert_eq!(root.locate("/"), None);
        assert_eq!(root.locate(""), None);
    }

    #[test]
    fn test_rejects_traversal_and_hidden() {
        let (dir, path) = root_with(&["site/index.html", "secret.txt", "site/.env"]);
        let root = ContentRoot::new("/", path.join("site"));

        assert_eq!(root.locate("/../secret.txt"), None);
        assert_eq!(root.locate("/./index.html"), None);
        assert_eq!(root.locate("/.env"), None);
        assert_eq!(root.locate("/..\\secret.txt"), None);
        drop(dir);
    }

    #[test]
    fn test_dotted_content_root_allowed() {
        let (_dir, path) = root_with(&[".private/spa1/index.html"]);
        let root = ContentRoot::new("/", path.join(".private/spa1"));

        assert!(root.locate("/index.html").is_some());
    }
}
