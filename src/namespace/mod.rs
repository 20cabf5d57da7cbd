//! Composed, read-only asset namespace.
//!
//! A namespace is an ordered list of [`ContentRoot`]s. Queries try the roots
//! in declaration order and the first one holding the path wins, so an
//! overlay root listed first shadows a base root listed after it.
//!
//! ```text
//! resolve_namespace(web_root, "spa1", "/", None)
//!     → Single(ContentRoot { "/", web_root/spa1 })
//!
//! resolve_namespace(web_root, "spa1", "/", Some([
//!     { base: "spa1", path: /src/theme/wwwroot },
//!     { base: "lib",  path: /src/lib/wwwroot },
//!     { base: "spa1", path: /src/spa1/wwwroot },
//! ]))
//!     → Composite([ /src/theme/wwwroot, /src/spa1/wwwroot ])
//! ```

mod root;

pub use root::ContentRoot;

use crate::manifest::ContentRootMapping;
use crate::utils::path::normalize_base;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Fatal namespace construction errors (raised at startup, never per request).
#[derive(Debug, Error)]
pub enum NamespaceError {
    #[error("unable to locate static asset mapping for static asset path `{0}`")]
    MissingPhysicalPath(String),
}

/// Read-only file namespace over zero or more content roots.
#[derive(Debug, Clone, Default)]
pub enum AssetNamespace {
    /// Nothing exists.
    #[default]
    Empty,
    /// Delegates straight to one root.
    Single(ContentRoot),
    /// First root containing the path wins.
    Composite(Vec<ContentRoot>),
}

/// An opened asset.
#[derive(Debug)]
pub struct AssetFile {
    pub physical_path: PathBuf,
    pub file: File,
    pub len: u64,
}

impl AssetNamespace {
    pub fn from_roots(mut roots: Vec<ContentRoot>) -> Self {
        match roots.len() {
            0 => Self::Empty,
            1 => Self::Single(roots.remove(0)),
            _ => Self::Composite(roots),
        }
    }

    /// Roots in resolution order.
    pub fn roots(&self) -> &[ContentRoot] {
        match self {
            Self::Empty => &[],
            Self::Single(root) => std::slice::from_ref(root),
            Self::Composite(roots) => roots,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Physical file for `logical`, from the first root that has it.
    pub fn locate(&self, logical: &str) -> Option<PathBuf> {
        match self {
            Self::Empty => None,
            Self::Single(root) => root.locate(logical),
            Self::Composite(roots) => roots.iter().find_map(|root| root.locate(logical)),
        }
    }

    pub fn exists(&self, logical: &str) -> bool {
        self.locate(logical).is_some()
    }

    /// Open `logical` for streaming. Misses surface as `NotFound`.
    pub fn open(&self, logical: &str) -> io::Result<AssetFile> {
        let physical_path = self
            .locate(logical)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, logical.to_string()))?;
        let file = File::open(&physical_path)?;
        let len = file.metadata()?.len();
        Ok(AssetFile {
            physical_path,
            file,
            len,
        })
    }
}

/// Request base path a mount is scoped under.
///
/// A blank request base defaults to the static asset base path.
pub fn effective_request_base(request_base_path: &str, static_asset_base_path: &str) -> String {
    if request_base_path.trim().is_empty() {
        normalize_base(static_asset_base_path)
    } else {
        normalize_base(request_base_path)
    }
}

/// Build the namespace for one static asset base path.
///
/// - No mappings: a single root at `web_root/static_asset_base_path`.
/// - Mappings: every mapping whose base path equals `static_asset_base_path`,
///   in manifest order. A matching mapping without a physical path is fatal.
///
/// Zero matching roots yield [`AssetNamespace::Empty`].
pub fn resolve_namespace(
    web_root: &Path,
    static_asset_base_path: &str,
    request_base_path: &str,
    mappings: Option<&[ContentRootMapping]>,
) -> Result<AssetNamespace, NamespaceError> {
    let request_base = effective_request_base(request_base_path, static_asset_base_path);
    let content_roots = content_root_paths(web_root, static_asset_base_path, mappings)?;

    let roots = content_roots
        .into_iter()
        .map(|path| ContentRoot::new(&request_base, path))
        .collect();

    Ok(AssetNamespace::from_roots(roots))
}

fn content_root_paths(
    web_root: &Path,
    static_asset_base_path: &str,
    mappings: Option<&[ContentRootMapping]>,
) -> Result<Vec<PathBuf>, NamespaceError> {
    let Some(mappings) = mappings else {
        // assets are published under the host's web root
        let relative = static_asset_base_path.trim_start_matches('/');
        return Ok(vec![web_root.join(relative)]);
    };

    mappings
        .iter()
        .filter(|m| m.base_path == static_asset_base_path)
        .map(|m| {
            if m.physical_path.trim().is_empty() {
                Err(NamespaceError::MissingPhysicalPath(
                    static_asset_base_path.to_string(),
                ))
            } else {
                Ok(PathBuf::from(&m.physical_path))
            }
        })
        .collect()
}

/// Build the host web-root namespace: the web root itself, followed by every
/// manifest root scoped under `/<base_path>`.
///
/// Base paths with a dot-prefixed segment are private and left to explicit
/// mounts. Mappings without a physical path are skipped.
pub fn resolve_web_root(web_root: &Path, mappings: Option<&[ContentRootMapping]>) -> AssetNamespace {
    let mut roots = vec![ContentRoot::new("/", web_root)];

    for mapping in mappings.unwrap_or_default() {
        if is_private_base(&mapping.base_path) {
            continue;
        }
        if mapping.physical_path.trim().is_empty() {
            crate::log!("warning"; "manifest entry `{}` has no path, skipped", mapping.base_path);
            continue;
        }
        roots.push(ContentRoot::new(&mapping.base_path, &mapping.physical_path));
    }

    AssetNamespace::from_roots(roots)
}

fn is_private_base(base_path: &str) -> bool {
    base_path
        .split('/')
        .filter(|s| !s.is_empty())
        .any(|s| s.starts_with('.'))
}
