//! Manifest-backed content root discovery.
//!
//! During development, a build writes a manifest next to the application
//! listing where each library's assets really live on disk. Loading it is
//! best effort: a missing, unreadable or malformed manifest means the
//! feature is off and namespaces fall back to the web root.
//!
//! | Module  | Purpose                                   |
//! |---------|-------------------------------------------|
//! | `parse` | XML → [`ContentRootMapping`] records      |
//! | `cache` | Single-flight, process-scoped memo        |

mod cache;
mod parse;

pub use cache::MappingCache;
pub use parse::{ManifestError, parse_manifest};

use crate::debug;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Suffix of the conventional manifest file next to the executable.
pub const MANIFEST_SUFFIX: &str = ".StaticWebAssets.xml";

/// Requests under `base_path` are satisfied from files under `physical_path`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRootMapping {
    pub base_path: String,
    pub physical_path: String,
}

impl ContentRootMapping {
    pub fn new(base_path: impl Into<String>, physical_path: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
            physical_path: physical_path.into(),
        }
    }
}

/// Where to look for the manifest.
#[derive(Debug, Clone, Default)]
pub struct ManifestLocator {
    /// Explicit path from configuration; wins over the conventional one.
    pub override_path: Option<PathBuf>,
    pub application_name: String,
    /// Directory holding the running application.
    pub application_dir: Option<PathBuf>,
}

impl ManifestLocator {
    /// Locator rooted at the directory of the current executable.
    pub fn for_current_exe(application_name: impl Into<String>, override_path: Option<PathBuf>) -> Self {
        let application_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf));
        Self {
            override_path,
            application_name: application_name.into(),
            application_dir,
        }
    }

    /// Path the manifest would be read from, whether or not it exists.
    pub fn candidate(&self) -> Option<PathBuf> {
        if let Some(path) = &self.override_path {
            return Some(path.clone());
        }
        let dir = self.application_dir.as_ref()?;
        Some(dir.join(format!("{}{MANIFEST_SUFFIX}", self.application_name)))
    }

    /// Existing manifest path, if any.
    pub fn resolve(&self) -> Option<PathBuf> {
        self.candidate().filter(|path| path.is_file())
    }
}

/// Read and parse the manifest.
pub fn read_manifest(path: &Path) -> Result<Vec<ContentRootMapping>, ManifestError> {
    let file = File::open(path).map_err(|e| ManifestError::Io(path.to_path_buf(), e))?;
    parse_manifest(BufReader::new(file))
}

/// Load content root mappings, degrading to `None` on any failure.
///
/// `None` means "no manifest in effect", not an error.
pub fn load_content_root_mappings(locator: &ManifestLocator) -> Option<Vec<ContentRootMapping>> {
    let Some(path) = locator.resolve() else {
        debug!("manifest"; "no manifest found, serving from web root");
        return None;
    };

    match read_manifest(&path) {
        Ok(mappings) => {
            debug!("manifest"; "{} content root(s) from {}", mappings.len(), path.display());
            Some(mappings)
        }
        Err(e) => {
            debug!("manifest"; "ignoring {}: {}", path.display(), e);
            None
        }
    }
}
