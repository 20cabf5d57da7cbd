//! `[[mount]]` section configuration.
//!
//! Each entry registers one single-page application.
//!
//! # Example
//!
//! ```toml
//! [[mount]]
//! request_path = "/"                    # URL prefix the app answers under
//! static_asset_path = ".private/spa1"   # Base path in the web root / manifest
//!
//! [[mount]]
//! static_asset_path = "admin"           # request_path defaults to "/admin"
//! ```

use crate::config::ConfigDiagnostics;
use crate::config::types::FieldPath;
use crate::namespace::effective_request_base;
use rustc_hash::FxHashSet;
use serde::Deserialize;

/// One single-page application mount.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MountConfig {
    /// URL prefix. Empty means "same as `static_asset_path`".
    #[serde(default)]
    pub request_path: String,

    /// Static asset base path: a directory under the web root, or a
    /// `BasePath` in the development manifest.
    pub static_asset_path: String,
}

impl MountConfig {
    const REQUEST_PATH: FieldPath = FieldPath::new("mount.request_path");
    const STATIC_ASSET_PATH: FieldPath = FieldPath::new("mount.static_asset_path");

    /// Normalized request base this mount answers under.
    pub fn request_base(&self) -> String {
        effective_request_base(&self.request_path, &self.static_asset_path)
    }

    /// Validate all mounts together (duplicates span entries).
    pub fn validate_all(mounts: &[Self], diag: &mut ConfigDiagnostics) {
        let mut seen = FxHashSet::default();

        for mount in mounts {
            if mount.static_asset_path.trim().is_empty() {
                diag.error(Self::STATIC_ASSET_PATH, "must not be empty");
                continue;
            }

            let request_path = mount.request_path.trim();
            if !request_path.is_empty() && !request_path.starts_with('/') {
                diag.error_with_hint(
                    Self::REQUEST_PATH,
                    format!("`{request_path}` must start with `/`"),
                    format!("use `/{request_path}`"),
                );
            }

            let base = mount.request_base().to_ascii_lowercase();
            if !seen.insert(base.clone()) {
                let shown = if base.is_empty() { "/" } else { base.as_str() };
                diag.error(
                    Self::REQUEST_PATH,
                    format!("more than one mount answers under `{shown}`"),
                );
            }
        }
    }
}
