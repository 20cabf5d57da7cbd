//! `[host]` section configuration.
//!
//! Describes the hosting environment the asset namespaces are resolved in.
//!
//! # Example
//!
//! ```toml
//! [host]
//! web_root = "wwwroot"                 # Published assets (relative to config)
//! environment = "development"          # development | staging | production
//! application_name = "spa-host"        # Names the conventional manifest file
//! static_assets_manifest = "obj/app.StaticWebAssets.xml"  # Optional override
//! ```
//!
//! The manifest is only consulted in `development`.

use crate::config::types::FieldPath;
use crate::config::ConfigDiagnostics;
use crate::core::Environment;
use serde::Deserialize;
use std::path::PathBuf;

/// Hosting environment settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Directory holding published static assets.
    pub web_root: PathBuf,

    /// Hosting environment name.
    pub environment: Environment,

    /// Application name; the conventional manifest is
    /// `<exe dir>/<application_name>.StaticWebAssets.xml`.
    pub application_name: String,

    /// Explicit manifest path, takes precedence over the conventional one.
    pub static_assets_manifest: Option<PathBuf>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            web_root: PathBuf::from("wwwroot"),
            environment: Environment::default(),
            application_name: env!("CARGO_PKG_NAME").to_string(),
            static_assets_manifest: None,
        }
    }
}

impl HostConfig {
    const APPLICATION_NAME: FieldPath = FieldPath::new("host.application_name");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.application_name.trim().is_empty() {
            diag.error_with_hint(
                Self::APPLICATION_NAME,
                "must not be empty",
                "it names the manifest file looked up next to the executable",
            );
        }
    }
}
