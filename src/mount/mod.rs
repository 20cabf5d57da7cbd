//! Single-page application mounts.
//!
//! A mount scopes one asset namespace under a request base path. Requests
//! below `<base>/_framework` are framework requests: they go through content
//! encoding negotiation and are never cached by the client without
//! revalidation.

mod dispatch;

pub use dispatch::{ServeContext, ServePlan};

use crate::config::MountConfig;
use crate::manifest::ContentRootMapping;
use crate::namespace::{AssetNamespace, NamespaceError, effective_request_base, resolve_namespace};
use crate::utils::path::{index_of, normalize_base, strip_base};
use std::path::Path;

/// Framework files live below this segment of a mount.
const FRAMEWORK_SEGMENT: &str = "/_framework";

/// Served by the server-side hosting model, not part of the static framework.
const SERVER_SCRIPT: &str = "/blazor.server.js";

/// One mounted single-page application.
#[derive(Debug, Clone)]
pub struct Mount {
    /// Normalized: `""` for root, else `/seg[/seg...]`.
    request_base: String,
    static_asset_path: String,
    namespace: AssetNamespace,
}

impl Mount {
    /// Resolve the namespace for a configured mount.
    pub fn resolve(
        config: &MountConfig,
        web_root: &Path,
        mappings: Option<&[ContentRootMapping]>,
    ) -> Result<Self, NamespaceError> {
        let namespace = resolve_namespace(
            web_root,
            &config.static_asset_path,
            &config.request_path,
            mappings,
        )?;

        Ok(Self {
            request_base: effective_request_base(&config.request_path, &config.static_asset_path),
            static_asset_path: config.static_asset_path.clone(),
            namespace,
        })
    }

    /// Request base path (`/` for the root mount).
    pub fn request_base(&self) -> &str {
        if self.request_base.is_empty() {
            "/"
        } else {
            &self.request_base
        }
    }

    pub fn static_asset_path(&self) -> &str {
        &self.static_asset_path
    }

    pub fn namespace(&self) -> &AssetNamespace {
        &self.namespace
    }

    /// Whether `path` falls under this mount.
    pub fn contains(&self, path: &str) -> bool {
        strip_base(&self.request_base, path).is_some()
    }

    pub fn is_framework_request(&self, path: &str) -> bool {
        is_framework_request(&self.request_base, path)
    }

    /// Logical path of the app shell served for client-side routes.
    pub fn index_path(&self) -> String {
        index_of(&self.request_base)
    }
}

/// Whether `path` addresses a framework file of the app mounted at
/// `request_base`.
///
/// Matching is segment-aware and ASCII-case-insensitive.
/// `<base>/_framework/blazor.server.js` is excluded.
pub fn is_framework_request(request_base: &str, path: &str) -> bool {
    let base = normalize_base(request_base);
    let Some(rest) = strip_base(&base, path) else {
        return false;
    };
    let Some(remaining) = strip_base(FRAMEWORK_SEGMENT, rest) else {
        return false;
    };
    strip_base(SERVER_SCRIPT, remaining).is_none()
}
