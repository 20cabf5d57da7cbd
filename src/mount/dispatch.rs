//! Request dispatch across mounts and the web root.

use super::Mount;
use crate::config::AppConfig;
use crate::core::headers::names::CACHE_CONTROL;
use crate::core::ResponseHeaders;
use crate::debug;
use crate::encoding::negotiate;
use crate::manifest::MappingCache;
use crate::namespace::{AssetFile, AssetNamespace, NamespaceError, resolve_web_root};
use crate::utils::mime::{ContentTypeMap, served_content_type};
use crate::utils::path::{index_of, is_route_like};

/// A resolved response: the file to stream and the headers to send with it.
#[derive(Debug)]
pub struct ServePlan {
    /// Logical path that was opened (after any encoding rewrite).
    pub logical_path: String,
    pub file: AssetFile,
    pub content_type: &'static str,
    pub headers: ResponseHeaders,
}

/// Everything needed to answer requests, built once at startup.
#[derive(Debug)]
pub struct ServeContext {
    /// Longest request base first.
    mounts: Vec<Mount>,
    web_root: Option<AssetNamespace>,
    framework_types: ContentTypeMap,
    default_types: ContentTypeMap,
}

impl ServeContext {
    /// Resolve every mount against the web root and, in development, the
    /// static web assets manifest.
    pub fn build(config: &AppConfig, cache: &MappingCache) -> Result<Self, NamespaceError> {
        let mappings = cache.for_environment(config.host.environment, &config.manifest_locator());
        let mappings = mappings.as_deref();
        let web_root = config.host.web_root.as_path();

        let mut mounts = config
            .mounts
            .iter()
            .map(|mount| Mount::resolve(mount, web_root, mappings))
            .collect::<Result<Vec<_>, _>>()?;
        mounts.sort_by_key(|mount| std::cmp::Reverse(mount.request_base.len()));

        let web_root = config
            .serve
            .web_root
            .then(|| resolve_web_root(web_root, mappings));

        Ok(Self {
            mounts,
            web_root,
            framework_types: ContentTypeMap::framework(),
            default_types: ContentTypeMap::new(),
        })
    }

    pub fn mounts(&self) -> &[Mount] {
        &self.mounts
    }

    pub fn web_root(&self) -> Option<&AssetNamespace> {
        self.web_root.as_ref()
    }

    /// The mount answering `path`, if any.
    pub fn mount_for(&self, path: &str) -> Option<&Mount> {
        self.mounts.iter().find(|mount| mount.contains(path))
    }

    /// Decide what to serve for a normalized request path.
    ///
    /// `None` means 404.
    pub fn plan(&self, path: &str, accept_encoding: Option<&str>) -> Option<ServePlan> {
        match self.mount_for(path) {
            Some(mount) if mount.is_framework_request(path) => {
                self.plan_framework(mount, path, accept_encoding)
            }
            Some(mount) => self.plan_app(mount, path),
            None => self
                .web_root
                .as_ref()
                .and_then(|namespace| self.plan_static(namespace, path)),
        }
    }

    /// Framework files: negotiate encoding, never fall back to the app shell.
    fn plan_framework(
        &self,
        mount: &Mount,
        path: &str,
        accept_encoding: Option<&str>,
    ) -> Option<ServePlan> {
        let namespace = mount.namespace();
        let negotiation = negotiate(path, accept_encoding, |candidate| {
            namespace.exists(candidate)
        });

        let mut logical_path = path.to_string();
        let mut headers = ResponseHeaders::new();
        negotiation.apply(&mut logical_path, &mut headers);
        if let Some(encoding) = negotiation.selected() {
            debug!("encoding"; "{} -> {}", path, encoding.token());
        }

        let file = namespace.open(&logical_path).ok()?;
        headers.set(CACHE_CONTROL, "no-cache");

        Some(ServePlan {
            content_type: served_content_type(&self.framework_types, &logical_path),
            logical_path,
            file,
            headers,
        })
    }

    /// App files, directory index, then the app shell for client-side routes.
    fn plan_app(&self, mount: &Mount, path: &str) -> Option<ServePlan> {
        if let Some(plan) = self.plan_static(mount.namespace(), path) {
            return Some(plan);
        }
        if !is_route_like(path) {
            return None;
        }
        debug!("serve"; "{} -> app shell of {}", path, mount.request_base());
        self.open_plain(mount.namespace(), mount.index_path())
    }

    /// Exact file, or the directory's `index.html`.
    fn plan_static(&self, namespace: &AssetNamespace, path: &str) -> Option<ServePlan> {
        self.open_plain(namespace, path.to_string()).or_else(|| {
            is_route_like(path)
                .then(|| index_of(path))
                .and_then(|index| self.open_plain(namespace, index))
        })
    }

    fn open_plain(&self, namespace: &AssetNamespace, logical_path: String) -> Option<ServePlan> {
        let file = namespace.open(&logical_path).ok()?;
        Some(ServePlan {
            content_type: self.default_types.for_path(&logical_path),
            logical_path,
            file,
            headers: ResponseHeaders::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MountConfig;
    use crate::core::Environment;
    use crate::core::headers::names::{CONTENT_ENCODING, VARY};
    use crate::utils::mime::types;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, body: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, body).unwrap();
    }

    fn mount(request_path: &str, static_asset_path: &str) -> MountConfig {
        MountConfig {
            request_path: request_path.into(),
            static_asset_path: static_asset_path.into(),
        }
    }

    /// Web root with one app at `/` and one at `/admin`.
    fn fixture() -> (TempDir, AppConfig) {
        let dir = TempDir::new().unwrap();
        let web_root = dir.path().join("wwwroot");

        write(&web_root, "favicon.ico", "ico");
        write(&web_root, "docs/index.html", "docs");
        write(&web_root, ".private/spa1/index.html", "spa1");
        write(&web_root, ".private/spa1/css/app.css", "css");
        write(&web_root, ".private/spa1/_framework/dotnet.wasm", "wasm");
        write(&web_root, ".private/spa1/_framework/dotnet.wasm.br", "br");
        write(&web_root, ".private/spa1/_framework/dotnet.wasm.gz", "gz");
        write(&web_root, ".private/spa1/_framework/app.dll", "dll");
        write(&web_root, "admin/index.html", "admin");

        let mut config = AppConfig::default();
        config.host.web_root = web_root;
        config.mounts = vec![mount("/", ".private/spa1"), mount("", "admin")];
        (dir, config)
    }

    fn body(plan: &ServePlan) -> String {
        fs::read_to_string(&plan.file.physical_path).unwrap()
    }

    #[test]
    fn test_mounts_ordered_by_specificity() {
        let (_dir, config) = fixture();
        let context = ServeContext::build(&config, &MappingCache::new()).unwrap();

        let bases: Vec<_> = context.mounts().iter().map(Mount::request_base).collect();
        assert_eq!(bases, ["/admin", "/"]);
        assert_eq!(context.mount_for("/admin/users").unwrap().request_base(), "/admin");
        assert_eq!(context.mount_for("/administrator").unwrap().request_base(), "/");
    }

    #[test]
    fn test_framework_request_negotiates_encoding() {
        let (_dir, config) = fixture();
        let context = ServeContext::build(&config, &MappingCache::new()).unwrap();

        let plan = context
            .plan("/_framework/dotnet.wasm", Some("gzip, br"))
            .unwrap();

        assert_eq!(plan.logical_path, "/_framework/dotnet.wasm.br");
        assert_eq!(body(&plan), "br");
        assert_eq!(plan.content_type, types::WASM);
        assert_eq!(plan.headers.get(CONTENT_ENCODING), Some("br"));
        assert_eq!(plan.headers.get(VARY), Some(CONTENT_ENCODING));
        assert_eq!(plan.headers.get(CACHE_CONTROL), Some("no-cache"));
    }

    #[test]
    fn test_framework_request_without_accept_encoding() {
        let (_dir, config) = fixture();
        let context = ServeContext::build(&config, &MappingCache::new()).unwrap();

        let plan = context.plan("/_framework/dotnet.wasm", None).unwrap();
        assert_eq!(plan.logical_path, "/_framework/dotnet.wasm");
        assert!(plan.headers.get(CONTENT_ENCODING).is_none());
        assert!(plan.headers.get(VARY).is_none());
        assert_eq!(plan.headers.get(CACHE_CONTROL), Some("no-cache"));
    }

    #[test]
    fn test_framework_content_types() {
        let (_dir, config) = fixture();
        let context = ServeContext::build(&config, &MappingCache::new()).unwrap();

        let plan = context.plan("/_framework/app.dll", Some("br")).unwrap();
        assert_eq!(plan.content_type, types::OCTET_STREAM);
        assert!(plan.headers.get(CONTENT_ENCODING).is_none());

        // direct request for a compressed variant keeps the original's type
        let plan = context.plan("/_framework/dotnet.wasm.gz", None).unwrap();
        assert_eq!(plan.content_type, types::WASM);
    }

    #[test]
    fn test_framework_miss_has_no_fallback() {
        let (_dir, config) = fixture();
        let context = ServeContext::build(&config, &MappingCache::new()).unwrap();

        assert!(context.plan("/_framework/missing", Some("br")).is_none());
        assert!(context.plan("/_framework/missing.js", None).is_none());
    }

    #[test]
    fn test_app_files_and_shell_fallback() {
        let (_dir, config) = fixture();
        let context = ServeContext::build(&config, &MappingCache::new()).unwrap();

        let plan = context.plan("/css/app.css", Some("br")).unwrap();
        assert_eq!(body(&plan), "css");
        assert_eq!(plan.content_type, types::CSS);
        assert!(plan.headers.is_empty());

        let plan = context.plan("/", None).unwrap();
        assert_eq!(body(&plan), "spa1");

        let plan = context.plan("/counter/42", None).unwrap();
        assert_eq!(plan.logical_path, "/index.html");
        assert_eq!(plan.content_type, types::HTML);

        // files are never replaced by the shell
        assert!(context.plan("/missing.png", None).is_none());
    }

    #[test]
    fn test_nested_mount_shell() {
        let (_dir, config) = fixture();
        let context = ServeContext::build(&config, &MappingCache::new()).unwrap();

        let plan = context.plan("/admin/users", None).unwrap();
        assert_eq!(plan.logical_path, "/admin/index.html");
        assert_eq!(body(&plan), "admin");
    }

    #[test]
    fn test_web_root_behind_root_mount() {
        let (_dir, mut config) = fixture();
        config.mounts.retain(|m| m.static_asset_path == "admin");
        let context = ServeContext::build(&config, &MappingCache::new()).unwrap();

        let plan = context.plan("/favicon.ico", None).unwrap();
        assert_eq!(plan.content_type, types::ICO);
        assert_eq!(body(&context.plan("/docs/", None).unwrap()), "docs");

        // private directories are not reachable through the web root
        assert!(context.plan("/.private/spa1/index.html", None).is_none());
        // no shell outside a mount
        assert!(context.plan("/unknown/route", None).is_none());
    }

    #[test]
    fn test_web_root_disabled() {
        let (_dir, mut config) = fixture();
        config.mounts.clear();
        config.serve.web_root = false;
        let context = ServeContext::build(&config, &MappingCache::new()).unwrap();

        assert!(context.web_root().is_none());
        assert!(context.plan("/favicon.ico", None).is_none());
    }

    #[test]
    fn test_development_manifest_composes_roots() {
        let (dir, mut config) = fixture();
        let theme = dir.path().join("theme");
        let source = dir.path().join("src");
        write(&theme, "css/app.css", "theme css");
        write(&source, "index.html", "source shell");
        write(&source, "_framework/dotnet.wasm.gz", "source gz");

        let manifest = dir.path().join("app.StaticWebAssets.xml");
        fs::write(
            &manifest,
            format!(
                r#"<StaticWebAssets Version="1.0">
  <ContentRoot BasePath=".private/spa1" Path="{}" />
  <ContentRoot BasePath=".private/spa1" Path="{}" />
</StaticWebAssets>"#,
                theme.display(),
                source.display()
            ),
        )
        .unwrap();

        config.host.environment = Environment::Development;
        config.host.static_assets_manifest = Some(manifest);
        config.mounts.truncate(1);

        let cache = MappingCache::new();
        let context = ServeContext::build(&config, &cache).unwrap();
        assert!(cache.is_loaded());
        assert_eq!(context.mounts()[0].namespace().roots().len(), 2);

        assert_eq!(body(&context.plan("/css/app.css", None).unwrap()), "theme css");
        assert_eq!(body(&context.plan("/route", None).unwrap()), "source shell");

        let plan = context.plan("/_framework/dotnet.wasm", Some("br, gzip")).unwrap();
        assert_eq!(plan.headers.get(CONTENT_ENCODING), Some("gzip"));
        assert_eq!(body(&plan), "source gz");
    }

    #[test]
    fn test_missing_physical_path_is_fatal() {
        let (dir, mut config) = fixture();
        let manifest = dir.path().join("app.StaticWebAssets.xml");
        fs::write(
            &manifest,
            r#"<StaticWebAssets Version="1.0"><ContentRoot BasePath=".private/spa1" /></StaticWebAssets>"#,
        )
        .unwrap();
        config.host.environment = Environment::Development;
        config.host.static_assets_manifest = Some(manifest);

        let err = ServeContext::build(&config, &MappingCache::new()).unwrap_err();
        assert!(matches!(err, NamespaceError::MissingPhysicalPath(_)));
    }
}
