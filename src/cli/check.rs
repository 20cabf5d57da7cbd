//! `check` command: resolve every namespace and report it.

use crate::{config::cfg, log, manifest::MappingCache, mount::ServeContext};
use anyhow::{Context, Result};
use owo_colors::OwoColorize;

/// Resolve all mounts and print their content roots.
///
/// Fails on the same fatal errors `serve` would hit at startup.
pub fn check_site() -> Result<()> {
    let config = cfg();
    let cache = MappingCache::new();
    let context = ServeContext::build(&config, &cache)
        .context("failed to resolve static asset namespaces")?;

    log!("check"; "environment: {}", config.host.environment);
    if config.host.environment.is_development() {
        match config.manifest_locator().resolve() {
            Some(path) => log!("check"; "manifest: {}", path.display()),
            None => log!("check"; "manifest: none, serving from web root"),
        }
    }

    for mount in context.mounts() {
        log!("check"; "{} {}", mount.request_base().bold(), mount.static_asset_path().dimmed());
        print_roots(mount.namespace());
    }

    match context.web_root() {
        Some(namespace) => {
            log!("check"; "{} {}", "*".bold(), "web root".dimmed());
            print_roots(namespace);
        }
        None => log!("check"; "web root disabled"),
    }

    Ok(())
}

fn print_roots(namespace: &crate::namespace::AssetNamespace) {
    if namespace.is_empty() {
        eprintln!("  {}", "(no content roots)".yellow());
        return;
    }
    for root in namespace.roots() {
        let missing = if root.content_root().is_dir() { "" } else { " (missing)" };
        eprintln!(
            "  {} {}{}",
            root.request_base_path(),
            root.content_root().display(),
            missing.red()
        );
    }
}
