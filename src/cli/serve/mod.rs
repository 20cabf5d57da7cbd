//! Static asset server for the configured single-page apps.

mod lifecycle;
mod response;

use crate::{
    config::{AppConfig, cfg},
    core::{is_shutdown, register_server},
    core::headers::names::ACCEPT_ENCODING,
    log,
    manifest::MappingCache,
    mount::ServeContext,
    utils::path::normalize_request_path,
};
use anyhow::{Context, Result};
use std::sync::Arc;
use tiny_http::{Request, Server};

/// Bound server ready to accept requests
pub struct BoundServer {
    server: Arc<Server>,
    threads: usize,
}

/// Resolve all namespaces, bind, and serve until Ctrl+C.
pub fn serve_site() -> Result<()> {
    let config = cfg();
    let cache = MappingCache::new();
    let context = ServeContext::build(&config, &cache)
        .context("failed to resolve static asset namespaces")?;

    for mount in context.mounts() {
        log!("serve"; "{} -> {} ({} roots)",
            mount.request_base(), mount.static_asset_path(), mount.namespace().roots().len());
    }

    bind_server(&config)?.run(&context)
}

/// Bind the HTTP server without starting the request loop
pub fn bind_server(config: &AppConfig) -> Result<BoundServer> {
    let (server, addr) = lifecycle::bind_with_retry(config.serve.interface, config.serve.port)?;
    let server = Arc::new(server);
    register_server(Arc::clone(&server));

    log!("serve"; "http://{} ({})", addr, config.host.environment);

    Ok(BoundServer {
        server,
        threads: config.serve.threads,
    })
}

impl BoundServer {
    /// Start the request loop (blocking).
    ///
    /// Returns once the server is unblocked and every in-flight request has
    /// been answered.
    pub fn run(self, context: &ServeContext) -> Result<()> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .thread_name(|i| format!("spa-host-worker-{i}"))
            .build()
            .context("failed to create request thread pool")?;

        pool.in_place_scope(|scope| {
            for request in self.server.incoming_requests() {
                scope.spawn(move |_| {
                    if let Err(e) = handle_request(request, context) {
                        log!("serve"; "request error: {e}");
                    }
                });
            }
        });
        Ok(())
    }
}

/// Handle a single HTTP request
fn handle_request(request: Request, context: &ServeContext) -> Result<()> {
    if is_shutdown() {
        return response::respond_unavailable(request);
    }
    if !response::is_read_request(&request) {
        return response::respond_method_not_allowed(request);
    }

    let path = normalize_request_path(request.url());
    let accept_encoding = response::header_list_value(&request, ACCEPT_ENCODING);

    match context.plan(&path, accept_encoding.as_deref()) {
        Some(plan) => response::respond_asset(request, plan),
        None => response::respond_not_found(request),
    }
}
