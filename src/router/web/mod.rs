//! HTTP-backed router used to host the site live.
//!
//! Deliberately simple: every handler error becomes a 400 with the error
//! text as the body. It exists to preview generated output locally, not to
//! be a production web server.

mod files;
mod lifecycle;
mod path;
mod requester;
mod response;

pub use files::{FileServer, serve_dir};
pub use lifecycle::{BoundServer, RunningServer, Service};
pub use path::PathError;
pub use requester::WebRequester;
pub use response::Reply;

use super::around::call_arounds;
use super::{AroundHandler, Context, ROOT_URL, Registry, Route, RouteError, Router};
use crate::logger::Log;
use crate::utils::url::{normalize, request_path};
use anyhow::Result;
use rustc_hash::FxHashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::OnceLock;
use tiny_http::Method;

/// A directory mounted under a URL prefix.
#[derive(Debug, Clone)]
struct Mount {
    /// Always ends with `/`
    prefix: String,
    dir: PathBuf,
}

/// The router to host a web application server.
///
/// Content type is resolved from the route pattern's extension or set via
/// [`Context`], and sent as the `Content-Type` header.
pub struct WebRouter {
    interface: IpAddr,
    port: u16,
    /// Set by [`WebRouter::bind`]; differs from `port` after a retry or for port 0
    bound: OnceLock<SocketAddr>,
    log: Log,

    registry: Registry,
    /// `/` is kept out of the route table so it never doubles as a fallback
    root: Option<Route>,
    routes: FxHashMap<String, Route>,
    mounts: Vec<Mount>,
    arounds: Vec<AroundHandler>,
}

impl WebRouter {
    pub fn new(interface: IpAddr, port: u16, log: Log) -> Self {
        Self {
            interface,
            port,
            bound: OnceLock::new(),
            log,
            registry: Registry::new(),
            root: None,
            routes: FxHashMap::default(),
            mounts: Vec::new(),
            arounds: Vec::new(),
        }
    }

    /// Serve files under `dir` for requests starting with `prefix`.
    ///
    /// Content type is resolved from the file extension. Request paths with
    /// a `..` segment are rejected before touching the filesystem.
    pub fn file_serve(&mut self, prefix: &str, dir: impl Into<PathBuf>) {
        let mut prefix = normalize(prefix).into_owned();
        if !prefix.ends_with('/') {
            prefix.push('/');
        }
        self.mounts.push(Mount {
            prefix,
            dir: dir.into(),
        });
    }

    /// Listen address: the bound one once bound, the configured one before.
    pub fn addr(&self) -> SocketAddr {
        self.bound
            .get()
            .copied()
            .unwrap_or_else(|| SocketAddr::new(self.interface, self.port))
    }

    /// Bind the server socket without entering the request loop.
    pub fn bind(self) -> Result<BoundServer<Self>> {
        let log = self.log.clone();
        let (interface, port) = (self.interface, self.port);
        BoundServer::bind(self, interface, port, log)
    }

    /// Bind and serve requests until shutdown (blocking).
    pub fn run(self) -> Result<()> {
        self.bind()?.run()
    }

    fn run_route(&self, route: &Route, url: &str) -> Reply {
        let mut ctx = Context::new(url, route.content_type(), self.log.clone());
        match call_arounds(&self.arounds, route.handler(), &mut ctx) {
            Ok(()) => {
                let response = ctx.into_response();
                Reply::body(200, response.mime_type, response.body)
            }
            Err(err) => Reply::error(400, format!("{err:#}")),
        }
    }

    fn serve_mount(&self, mount: &Mount, url: &str) -> Reply {
        let relative = &url[mount.prefix.len()..];
        match path::resolve_mounted(&mount.dir, relative) {
            Ok(path) => Reply::file(path),
            Err(err @ PathError::Traversal(_)) => {
                self.log.with_field("url", url).warn(&err);
                Reply::error(400, err.to_string())
            }
            Err(err) => Reply::error(404, err.to_string()),
        }
    }

    fn not_handled(&self, method: &Method, url: &str) -> Reply {
        let message = format!("{method} {url} is not being handled");
        self.log.error(&message);
        Reply::error(400, message)
    }
}

impl Service for WebRouter {
    fn reply(&self, method: &Method, raw_url: &str) -> Reply {
        if *method != Method::Get {
            return self.not_handled(method, raw_url);
        }

        let url = request_path(raw_url);
        let route = if url == ROOT_URL {
            self.root.as_ref()
        } else {
            self.routes.get(url.as_str())
        };
        if let Some(route) = route {
            return self.run_route(route, &url);
        }

        if let Some(mount) = self.mounts.iter().find(|m| url.starts_with(&m.prefix)) {
            return self.serve_mount(mount, &url);
        }

        Reply::error(404, RouteError::NotFound(url).to_string())
    }

    fn bound(&self, addr: SocketAddr) {
        let _ = self.bound.set(addr);
    }
}

impl Router for WebRouter {
    type Requester<'a> = WebRequester;

    fn add_around(&mut self, around: AroundHandler) {
        self.arounds.push(around);
    }

    fn add_route(&mut self, route: Route) -> Result<(), RouteError> {
        self.registry.register(route.pattern())?;
        if route.pattern() == ROOT_URL {
            self.root = Some(route);
        } else {
            self.routes.insert(route.pattern().to_string(), route);
        }
        Ok(())
    }

    fn registry(&self) -> &Registry {
        &self.registry
    }

    fn requester(&self) -> WebRequester {
        WebRequester::for_addr(self.addr())
    }
}
