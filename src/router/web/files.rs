//! Static file server for an already generated site.

use super::lifecycle::{BoundServer, Service};
use super::path::{PathError, resolve_path};
use super::response::Reply;
use crate::logger::Log;
use crate::utils::mime::types;
use crate::utils::url::request_path;
use anyhow::Result;
use std::net::IpAddr;
use std::path::PathBuf;
use tiny_http::Method;

/// Serves files under a directory the way the generator laid them out.
///
/// Generated pages have no extension (`/about` is written to `about`), so
/// extension-less files are sent as HTML.
#[derive(Debug)]
pub struct FileServer {
    root: PathBuf,
    log: Log,
}

impl FileServer {
    pub fn new(root: impl Into<PathBuf>, log: Log) -> Self {
        Self {
            root: root.into(),
            log,
        }
    }
}

impl Service for FileServer {
    fn reply(&self, method: &Method, url: &str) -> Reply {
        if !matches!(method, Method::Get | Method::Head) {
            return Reply::error(405, format!("{method} is not allowed"));
        }

        let url = request_path(url);
        match resolve_path(&url, &self.root) {
            Ok(path) if path.extension().is_none() => Reply::File {
                path,
                content_type: types::HTML,
            },
            Ok(path) => Reply::file(path),
            Err(err @ PathError::Traversal(_)) => {
                self.log.with_field("url", &url).warn(&err);
                Reply::error(400, err.to_string())
            }
            Err(err) => {
                self.log.with_field("url", &url).debug(&err);
                Reply::error(404, "404 Not Found")
            }
        }
    }
}

/// Serve `dir` on `interface:port` until Ctrl+C.
pub fn serve_dir(dir: impl Into<PathBuf>, interface: IpAddr, port: u16, log: Log) -> Result<()> {
    let server = FileServer::new(dir, log.clone());
    BoundServer::bind(server, interface, port, log)?.run()
}
