//! Blocking HTTP client for a running [`WebRouter`](super::WebRouter).

use crate::router::{Requester, Response};
use crate::utils::url::normalize;
use anyhow::{Context, Result, bail};
use std::io::Read;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(30);

/// Requester making HTTP GET requests against a host and port.
#[derive(Clone)]
pub struct WebRequester {
    base: String,
    agent: ureq::Agent,
}

impl WebRequester {
    pub fn new(host: &str, port: u16) -> Self {
        Self {
            base: format!("http://{host}:{port}"),
            agent: ureq::AgentBuilder::new().timeout(TIMEOUT).build(),
        }
    }

    /// Requester for a listen address; unspecified interfaces go to loopback.
    pub fn for_addr(addr: SocketAddr) -> Self {
        let ip = match addr.ip() {
            ip if ip.is_unspecified() => IpAddr::V4(Ipv4Addr::LOCALHOST),
            ip => ip,
        };
        let host = match ip {
            IpAddr::V4(v4) => v4.to_string(),
            IpAddr::V6(v6) => format!("[{v6}]"),
        };
        Self::new(&host, addr.port())
    }

    pub fn base(&self) -> &str {
        &self.base
    }
}

impl Requester for WebRequester {
    fn get(&self, url: &str) -> Result<Response> {
        let target = format!("{}{}", self.base, normalize(url));
        let response = match self.agent.get(&target).call() {
            Ok(response) => response,
            Err(ureq::Error::Status(code, response)) => {
                // The body is the error text the router responded with
                let body = response.into_string().unwrap_or_default();
                let message = body.trim();
                if message.is_empty() {
                    bail!("GET {url} returned {code}");
                }
                bail!("{message}");
            }
            Err(e) => return Err(e).with_context(|| format!("GET {target}")),
        };

        let mime_type = response.header("Content-Type").unwrap_or_default().to_string();
        let mut body = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut body)
            .with_context(|| format!("reading body of {url}"))?;
        Ok(Response::new(body, mime_type))
    }
}

impl std::fmt::Debug for WebRequester {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebRequester").field("base", &self.base).finish()
    }
}
