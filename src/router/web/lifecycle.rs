//! Server lifecycle management.

use super::WebRequester;
use super::response::{self, Reply};
use crate::core::{is_shutdown, register_server};
use crate::logger::Log;
use anyhow::{Result, anyhow};
use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
    thread::{self, JoinHandle},
};
use tiny_http::{Method, Request, Server};

/// Maximum number of port binding attempts.
const MAX_PORT_RETRIES: u16 = 10;

/// Worker threads answering requests.
const REQUEST_THREADS: usize = 4;

/// Anything that turns a request line into a [`Reply`].
pub trait Service: Send + Sync + 'static {
    fn reply(&self, method: &Method, url: &str) -> Reply;

    /// Called once with the address actually bound, before serving.
    fn bound(&self, _addr: SocketAddr) {}
}

/// Bind to the specified interface and port, with automatic port retry.
///
/// Port 0 binds an ephemeral port; the returned address is the real one.
fn bind_with_retry(interface: IpAddr, base_port: u16, log: &Log) -> Result<(Server, SocketAddr)> {
    let attempts = if base_port == 0 { 1 } else { MAX_PORT_RETRIES };
    let mut last_error = None;

    for offset in 0..attempts {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(interface, port);

        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    log.warn(format_args!("port {base_port} in use, using {port} instead"));
                }
                let addr = server.server_addr().to_ip().unwrap_or(addr);
                return Ok((server, addr));
            }
            Err(e) => last_error = Some(e),
        }
    }

    let last_port = base_port.saturating_add(attempts - 1);
    Err(anyhow!(
        "failed to bind after {attempts} attempts (ports {base_port}-{last_port}): {}",
        last_error.map(|e| e.to_string()).unwrap_or_default()
    ))
}

/// Bound server ready to accept requests.
pub struct BoundServer<S> {
    server: Arc<Server>,
    addr: SocketAddr,
    service: Arc<S>,
    log: Log,
}

impl<S: Service> BoundServer<S> {
    /// Bind the HTTP server without starting the request loop.
    pub fn bind(service: S, interface: IpAddr, port: u16, log: Log) -> Result<Self> {
        let (server, addr) = bind_with_retry(interface, port, &log)?;
        service.bound(addr);
        Ok(Self {
            server: Arc::new(server),
            addr,
            service: Arc::new(service),
            log,
        })
    }

    /// Get the bound address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Requester fetching from this server.
    pub fn requester(&self) -> WebRequester {
        WebRequester::for_addr(self.addr)
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Start the request loop (blocking) until Ctrl+C.
    pub fn run(self) -> Result<()> {
        register_server(Arc::clone(&self.server));
        self.log.info(format_args!("http://{}", self.addr));
        run_request_loop(&self.server, &self.service, &self.log)
    }

    /// Start the request loop on a background thread.
    ///
    /// Not registered with the Ctrl+C handler; stop it with
    /// [`RunningServer::shutdown`].
    pub fn spawn(self) -> Result<RunningServer<S>> {
        let Self {
            server,
            addr,
            service,
            log,
        } = self;
        let (loop_server, loop_service) = (Arc::clone(&server), Arc::clone(&service));
        let handle = thread::Builder::new()
            .name(format!("serve-{}", addr.port()))
            .spawn(move || run_request_loop(&loop_server, &loop_service, &log))?;

        Ok(RunningServer {
            server,
            addr,
            service,
            handle,
        })
    }
}

/// Handle to a server spawned with [`BoundServer::spawn`].
pub struct RunningServer<S> {
    server: Arc<Server>,
    addr: SocketAddr,
    service: Arc<S>,
    handle: JoinHandle<Result<()>>,
}

impl<S> RunningServer<S> {
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn requester(&self) -> WebRequester {
        WebRequester::for_addr(self.addr)
    }

    /// The service answering requests, shared with the request loop.
    pub fn service(&self) -> &S {
        &self.service
    }

    /// Stop accepting requests and wait for the loop to exit.
    pub fn shutdown(self) -> Result<()> {
        self.server.unblock();
        self.handle
            .join()
            .map_err(|_| anyhow!("server thread panicked"))?
    }
}

fn run_request_loop<S: Service>(server: &Server, service: &Arc<S>, log: &Log) -> Result<()> {
    // Use thread pool so a slow handler doesn't block other requests
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(REQUEST_THREADS)
        .build()?;

    for request in server.incoming_requests() {
        let service = Arc::clone(service);
        let log = log.clone();
        pool.spawn(move || {
            let url = request.url().to_string();
            if let Err(e) = handle_request(request, service.as_ref()) {
                log.with_field("url", url).error(format_args!("request error: {e}"));
            }
        });
    }
    Ok(())
}

/// Handle a single HTTP request
fn handle_request<S: Service>(request: Request, service: &S) -> Result<()> {
    // Early exit if shutdown requested
    if is_shutdown() {
        return response::respond_unavailable(request);
    }
    let reply = service.reply(request.method(), request.url());
    response::respond(request, reply)
}
