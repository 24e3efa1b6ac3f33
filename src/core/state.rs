//! Shutdown state for the blocking servers.
//!
//! `SHUTDOWN` is set once Ctrl+C is received; requests still in flight
//! after that are answered with 503.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use anyhow::{Context, Result};
use tiny_http::Server;

static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// The server a Ctrl+C unblocks. Unset while generating.
static SERVER: OnceLock<Arc<Server>> = OnceLock::new();

fn on_interrupt() {
    SHUTDOWN.store(true, Ordering::SeqCst);
    match SERVER.get() {
        Some(server) => {
            crate::log!("serve"; "shutting down...");
            server.unblock();
        }
        // generation writes files directly, nothing to unwind
        None => std::process::exit(130),
    }
}

/// Install the Ctrl+C handler. Call once, before anything blocks.
pub fn setup_shutdown_handler() -> Result<()> {
    ctrlc::set_handler(on_interrupt).context("failed to set Ctrl+C handler")
}

/// Make `server` the one Ctrl+C stops. The first registration wins.
pub fn register_server(server: Arc<Server>) {
    let _ = SERVER.set(server);
}

pub fn is_shutdown() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_shutdown_by_default() {
        assert!(!is_shutdown());
    }
}
