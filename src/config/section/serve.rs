//! `[serve]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [serve]
//! interface = "127.0.0.1"     # Network interface (127.0.0.1 = localhost only)
//! port = 8080                 # Host mode: routes rendered per request
//! file_server_port = 3000     # Serves the generated output directory
//! ```
//!
//! Use `interface = "0.0.0.0"` to make the servers accessible from LAN.

use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};

/// Server settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServeConfig {
    /// Network interface to bind.
    /// - `127.0.0.1` (default): localhost only
    /// - `0.0.0.0`: all interfaces (LAN accessible)
    pub interface: IpAddr,

    /// Port of the host mode server.
    pub port: u16,

    /// Port of the generated files server.
    pub file_server_port: u16,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            interface: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 8080,
            file_server_port: 3000,
        }
    }
}
