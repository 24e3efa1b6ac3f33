//! Process-wide state shared by the servers.

mod state;

pub use state::{is_shutdown, register_server, setup_shutdown_handler};
