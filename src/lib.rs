//! Register page handlers once, then either generate a static site from
//! them or host them live.
//!
//! ```text
//! Setter::set_routes ─→ Router ─┬─ GenerateRouter ─→ Tracker ─→ Generator ─→ files
//!                               └─ WebRouter ─→ HTTP
//! ```

pub mod app;
pub mod cli;
pub mod config;
pub mod core;
pub mod logger;
pub mod pool;
pub mod router;
pub mod utils;

pub use app::{App, Setter, Tracker};
pub use router::{Context, Next, Requester, Response, RouteError, Router};
