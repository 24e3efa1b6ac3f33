//! Configuration section definitions.
//!
//! Each module corresponds to a section in `rstatic.toml`:
//!
//! | Module  | TOML Section | Purpose                                  |
//! |---------|--------------|------------------------------------------|
//! | `build` | `[build]`    | Output directory, concurrency, fail-fast |
//! | `serve` | `[serve]`    | Host mode and file server addresses      |

mod build;
mod serve;

pub use build::BuildConfig;
pub use serve::ServeConfig;
