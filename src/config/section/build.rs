//! `[build]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [build]
//! output = "./generated"      # Where generated files are written
//! concurrency = 10            # Workers per batch
//! fail_fast = false           # Skip dependent urls if any independent url failed
//! ```
//!
//! When `output` is not set, the `GENERATED_PATH` environment variable is
//! used before falling back to `./generated`.

use serde::Deserialize;
use std::path::PathBuf;

/// Environment variable overriding the default output directory.
pub const GENERATED_PATH_ENV: &str = "GENERATED_PATH";

const DEFAULT_OUTPUT: &str = "./generated";

/// Static generation settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Output directory for generated files.
    pub output: PathBuf,

    /// Number of workers generating urls of one batch.
    pub concurrency: usize,

    /// Abort before the dependent batch when the independent one had failures.
    pub fail_fast: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            output: default_output(std::env::var(GENERATED_PATH_ENV).ok()),
            concurrency: 10,
            fail_fast: false,
        }
    }
}

fn default_output(env: Option<String>) -> PathBuf {
    env.filter(|path| !path.is_empty())
        .map_or_else(|| PathBuf::from(DEFAULT_OUTPUT), PathBuf::from)
}
