//! Site configuration management for `rstatic.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── build      # [build]
//! │   └── serve      # [serve]
//! ├── error          # ConfigError
//! └── mod.rs         # SiteConfig (this file)
//! ```
//!
//! A missing config file is not an error: every field has a default.

mod error;
pub mod section;

pub use error::ConfigError;
pub use section::{BuildConfig, ServeConfig};

use crate::{
    cli::{Cli, Commands},
    log,
};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing rstatic.toml
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SiteConfig {
    /// Path of the config file, whether or not it exists (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Static generation settings
    #[serde(default)]
    pub build: BuildConfig,

    /// Server settings
    #[serde(default)]
    pub serve: ServeConfig,

    /// Site-specific settings, passed untouched to the site's `Setter`
    #[serde(default)]
    pub content: toml::Table,
}

impl SiteConfig {
    /// Load configuration for a CLI invocation.
    ///
    /// Falls back to defaults when the file does not exist, then applies
    /// command-line overrides and validates the result.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = Self::from_path_or_default(&cli.config)?;
        config.apply_command_options(cli);
        config.validate()?;
        Ok(config)
    }

    /// Read `path`, or use defaults with a warning if it is missing.
    pub fn from_path_or_default(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            Self::from_path(path)?
        } else {
            log!("warning"; "{} not found, using defaults...", path.display());
            Self::default()
        };
        config.config_path = path.to_path_buf();
        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {field}");
        }
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Apply command-specific configuration options.
    fn apply_command_options(&mut self, cli: &Cli) {
        match &cli.command {
            Commands::Build {
                output,
                concurrency,
                fail_fast,
            } => {
                Self::update_option(&mut self.build.output, output.as_ref());
                Self::update_option(&mut self.build.concurrency, concurrency.as_ref());
                Self::update_option(&mut self.build.fail_fast, fail_fast.as_ref());
            }
            Commands::Serve { interface, port } => {
                Self::update_option(&mut self.serve.interface, interface.as_ref());
                Self::update_option(&mut self.serve.port, port.as_ref());
            }
            Commands::Files {
                output,
                interface,
                port,
            } => {
                Self::update_option(&mut self.build.output, output.as_ref());
                Self::update_option(&mut self.serve.interface, interface.as_ref());
                Self::update_option(&mut self.serve.file_server_port, port.as_ref());
            }
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.build.output.as_os_str().is_empty() {
            return Err(ConfigError::Validation("build.output must not be empty".into()));
        }
        Ok(())
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config, panicking on unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> SiteConfig {
    let (parsed, ignored) = SiteConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("rstatic").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_from_str_invalid_toml() {
        let result = SiteConfig::from_str("[build\noutput = \"x\"");
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn test_unknown_fields_detected() {
        let content = "[build]\nconcurrency = 2\n[unknown_section]\nfield = \"value\"";
        let (config, ignored) = SiteConfig::parse_with_ignored(content).unwrap();

        assert_eq!(config.build.concurrency, 2);
        assert!(ignored.iter().any(|f| f.contains("unknown_section")));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rstatic.toml");

        let config = SiteConfig::from_path_or_default(&path).unwrap();
        assert_eq!(config.config_path, path);
        assert_eq!(config.serve.port, 8080);
    }

    #[test]
    fn test_cli_overrides_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rstatic.toml");
        fs::write(&path, "[build]\noutput = \"from-file\"\nconcurrency = 3\n").unwrap();
        let config_arg = path.to_str().unwrap();

        let config = SiteConfig::load(&cli(&["-C", config_arg, "build", "-j", "7"])).unwrap();
        assert_eq!(config.build.output, Path::new("from-file"));
        assert_eq!(config.build.concurrency, 7);

        let config =
            SiteConfig::load(&cli(&["-C", config_arg, "build", "--output", "cli-out"])).unwrap();
        assert_eq!(config.build.output, Path::new("cli-out"));
        assert_eq!(config.build.concurrency, 3);

        let config = SiteConfig::load(&cli(&["-C", config_arg, "files", "-p", "4000"])).unwrap();
        assert_eq!(config.serve.file_server_port, 4000);
        assert_eq!(config.serve.port, 8080);
    }

    #[test]
    fn test_content_is_passed_through() {
        let config = test_parse_config("[content]\ntitle = \"Blog\"\n[content.nav]\nhome = \"/\"");
        assert_eq!(config.content["title"].as_str(), Some("Blog"));
        assert_eq!(config.content["nav"]["home"].as_str(), Some("/"));

        assert!(test_parse_config("").content.is_empty());
    }

    #[test]
    fn test_empty_output_rejected() {
        let config = test_parse_config("[build]\noutput = \"\"");
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }
}
