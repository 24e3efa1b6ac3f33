//! Command-line interface module.
//!
//! A site binary hands its [`Setter`] to [`run`] and gets the `build`,
//! `serve` and `files` subcommands for free.

mod args;

pub use args::{Cli, Commands};

use crate::{
    app::{App, Setter},
    config::SiteConfig,
    core,
    logger::{self, Log},
};
use anyhow::Result;
use clap::{ColorChoice, Parser};

/// Parse the process arguments and run the chosen command.
pub fn run<S: Setter>(setter: S) -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;
    run_with(setter, &Cli::parse())
}

/// Run a command from already parsed arguments.
pub fn run_with<S: Setter>(setter: S, cli: &Cli) -> Result<()> {
    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = SiteConfig::load(cli)?;
    crate::debug!("config"; "loaded {}", config.config_path.display());

    match &cli.command {
        Commands::Build { .. } => {
            let app = App::new(setter, config, Log::new("build"))?;
            let report = app.generate()?;
            if report.failed() > 0 {
                crate::log!("error"; "{} url(s) failed, see the log above", report.failed());
            }
            Ok(())
        }
        Commands::Serve { .. } => App::new(setter, config, Log::new("serve"))?.host(),
        Commands::Files { .. } => App::new(setter, config, Log::new("files"))?.run_file_server(),
    }
}
