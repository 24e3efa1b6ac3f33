//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::net::IpAddr;
use std::path::PathBuf;

/// Generate a static site from registered routes, or host it live
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: rstatic.toml)
    #[arg(short = 'C', long, global = true, default_value = "rstatic.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Generate every route into the output directory
    #[command(visible_alias = "b")]
    Build {
        /// Output directory path
        #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
        output: Option<PathBuf>,

        /// Number of workers per batch
        #[arg(short = 'j', long)]
        concurrency: Option<usize>,

        /// Skip dependent urls if any independent url failed
        #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
        fail_fast: Option<bool>,
    },

    /// Host the routes, rendering each request live
    #[command(visible_alias = "s")]
    Serve {
        /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
        #[arg(short, long)]
        interface: Option<IpAddr>,

        /// Port number to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Serve the generated output directory
    #[command(visible_alias = "f")]
    Files {
        /// Output directory path
        #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
        output: Option<PathBuf>,

        /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
        #[arg(short, long)]
        interface: Option<IpAddr>,

        /// Port number to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("rstatic").chain(args.iter().copied()))
    }

    #[test]
    fn test_command_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_version_flag() {
        let err = parse(&["-V"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_build_args() {
        let cli = parse(&["b", "-o", "out", "-j", "3", "--fail-fast"]).unwrap();
        match cli.command {
            Commands::Build {
                output,
                concurrency,
                fail_fast,
            } => {
                assert_eq!(output, Some(PathBuf::from("out")));
                assert_eq!(concurrency, Some(3));
                assert_eq!(fail_fast, Some(true));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_global_args_after_subcommand() {
        let cli = parse(&["serve", "-p", "9000", "-v", "-C", "site.toml"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, PathBuf::from("site.toml"));
        assert!(matches!(cli.command, Commands::Serve { port: Some(9000), .. }));
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["files"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("rstatic.toml"));
        assert!(!cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Files {
                output: None,
                interface: None,
                port: None
            }
        ));
    }

    #[test]
    fn test_invalid_interface_rejected() {
        assert!(parse(&["serve", "-i", "not-an-ip"]).is_err());
    }
}
