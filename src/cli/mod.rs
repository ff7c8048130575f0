//! Command-line interface for pkgctl.
//!
//! # Available Commands
//!
//! ## Package revisions (`rpkg`)
//! - `get` - Show one package revision or list the namespace
//! - `create` - Create an empty draft
//! - `clone` - Create a draft whose upstream is another revision
//! - `delete` - Delete a package revision
//! - `update-status` - Move a revision through its lifecycle
//! - `pull` - Fetch content into a directory or to stdout
//! - `push` - Replace the content of a draft from a directory or stdin
//!
//! ## Local state
//! - `repo` - Manage the repository registry in the configuration file
//! - `config` - Show the configuration file and its location
//!
//! # Global Options
//!
//! - `--config` / `PKGCTL_CONFIG` - Configuration file to use
//! - `--server` / `PKGCTL_SERVER` - Package server base URL
//! - `--namespace`, `-n` - Namespace for package revision operations
//! - `--verbose`, `-v` / `--quiet`, `-q` - Log verbosity
//!
//! Logs go to stderr; stdout carries only command output so it can be piped
//! (e.g. `pkgctl rpkg pull NAME | pkgctl rpkg push OTHER`).

pub mod common;
mod config;
mod repo;
mod rpkg;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::config::GlobalConfig;
use crate::constants::{CONFIG_ENV, SERVER_ENV};
use common::CommandContext;

/// Command-line client for package revisions on a package server.
#[derive(Parser)]
#[command(
    name = "pkgctl",
    about = "Manage package revisions on a package server",
    version,
    long_about = "pkgctl creates, clones, pushes, pulls and promotes package revisions \
                  and keeps a local registry of package repositories."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the configuration file [default: ~/.pkgctl/config.toml]
    #[arg(long, global = true, env = CONFIG_ENV)]
    config: Option<PathBuf>,

    /// Base URL of the package server
    #[arg(long, global = true, env = SERVER_ENV)]
    server: Option<String>,

    /// Namespace for package revision operations [default: from config, else "default"]
    #[arg(short, long, global = true)]
    namespace: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage remote package revisions
    Rpkg(rpkg::RpkgCommand),

    /// Manage the local repository registry
    Repo(repo::RepoCommand),

    /// Inspect the configuration
    Config(config::ConfigCommand),
}

impl Cli {
    /// Initialise logging, load the configuration and run the command.
    pub async fn execute(self) -> Result<()> {
        init_logging(self.log_filter());

        let config_path = GlobalConfig::resolve_path(self.config.clone())?;
        let config = GlobalConfig::load_with_optional(Some(config_path.clone())).await?;
        let mut ctx = self.context(config, config_path);
        ctx.cancel_on_ctrl_c();

        self.dispatch(&mut ctx).await
    }

    /// Build the command context from flags and a loaded configuration.
    fn context(&self, config: GlobalConfig, config_path: PathBuf) -> CommandContext {
        let namespace = config.resolve_namespace(self.namespace.as_deref());
        let server = config.resolve_server(self.server.as_deref());
        CommandContext::new(config, config_path, namespace, server)
    }

    async fn dispatch(self, ctx: &mut CommandContext) -> Result<()> {
        match self.command {
            Commands::Rpkg(cmd) => cmd.execute(ctx).await,
            Commands::Repo(cmd) => cmd.execute(ctx).await,
            Commands::Config(cmd) => cmd.execute(ctx),
        }
    }

    /// Log filter selected by `--verbose`/`--quiet`; `None` defers to
    /// `RUST_LOG`.
    fn log_filter(&self) -> Option<&'static str> {
        if self.verbose {
            Some("debug")
        } else if self.quiet {
            Some("error")
        } else {
            None
        }
    }
}

/// Install the global tracing subscriber, writing to stderr.
///
/// `level` wins over `RUST_LOG`; with neither set only warnings and errors
/// are shown.
fn init_logging(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
