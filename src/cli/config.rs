//! `pkgctl config`: inspect the configuration file.

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;
use std::io::Write;

use super::common::CommandContext;
use crate::config::GlobalConfig;

/// Inspect the pkgctl configuration
#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    command: Option<ConfigSubcommands>,
}

#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Print the configuration file location
    Path,

    /// Print the effective configuration (default)
    Show,
}

impl ConfigCommand {
    pub fn execute(self, ctx: &CommandContext) -> Result<()> {
        self.execute_with_writer(ctx, &mut std::io::stdout())
    }

    pub fn execute_with_writer<W: Write>(self, ctx: &CommandContext, out: &mut W) -> Result<()> {
        match self.command {
            Some(ConfigSubcommands::Path) => {
                writeln!(out, "{}", ctx.config_path.display())?;
            }
            Some(ConfigSubcommands::Show) | None => show(ctx, out)?,
        }
        Ok(())
    }
}

fn show<W: Write>(ctx: &CommandContext, out: &mut W) -> Result<()> {
    writeln!(out, "{}", "Configuration".bold())?;
    writeln!(out, "Location:  {}", ctx.config_path.display())?;
    writeln!(out, "Server:    {}", ctx.server.as_deref().unwrap_or("(not set)"))?;
    writeln!(out, "Namespace: {}", ctx.namespace)?;

    if ctx.config.repos.is_empty() {
        writeln!(out, "\nNo repositories registered.")?;
        writeln!(out, "\n{}", "Tip:".yellow())?;
        writeln!(out, "  Register one with: pkgctl repo add <name> <url>")?;
    } else {
        let repos_only = GlobalConfig {
            repos: ctx.config.repos.clone(),
            ..GlobalConfig::default()
        };
        writeln!(out)?;
        write!(out, "{}", toml::to_string_pretty(&repos_only)?)?;
    }
    Ok(())
}
