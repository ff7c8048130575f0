//! `pkgctl repo`: the local repository registry.
//!
//! Entries live under `[repos.<name>]` in the configuration file and are
//! persisted immediately by `add` and `delete`.

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;
use std::io::Write;

use super::common::CommandContext;
use crate::config::Repository;

/// Manage registered repositories
#[derive(Args)]
pub struct RepoCommand {
    #[command(subcommand)]
    command: RepoSubcommands,
}

#[derive(Subcommand)]
enum RepoSubcommands {
    /// Register a repository
    Add {
        /// Registry name
        name: String,

        /// Repository URL
        url: String,

        /// Secret used for accessing the repository
        #[arg(long)]
        secret: Option<String>,

        /// Tag the repository as holding deployable packages
        #[arg(long, short = 'd')]
        deployment: bool,

        /// Directory within the repository
        #[arg(long)]
        directory: Option<String>,
    },

    /// Remove a registered repository
    Delete {
        /// Registry name
        name: String,
    },

    /// List registered repositories
    List,
}

impl RepoCommand {
    pub async fn execute(self, ctx: &mut CommandContext) -> Result<()> {
        self.execute_with_writer(ctx, &mut std::io::stdout()).await
    }

    pub async fn execute_with_writer<W: Write>(
        self,
        ctx: &mut CommandContext,
        out: &mut W,
    ) -> Result<()> {
        match self.command {
            RepoSubcommands::Add {
                name,
                url,
                secret,
                deployment,
                directory,
            } => {
                let repository = Repository {
                    url,
                    secret,
                    deployment,
                    directory,
                };
                if ctx.config.add_repository(name.clone(), repository).is_some() {
                    writeln!(out, "{} repository '{}'", "Updated".yellow(), name)?;
                } else {
                    writeln!(out, "{} repository '{}'", "Added".green(), name)?;
                }
                ctx.save_config().await
            }
            RepoSubcommands::Delete {
                name,
            } => {
                ctx.config.remove_repository(&name)?;
                ctx.save_config().await?;
                writeln!(out, "{} repository '{}'", "Deleted".red(), name)?;
                Ok(())
            }
            RepoSubcommands::List => {
                if ctx.config.repos.is_empty() {
                    writeln!(out, "No repositories registered.")?;
                    return Ok(());
                }
                for (name, repo) in &ctx.config.repos {
                    let mut line = format!("{}  {}", name.cyan(), repo.url);
                    if let Some(directory) = &repo.directory {
                        line.push_str(&format!("  directory={directory}"));
                    }
                    if let Some(secret) = &repo.secret {
                        line.push_str(&format!("  secret={secret}"));
                    }
                    if repo.deployment {
                        line.push_str("  deployment");
                    }
                    writeln!(out, "{line}")?;
                }
                Ok(())
            }
        }
    }
}
