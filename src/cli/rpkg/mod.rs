//! `pkgctl rpkg`: package revisions on the package server.
//!
//! # Examples
//!
//! ```bash
//! pkgctl rpkg create catalog.repo-a.infra.workload.ws1
//! pkgctl rpkg push catalog.repo-a.infra.workload.ws1 ./workload
//! pkgctl rpkg update-status catalog.repo-a.infra.workload.ws1 --lifecycle proposed
//! pkgctl rpkg clone catalog.repo-a.infra.workload.ws3 catalog.repo-a.infra.workload.ws1@v3
//! pkgctl rpkg pull catalog.repo-a.infra.workload.ws3 ./ws3
//! ```

mod clone;
mod create;
mod delete;
mod get;
mod pull;
mod push;
mod update_status;

use anyhow::Result;
use clap::{Args, Subcommand};
use std::io::Write;

use super::common::CommandContext;

/// Manage remote package revisions
#[derive(Args)]
pub struct RpkgCommand {
    #[command(subcommand)]
    command: RpkgSubcommands,
}

#[derive(Subcommand)]
enum RpkgSubcommands {
    /// Show one package revision or list all in the namespace
    Get(get::GetCommand),
    /// Create an empty draft package revision
    Create(create::CreateCommand),
    /// Create a draft package revision from an existing one
    Clone(clone::CloneCommand),
    /// Delete a package revision
    Delete(delete::DeleteCommand),
    /// Move a package revision to another lifecycle state
    UpdateStatus(update_status::UpdateStatusCommand),
    /// Fetch the content of a package revision
    Pull(pull::PullCommand),
    /// Replace the content of a draft package revision
    Push(push::PushCommand),
}

impl RpkgCommand {
    pub async fn execute(self, ctx: &CommandContext) -> Result<()> {
        self.execute_with_writer(ctx, &mut std::io::stdout()).await
    }

    /// Run the subcommand, writing its normal output to `out`.
    pub async fn execute_with_writer<W: Write>(self, ctx: &CommandContext, out: &mut W) -> Result<()> {
        match self.command {
            RpkgSubcommands::Get(cmd) => cmd.execute(ctx, out).await,
            RpkgSubcommands::Create(cmd) => cmd.execute(ctx, out).await,
            RpkgSubcommands::Clone(cmd) => cmd.execute(ctx, out).await,
            RpkgSubcommands::Delete(cmd) => cmd.execute(ctx, out).await,
            RpkgSubcommands::UpdateStatus(cmd) => cmd.execute(ctx, out).await,
            RpkgSubcommands::Pull(cmd) => cmd.execute(ctx, out).await,
            RpkgSubcommands::Push(cmd) => cmd.execute(ctx).await,
        }
    }
}
