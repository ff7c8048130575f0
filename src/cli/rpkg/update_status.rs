use anyhow::Result;
use clap::Args;
use std::io::Write;

use crate::api::Lifecycle;
use crate::cli::common::CommandContext;

#[derive(Args)]
pub struct UpdateStatusCommand {
    /// Package revision to update
    package_revision: String,

    /// Target lifecycle: draft, proposed, published or deletionCandidate
    #[arg(long, short = 'l')]
    lifecycle: Lifecycle,
}

impl UpdateStatusCommand {
    pub async fn execute<W: Write>(self, ctx: &CommandContext, out: &mut W) -> Result<()> {
        let updated = ctx.client()?.update_status(&self.package_revision, self.lifecycle).await?;
        writeln!(out, "{} {}", updated.metadata.name, updated.lifecycle())?;
        Ok(())
    }
}
