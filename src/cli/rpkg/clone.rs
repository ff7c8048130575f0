use anyhow::Result;
use clap::Args;
use std::io::Write;

use crate::cli::common::CommandContext;

#[derive(Args)]
pub struct CloneCommand {
    /// Name of the new package revision
    target: String,

    /// Package revision to clone from, as NAME[@REVISION]
    source: String,

    /// Revision of the source; overrides an @REVISION suffix
    #[arg(long)]
    revision: Option<String>,
}

impl CloneCommand {
    pub async fn execute<W: Write>(self, ctx: &CommandContext, out: &mut W) -> Result<()> {
        let created =
            ctx.client()?.clone_revision(&self.target, &self.source, self.revision).await?;
        writeln!(out, "{}", created.metadata.name)?;
        Ok(())
    }
}
