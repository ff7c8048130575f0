use anyhow::Result;
use clap::Args;
use std::io::Write;

use crate::cli::common::CommandContext;

#[derive(Args)]
pub struct DeleteCommand {
    /// Package revision to delete
    package_revision: String,
}

impl DeleteCommand {
    pub async fn execute<W: Write>(self, ctx: &CommandContext, out: &mut W) -> Result<()> {
        ctx.client()?.delete(&self.package_revision).await?;
        writeln!(out, "{} deleted", self.package_revision)?;
        Ok(())
    }
}
