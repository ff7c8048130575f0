use anyhow::Result;
use clap::Args;
use std::io::Write;

use crate::cli::common::CommandContext;

#[derive(Args)]
pub struct CreateCommand {
    /// Package revision name: TARGET.REPOSITORY.REALM.PACKAGE.WORKSPACE
    package_revision: String,
}

impl CreateCommand {
    pub async fn execute<W: Write>(self, ctx: &CommandContext, out: &mut W) -> Result<()> {
        let created = ctx.client()?.create(&self.package_revision).await?;
        writeln!(out, "{}", created.metadata.name)?;
        Ok(())
    }
}
