use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::io::Write;
use std::path::PathBuf;

use crate::cli::common::CommandContext;

#[derive(Args)]
pub struct PullCommand {
    /// Package revision to pull, as NAME[@REVISION]
    package_revision: String,

    /// Directory to write into; the content is printed as YAML when omitted
    dir: Option<PathBuf>,
}

impl PullCommand {
    pub async fn execute<W: Write>(self, ctx: &CommandContext, out: &mut W) -> Result<()> {
        let client = ctx.client()?;
        match &self.dir {
            Some(dir) => {
                let summary =
                    client.pull_to_directory(&self.package_revision, dir, &ctx.cancel).await?;
                eprintln!(
                    "{} {} into {} ({} written, {} unchanged)",
                    "Pulled".green(),
                    self.package_revision,
                    dir.display(),
                    summary.written,
                    summary.unchanged
                );
            }
            None => client.pull_to_writer(&self.package_revision, out, &ctx.cancel).await?,
        }
        Ok(())
    }
}
