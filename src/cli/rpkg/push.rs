use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use crate::cli::common::CommandContext;

#[derive(Args)]
pub struct PushCommand {
    /// Draft package revision to push to
    package_revision: String,

    /// Directory to read from; a YAML stream is read from stdin when omitted
    dir: Option<PathBuf>,
}

impl PushCommand {
    pub async fn execute(self, ctx: &CommandContext) -> Result<()> {
        let client = ctx.client()?;
        match &self.dir {
            Some(dir) => {
                client.push_directory(&self.package_revision, dir, &ctx.cancel).await?;
            }
            None => {
                client
                    .push_stream(&self.package_revision, std::io::stdin(), "stdin", &ctx.cancel)
                    .await?;
            }
        }
        Ok(())
    }
}
