use anyhow::{Context, Result};
use clap::Args;
use std::io::Write;

use crate::api::PackageRevision;
use crate::cli::common::{CommandContext, OutputFormat};

#[derive(Args)]
pub struct GetCommand {
    /// Package revision to show, as NAME[@REVISION]; lists all when omitted
    package_revision: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
}

impl GetCommand {
    pub async fn execute<W: Write>(self, ctx: &CommandContext, out: &mut W) -> Result<()> {
        let client = ctx.client()?;
        let revisions = match &self.package_revision {
            Some(reference) => vec![client.get(reference).await?],
            None => client.list().await?,
        };

        match self.output {
            OutputFormat::Table => write_table(out, &revisions, ctx.namespace.as_str())?,
            OutputFormat::Json => {
                let text = if self.package_revision.is_some() {
                    serde_json::to_string_pretty(&revisions[0])?
                } else {
                    serde_json::to_string_pretty(&revisions)?
                };
                writeln!(out, "{text}")?;
            }
            OutputFormat::Yaml => {
                for (index, revision) in revisions.iter().enumerate() {
                    if index > 0 {
                        writeln!(out, "---")?;
                    }
                    write!(out, "{}", serde_yaml::to_string(revision)?)?;
                }
            }
        }
        Ok(())
    }
}

fn write_table<W: Write>(out: &mut W, revisions: &[PackageRevision], namespace: &str) -> Result<()> {
    if revisions.is_empty() {
        writeln!(out, "No package revisions found in namespace '{namespace}'")?;
        return Ok(());
    }

    let rows: Vec<[String; 5]> = revisions
        .iter()
        .map(|r| {
            [
                r.metadata.name.clone(),
                r.lifecycle().to_string(),
                r.spec.package_rev_id.revision.clone().unwrap_or_else(|| "-".to_string()),
                r.spec.upstream.as_ref().map_or_else(|| "-".to_string(), ToString::to_string),
                r.status.ready().unwrap_or("-").to_string(),
            ]
        })
        .collect();

    let header = ["NAME", "LIFECYCLE", "REVISION", "UPSTREAM", "READY"];
    let mut widths = header.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let print_row = |out: &mut W, cells: [&str; 5]| -> Result<()> {
        writeln!(
            out,
            "{:<w0$}  {:<w1$}  {:<w2$}  {:<w3$}  {}",
            cells[0],
            cells[1],
            cells[2],
            cells[3],
            cells[4],
            w0 = widths[0],
            w1 = widths[1],
            w2 = widths[2],
            w3 = widths[3],
        )
        .context("Failed to write output")
    };

    print_row(out, header)?;
    for row in &rows {
        print_row(out, [&row[0], &row[1], &row[2], &row[3], &row[4]])?;
    }
    Ok(())
}
