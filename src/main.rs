//! pkgctl CLI entry point
//!
//! Parses arguments, runs the selected command and renders failures as
//! user-friendly errors with a non-zero exit status.

use anyhow::Result;
use clap::Parser;
use pkgctl::cli;
use pkgctl::core::user_friendly_error;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            user_friendly_error(e).display();
            std::process::exit(1);
        }
    }
}
