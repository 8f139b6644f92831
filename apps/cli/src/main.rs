//! Gleaner CLI: scrape blogs, guides, and PDF books into a knowledge base.
//!
//! Prints the resulting knowledge base as JSON.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
