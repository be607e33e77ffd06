//! Command-line interface.

use std::path::PathBuf;

use clap::Parser;
use console::style;

use crate::export::write_spreadsheet;
use crate::models::Precedent;
use crate::scrapers::pangea::{collect_all, PaginatorConfig};
use crate::scrapers::{BrowserSession, BrowserSessionConfig, PangeaSearch};

#[derive(Parser)]
#[command(name = "pangea")]
#[command(about = "Collects published precedents from the Pangea (BNP) search portal")]
#[command(version)]
pub struct Cli {
    /// Output spreadsheet path
    #[arg(short, long, value_name = "FILE", default_value = "pangea_precedents.csv")]
    output: PathBuf,

    /// Show the browser window instead of running headless
    #[arg(long)]
    headed: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

/// Run the whole pipeline: launch, collect, release, export.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let browser_config = BrowserSessionConfig {
        headless: !cli.headed,
        ..Default::default()
    };

    let session = BrowserSession::launch(&browser_config).await?;

    // The session is released on every path out of the collection,
    // including errors; only afterwards does the error propagate.
    let collected = scrape(&session).await;
    session.close().await;
    let records = collected?;

    write_spreadsheet(&cli.output, &records)?;

    println!(
        "{} {} records saved to {}",
        style("OK:").green().bold(),
        records.len(),
        cli.output.display()
    );

    Ok(())
}

async fn scrape(session: &BrowserSession) -> anyhow::Result<Vec<Precedent>> {
    let search = PangeaSearch::open(session).await?;
    collect_all(&search, &PaginatorConfig::default()).await
}
