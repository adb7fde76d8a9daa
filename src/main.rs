use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use log::error;

use mail2site::mail::{PageSource, StdinSource};
use mail2site::site::SiteBuilder;
use mail2site::site::html::StaticHtmlSite;
use mail2site::store::repo::PageRegistry;
use mail2site::store::sqlite::SqlitePageRegistry;

const SECS_PER_DAY: u64 = 86_400;

/// News digest builder: reads one mail message from stdin, stores it, and
/// regenerates the static site from the recent pages.
#[derive(Parser)]
#[command(name = "mail2site")]
#[command(about = "News digest builder", long_about = None)]
struct Cli {
    /// Output folder for the generated site
    #[arg(short, long, value_name = "output_dir")]
    output: PathBuf,

    /// Database file location
    #[arg(short, long, value_name = "db_file")]
    database: PathBuf,

    /// Days to include into the index
    #[arg(short = 'D', long, value_name = "days_ago")]
    days: u64,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let registry = SqlitePageRegistry::open(&cli.database)
        .with_context(|| format!("opening page registry at {}", cli.database.display()))?;

    // A message that cannot be ingested must not stop the digest from being
    // rebuilt out of what is already stored.
    if let Err(e) = ingest(&mut StdinSource, &registry) {
        error!("failed to ingest message: {e:?}");
    }

    let pages = registry
        .recent_pages(Duration::from_secs(cli.days * SECS_PER_DAY))
        .context("querying recent pages")?;

    let site = StaticHtmlSite::new(&cli.output);
    site.build_site(&pages)
        .with_context(|| format!("building site in {}", cli.output.display()))
}

fn ingest(source: &mut dyn PageSource, registry: &dyn PageRegistry) -> Result<()> {
    let page = source.read_page()?;
    registry.save_page(&page)
}
