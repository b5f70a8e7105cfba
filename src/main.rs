use anyhow::Result;
use clap::Parser;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use zonafinder::fetcher::HttpFetcher;
use zonafinder::output;
use zonafinder::scraper::{Scraper, ScrapingOptions};
use zonafinder::tui::ScraperTUI;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Zonafinder - Listing Scraper for Zonaprop")]
struct Args {
    /// Base listing URL without the .html extension
    #[clap(short, long)]
    url: String,

    /// Path to output CSV file
    #[clap(short, long, default_value = "listings.csv")]
    output: String,

    /// Optional path for a JSON dump of the same records
    #[clap(short, long)]
    json: Option<String>,

    /// Maximum number of pages to scrape (if not set, scrape until the advertised total is reached)
    #[clap(short, long)]
    max_pages: Option<usize>,

    /// Delay between page fetches in seconds
    #[clap(short, long, default_value = "3")]
    delay: u64,

    /// Disable the progress display
    #[clap(long)]
    no_progress: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    println!("Zonafinder - Listing Scraper for Zonaprop");
    println!("=========================================");

    let mut options = ScrapingOptions::new(args.url);
    options.max_pages = args.max_pages;
    options.page_delay = Duration::from_secs(args.delay);

    let scraper = Scraper::new(HttpFetcher::new(), options);

    let listings = if args.no_progress {
        scraper.scrape_website(None)?
    } else {
        let mut tui = ScraperTUI::new();
        scraper.scrape_website(Some(&mut tui))?
    };

    output::save_listings_to_csv(&listings, &args.output)?;
    if let Some(json_path) = &args.json {
        output::save_listings_to_json(&listings, json_path)?;
    }

    println!("\n=== Summary ===");
    println!("Total listings scraped: {}", listings.len());
    println!("Saved to: {}", args.output);

    Ok(())
}
