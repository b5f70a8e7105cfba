use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::extractor;
use crate::fetcher::PageFetcher;
use crate::models::Listing;
use crate::tui::ScraperTUI;

const PAGE_URL_SUFFIX: &str = "-pagina-";
const HTML_EXTENSION: &str = ".html";

#[derive(Debug, Clone)]
pub struct ScrapingOptions {
    /// Listing URL without the `.html` extension; page segments are
    /// appended to it.
    pub base_url: String,
    /// Optional page cap, independent of the advertised total.
    pub max_pages: Option<usize>,
    /// Politeness pause between page fetches.
    pub page_delay: Duration,
}

impl ScrapingOptions {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            max_pages: None,
            page_delay: Duration::from_secs(3),
        }
    }
}

/// Walks the paginated results of one listing search and accumulates flat
/// records. Page extraction is stateless; the driver only owns the page
/// counter and the running record list.
pub struct Scraper<F> {
    fetcher: F,
    options: ScrapingOptions,
}

impl<F: PageFetcher> Scraper<F> {
    pub fn new(fetcher: F, options: ScrapingOptions) -> Self {
        Self { fetcher, options }
    }

    fn page_url(&self, page_number: usize) -> String {
        if page_number == 1 {
            format!("{}{}", self.options.base_url, HTML_EXTENSION)
        } else {
            format!(
                "{}{}{}{}",
                self.options.base_url, PAGE_URL_SUFFIX, page_number, HTML_EXTENSION
            )
        }
    }

    /// Fetches and extracts a single results page.
    pub fn scrape_page(&self, page_number: usize) -> Result<Vec<Listing>> {
        let url = self.page_url(page_number);
        debug!(%url, "fetching listing page");
        let html = self
            .fetcher
            .fetch(&url)
            .with_context(|| format!("Failed to fetch listing page {}", page_number))?;
        let listings = extractor::extract_page(&html);
        debug!(page = page_number, count = listings.len(), "extracted listings");
        Ok(listings)
    }

    /// Reads the advertised listing total from the first results page.
    pub fn total_listings(&self) -> Result<u32> {
        let html = self
            .fetcher
            .fetch(&self.page_url(1))
            .context("Failed to fetch first listing page")?;
        Ok(extractor::read_total_count(&html))
    }

    /// Walks results pages in order until the advertised total is reached,
    /// an empty page signals exhaustion, or the page cap is hit. Fetch
    /// failures abort with the failing page number; parse misses never do.
    pub fn scrape_website(&self, mut tui: Option<&mut ScraperTUI>) -> Result<Vec<Listing>> {
        let total = self.total_listings()? as usize;
        if total == 0 {
            warn!("listing total reads as 0, nothing to scrape");
            return Ok(Vec::new());
        }
        info!(total, "starting paginated scrape");
        if let Some(tui) = tui.as_mut() {
            tui.start_run(total)?;
        }

        let mut listings: Vec<Listing> = Vec::new();
        let mut page_number = 1;
        while listings.len() < total {
            if let Some(max) = self.options.max_pages {
                if page_number > max {
                    info!(max_pages = max, "reached page cap, stopping");
                    break;
                }
            }

            let page_listings = self.scrape_page(page_number)?;
            if page_listings.is_empty() {
                warn!(page = page_number, "no listings on page, stopping early");
                break;
            }
            listings.extend(page_listings);

            if let Some(tui) = tui.as_mut() {
                tui.page_done(page_number, listings.len(), total)?;
            }

            page_number += 1;
            if listings.len() < total {
                thread::sleep(self.options.page_delay);
            }
        }

        if let Some(tui) = tui.as_mut() {
            tui.finish_run(listings.len())?;
        }
        info!(count = listings.len(), "scrape finished");
        Ok(listings)
    }
}
