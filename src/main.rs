mod config;
mod identifier;
mod model;
mod normalizer;
mod numeric;
mod parser;
mod scraper;
mod storage;

use config::load_config;
use identifier::{CarIdentifier, IdentifierTables};
use model::{Listing, ScrapeRequest};
use parser::{Parser, Site8891Parser};
use crate::scraper::{Scraper, ScraperImpl};
use rand::Rng;
use std::path::Path;
use storage::SqliteStorage;
use tokio::time::{sleep, Duration};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Set panic hook to log details about any panic
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("😱 Panic occurred: {:?}", panic_info);
    }));

    // Load configuration from file
    let config = match load_config("config.json") {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Config load error: {}", e);
            return;
        }
    };

    // Lookup tables load once and stay immutable; a missing config dir only
    // degrades classification, it never stops the run.
    let identifier = CarIdentifier::new(IdentifierTables::load(Path::new(&config.config_dir)));

    let scraper = match ScraperImpl::new(&config.base_url) {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to build HTTP client: {}", e);
            return;
        }
    };
    let parser = Site8891Parser::new();

    let storage = match SqliteStorage::new(&config.db_path) {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to initialize storage: {}", e);
            return;
        }
    };

    let mut saved = 0usize;
    let mut rejected = 0usize;

    for page in 1..=config.pages {
        info!("Fetching page {}/{}...", page, config.pages);
        let request = ScrapeRequest { page };

        let html = match scraper.fetch(&request).await {
            Ok(html) => html,
            Err(e) => {
                warn!("Scraper error on page {}: {}", page, e);
                continue;
            }
        };

        let raw_listings = match parser.parse(&html) {
            Ok(listings) => listings,
            Err(e) => {
                warn!("Parse error on page {}: {}", page, e);
                continue;
            }
        };
        info!("Page {}: {} raw listings", page, raw_listings.len());

        for raw in raw_listings {
            // One bad record never poisons the batch
            match Listing::build(raw, &identifier) {
                Ok(listing) => {
                    if let Err(e) = storage.upsert_listing(&listing) {
                        warn!("DB save error for {}: {}", listing.external_id, e);
                        continue;
                    }
                    saved += 1;
                }
                Err(e) => {
                    warn!("Rejected listing: {}", e);
                    rejected += 1;
                }
            }
        }

        if page < config.pages {
            let delay = rand::rng().random_range(config.min_delay_ms..=config.max_delay_ms);
            info!("Waiting {}ms before next page...", delay);
            sleep(Duration::from_millis(delay)).await;
        }
    }

    let total = storage.count_listings().unwrap_or(-1);
    info!(
        "Run complete: {} saved, {} rejected, {} listings in database",
        saved, rejected, total
    );
}
