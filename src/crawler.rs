use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};
use url::Url;

use crate::browser::Browser;
use crate::config::CrawlConfig;
use crate::directory;
use crate::output::JsonArrayWriter;
use crate::parser;

/// Crawl stats returned after completion.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CrawlStats {
    /// Directory entries on the listing page.
    pub entries: usize,
    /// Records appended to the output array.
    pub written: usize,
    /// Entries with no usable profile link, or whose profile failed to load.
    pub skipped: usize,
    /// Profiles that loaded but had no field groups.
    pub empty: usize,
}

/// Run one crawl with `browser`, then close it whether or not the crawl
/// succeeded.
pub async fn run<B: Browser>(browser: B, config: &CrawlConfig) -> Result<CrawlStats> {
    let result = crawl(&browser, config).await;
    if let Err(e) = browser.close().await {
        warn!("Failed to close browser: {}", e);
    }
    result
}

/// Walk the directory's first page and stream every member record into
/// `config.output`. Profiles are visited one at a time.
pub async fn crawl<B: Browser>(browser: &B, config: &CrawlConfig) -> Result<CrawlStats> {
    let selectors = config.selectors()?;
    let start_url = Url::parse(&config.start_url)
        .with_context(|| format!("Invalid start URL {}", config.start_url))?;

    info!("Opening directory: {}", start_url);
    let listing = browser
        .open_page(&start_url)
        .await
        .context("Failed to load directory listing")?;

    let mut out = match JsonArrayWriter::create(&config.output) {
        Ok(out) => out,
        Err(e) => {
            browser.close_page(listing);
            return Err(e);
        }
    };

    let entries = directory::entries(listing.document(), &selectors.entry);
    info!("Found {} directory entries", entries.len());
    let mut stats = CrawlStats {
        entries: entries.len(),
        ..Default::default()
    };

    let pb = ProgressBar::new(entries.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta})")?
            .progress_chars("=> "),
    );

    for (i, entry) in entries.iter().enumerate() {
        info!("Parsing member {}...", i);
        pb.inc(1);

        let url = match directory::profile_url(*entry, listing.document().base_url()) {
            Ok(url) => url,
            Err(e) => {
                warn!("Skipping member {}: {}", i, e);
                stats.skipped += 1;
                continue;
            }
        };

        let page = match browser.open_page(&url).await {
            Ok(page) => page,
            Err(e) => {
                warn!("Skipping member {} ({}): {}", i, url, e);
                stats.skipped += 1;
                continue;
            }
        };
        let record = parser::extract_member(page.document(), &selectors.profile);
        browser.close_page(page);

        match record {
            Some(record) => {
                debug!("Data: {}", serde_json::to_string(&record)?);
                out.push(&record)
                    .with_context(|| format!("could not write to {}", config.output.display()))?;
                stats.written += 1;
            }
            None => {
                debug!("No profile data at {}", url);
                stats.empty += 1;
            }
        }
    }

    let out_is_empty = out.is_empty();
    out.finish()
        .with_context(|| format!("could not write to {}", config.output.display()))?;
    pb.finish_and_clear();
    drop(entries);
    browser.close_page(listing);

    if out_is_empty {
        info!("No member records found");
    }

    info!(
        "Crawled {} entries ({} written, {} skipped, {} empty)",
        stats.entries, stats.written, stats.skipped, stats.empty
    );
    Ok(stats)
}
