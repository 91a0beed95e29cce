use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use ::config::{Config, Environment, File, FileFormat};
use scraper::Selector;
use serde::{Deserialize, Serialize};

use crate::parser::ProfileSelectors;

pub const DEFAULT_START_URL: &str = "https://intus.austinbar.org/directory/default.aspx?page=1";
pub const DEFAULT_OUTPUT: &str = "parsed.json";
/// Environment variables `MEMBER_SCRAPER_<KEY>` override file values.
pub const ENV_PREFIX: &str = "MEMBER_SCRAPER";

/// Everything a crawl run needs. Missing keys in a config file fall back to
/// the defaults below.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    /// Directory listing page 1.
    pub start_url: String,
    pub output: PathBuf,
    /// One thumbnail per member on the listing page.
    pub entry_selector: String,
    pub group_selector: String,
    pub label_selector: String,
    /// Element that must be present before a page counts as loaded.
    pub ready_marker: String,
    pub settle_ms: u64,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            start_url: DEFAULT_START_URL.to_string(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            entry_selector: ".directory-search-item".to_string(),
            group_selector: ".form-group".to_string(),
            label_selector: "label".to_string(),
            ready_marker: "#footer".to_string(),
            settle_ms: 250,
            timeout_secs: 30,
            user_agent: concat!("member_scraper/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Command-line values, applied over every other source.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub start_url: Option<String>,
    pub output: Option<PathBuf>,
    pub settle_ms: Option<u64>,
}

/// Compiled selectors for one run.
#[derive(Debug, Clone)]
pub struct Selectors {
    pub entry: Selector,
    pub profile: ProfileSelectors,
}

impl CrawlConfig {
    /// Layer defaults, an optional JSON file, `MEMBER_SCRAPER_*` environment
    /// variables and command-line overrides, later sources winning.
    pub fn load(file: Option<&Path>, overrides: &Overrides) -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&CrawlConfig::default())?);
        if let Some(path) = file {
            builder = builder.add_source(File::from(path).format(FileFormat::Json));
        }

        let settings = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .set_override_option("start_url", overrides.start_url.clone())?
            .set_override_option(
                "output",
                overrides.output.as_ref().map(|p| p.display().to_string()),
            )?
            .set_override_option("settle_ms", overrides.settle_ms)?
            .build()
            .context("Failed to load configuration")?;

        settings
            .try_deserialize()
            .context("Invalid configuration")
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn selectors(&self) -> Result<Selectors> {
        Ok(Selectors {
            entry: parse_selector(&self.entry_selector)?,
            profile: ProfileSelectors {
                group: parse_selector(&self.group_selector)?,
                label: parse_selector(&self.label_selector)?,
            },
        })
    }
}

pub fn parse_selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow::anyhow!("Invalid selector {:?}: {:?}", css, e))
}
