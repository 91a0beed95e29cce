use std::time::{Duration, Instant};

use async_trait::async_trait;
use scraper::Selector;
use tracing::debug;
use url::Url;

use crate::config::{parse_selector, CrawlConfig};
use crate::parser::ProfileDocument;

#[derive(Debug, thiserror::Error)]
pub enum BrowserError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("{url} never showed ready marker {marker:?}")]
    NotReady { url: String, marker: String },
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// A loaded page. Holds its document until closed.
#[derive(Debug)]
pub struct Page {
    document: ProfileDocument,
}

impl Page {
    pub fn new(document: ProfileDocument) -> Self {
        Self { document }
    }

    pub fn document(&self) -> &ProfileDocument {
        &self.document
    }

    pub fn url(&self) -> &Url {
        self.document.url()
    }

    pub fn close(self) {
        debug!("Closed {}", self.document.url());
    }
}

/// One browsing session, shared by every page of a run.
///
/// Parsed documents are not `Send`, so the futures are not either; the crawl
/// runs on a single task.
#[async_trait(?Send)]
pub trait Browser {
    /// Navigate to `url` and return once the page is ready to query.
    async fn open_page(&self, url: &Url) -> Result<Page, BrowserError>;

    /// Release a page obtained from [`open_page`](Self::open_page).
    fn close_page(&self, page: Page) {
        page.close();
    }

    /// End the session. Consumes it so it cannot be closed twice.
    async fn close(self) -> Result<(), BrowserError>
    where
        Self: Sized;
}

/// Fetches pages over HTTP and treats the presence of the ready marker as
/// "loaded".
pub struct HttpBrowser {
    client: reqwest::Client,
    ready_marker: Selector,
    marker_css: String,
    settle: Duration,
}

impl HttpBrowser {
    pub fn launch(config: &CrawlConfig) -> Result<Self, BrowserError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.request_timeout())
            .build()?;
        let ready_marker =
            parse_selector(&config.ready_marker).map_err(|e| BrowserError::Config(e.to_string()))?;

        Ok(Self {
            client,
            ready_marker,
            marker_css: config.ready_marker.clone(),
            settle: config.settle_delay(),
        })
    }
}

#[async_trait(?Send)]
impl Browser for HttpBrowser {
    async fn open_page(&self, url: &Url) -> Result<Page, BrowserError> {
        let start = Instant::now();
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BrowserError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().clone();
        let body = response.text().await?;

        // fixed settle delay per page load
        tokio::time::sleep(self.settle).await;

        let document = ProfileDocument::parse(&body, final_url);
        if document.html().select(&self.ready_marker).next().is_none() {
            return Err(BrowserError::NotReady {
                url: url.to_string(),
                marker: self.marker_css.clone(),
            });
        }

        debug!(
            "Loaded {} in {}ms",
            document.url(),
            start.elapsed().as_millis()
        );
        Ok(Page::new(document))
    }

    async fn close(self) -> Result<(), BrowserError> {
        debug!("Browser session closed");
        Ok(())
    }
}
