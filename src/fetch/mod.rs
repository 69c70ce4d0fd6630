//! Feed retrieval, parsing, and paper download
//!
//! All network operations are blocking; callers that need responsiveness
//! run them off the interaction thread (see the app worker). Transport
//! failures degrade to empty results and are never propagated as errors.

mod feed;
mod latex;

pub use feed::parse_feed;
pub use latex::{normalize, replace_accents, strip_style_commands};

use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use thiserror::Error;

use crate::models::Article;

/// Base URL for the arXiv RSS feed
const FEED_BASE_URL: &str = "https://rss.arxiv.org/rss";

/// Base URL for paper PDFs
const PDF_BASE_URL: &str = "https://arxiv.org/pdf";

/// Base URL for abstract pages
const ABS_BASE_URL: &str = "https://arxiv.org/abs";

/// Request timeout for all remote calls
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Cap on downloaded PDF size
const MAX_PDF_BYTES: u64 = 100 * 1024 * 1024;

/// Errors from the remote side, recovered locally by the fetch methods
#[derive(Debug, Error)]
pub enum FetchError {
    /// Request could not be completed
    #[error("request failed: {0}")]
    Transport(String),
    /// Server answered with a non-success status
    #[error("unexpected status {0}")]
    Status(u16),
    /// Local file write failed
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Source of article metadata and paper documents.
///
/// The orchestration core talks to this trait so it can be exercised
/// against a stub in tests.
pub trait ArticleSource {
    /// Fetch the configured feed; empty on any failure
    fn fetch(&self) -> Vec<Article>;

    /// Fetch the configured feed, keeping only articles dated today
    fn fetch_today(&self) -> Vec<Article>;

    /// Download the PDF for a paper id into the download directory
    fn download_paper(&self, paper_id: &str, filename: &str) -> bool;

    /// Best-effort scrape of a paper's abstract page; empty on failure
    fn paper_abstract(&self, paper_id: &str) -> String;
}

/// Blocking arXiv client
pub struct Fetcher {
    agent: ureq::Agent,
    topics: Vec<String>,
    download_dir: PathBuf,
}

impl Fetcher {
    /// Create a fetcher for a topic set.
    ///
    /// Fails if the download path exists and is not a directory; the
    /// directory itself is only created on first download.
    pub fn new(topics: Vec<String>, download_dir: &Path) -> Result<Self> {
        if download_dir.exists() && !download_dir.is_dir() {
            anyhow::bail!(
                "download path {} exists and is not a directory",
                download_dir.display()
            );
        }

        let agent = ureq::AgentBuilder::new().timeout(REQUEST_TIMEOUT).build();

        Ok(Self {
            agent,
            topics,
            download_dir: download_dir.to_path_buf(),
        })
    }

    /// The feed URL for the configured topic set
    fn feed_url(&self) -> String {
        format!("{FEED_BASE_URL}/{}", self.topics.join("+"))
    }

    /// Issue a GET, mapping transport and status failures to `FetchError`
    fn get(&self, url: &str) -> Result<ureq::Response, FetchError> {
        match self.agent.get(url).call() {
            Ok(response) => Ok(response),
            Err(ureq::Error::Status(code, _)) => Err(FetchError::Status(code)),
            Err(e) => Err(FetchError::Transport(e.to_string())),
        }
    }

    /// Fetch a page as text
    fn fetch_page(&self, url: &str) -> Result<String, FetchError> {
        self.get(url)?
            .into_string()
            .map_err(|e| FetchError::Transport(e.to_string()))
    }

    /// Retrieve the raw feed document
    fn fetch_feed(&self) -> Result<String, FetchError> {
        tracing::trace!("[fetcher] fetching articles for topics [{}]", self.topics.join(", "));
        self.fetch_page(&self.feed_url())
    }
}

impl ArticleSource for Fetcher {
    fn fetch(&self) -> Vec<Article> {
        let articles = match self.fetch_feed() {
            Ok(body) => parse_feed(&body),
            Err(e) => {
                tracing::warn!("[fetcher] feed fetch failed: {e}");
                Vec::new()
            }
        };

        tracing::info!("[fetcher] fetched {} articles", articles.len());
        articles
    }

    fn fetch_today(&self) -> Vec<Article> {
        let today = Utc::now().date_naive();
        self.fetch()
            .into_iter()
            .filter(|article| article.date.date_naive() == today)
            .collect()
    }

    fn download_paper(&self, paper_id: &str, filename: &str) -> bool {
        let url = format!("{PDF_BASE_URL}/{paper_id}");
        tracing::debug!("[fetcher] downloading {url}");

        let result = (|| -> Result<(), FetchError> {
            std::fs::create_dir_all(&self.download_dir)?;

            let response = self.get(&url)?;
            let path = self.download_dir.join(filename);
            let mut file = std::fs::File::create(&path)?;
            let mut reader = response.into_reader().take(MAX_PDF_BYTES);
            std::io::copy(&mut reader, &mut file)?;
            Ok(())
        })();

        match result {
            Ok(()) => {
                tracing::info!("[fetcher] saved {filename}");
                true
            }
            Err(e) => {
                tracing::warn!("[fetcher] download of {paper_id} failed: {e}");
                false
            }
        }
    }

    fn paper_abstract(&self, paper_id: &str) -> String {
        let url = format!("{ABS_BASE_URL}/{paper_id}");
        let page = match self.fetch_page(&url) {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("[fetcher] abstract fetch for {paper_id} failed: {e}");
                return String::new();
            }
        };

        extract_abstract(&page)
    }
}

/// Pull the abstract text out of an arXiv abstract page
fn extract_abstract(page: &str) -> String {
    let blockquote = regex_lite::Regex::new(r#"(?s)<blockquote class="abstract[^"]*">(.*?)</blockquote>"#)
        .ok()
        .and_then(|re| re.captures(page).map(|c| c[1].to_string()));

    let Some(raw) = blockquote else {
        return String::new();
    };

    // Strip tags, then the label the page embeds before the text
    let tags = regex_lite::Regex::new(r"<[^>]+>").map_or(raw.clone(), |re| re.replace_all(&raw, "").into_owned());
    tags.trim()
        .strip_prefix("Abstract:")
        .map_or_else(|| tags.trim().to_string(), |rest| rest.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_new_rejects_non_directory_path() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("not-a-dir");
        std::fs::write(&file_path, "x").unwrap();

        assert!(Fetcher::new(vec!["hep-ph".to_string()], &file_path).is_err());
    }

    #[test]
    fn test_new_accepts_missing_path() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("papers");
        let fetcher = Fetcher::new(vec!["hep-ph".to_string()], &missing).unwrap();
        // Directory is created lazily, not at construction
        assert!(!missing.exists());
        assert_eq!(fetcher.feed_url(), "https://rss.arxiv.org/rss/hep-ph");
    }

    #[test]
    fn test_feed_url_joins_topics() {
        let dir = tempdir().unwrap();
        let fetcher = Fetcher::new(
            vec!["hep-ph".to_string(), "hep-ex".to_string()],
            dir.path(),
        )
        .unwrap();
        assert_eq!(fetcher.feed_url(), "https://rss.arxiv.org/rss/hep-ph+hep-ex");
    }

    #[test]
    fn test_extract_abstract() {
        let page = r#"<html><body>
            <blockquote class="abstract mathjax">
              <span class="descriptor">Abstract:</span> We study a thing.
            </blockquote></body></html>"#;
        assert_eq!(extract_abstract(page), "We study a thing.");
    }

    #[test]
    fn test_extract_abstract_missing() {
        assert_eq!(extract_abstract("<html><body>nothing here</body></html>"), "");
    }
}
