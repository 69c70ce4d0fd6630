//! Article model (one tracked preprint)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single paper's metadata record as tracked locally
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    /// Paper title
    pub title: String,
    /// Abstract page URL; unique identifier for the article
    pub link: String,
    /// Abstract text
    pub summary: String,
    /// Author display string (comma separated)
    pub authors: String,
    /// Publication timestamp
    pub date: DateTime<Utc>,
    /// Comma-joined category labels (e.g. "hep-ph, hep-ex")
    pub category: String,
    /// Whether the user has bookmarked this article
    pub bookmarked: bool,
}

impl Article {
    /// Create a new article with the given link; remaining fields start empty
    pub fn new(link: &str) -> Self {
        Self {
            title: String::new(),
            link: link.to_string(),
            summary: String::new(),
            authors: String::new(),
            date: Utc::now(),
            category: String::new(),
            bookmarked: false,
        }
    }

    /// The arXiv paper id, derived from the trailing path segment of the link
    /// (e.g. "2403.12345" from "https://arxiv.org/abs/2403.12345").
    ///
    /// Returns an empty string if the link has no path separator.
    pub fn id(&self) -> String {
        match self.link.rfind('/') {
            Some(pos) => self.link[pos + 1..].to_string(),
            None => {
                tracing::error!("[article] invalid link format: {}", self.link);
                String::new()
            }
        }
    }

    /// Title prefixed with the bookmark marker when set
    pub fn display_title(&self) -> String {
        if self.bookmarked {
            format!("★ {}", self.title)
        } else {
            self.title.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_from_link() {
        let article = Article::new("https://arxiv.org/abs/2403.12345");
        assert_eq!(article.id(), "2403.12345");
    }

    #[test]
    fn test_id_without_separator() {
        let article = Article::new("not-a-url");
        assert_eq!(article.id(), "");
    }

    #[test]
    fn test_display_title_marker() {
        let mut article = Article::new("https://arxiv.org/abs/2403.12345");
        article.title = "Sample Article Title".to_string();
        assert_eq!(article.display_title(), "Sample Article Title");
        article.bookmarked = true;
        assert_eq!(article.display_title(), "★ Sample Article Title");
    }
}
