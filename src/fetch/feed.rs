//! RSS feed parsing
//!
//! Streams the feed document with `quick-xml`: locate the channel, walk
//! its items, and build one [`Article`] per item. A field that fails to
//! parse degrades to an empty value; a bad date degrades to the current
//! time. Nothing in here aborts the batch.

use chrono::{DateTime, NaiveDateTime, Utc};
use quick_xml::Reader;
use quick_xml::events::Event;

use crate::models::Article;

use super::latex::normalize;

/// Date pattern used by the feed's `pubDate` field
const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Which item child the reader is currently inside
#[derive(Clone, Copy, PartialEq, Eq)]
enum Field {
    None,
    Title,
    Link,
    Description,
    PubDate,
    Creator,
    Category,
}

/// Accumulates one item's fields as text events arrive
#[derive(Default)]
struct ItemDraft {
    title: String,
    link: String,
    description: String,
    pub_date: String,
    creator: String,
    categories: Vec<String>,
}

impl ItemDraft {
    fn into_article(self) -> Article {
        Article {
            title: normalize(&self.title),
            link: self.link.trim().to_string(),
            summary: normalize(strip_abstract_marker(&self.description)),
            authors: normalize(&self.creator),
            date: parse_date(&self.pub_date).unwrap_or_else(Utc::now),
            category: self.categories.join(", "),
            bookmarked: false,
        }
    }
}

/// Parse a feed document into articles.
///
/// Returns the articles collected so far on a document-level error, which
/// for an unparseable document means an empty vec.
pub fn parse_feed(xml: &str) -> Vec<Article> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut articles = Vec::new();
    let mut in_channel = false;
    let mut in_item = false;
    let mut field = Field::None;
    let mut draft = ItemDraft::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"channel" => in_channel = true,
                b"item" if in_channel => {
                    in_item = true;
                    draft = ItemDraft::default();
                }
                b"title" if in_item => field = Field::Title,
                b"link" if in_item => field = Field::Link,
                b"description" if in_item => field = Field::Description,
                b"pubDate" if in_item => field = Field::PubDate,
                b"dc:creator" if in_item => field = Field::Creator,
                b"category" if in_item => field = Field::Category,
                _ => field = Field::None,
            },
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"channel" => in_channel = false,
                b"item" => {
                    if in_item {
                        in_item = false;
                        let article = std::mem::take(&mut draft).into_article();
                        if article.link.is_empty() {
                            tracing::debug!("[fetcher] skipping feed item without a link");
                        } else {
                            articles.push(article);
                        }
                    }
                }
                _ => field = Field::None,
            },
            Ok(Event::Text(e)) => {
                if in_item {
                    let text = e.unescape().unwrap_or_default().into_owned();
                    append_field(&mut draft, field, &text);
                }
            }
            Ok(Event::CData(e)) => {
                if in_item {
                    let text = String::from_utf8_lossy(&e).into_owned();
                    append_field(&mut draft, field, &text);
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                tracing::error!("[fetcher] feed parse error: {e}");
                break;
            }
        }
    }

    articles
}

fn append_field(draft: &mut ItemDraft, field: Field, text: &str) {
    match field {
        Field::Title => draft.title.push_str(text),
        Field::Link => draft.link.push_str(text),
        Field::Description => draft.description.push_str(text),
        Field::PubDate => draft.pub_date.push_str(text),
        Field::Creator => draft.creator.push_str(text),
        Field::Category => draft.categories.push(text.to_string()),
        Field::None => {}
    }
}

/// Parse the feed date format; `None` on mismatch
fn parse_date(date: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(date.trim(), DATE_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Drop the "Abstract:" label the feed prepends to descriptions
fn strip_abstract_marker(description: &str) -> &str {
    let trimmed = description.trim();
    trimmed
        .strip_prefix("Abstract:")
        .map_or(trimmed, str::trim_start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    const SAMPLE_FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:dc="http://purl.org/dc/elements/1.1/">
  <channel>
    <title>hep-ph updates on arXiv.org</title>
    <link>http://rss.arxiv.org/rss/hep-ph</link>
    <item>
      <title>Sample Article Title</title>
      <link>https://arxiv.org/abs/2403.12345</link>
      <description>Abstract: We present a sample result.</description>
      <pubDate>2024-03-18T00:00:00</pubDate>
      <dc:creator>A. Author, B. Author</dc:creator>
      <category>hep-ph</category>
      <category>hep-ex</category>
    </item>
    <item>
      <title>Second Article</title>
      <link>https://arxiv.org/abs/2403.67890</link>
      <description>No marker here.</description>
      <pubDate>garbled date</pubDate>
      <dc:creator>C. Author</dc:creator>
      <category>hep-lat</category>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn test_parse_sample_feed() {
        let articles = parse_feed(SAMPLE_FEED);
        assert_eq!(articles.len(), 2);

        let first = &articles[0];
        assert_eq!(first.title, "Sample Article Title");
        assert_eq!(first.link, "https://arxiv.org/abs/2403.12345");
        assert_eq!(first.summary, "We present a sample result.");
        assert_eq!(first.authors, "A. Author, B. Author");
        assert_eq!(first.category, "hep-ph, hep-ex");
        assert_eq!(first.date.year(), 2024);
        assert!(!first.bookmarked);
    }

    #[test]
    fn test_bad_date_defaults_to_now() {
        let articles = parse_feed(SAMPLE_FEED);
        // The record is kept, dated approximately now
        let second = &articles[1];
        assert_eq!(second.title, "Second Article");
        assert!((Utc::now() - second.date).num_seconds() < 60);
    }

    #[test]
    fn test_description_without_marker() {
        let articles = parse_feed(SAMPLE_FEED);
        assert_eq!(articles[1].summary, "No marker here.");
    }

    #[test]
    fn test_missing_fields_degrade_to_empty() {
        let xml = r#"<rss><channel><item>
            <link>https://arxiv.org/abs/2403.11111</link>
        </item></channel></rss>"#;
        let articles = parse_feed(xml);
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "");
        assert_eq!(articles[0].authors, "");
        assert_eq!(articles[0].category, "");
    }

    #[test]
    fn test_item_without_link_is_skipped() {
        let xml = r#"<rss><channel><item>
            <title>Linkless</title>
        </item></channel></rss>"#;
        assert!(parse_feed(xml).is_empty());
    }

    #[test]
    fn test_items_outside_channel_ignored() {
        let xml = r#"<rss><item><link>https://arxiv.org/abs/2403.22222</link></item>
            <channel></channel></rss>"#;
        assert!(parse_feed(xml).is_empty());
    }

    #[test]
    fn test_unparseable_document() {
        assert!(parse_feed("this is not xml <<<").is_empty());
    }

    #[test]
    fn test_latex_normalized_on_parse() {
        let xml = r#"<rss xmlns:dc="http://purl.org/dc/elements/1.1/"><channel><item>
            <title>\textbf{Bold} claims</title>
            <link>https://arxiv.org/abs/2403.33333</link>
            <dc:creator>R\'enyi entropy group</dc:creator>
        </item></channel></rss>"#;
        let articles = parse_feed(xml);
        assert_eq!(articles[0].title, "Bold claims");
        assert_eq!(articles[0].authors, "Rényi entropy group");
    }

    #[test]
    fn test_parse_date() {
        let parsed = parse_date("2024-03-18T12:30:45").unwrap();
        assert_eq!(parsed.timestamp(), 1_710_765_045);
        assert!(parse_date("Mon, 18 Mar 2024 00:00:00 -0400").is_none());
    }
}
