use anyhow::{anyhow, Context, Result};
use chrono::SecondsFormat;
use common::FetchConfig;
use feed_rs::model::Entry;
use feed_rs::parser;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Client;
use scraper::Html;
use std::time::Duration;
use tracing::debug;

use crate::analysis::RawItem;

/// Author reported when the feed names none.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// Source of raw feed entries
#[async_trait::async_trait]
pub trait FeedFetcher: Send + Sync {
    /// Fetch and parse the feed at `url`, entries in feed order
    async fn fetch(&self, url: &str) -> Result<Vec<RawItem>>;
}

/// Fetches feeds over HTTP with one shared client.
pub struct HttpFeedFetcher {
    client: Client,
}

impl HttpFeedFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_str(&config.accept).context("invalid Accept header in config")?,
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()
            .context("failed to build reqwest client")?;

        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl FeedFetcher for HttpFeedFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<RawItem>> {
        debug!(%url, "fetching feed");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("network error during fetch")?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("feed fetch failed with status: {}", status));
        }

        let bytes = response.bytes().await.context("failed to read response body")?;
        parse_feed(bytes.as_ref())
    }
}

/// Parse an RSS or Atom document into raw items.
pub fn parse_feed(bytes: &[u8]) -> Result<Vec<RawItem>> {
    let feed = parser::parse(bytes).context("failed to parse feed")?;
    Ok(feed.entries.into_iter().map(raw_item_from_entry).collect())
}

fn raw_item_from_entry(entry: Entry) -> RawItem {
    let title = entry.title.map(|t| t.content).unwrap_or_default();

    let body = entry
        .summary
        .map(|s| s.content)
        .filter(|s| !s.trim().is_empty())
        .or_else(|| entry.content.and_then(|c| c.body))
        .map(|html| html_to_text(&html))
        .filter(|text| !text.is_empty());

    let published = entry
        .published
        .or(entry.updated)
        .map(|date| date.to_rfc3339_opts(SecondsFormat::Secs, true));

    RawItem {
        title,
        body,
        published,
        link: entry.links.into_iter().next().map(|l| l.href).unwrap_or_default(),
        categories: entry.categories.into_iter().map(|c| c.term).collect(),
        author: entry
            .authors
            .into_iter()
            .map(|person| person.name)
            .find(|name| !name.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
    }
}

/// Strip markup, keep the text with whitespace collapsed.
fn html_to_text(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let text: String = fragment.root_element().text().collect();
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:dc="http://purl.org/dc/elements/1.1/">
  <channel>
    <title>Test feed</title>
    <link>http://example.com</link>
    <description>Test</description>
    <item>
      <title>Farmers protest over crop prices in Punjab</title>
      <link>http://example.com/1</link>
      <description><![CDATA[<p>Thousands of farmers <b>gathered</b> demanding better irrigation support.</p>]]></description>
      <category>India</category>
      <category>Agriculture</category>
      <dc:creator>Staff Reporter</dc:creator>
      <pubDate>Mon, 01 Jan 2024 10:00:00 GMT</pubDate>
    </item>
    <item>
      <title>No body here</title>
      <link>http://example.com/2</link>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn maps_rss_items() {
        let items = parse_feed(RSS.as_bytes()).unwrap();
        assert_eq!(items.len(), 2);

        let first = &items[0];
        assert_eq!(first.title, "Farmers protest over crop prices in Punjab");
        assert_eq!(
            first.body.as_deref(),
            Some("Thousands of farmers gathered demanding better irrigation support.")
        );
        assert_eq!(first.link, "http://example.com/1");
        assert_eq!(first.categories, vec!["India", "Agriculture"]);
        assert_eq!(first.published.as_deref(), Some("2024-01-01T10:00:00Z"));
    }

    #[test]
    fn missing_fields_get_defaults() {
        let items = parse_feed(RSS.as_bytes()).unwrap();
        let second = &items[1];
        assert!(second.body.is_none());
        assert!(second.published.is_none());
        assert!(second.categories.is_empty());
        assert_eq!(second.author, UNKNOWN_AUTHOR);
    }

    #[test]
    fn rejects_non_feed_documents() {
        assert!(parse_feed(b"<html><body>not a feed</body></html>").is_err());
    }

    #[test]
    fn strips_markup() {
        assert_eq!(
            html_to_text("<p>Hello&nbsp;<a href=\"#\">world</a></p>\n<p>again</p>"),
            "Hello world again"
        );
    }
}
