use anyhow::{Context, Result};
use common::Config;
use std::sync::Arc;
use tracing::{info, warn};

use crate::analysis::sentiment::AfinnAnalyzer;
use crate::analysis::summarizer::Summarizer;
use crate::analysis::{EnrichedArticle, Enricher, SentimentProvider};
use crate::ingestion::{FeedFetcher, HttpFeedFetcher};
use crate::sources::{NewsSource, NEWS_SOURCES};

/// Fetches every feed of a source in order and enriches its first items.
#[derive(Clone)]
pub struct Aggregator {
    fetcher: Arc<dyn FeedFetcher>,
    enricher: Enricher,
    max_items_per_feed: usize,
}

impl Aggregator {
    pub fn new(fetcher: Arc<dyn FeedFetcher>, enricher: Enricher, max_items_per_feed: usize) -> Self {
        Self {
            fetcher,
            enricher,
            max_items_per_feed,
        }
    }

    /// Build the HTTP fetcher and the lexicon analyzer described by `config`.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let analyzer = match config.sentiment.lexicon_path.as_deref() {
            Some(path) => AfinnAnalyzer::from_path(path).await?,
            None => AfinnAnalyzer::bundled()?,
        };
        info!(words = analyzer.len(), "sentiment analyzer ready");

        let sentiment: Arc<dyn SentimentProvider> = Arc::new(analyzer);
        let enricher = Enricher::new(sentiment, Summarizer::from(&config.summary));
        let fetcher = HttpFeedFetcher::new(&config.fetch).context("Failed to create feed fetcher")?;

        Ok(Self::new(
            Arc::new(fetcher),
            enricher,
            config.fetch.max_items_per_feed,
        ))
    }

    /// Articles of one source, feeds in registry order. A failing feed is
    /// logged and skipped; whatever it produced before failing is kept.
    pub async fn fetch_source(&self, source: &NewsSource) -> Vec<EnrichedArticle> {
        let mut articles = Vec::new();

        for url in source.feeds {
            if let Err(e) = self.process_feed(source, url, &mut articles).await {
                warn!(source = source.name, feed = %url, "Error fetching feed: {:#}", e);
            }
        }

        info!("Fetched {} articles from {}", articles.len(), source.name);
        articles
    }

    /// Articles of every registered source, in registry order.
    pub async fn fetch_all(&self) -> Vec<EnrichedArticle> {
        let mut articles = Vec::new();
        for source in NEWS_SOURCES.iter() {
            articles.extend(self.fetch_source(source).await);
        }
        info!("Aggregated {} articles from {} sources", articles.len(), NEWS_SOURCES.len());
        articles
    }

    async fn process_feed(
        &self,
        source: &NewsSource,
        url: &str,
        articles: &mut Vec<EnrichedArticle>,
    ) -> Result<()> {
        let items = self.fetcher.fetch(url).await?;

        for item in items.iter().take(self.max_items_per_feed) {
            if let Some(article) = self.enricher.enrich(source.name, item)? {
                articles.push(article);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::RawItem;
    use anyhow::anyhow;
    use std::sync::Mutex;

    /// Serves canned items, records every requested URL.
    struct Recording {
        requested: Mutex<Vec<String>>,
        items: usize,
    }

    #[async_trait::async_trait]
    impl FeedFetcher for Recording {
        async fn fetch(&self, url: &str) -> Result<Vec<RawItem>> {
            self.requested.lock().unwrap().push(url.to_string());
            if url.contains("/sport/") {
                return Err(anyhow!("connection reset"));
            }
            Ok((0..self.items)
                .map(|n| RawItem {
                    title: format!("Story number {n} from the wire"),
                    link: format!("{url}#{n}"),
                    published: Some("2024-01-01T00:00:00Z".to_string()),
                    author: "Unknown".to_string(),
                    ..Default::default()
                })
                .collect())
        }
    }

    struct Neutral;

    impl SentimentProvider for Neutral {
        fn score(&self, _tokens: &[String]) -> Result<f64> {
            Ok(0.0)
        }
    }

    fn aggregator(items: usize) -> (Arc<Recording>, Aggregator) {
        let fetcher = Arc::new(Recording {
            requested: Mutex::new(Vec::new()),
            items,
        });
        let enricher = Enricher::new(Arc::new(Neutral), Summarizer::default());
        (fetcher.clone(), Aggregator::new(fetcher, enricher, 5))
    }

    #[tokio::test]
    async fn fetches_feeds_in_order_and_skips_failures() {
        let (fetcher, aggregator) = aggregator(2);
        let hindu = &NEWS_SOURCES[1];

        let articles = aggregator.fetch_source(hindu).await;

        let requested = fetcher.requested.lock().unwrap().clone();
        let expected: Vec<String> = hindu.feeds.iter().map(|f| f.to_string()).collect();
        assert_eq!(requested, expected);
        // the sport feed fails, the other eight yield two items each
        assert_eq!(articles.len(), 16);
        assert!(articles.iter().all(|a| a.source == "The Hindu"));
        assert!(!articles.iter().any(|a| a.url.contains("/sport/")));
    }

    #[tokio::test]
    async fn caps_items_per_feed() {
        let (_, aggregator) = aggregator(12);
        let articles = aggregator.fetch_source(&NEWS_SOURCES[0]).await;
        assert_eq!(articles.len(), 3 * 5);
        assert_eq!(articles[4].url, format!("{}#4", NEWS_SOURCES[0].feeds[0]));
        assert_eq!(articles[5].url, format!("{}#0", NEWS_SOURCES[0].feeds[1]));
    }

    #[tokio::test]
    async fn fetch_all_walks_registry_order() {
        let (_, aggregator) = aggregator(1);
        let articles = aggregator.fetch_all().await;

        let sources: Vec<&str> = articles.iter().map(|a| a.source.as_str()).collect();
        let first_hindu = sources.iter().position(|s| *s == "The Hindu").unwrap();
        let first_ht = sources.iter().position(|s| *s == "Hindustan Times").unwrap();
        assert_eq!(first_hindu, 3);
        assert!(first_ht > first_hindu);
        assert_eq!(articles.len(), 3 + 8 + 9);
    }
}
