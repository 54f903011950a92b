use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub mod entities;
pub mod sentiment;
pub mod summarizer;
pub mod tokenizer;
pub mod topics;

use entities::extract_entities;
use summarizer::Summarizer;
use topics::Topic;

/// Items whose combined title and body are this short (in characters) are dropped.
pub const MIN_CONTENT_CHARS: usize = 10;

/// Core trait for sentiment providers
pub trait SentimentProvider: Send + Sync {
    /// Aggregate polarity of a token sequence
    fn score(&self, tokens: &[String]) -> Result<f64>;
}

/// One feed entry before enrichment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawItem {
    pub title: String,
    /// Plain-text snippet of the entry body
    pub body: Option<String>,
    /// Publication date as delivered by the feed
    pub published: Option<String>,
    pub link: String,
    pub categories: Vec<String>,
    pub author: String,
}

/// A feed entry with topic, summary, sentiment and entities attached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedArticle {
    pub source: String,
    pub title: String,
    pub topic: Topic,
    pub summary: String,
    pub sentiment_score: f64,
    pub affected_states: Vec<String>,
    pub key_people: Vec<String>,
    pub organizations: Vec<String>,
    pub timestamp: String,
    pub content_length: usize,
    pub url: String,
    pub category: Vec<String>,
    pub author: String,
}

/// Per-article transform composing the analyzers. Holds no mutable state.
#[derive(Clone)]
pub struct Enricher {
    sentiment: Arc<dyn SentimentProvider>,
    summarizer: Summarizer,
}

impl Enricher {
    pub fn new(sentiment: Arc<dyn SentimentProvider>, summarizer: Summarizer) -> Self {
        Self {
            sentiment,
            summarizer,
        }
    }

    /// Enrich one item. `Ok(None)` means the item was too short to keep.
    pub fn enrich(&self, source: &str, item: &RawItem) -> Result<Option<EnrichedArticle>> {
        let full_text = format!("{} {}", item.title, item.body.as_deref().unwrap_or(""));
        let content_length = full_text.chars().count();
        if content_length <= MIN_CONTENT_CHARS {
            return Ok(None);
        }

        let words = tokenizer::tokenize(&full_text);
        let sentiment = self
            .sentiment
            .score(&words)
            .context("sentiment scoring failed")?;
        let entities = extract_entities(&full_text);

        Ok(Some(EnrichedArticle {
            source: source.to_string(),
            title: item.title.clone(),
            topic: topics::classify(&full_text),
            summary: self.summarizer.summarize(&full_text),
            sentiment_score: round_to_hundredths(sentiment),
            affected_states: entities.states,
            key_people: entities.people,
            organizations: entities.organizations,
            timestamp: item
                .published
                .clone()
                .unwrap_or_else(|| Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
            content_length,
            url: item.link.clone(),
            category: item.categories.clone(),
            author: item.author.clone(),
        }))
    }
}

/// Two decimals, halves rounded toward positive infinity. Non-finite input becomes 0.
fn round_to_hundredths(value: f64) -> f64 {
    let rounded = (value * 100.0 + 0.5).floor() / 100.0;
    if rounded.is_finite() {
        rounded
    } else {
        0.0
    }
}
