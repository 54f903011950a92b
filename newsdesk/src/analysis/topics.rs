//! Keyword-frequency topic classification.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::tokenizer::tokenize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topic {
    Politics,
    Sports,
    Agriculture,
    Business,
    Technology,
    Entertainment,
    General,
}

impl Topic {
    /// Classifiable topics in declaration order. Ties go to the earlier entry.
    pub const CLASSIFIED: [Topic; 6] = [
        Topic::Politics,
        Topic::Sports,
        Topic::Agriculture,
        Topic::Business,
        Topic::Technology,
        Topic::Entertainment,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Topic::Politics => "politics",
            Topic::Sports => "sports",
            Topic::Agriculture => "agriculture",
            Topic::Business => "business",
            Topic::Technology => "technology",
            Topic::Entertainment => "entertainment",
            Topic::General => "general",
        }
    }

    /// Keywords are compared against lower-cased tokens as written here,
    /// so the upper-case entries never match.
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Topic::Politics => &[
                "government", "minister", "election", "party", "parliament", "political",
                "policy", "vote", "democracy", "BJP", "Congress",
            ],
            Topic::Sports => &[
                "cricket", "football", "game", "match", "player", "sport", "tournament", "team",
                "championship", "athlete", "IPL",
            ],
            Topic::Agriculture => &[
                "farmer", "crop", "agriculture", "harvest", "farming", "irrigation", "monsoon",
                "rural", "cultivation",
            ],
            Topic::Business => &[
                "market", "economy", "stock", "company", "business", "trade", "investment",
                "finance", "rupee", "industry",
            ],
            Topic::Technology => &[
                "tech", "digital", "software", "internet", "cyber", "AI", "startup",
                "innovation", "mobile", "app",
            ],
            Topic::Entertainment => &[
                "movie", "film", "actor", "music", "celebrity", "bollywood", "song", "star",
                "cinema", "entertainment",
            ],
            Topic::General => &[],
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown topic: {0}")]
pub struct UnknownTopic(pub String);

impl FromStr for Topic {
    type Err = UnknownTopic;

    /// Case-insensitive; accepts `general` as well as the classified topics.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Topic::CLASSIFIED
            .into_iter()
            .chain(std::iter::once(Topic::General))
            .find(|topic| topic.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownTopic(s.to_string()))
    }
}

/// Names of the classified topics, independent of any text.
pub fn topic_names() -> Vec<&'static str> {
    Topic::CLASSIFIED.iter().map(|t| t.as_str()).collect()
}

/// Weight of every classified topic for `text`, in declaration order.
/// A token counts once per keyword it contains, so "cricketer" counts for "cricket".
pub fn score_topics(text: &str) -> Vec<(Topic, usize)> {
    let words = tokenize(&text.to_lowercase());

    Topic::CLASSIFIED
        .iter()
        .map(|&topic| {
            let weight = topic
                .keywords()
                .iter()
                .map(|keyword| words.iter().filter(|word| word.contains(keyword)).count())
                .sum();
            (topic, weight)
        })
        .collect()
}

/// Highest-weighted topic, first in declaration order on ties, `General` when nothing matched.
pub fn classify(text: &str) -> Topic {
    let mut best = (Topic::General, 0);
    for (topic, weight) in score_topics(text) {
        if weight > best.1 {
            best = (topic, weight);
        }
    }
    best.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_topic_vocabulary_wins() {
        assert_eq!(classify("The cricket team won the tournament"), Topic::Sports);
        assert_eq!(classify("Monsoon irrigation for every farmer"), Topic::Agriculture);
        assert_eq!(classify("Bollywood film music"), Topic::Entertainment);
    }

    #[test]
    fn no_keyword_means_general() {
        assert_eq!(classify("The weather was pleasant yesterday"), Topic::General);
        assert_eq!(classify(""), Topic::General);
    }

    #[test]
    fn substring_matches_count() {
        let scores = score_topics("Cricketers and footballers");
        assert_eq!(scores[1], (Topic::Sports, 2));
    }

    #[test]
    fn ties_go_to_declaration_order() {
        // one politics hit, one business hit
        assert_eq!(classify("election market"), Topic::Politics);
        assert_eq!(classify("market election"), Topic::Politics);
    }

    #[test]
    fn uppercase_keywords_are_inert() {
        assert_eq!(classify("BJP and Congress leaders"), Topic::General);
    }

    #[test]
    fn scores_are_fresh_per_call() {
        let first = score_topics("stock market");
        let _ = score_topics("cricket cricket cricket");
        assert_eq!(score_topics("stock market"), first);
    }

    #[test]
    fn parses_labels_case_insensitively() {
        assert_eq!("SPORTS".parse::<Topic>(), Ok(Topic::Sports));
        assert_eq!("General".parse::<Topic>(), Ok(Topic::General));
        assert!("weather".parse::<Topic>().is_err());
    }

    #[test]
    fn topic_names_are_the_six_classified_topics() {
        assert_eq!(
            topic_names(),
            vec!["politics", "sports", "agriculture", "business", "technology", "entertainment"]
        );
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Topic::Technology).unwrap(), "\"technology\"");
    }
}
