//! Extractive summaries ranked by TF-IDF.

use regex::Regex;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::LazyLock;

use super::tokenizer::{is_stop_word, tokenize};

static SENTENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^.!?]+[.!?]+").expect("valid sentence pattern"));

const ELLIPSIS: &str = "...";

#[derive(Debug, Clone)]
pub struct Summarizer {
    /// Upper bound on the summary length, in characters
    pub max_length: usize,
    /// Sentences kept in the summary
    pub sentences: usize,
}

impl Default for Summarizer {
    fn default() -> Self {
        Self {
            max_length: 150,
            sentences: 2,
        }
    }
}

impl From<&common::SummaryConfig> for Summarizer {
    fn from(config: &common::SummaryConfig) -> Self {
        Self {
            max_length: config.max_length,
            sentences: config.sentences,
        }
    }
}

impl Summarizer {
    pub fn summarize(&self, text: &str) -> String {
        let sentences: Vec<&str> = SENTENCE.find_iter(text).map(|m| m.as_str()).collect();
        if sentences.len() <= 1 {
            return truncate_chars(text, self.max_length);
        }

        let model = TfIdf::new(&sentences);
        let scores: Vec<f64> = sentences
            .iter()
            .enumerate()
            .map(|(idx, sentence)| {
                tokenize(sentence)
                    .iter()
                    .map(|term| model.tfidf(&term.to_lowercase(), idx))
                    .sum()
            })
            .collect();

        let mut ranked: Vec<usize> = (0..sentences.len()).collect();
        ranked.sort_by(|&a, &b| {
            scores[b]
                .partial_cmp(&scores[a])
                .unwrap_or(Ordering::Equal)
                .then(a.cmp(&b))
        });
        ranked.truncate(self.sentences);
        ranked.sort_unstable();

        let summary = ranked
            .iter()
            .map(|&idx| sentences[idx].trim())
            .collect::<Vec<_>>()
            .join(" ");

        if summary.chars().count() > self.max_length {
            let mut cut = truncate_chars(&summary, self.max_length.saturating_sub(ELLIPSIS.len()));
            cut.push_str(ELLIPSIS);
            cut
        } else {
            summary
        }
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Term statistics with every sentence treated as its own document.
struct TfIdf {
    documents: Vec<HashMap<String, usize>>,
}

impl TfIdf {
    fn new(sentences: &[&str]) -> Self {
        let documents = sentences
            .iter()
            .map(|sentence| {
                let mut counts = HashMap::new();
                for term in tokenize(&sentence.to_lowercase()) {
                    if !is_stop_word(&term) {
                        *counts.entry(term).or_insert(0) += 1;
                    }
                }
                counts
            })
            .collect();
        Self { documents }
    }

    fn tf(&self, term: &str, doc: usize) -> f64 {
        self.documents[doc].get(term).copied().unwrap_or(0) as f64
    }

    fn idf(&self, term: &str) -> f64 {
        let containing = self
            .documents
            .iter()
            .filter(|doc| doc.contains_key(term))
            .count();
        1.0 + (self.documents.len() as f64 / (1.0 + containing as f64)).ln()
    }

    fn tfidf(&self, term: &str, doc: usize) -> f64 {
        self.tf(term, doc) * self.idf(term)
    }
}
