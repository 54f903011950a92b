//! AFINN-style lexicon sentiment.

use anyhow::{anyhow, Context, Result};
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

use super::SentimentProvider;

/// The AFINN-165 word list compiled into the binary. Another list in the same
/// format can be supplied at runtime through `sentiment.lexicon_path`.
const BUNDLED_LEXICON: &str = include_str!("../../data/afinn-en.tsv");

/// A negation flips the polarity of every hit that follows it in the text.
const NEGATIONS: &[&str] = &[
    "not", "no", "never", "neither", "nor", "nobody", "none", "nothing", "nowhere",
];

/// Lexicon analyzer: exact lookup first, then lookup by English stem.
/// The score is the sum of matched polarities divided by the token count.
pub struct AfinnAnalyzer {
    vocabulary: HashMap<String, i32>,
    stemmed: HashMap<String, i32>,
    stemmer: Stemmer,
}

impl AfinnAnalyzer {
    /// Analyzer over the bundled word list.
    pub fn bundled() -> Result<Self> {
        Self::from_afinn(BUNDLED_LEXICON).context("bundled lexicon is malformed")
    }

    /// Analyzer over a lexicon file on disk.
    pub async fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = tokio::fs::read_to_string(path.as_ref())
            .await
            .with_context(|| format!("Failed to read lexicon: {}", path.as_ref().display()))?;
        let analyzer = Self::from_afinn(&data)
            .with_context(|| format!("Failed to parse lexicon: {}", path.as_ref().display()))?;
        info!(path = %path.as_ref().display(), words = analyzer.len(), "sentiment lexicon loaded");
        Ok(analyzer)
    }

    /// Parse `word<TAB>score` lines. Blank lines and `#` comments are skipped.
    pub fn from_afinn(data: &str) -> Result<Self> {
        let stemmer = Stemmer::create(Algorithm::English);
        let mut vocabulary = HashMap::new();
        let mut stemmed = HashMap::new();

        for (number, line) in data.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (word, score) = line
                .rsplit_once('\t')
                .ok_or_else(|| anyhow!("line {}: expected `word<TAB>score`", number + 1))?;
            let score: i32 = score
                .trim()
                .parse()
                .with_context(|| format!("line {}: invalid score {:?}", number + 1, score))?;
            let word = word.trim().to_lowercase();

            stemmed.insert(stemmer.stem(&word).into_owned(), score);
            vocabulary.insert(word, score);
        }

        Ok(Self {
            vocabulary,
            stemmed,
            stemmer,
        })
    }

    pub fn len(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vocabulary.is_empty()
    }

    /// The exact word wins over its stem, so inflections listed in the lexicon
    /// keep their own score and only unlisted forms fall back to the stem.
    fn lookup(&self, word: &str) -> Option<i32> {
        self.vocabulary
            .get(word)
            .or_else(|| self.stemmed.get(self.stemmer.stem(word).as_ref()))
            .copied()
    }
}

impl SentimentProvider for AfinnAnalyzer {
    fn score(&self, tokens: &[String]) -> Result<f64> {
        if tokens.is_empty() {
            return Ok(0.0);
        }

        let mut total = 0i64;
        let mut negator = 1i64;

        for token in tokens {
            let word = token.to_lowercase();
            if NEGATIONS.contains(&word.as_str()) {
                negator = -1;
            } else if let Some(polarity) = self.lookup(&word) {
                total += negator * i64::from(polarity);
            }
        }

        Ok(total as f64 / tokens.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn averages_over_all_tokens() {
        let analyzer = AfinnAnalyzer::from_afinn("good\t3\nbad\t-3\n").unwrap();
        let score = analyzer.score(&words("a good day")).unwrap();
        assert!((score - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn unknown_words_are_neutral() {
        let analyzer = AfinnAnalyzer::from_afinn("good\t3\n").unwrap();
        assert_eq!(analyzer.score(&words("the parliament met")).unwrap(), 0.0);
        assert_eq!(analyzer.score(&[]).unwrap(), 0.0);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let analyzer = AfinnAnalyzer::from_afinn("good\t3\n").unwrap();
        assert_eq!(analyzer.score(&words("GOOD")).unwrap(), 3.0);
    }

    #[test]
    fn falls_back_to_stem() {
        let analyzer = AfinnAnalyzer::from_afinn("celebrate\t3\n").unwrap();
        assert_eq!(analyzer.score(&words("celebrating")).unwrap(), 3.0);
    }

    #[test]
    fn negation_flips_following_hits() {
        let analyzer = AfinnAnalyzer::from_afinn("good\t3\nhappy\t3\n").unwrap();
        let score = analyzer.score(&words("good but not happy")).unwrap();
        assert_eq!(score, 0.0);
    }

    #[test]
    fn rejects_malformed_lines() {
        assert!(AfinnAnalyzer::from_afinn("good 3\n").is_err());
        assert!(AfinnAnalyzer::from_afinn("good\tgreat\n").is_err());
    }

    #[test]
    fn bundled_lexicon_parses() {
        let analyzer = AfinnAnalyzer::bundled().unwrap();
        assert!(analyzer.len() > 3000);
        assert!(analyzer.score(&words("farmers protest")).unwrap() < 0.0);
    }

    #[test]
    fn bundled_lexicon_covers_common_news_words() {
        let analyzer = AfinnAnalyzer::bundled().unwrap();
        let score = analyzer.score(&words("terrible weak outlook")).unwrap();
        assert!((score - (-5.0 / 3.0)).abs() < 1e-9);
    }

    #[test]
    fn exact_entry_beats_stem() {
        // both entries share the stem "celebr"
        let analyzer = AfinnAnalyzer::from_afinn("celebrate\t3\ncelebrated\t1\n").unwrap();
        assert_eq!(analyzer.score(&words("celebrate")).unwrap(), 3.0);
        assert_eq!(analyzer.score(&words("celebrated")).unwrap(), 1.0);
    }
}
