//! Word tokenization shared by every analyzer.

use regex::Regex;
use std::sync::LazyLock;

/// Anything that is not a latin/cyrillic letter, a digit or an underscore separates words.
static WORD_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-zА-Яа-я0-9_]+").expect("valid separator pattern"));

/// English stop words ignored when building term statistics.
pub const STOP_WORDS: &[&str] = &[
    "about", "above", "after", "again", "all", "also", "am", "an", "and", "another", "any",
    "are", "as", "at", "be", "because", "been", "before", "being", "below", "between", "both",
    "but", "by", "came", "can", "cannot", "come", "could", "did", "do", "does", "doing",
    "during", "each", "few", "for", "from", "further", "get", "got", "has", "had", "he", "have",
    "her", "here", "him", "himself", "his", "how", "if", "in", "into", "is", "it", "its",
    "itself", "like", "make", "many", "me", "might", "more", "most", "much", "must", "my",
    "myself", "never", "now", "of", "on", "only", "or", "other", "our", "ours", "ourselves",
    "out", "over", "own", "said", "same", "see", "should", "since", "so", "some", "still",
    "such", "take", "than", "that", "the", "their", "theirs", "them", "themselves", "then",
    "there", "these", "they", "this", "those", "through", "to", "too", "under", "until", "up",
    "very", "was", "way", "we", "well", "were", "what", "where", "when", "which", "while",
    "who", "whom", "with", "would", "why", "you", "your", "yours", "yourself", "a", "b", "c",
    "d", "e", "f", "g", "h", "i", "j", "k", "l", "m", "n", "o", "p", "q", "r", "s", "t", "u",
    "v", "w", "x", "y", "z", "0", "1", "2", "3", "4", "5", "6", "7", "8", "9", "_",
];

/// Split text into words, keeping the original case.
pub fn tokenize(text: &str) -> Vec<String> {
    WORD_SEPARATOR
        .split(text)
        .filter(|word| !word.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}
