//! Gazetteer and pattern based entity extraction.
//!
//! The person and organization patterns are deliberately loose: any run of
//! two or three capitalized words counts as a name, sentence-initial words
//! included, and the corporate suffix needs no trailing word boundary.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::LazyLock;

/// Place names reported under their canonical spelling.
pub const STATES: [&str; 20] = [
    "Delhi", "Mumbai", "Karnataka", "Tamil Nadu", "Kerala", "Gujarat",
    "Maharashtra", "Uttar Pradesh", "Bengal", "Punjab", "Rajasthan",
    "Madhya Pradesh", "Telangana", "Andhra Pradesh", "Haryana",
    "Jharkhand", "Assam", "Odisha", "Chhattisgarh", "Goa",
];

pub const ORGANIZATION_SUFFIXES: [&str; 11] = [
    "Ltd", "Limited", "Corp", "Corporation", "Inc", "Incorporated", "LLC", "LLP", "Pvt",
    "Private", "Company",
];

static STATE_PATTERNS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    STATES
        .iter()
        .map(|&state| {
            // ASCII word boundaries: an accented letter next to the name still separates it
            let pattern = format!(r"(?i)(?-u:\b){}(?-u:\b)", regex::escape(state));
            (state, Regex::new(&pattern).expect("valid state pattern"))
        })
        .collect()
});

static PERSON_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:[A-Z][a-z]+ ){1,2}(?:[A-Z][a-z]+)").expect("valid person pattern")
});

static ORGANIZATION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(r"(?:[A-Z][a-z]* )*(?:{})", ORGANIZATION_SUFFIXES.join("|"));
    Regex::new(&pattern).expect("valid organization pattern")
});

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entities {
    pub states: Vec<String>,
    pub people: Vec<String>,
    pub organizations: Vec<String>,
}

pub fn extract_entities(text: &str) -> Entities {
    let states = STATE_PATTERNS
        .iter()
        .filter(|(_, pattern)| pattern.is_match(text))
        .map(|(state, _)| state.to_string())
        .collect();

    Entities {
        states,
        people: unique_matches(&PERSON_PATTERN, text),
        organizations: unique_matches(&ORGANIZATION_PATTERN, text),
    }
}

/// Non-overlapping matches, deduplicated, first-seen order.
fn unique_matches(pattern: &Regex, text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    pattern
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|found| seen.insert(*found))
        .map(str::to_string)
        .collect()
}
