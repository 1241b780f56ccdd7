//! Job-description keyword overlap.
//!
//! Tokenizes a JD into lowercase words of at least four characters, deduplicates
//! them in first-seen order, drops English stop words, and measures how many of
//! the remaining words appear as substrings of the candidate text.

use std::collections::HashSet;

/// Minimum token length (in chars) for a JD word to count as a keyword.
const MIN_KEYWORD_LEN: usize = 4;

/// Cap on matched / missing keywords carried into results.
pub const MAX_REPORTED_KEYWORDS: usize = 10;

const STOP_WORDS: &[&str] = &[
    "about", "above", "after", "again", "also", "always", "among", "and", "another", "because",
    "been", "before", "being", "below", "between", "both", "can", "cannot", "could", "does",
    "doing", "down", "during", "each", "either", "else", "ensure", "every", "from", "further",
    "have", "having", "here", "into", "itself", "just", "like", "more", "most", "much", "must",
    "near", "need", "needs", "only", "other", "others", "ours", "over", "own", "same", "should",
    "some", "such", "than", "that", "their", "theirs", "them", "then", "there", "these", "they",
    "this", "those", "through", "under", "until", "upon", "very", "want", "were", "what", "when",
    "where", "which", "while", "whom", "with", "within", "without", "would", "your", "yours",
    "will", "shall", "including", "role", "join", "looking", "able",
];

/// Result of matching a job description against a CV.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JdKeywordMatch {
    /// Fraction (0.0 – 1.0) of unique JD keywords found in the CV.
    /// `None` when there was no JD or it produced no usable keywords.
    pub overlap_pct: Option<f64>,
    pub matched: Vec<String>,
    pub missing: Vec<String>,
}

impl JdKeywordMatch {
    /// The "no job description" result: bonus unavailable.
    pub fn absent() -> Self {
        Self::default()
    }
}

/// Matches `job_description` against an already-lowercased CV.
pub fn match_job_description(job_description: &str, cv_lower: &str) -> JdKeywordMatch {
    let keywords = unique_keywords(job_description);
    if keywords.is_empty() {
        return JdKeywordMatch::absent();
    }

    let (matched, missing): (Vec<String>, Vec<String>) =
        keywords.iter().cloned().partition(|kw| cv_lower.contains(kw.as_str()));

    let overlap_pct = matched.len() as f64 / keywords.len() as f64;

    JdKeywordMatch {
        overlap_pct: Some(overlap_pct),
        matched: matched.into_iter().take(MAX_REPORTED_KEYWORDS).collect(),
        missing: missing.into_iter().take(MAX_REPORTED_KEYWORDS).collect(),
    }
}

/// Unique, stop-word-free JD keywords in order of first appearance.
pub fn unique_keywords(job_description: &str) -> Vec<String> {
    let stop: HashSet<&str> = STOP_WORDS.iter().copied().collect();
    let mut seen = HashSet::new();

    job_description
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.chars().count() >= MIN_KEYWORD_LEN)
        .filter(|w| !stop.contains(w))
        .filter(|w| seen.insert(w.to_string()))
        .map(str::to_string)
        .collect()
}
