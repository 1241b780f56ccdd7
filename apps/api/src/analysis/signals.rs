//! Stateless regex and keyword classifiers over raw CV text.
//!
//! Every function here is total: any input (empty, binary garbage, stray control
//! characters) yields a well-formed `Signals` record. Rubric thresholds depend on
//! these exact detection rules, so change them together with `rubric.rs`.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::analysis::keywords::{match_job_description, JdKeywordMatch};

// ────────────────────────────────────────────────────────────────────────────
// Vocabularies
// ────────────────────────────────────────────────────────────────────────────

/// Section tokens searched anywhere in the lowercased document (not anchored to headings).
pub const SECTION_VOCABULARY: &[&str] = &["experience", "education", "skills", "summary", "profile"];

/// Strong action verbs. Matched as substrings of the lowercased text.
pub const ACTION_VERBS: &[&str] = &[
    "led",
    "built",
    "developed",
    "delivered",
    "improved",
    "reduced",
    "increased",
    "designed",
    "implemented",
    "automated",
    "deployed",
    "managed",
    "created",
    "established",
    "launched",
    "optimized",
    "architected",
];

/// Technology vocabulary: languages, cloud, containers, IaC, VCS, CI/CD, methodologies.
pub const TECH_KEYWORDS: &[&str] = &[
    "python",
    "java",
    "javascript",
    "typescript",
    "sql",
    "aws",
    "azure",
    "gcp",
    "docker",
    "kubernetes",
    "terraform",
    "git",
    "ci/cd",
    "jenkins",
    "react",
    "node",
    "agile",
    "scrum",
];

const BULLET_MARKERS: &[char] = &['•', '-', '*'];

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)[a-z0-9._%+\-]+@[a-z0-9.\-]+\.[a-z]{2,}").unwrap());

/// UK-style phone: `+44` or `0`, then 9–15 digits/spaces/hyphens/parentheses.
/// The prefix must not follow a digit, otherwise the `0` closing a year would start a match.
static PHONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|[^\d+])(?:\+44|0)[\d\s\-()]{9,15}").unwrap());

static METRIC_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\d+(?:\.\d+)?%|[£$]\s?\d[\d,]*(?:\.\d+)?|\d+\+?\s+(?:users|clients|projects|team|members|months|years|hours|days|people)",
    )
    .unwrap()
});

static PERCENT_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+(?:\.\d+)?%").unwrap());

// ────────────────────────────────────────────────────────────────────────────
// Signals
// ────────────────────────────────────────────────────────────────────────────

/// Fixed-shape feature record computed once per scoring call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Signals {
    pub has_email: bool,
    pub has_phone: bool,
    /// Any `linkedin.com` mention.
    pub has_linkedin: bool,
    /// Stricter `linkedin.com/in/` profile URL.
    pub has_linkedin_profile: bool,
    pub section_hits: BTreeSet<&'static str>,
    pub has_quantified_metric: bool,
    /// Number of `%`-suffixed metrics only.
    pub metric_count: usize,
    pub action_verb_hits: BTreeSet<&'static str>,
    pub tech_keyword_hits: BTreeSet<&'static str>,
    pub word_count: usize,
    pub has_bullet_formatting: bool,
    /// Present only when a job description with at least one usable keyword was supplied.
    pub jd_keyword_overlap_pct: Option<f64>,
    pub jd_matched_keywords: Vec<String>,
    pub jd_missing_keywords: Vec<String>,
}

/// Extracts rubric signals from raw text, optionally against a job description.
pub fn extract(text: &str, job_description: Option<&str>) -> Signals {
    let text = sanitize(text);
    let lower = text.to_lowercase();

    let section_hits = hits(&lower, SECTION_VOCABULARY);
    let action_verb_hits = hits(&lower, ACTION_VERBS);
    let tech_keyword_hits = hits(&lower, TECH_KEYWORDS);

    let has_bullet_formatting = text
        .lines()
        .any(|line| line.trim_start().starts_with(BULLET_MARKERS));

    let jd = job_description
        .map(|jd| match_job_description(jd, &lower))
        .unwrap_or_else(JdKeywordMatch::absent);

    Signals {
        has_email: EMAIL_PATTERN.is_match(&text),
        has_phone: PHONE_PATTERN.is_match(&text),
        has_linkedin: lower.contains("linkedin.com"),
        has_linkedin_profile: lower.contains("linkedin.com/in/"),
        section_hits,
        has_quantified_metric: METRIC_PATTERN.is_match(&text),
        metric_count: PERCENT_PATTERN.find_iter(&text).count(),
        action_verb_hits,
        tech_keyword_hits,
        word_count: text.split_whitespace().count(),
        has_bullet_formatting,
        jd_keyword_overlap_pct: jd.overlap_pct,
        jd_matched_keywords: jd.matched,
        jd_missing_keywords: jd.missing,
    }
}

/// Drops control characters other than whitespace (newlines and tabs survive).
fn sanitize(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control() || c.is_whitespace())
        .collect()
}

fn hits(haystack: &str, vocabulary: &[&'static str]) -> BTreeSet<&'static str> {
    vocabulary
        .iter()
        .copied()
        .filter(|term| haystack.contains(term))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_email_case_insensitive() {
        let s = extract("Contact: Jane.Doe@Example.CO.UK", None);
        assert!(s.has_email);
    }

    #[test]
    fn test_uk_phone_with_country_code() {
        let s = extract("Phone +44 7700 900000", None);
        assert!(s.has_phone);
    }

    #[test]
    fn test_uk_phone_with_leading_zero() {
        let s = extract("Mobile: 07700-900-000", None);
        assert!(s.has_phone);
    }

    #[test]
    fn test_short_number_is_not_a_phone() {
        let s = extract("Room 0123", None);
        assert!(!s.has_phone);
    }

    #[test]
    fn test_year_list_is_not_a_phone() {
        let s = extract("Acme 2010 2015 2020", None);
        assert!(!s.has_phone);

        let s = extract("Engineer | Acme | 2010-2015, 2015-2020", None);
        assert!(!s.has_phone);
    }

    #[test]
    fn test_phone_at_line_start_after_years() {
        let s = extract("Acme 2010 2015
07700 900000", None);
        assert!(s.has_phone);
    }

    #[test]
    fn test_linkedin_loose_and_strict() {
        let loose = extract("linkedin.com/company/acme", None);
        assert!(loose.has_linkedin);
        assert!(!loose.has_linkedin_profile);

        let strict = extract("https://www.LinkedIn.com/in/jane", None);
        assert!(strict.has_linkedin);
        assert!(strict.has_linkedin_profile);
    }

    #[test]
    fn test_sections_found_anywhere_in_text() {
        let s = extract("Years of experience in teaching; strong skills.", None);
        assert!(s.section_hits.contains("experience"));
        assert!(s.section_hits.contains("skills"));
        assert!(!s.section_hits.contains("education"));
    }

    #[test]
    fn test_metric_count_counts_percentages_only() {
        let s = extract("Cut spend by 30% and churn by 4.5%, saving £20,000 for 40 clients", None);
        assert!(s.has_quantified_metric);
        assert_eq!(s.metric_count, 2);
    }

    #[test]
    fn test_unit_metric_without_percent() {
        let s = extract("Mentored 6 people across two offices", None);
        assert!(s.has_quantified_metric);
        assert_eq!(s.metric_count, 0);
    }

    #[test]
    fn test_no_metric_in_plain_prose() {
        let s = extract("Worked on many things for a long time", None);
        assert!(!s.has_quantified_metric);
    }

    #[test]
    fn test_action_verbs_and_tech_hits() {
        let s = extract("Architected a Kubernetes platform and automated Terraform rollouts", None);
        assert!(s.action_verb_hits.contains("architected"));
        assert!(s.action_verb_hits.contains("automated"));
        assert!(s.tech_keyword_hits.contains("kubernetes"));
        assert!(s.tech_keyword_hits.contains("terraform"));
    }

    #[test]
    fn test_word_count_on_raw_text() {
        let s = extract("  One two\tthree\nFour  ", None);
        assert_eq!(s.word_count, 4);
    }

    #[test]
    fn test_bullet_formatting_detected_after_trim() {
        assert!(extract("Intro\n   • item", None).has_bullet_formatting);
        assert!(extract("* item", None).has_bullet_formatting);
        assert!(!extract("plain line\nanother", None).has_bullet_formatting);
    }

    #[test]
    fn test_control_characters_are_ignored() {
        let s = extract("jane\u{0}@example.com\u{7}\u{1b}", None);
        assert!(s.has_email);
    }

    #[test]
    fn test_empty_input_is_well_formed() {
        let s = extract("", None);
        assert_eq!(s.word_count, 0);
        assert!(s.section_hits.is_empty());
        assert!(s.jd_keyword_overlap_pct.is_none());
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let text = "Led a team of 8 people; reduced costs by 30%. jane@example.com";
        assert_eq!(extract(text, Some("team costs")), extract(text, Some("team costs")));
    }

    #[test]
    fn test_jd_overlap_only_when_description_supplied() {
        let s = extract("Python developer", Some("Python developer wanted"));
        assert!(s.jd_keyword_overlap_pct.is_some());
    }
}
