//! Classifies each line of a plain-text CV into a display role.
//!
//! Display only. Scoring always runs on the raw text, never on this tree.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

const BULLET_MARKERS: &[char] = &['•', '-', '*'];

/// Canonical section header phrases, compared case-insensitively.
const SECTION_HEADERS: &[&str] = &[
    "professional summary",
    "experience",
    "education",
    "skills",
    "technical skills",
    "certifications",
];

static YEAR_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(?:19|20)\d{2}\b").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DocumentNode {
    Heading { text: String },
    BulletList { items: Vec<String> },
    /// "Title | Company | Dates" style lines.
    Entry { text: String },
    Paragraph { text: String },
    Break,
}

impl DocumentNode {
    /// Visible text lines carried by this node, in order.
    #[cfg(test)]
    pub fn text_lines(&self) -> Vec<&str> {
        match self {
            DocumentNode::Heading { text }
            | DocumentNode::Entry { text }
            | DocumentNode::Paragraph { text } => vec![text.as_str()],
            DocumentNode::BulletList { items } => items.iter().map(String::as_str).collect(),
            DocumentNode::Break => vec![],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemanticDocument {
    pub nodes: Vec<DocumentNode>,
}

/// Single pass over lines; the only state is the currently open bullet list.
pub fn render(text: &str) -> SemanticDocument {
    let mut nodes = Vec::new();
    let mut open_list: Option<Vec<String>> = None;

    for raw in text.lines() {
        let line = raw.trim();

        if let Some(item) = strip_bullet(line) {
            open_list.get_or_insert_with(Vec::new).push(item.to_string());
            continue;
        }

        if let Some(items) = open_list.take() {
            nodes.push(DocumentNode::BulletList { items });
        }

        let node = if line.is_empty() {
            DocumentNode::Break
        } else if is_heading(line) {
            DocumentNode::Heading {
                text: line.to_string(),
            }
        } else if line.contains('|') || YEAR_PATTERN.is_match(line) {
            DocumentNode::Entry {
                text: line.to_string(),
            }
        } else {
            DocumentNode::Paragraph {
                text: line.to_string(),
            }
        };
        nodes.push(node);
    }

    if let Some(items) = open_list {
        nodes.push(DocumentNode::BulletList { items });
    }

    SemanticDocument { nodes }
}

fn strip_bullet(line: &str) -> Option<&str> {
    line.strip_prefix(BULLET_MARKERS).map(str::trim)
}

fn is_heading(line: &str) -> bool {
    let all_caps =
        line.chars().any(char::is_alphabetic) && !line.chars().any(char::is_lowercase);
    if all_caps {
        return true;
    }
    let phrase = line.trim_end_matches(':').trim().to_lowercase();
    SECTION_HEADERS.contains(&phrase.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heading(t: &str) -> DocumentNode {
        DocumentNode::Heading { text: t.into() }
    }

    #[test]
    fn test_experience_block_scenario() {
        let doc = render(
            "EXPERIENCE\n• Led team of 8\n• Reduced costs by 30%\n\nSoftware Engineer | Acme | 2020-2023",
        );
        assert_eq!(
            doc.nodes,
            vec![
                heading("EXPERIENCE"),
                DocumentNode::BulletList {
                    items: vec!["Led team of 8".into(), "Reduced costs by 30%".into()]
                },
                DocumentNode::Break,
                DocumentNode::Entry {
                    text: "Software Engineer | Acme | 2020-2023".into()
                },
            ]
        );
    }

    #[test]
    fn test_canonical_headers_case_insensitive() {
        let doc = render("Professional Summary\nTechnical Skills:\ncertifications");
        assert_eq!(
            doc.nodes,
            vec![
                heading("Professional Summary"),
                heading("Technical Skills:"),
                heading("certifications"),
            ]
        );
    }

    #[test]
    fn test_bullet_marker_wins_over_all_caps() {
        let doc = render("SKILLS\n• AWS, GCP, SQL\n- PYTHON");
        assert_eq!(
            doc.nodes,
            vec![
                heading("SKILLS"),
                DocumentNode::BulletList {
                    items: vec!["AWS, GCP, SQL".into(), "PYTHON".into()]
                },
            ]
        );
    }

    #[test]
    fn test_year_line_is_entry_and_prose_is_paragraph() {
        let doc = render("Graduated in 2019 with honours\nI enjoy solving hard problems.");
        assert_eq!(
            doc.nodes,
            vec![
                DocumentNode::Entry {
                    text: "Graduated in 2019 with honours".into()
                },
                DocumentNode::Paragraph {
                    text: "I enjoy solving hard problems.".into()
                },
            ]
        );
    }

    #[test]
    fn test_non_bullet_line_closes_open_list() {
        let doc = render("- one\n* two\nAfter the list");
        assert_eq!(
            doc.nodes,
            vec![
                DocumentNode::BulletList {
                    items: vec!["one".into(), "two".into()]
                },
                DocumentNode::Paragraph {
                    text: "After the list".into()
                },
            ]
        );
    }

    #[test]
    fn test_open_list_closed_at_end_of_input() {
        let doc = render("Skills\n- Rust\n- SQL");
        assert_eq!(doc.nodes.len(), 2);
        assert!(matches!(doc.nodes[1], DocumentNode::BulletList { ref items } if items.len() == 2));
    }

    #[test]
    fn test_every_blank_line_is_a_break() {
        let doc = render("A paragraph\n\n\nAnother one");
        assert_eq!(doc.nodes.len(), 4);
        assert_eq!(doc.nodes[1], DocumentNode::Break);
        assert_eq!(doc.nodes[2], DocumentNode::Break);
    }

    #[test]
    fn test_no_text_is_dropped() {
        let input = "JANE DOE\njane@example.com | 07700 900000\n\nSummary\nCalm, curious engineer.\n\
                     • Built the billing service\n  - Cut costs by 12%\nBSc Physics, 2015\n\n";
        let doc = render(input);

        let rendered: Vec<&str> = doc.nodes.iter().flat_map(|n| n.text_lines()).collect();
        let expected: Vec<&str> = input
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(|l| strip_bullet(l).unwrap_or(l))
            .collect();
        assert_eq!(rendered, expected);
    }

    #[test]
    fn test_empty_input_renders_nothing() {
        assert!(render("").nodes.is_empty());
    }

    #[test]
    fn test_node_serialization_is_tagged() {
        let json = serde_json::to_value(DocumentNode::Entry { text: "x".into() }).unwrap();
        assert_eq!(json["type"], "entry");
        assert_eq!(json["text"], "x");
        let json = serde_json::to_value(DocumentNode::Break).unwrap();
        assert_eq!(json, serde_json::json!({"type": "break"}));
    }
}
