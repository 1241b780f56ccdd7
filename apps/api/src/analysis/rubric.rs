//! The fixed check tables and the named presets that select them.
//!
//! Checks are data: each `RubricCheck` names a `CheckId` whose predicate lives in
//! `CheckId::evaluate`, plus the category, severity, weight and remediation text
//! that a failure turns into an `Issue`. One scoring routine (`scoring::score`)
//! consumes any preset.

use serde::{Deserialize, Serialize};

use crate::analysis::signals::{Signals, SECTION_VOCABULARY};

// ────────────────────────────────────────────────────────────────────────────
// Severity / grade
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    Excellent,
    Good,
    Fair,
    Poor,
}

/// Lower bounds (inclusive) for each grade band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradeThresholds {
    pub excellent: u32,
    pub good: u32,
    pub fair: u32,
}

impl GradeThresholds {
    pub fn grade(&self, score: u32) -> Grade {
        match score {
            s if s >= self.excellent => Grade::Excellent,
            s if s >= self.good => Grade::Good,
            s if s >= self.fair => Grade::Fair,
            _ => Grade::Poor,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Checks
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckId {
    Contact,
    LinkedIn,
    Structure,
    Metrics,
    ActionVerbs,
    TechKeywords,
    Length,
    Formatting,
}

/// Per-preset targets that check predicates compare against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Targets {
    pub action_verbs: usize,
    pub tech_keywords: usize,
    pub min_words: usize,
    pub max_words: usize,
    /// Require a `linkedin.com/in/` profile URL rather than any LinkedIn mention.
    pub strict_linkedin: bool,
}

/// Outcome of one check: the fraction of its weight earned and every violated
/// sub-condition. An empty `problems` list means the check passed.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub earned_fraction: f64,
    pub problems: Vec<String>,
}

impl Evaluation {
    fn pass() -> Self {
        Self {
            earned_fraction: 1.0,
            problems: vec![],
        }
    }

    fn fail(problems: Vec<String>) -> Self {
        Self::partial(0.0, problems)
    }

    fn partial(earned_fraction: f64, problems: Vec<String>) -> Self {
        if problems.is_empty() {
            return Self::pass();
        }
        Self {
            earned_fraction: earned_fraction.clamp(0.0, 1.0),
            problems,
        }
    }

    pub fn passed(&self) -> bool {
        self.problems.is_empty()
    }
}

impl CheckId {
    pub fn evaluate(self, signals: &Signals, targets: &Targets) -> Evaluation {
        match self {
            CheckId::Contact => {
                let mut problems = vec![];
                if !signals.has_email {
                    problems.push("no email address found".to_string());
                }
                if !signals.has_phone {
                    problems.push("no phone number found".to_string());
                }
                let earned = match problems.len() {
                    0 => 1.0,
                    1 => 0.5,
                    _ => 0.0,
                };
                Evaluation::partial(earned, problems)
            }
            CheckId::LinkedIn => {
                let present = if targets.strict_linkedin {
                    signals.has_linkedin_profile
                } else {
                    signals.has_linkedin
                };
                if present {
                    Evaluation::pass()
                } else if targets.strict_linkedin && signals.has_linkedin {
                    Evaluation::fail(vec![
                        "LinkedIn is mentioned but no linkedin.com/in/ profile URL is given"
                            .to_string(),
                    ])
                } else {
                    Evaluation::fail(vec!["no LinkedIn profile found".to_string()])
                }
            }
            CheckId::Structure => {
                let missing: Vec<&str> = SECTION_VOCABULARY
                    .iter()
                    .copied()
                    .filter(|s| !signals.section_hits.contains(s))
                    .collect();
                if missing.is_empty() {
                    return Evaluation::pass();
                }
                let found = SECTION_VOCABULARY.len() - missing.len();
                Evaluation::partial(
                    found as f64 / SECTION_VOCABULARY.len() as f64,
                    vec![format!(
                        "{found} of {} standard sections present; missing: {}",
                        SECTION_VOCABULARY.len(),
                        missing.join(", ")
                    )],
                )
            }
            CheckId::Metrics => {
                if signals.has_quantified_metric {
                    Evaluation::pass()
                } else {
                    Evaluation::fail(vec![
                        "no quantified achievements (percentages, money, or counts)".to_string(),
                    ])
                }
            }
            CheckId::ActionVerbs => count_against_target(
                signals.action_verb_hits.len(),
                targets.action_verbs,
                "strong action verbs",
            ),
            CheckId::TechKeywords => count_against_target(
                signals.tech_keyword_hits.len(),
                targets.tech_keywords,
                "recognised technical keywords",
            ),
            CheckId::Length => {
                let words = signals.word_count;
                if words < targets.min_words {
                    Evaluation::fail(vec![format!(
                        "{words} words is below the {} word minimum",
                        targets.min_words
                    )])
                } else if words > targets.max_words {
                    Evaluation::fail(vec![format!(
                        "{words} words exceeds the {} word maximum",
                        targets.max_words
                    )])
                } else {
                    Evaluation::pass()
                }
            }
            CheckId::Formatting => {
                if signals.has_bullet_formatting {
                    Evaluation::pass()
                } else {
                    Evaluation::fail(vec!["no bullet-point formatting detected".to_string()])
                }
            }
        }
    }
}

fn count_against_target(count: usize, target: usize, what: &str) -> Evaluation {
    if count >= target {
        return Evaluation::pass();
    }
    Evaluation::partial(
        count as f64 / target.max(1) as f64,
        vec![format!("only {count} {what} (target {target})")],
    )
}

/// One row of a rubric table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RubricCheck {
    pub id: CheckId,
    pub category: &'static str,
    pub severity: Severity,
    pub weight: u32,
    pub fix_description: &'static str,
}

/// Optional job-description keyword bonus. Only ever adds points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeywordBonus {
    pub category: &'static str,
    pub weight: u32,
    /// Overlap fraction at which the full bonus is earned.
    pub full_credit_overlap: f64,
    pub fix_description: &'static str,
}

// ────────────────────────────────────────────────────────────────────────────
// Presets
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoringMode {
    /// Start at 0 and add each check's earned points.
    Additive,
    /// Start at 100 and deduct each failed check's impact.
    Subtractive,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresetName {
    /// Heavier, additive rubric used for the full analysis view.
    #[default]
    Analysis,
    /// Lighter, subtractive rubric used for quick checks and fix validation.
    Quick,
}

impl PresetName {
    pub fn preset(self) -> &'static RubricPreset {
        match self {
            PresetName::Analysis => &ANALYSIS_PRESET,
            PresetName::Quick => &QUICK_PRESET,
        }
    }
}

impl std::str::FromStr for PresetName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "analysis" => Ok(PresetName::Analysis),
            "quick" => Ok(PresetName::Quick),
            other => Err(format!("unknown rubric preset '{other}'")),
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct RubricPreset {
    pub name: PresetName,
    pub mode: ScoringMode,
    pub thresholds: GradeThresholds,
    pub targets: Targets,
    /// Evaluated in this order; issues keep this order.
    pub checks: &'static [RubricCheck],
    pub bonus: KeywordBonus,
}

impl RubricPreset {
    #[cfg(test)]
    pub fn required_weight(&self) -> u32 {
        self.checks.iter().map(|c| c.weight).sum()
    }
}

const FIX_CONTACT: &str =
    "Add a professional email address and a phone number at the top of the CV";
const FIX_LINKEDIN: &str = "Add your LinkedIn profile URL (linkedin.com/in/...) to the contact line";
const FIX_STRUCTURE: &str =
    "Add clearly labelled Summary/Profile, Experience, Education and Skills sections";
const FIX_METRICS: &str =
    "Quantify achievements with percentages, money amounts, or counts (users, clients, team size)";
const FIX_ACTION_VERBS: &str =
    "Start each bullet with a strong action verb such as Led, Built, Delivered or Reduced";
const FIX_TECH: &str = "List the concrete technologies, platforms and methodologies you have used";
const FIX_LENGTH: &str = "Adjust the CV length to fall within the recommended word range";
const FIX_FORMATTING: &str = "Present responsibilities and achievements as bullet points";
const FIX_JD: &str =
    "Mirror the job description's key terms where they truthfully describe your experience";

const fn check(
    id: CheckId,
    category: &'static str,
    severity: Severity,
    weight: u32,
    fix_description: &'static str,
) -> RubricCheck {
    RubricCheck {
        id,
        category,
        severity,
        weight,
        fix_description,
    }
}

static ANALYSIS_CHECKS: [RubricCheck; 8] = [
    check(CheckId::Contact, "Contact Info", Severity::Critical, 20, FIX_CONTACT),
    check(CheckId::LinkedIn, "LinkedIn", Severity::Info, 5, FIX_LINKEDIN),
    check(CheckId::Structure, "Structure", Severity::Warning, 20, FIX_STRUCTURE),
    check(CheckId::Metrics, "Quantified Achievements", Severity::Warning, 20, FIX_METRICS),
    check(CheckId::ActionVerbs, "Action Verbs", Severity::Warning, 15, FIX_ACTION_VERBS),
    check(CheckId::TechKeywords, "Technical Keywords", Severity::Info, 5, FIX_TECH),
    check(CheckId::Length, "Length", Severity::Warning, 10, FIX_LENGTH),
    check(CheckId::Formatting, "Formatting", Severity::Info, 5, FIX_FORMATTING),
];

static QUICK_CHECKS: [RubricCheck; 8] = [
    check(CheckId::Contact, "Contact Info", Severity::Critical, 25, FIX_CONTACT),
    check(CheckId::LinkedIn, "LinkedIn", Severity::Info, 5, FIX_LINKEDIN),
    check(CheckId::Structure, "Structure", Severity::Warning, 15, FIX_STRUCTURE),
    check(CheckId::Metrics, "Quantified Achievements", Severity::Warning, 15, FIX_METRICS),
    check(CheckId::ActionVerbs, "Action Verbs", Severity::Warning, 10, FIX_ACTION_VERBS),
    check(CheckId::TechKeywords, "Technical Keywords", Severity::Info, 10, FIX_TECH),
    check(CheckId::Length, "Length", Severity::Warning, 10, FIX_LENGTH),
    check(CheckId::Formatting, "Formatting", Severity::Info, 10, FIX_FORMATTING),
];

const JD_BONUS: KeywordBonus = KeywordBonus {
    category: "Job Keyword Match",
    weight: 10,
    full_credit_overlap: 0.6,
    fix_description: FIX_JD,
};

pub static ANALYSIS_PRESET: RubricPreset = RubricPreset {
    name: PresetName::Analysis,
    mode: ScoringMode::Additive,
    thresholds: GradeThresholds {
        excellent: 85,
        good: 70,
        fair: 50,
    },
    targets: Targets {
        action_verbs: 5,
        tech_keywords: 5,
        min_words: 300,
        max_words: 900,
        strict_linkedin: false,
    },
    checks: &ANALYSIS_CHECKS,
    bonus: JD_BONUS,
};

pub static QUICK_PRESET: RubricPreset = RubricPreset {
    name: PresetName::Quick,
    mode: ScoringMode::Subtractive,
    thresholds: GradeThresholds {
        excellent: 80,
        good: 65,
        fair: 45,
    },
    targets: Targets {
        action_verbs: 5,
        tech_keywords: 5,
        min_words: 250,
        max_words: 1000,
        strict_linkedin: true,
    },
    checks: &QUICK_CHECKS,
    bonus: JD_BONUS,
};
