//! Applies a rubric preset to extracted signals.
//!
//! Deterministic and total. Issues come out in rubric order (never re-sorted by
//! severity), one per failed check, with the check's violated sub-conditions
//! folded into a single message.

use serde::{Deserialize, Serialize};

use crate::analysis::rubric::{
    Evaluation, Grade, KeywordBonus, PresetName, RubricCheck, RubricPreset, ScoringMode, Severity,
};
use crate::analysis::signals::{extract, Signals};

/// A single failed rubric check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub category: String,
    pub severity: Severity,
    pub message: String,
    pub fix_description: String,
    /// Points this issue cost. Always > 0.
    pub impact: u32,
}

/// Full scoring output for one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub score: u32, // 0 – 100
    pub grade: Grade,
    pub issues: Vec<Issue>,
    /// Σ issue impacts. May exceed `100 - score` when the score was clamped.
    pub total_impact: u32,
    pub preset: PresetName,
    /// Up to 10 job-description keywords found in the CV.
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub keyword_overlap_pct: Option<f64>,
}

impl AnalysisResult {
    pub fn is_perfect(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Convenience: extract + score in one call.
pub fn analyze(text: &str, job_description: Option<&str>, preset: PresetName) -> AnalysisResult {
    score(&extract(text, job_description), preset.preset())
}

/// Scores `signals` under `preset`.
pub fn score(signals: &Signals, preset: &RubricPreset) -> AnalysisResult {
    let mut issues = Vec::new();
    let mut earned_total: u32 = 0;
    let mut deducted_total: u32 = 0;

    for check in preset.checks {
        let evaluation = check.id.evaluate(signals, &preset.targets);
        let earned = earned_points(check.weight, &evaluation);
        earned_total += earned;

        if !evaluation.passed() {
            let impact = check.weight - earned;
            deducted_total += impact;
            issues.push(issue_for(check, &evaluation, impact));
        }
    }

    let (bonus_points, bonus_issue) = keyword_bonus(signals, &preset.bonus);
    issues.extend(bonus_issue);

    let raw = match preset.mode {
        ScoringMode::Additive => earned_total as i64 + bonus_points as i64,
        ScoringMode::Subtractive => 100 - deducted_total as i64 + bonus_points as i64,
    };
    let score = raw.clamp(0, 100) as u32;
    let total_impact = issues.iter().map(|i| i.impact).sum();

    AnalysisResult {
        score,
        grade: preset.thresholds.grade(score),
        issues,
        total_impact,
        preset: preset.name,
        keywords: signals.jd_matched_keywords.clone(),
        keyword_overlap_pct: signals.jd_keyword_overlap_pct,
    }
}

/// Points earned by a check. A failing check always forfeits at least one point.
fn earned_points(weight: u32, evaluation: &Evaluation) -> u32 {
    if evaluation.passed() {
        return weight;
    }
    let earned = (weight as f64 * evaluation.earned_fraction).floor() as u32;
    earned.min(weight.saturating_sub(1))
}

fn issue_for(check: &RubricCheck, evaluation: &Evaluation, impact: u32) -> Issue {
    Issue {
        category: check.category.to_string(),
        severity: check.severity,
        message: capitalize(&evaluation.problems.join("; ")),
        fix_description: check.fix_description.to_string(),
        impact,
    }
}

/// JD keyword bonus: points earned plus an info issue when the bonus was available
/// but not fully earned. Absent JD → no points, no issue.
fn keyword_bonus(signals: &Signals, bonus: &KeywordBonus) -> (u32, Option<Issue>) {
    let Some(overlap) = signals.jd_keyword_overlap_pct else {
        return (0, None);
    };

    if overlap >= bonus.full_credit_overlap {
        return (bonus.weight, None);
    }

    let fraction = overlap / bonus.full_credit_overlap;
    let earned = ((bonus.weight as f64 * fraction).floor() as u32).min(bonus.weight - 1);
    let mut message = format!(
        "{:.0}% of job description keywords found (full credit at {:.0}%)",
        overlap * 100.0,
        bonus.full_credit_overlap * 100.0
    );
    if !signals.jd_missing_keywords.is_empty() {
        message.push_str(&format!(
            "; missing: {}",
            signals.jd_missing_keywords.join(", ")
        ));
    }

    let issue = Issue {
        category: bonus.category.to_string(),
        severity: Severity::Info,
        message,
        fix_description: bonus.fix_description.to_string(),
        impact: bonus.weight - earned,
    };
    (earned, Some(issue))
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}
