//! Turns an analysis into one rewrite instruction, calls the rewrite capability
//! exactly once, and re-scores the result.
//!
//! Single-shot: there is no fix→rescore loop here. Each call costs at
//! most one external invocation; a caller that wants another pass calls again
//! with the fresh issue list from `FixResult::after`.

pub mod prompts;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::analysis::scoring::{analyze, AnalysisResult, Issue};
use crate::analysis::signals::extract;
use crate::fix::prompts::{KEYWORD_GUIDANCE_TEMPLATE, REWRITE_PROMPT_TEMPLATE};
use crate::llm_client::prompts::FACTUALITY_INSTRUCTION;

// ────────────────────────────────────────────────────────────────────────────
// Rewrite capability seam
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Error, PartialEq)]
pub enum RewriteError {
    /// Missing credential, transport failure, or non-success response.
    #[error("rewrite service unavailable: {0}")]
    Unavailable(String),

    /// The call succeeded but produced no usable text.
    #[error("rewrite service returned an empty response")]
    EmptyResponse,
}

/// An external generative text service. One call in, one document out.
///
/// Credentials and token budget are supplied when the implementation is built;
/// `AppState` carries it as `Arc<dyn RewriteCapability>`.
#[async_trait]
pub trait RewriteCapability: Send + Sync {
    async fn rewrite(&self, instruction: &str) -> Result<String, RewriteError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Orchestrator
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Error, PartialEq)]
pub enum FixError {
    #[error("rewrite capability unavailable: {0}")]
    RewriteCapabilityUnavailable(String),

    #[error("rewrite capability returned no usable text")]
    RewriteEmptyResponse,
}

impl From<RewriteError> for FixError {
    fn from(e: RewriteError) -> Self {
        match e {
            RewriteError::Unavailable(msg) => FixError::RewriteCapabilityUnavailable(msg),
            RewriteError::EmptyResponse => FixError::RewriteEmptyResponse,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixResult {
    pub before: AnalysisResult,
    pub after: AnalysisResult,
    pub fixed_text: String,
    pub score_delta: i32,
    /// `before.issues - after.issues`. Negative when the rewrite introduced failures.
    pub issues_resolved_count: i32,
}

impl FixResult {
    /// The no-op result for an analysis with nothing to fix.
    fn unchanged(raw_text: &str, before: &AnalysisResult) -> Self {
        Self {
            before: before.clone(),
            after: before.clone(),
            fixed_text: raw_text.to_string(),
            score_delta: 0,
            issues_resolved_count: 0,
        }
    }
}

/// Rewrites `raw_text` to address `before.issues`, then re-scores it with the same
/// rubric preset and job description that produced `before`.
///
/// No issues → returns `before == after` without touching `rewriter`.
/// Rewrite failure → error, no partial result.
pub async fn fix_cv(
    raw_text: &str,
    before: &AnalysisResult,
    job_description: Option<&str>,
    rewriter: &dyn RewriteCapability,
) -> Result<FixResult, FixError> {
    if before.is_perfect() {
        info!("No issues to fix (score {}), skipping rewrite", before.score);
        return Ok(FixResult::unchanged(raw_text, before));
    }

    let instruction = build_rewrite_instruction(raw_text, before, job_description);

    info!(
        "Requesting rewrite for {} issues (score {})",
        before.issues.len(),
        before.score
    );
    let rewritten = rewriter.rewrite(&instruction).await?;
    let fixed_text = rewritten.trim();
    if fixed_text.is_empty() {
        return Err(FixError::RewriteEmptyResponse);
    }

    let after = analyze(fixed_text, job_description, before.preset);
    let score_delta = after.score as i32 - before.score as i32;
    let issues_resolved_count = before.issues.len() as i32 - after.issues.len() as i32;

    info!(
        "Rewrite scored {} → {} ({:+}), issues resolved: {}",
        before.score, after.score, score_delta, issues_resolved_count
    );

    Ok(FixResult {
        before: before.clone(),
        after,
        fixed_text: fixed_text.to_string(),
        score_delta,
        issues_resolved_count,
    })
}

/// Builds the single rewrite instruction: original text verbatim, the enumerated
/// issues (category + remediation, not the diagnosis), and the fixed constraints.
pub fn build_rewrite_instruction(
    raw_text: &str,
    before: &AnalysisResult,
    job_description: Option<&str>,
) -> String {
    let targets = before.preset.preset().targets;

    let keyword_guidance = job_description
        .map(|jd| extract(raw_text, Some(jd)).jd_missing_keywords)
        .filter(|missing| !missing.is_empty())
        .map(|missing| KEYWORD_GUIDANCE_TEMPLATE.replace("{keywords}", &missing.join(", ")))
        .unwrap_or_default();

    REWRITE_PROMPT_TEMPLATE
        .replace("{factuality_instruction}", FACTUALITY_INSTRUCTION)
        .replace("{issues}", &format_issues(&before.issues))
        .replace("{min_words}", &targets.min_words.to_string())
        .replace("{max_words}", &targets.max_words.to_string())
        .replace("{keyword_guidance}", &keyword_guidance)
        .replace("{cv_text}", raw_text)
}

fn format_issues(issues: &[Issue]) -> String {
    issues
        .iter()
        .enumerate()
        .map(|(i, issue)| format!("{}. [{}] {}", i + 1, issue.category, issue.fix_description))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::rubric::PresetName;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Scripted rewriter that records every call.
    struct ScriptedRewriter {
        response: Result<String, RewriteError>,
        calls: AtomicUsize,
        last_instruction: Mutex<Option<String>>,
    }

    impl ScriptedRewriter {
        fn returning(response: Result<String, RewriteError>) -> Self {
            Self {
                response,
                calls: AtomicUsize::new(0),
                last_instruction: Mutex::new(None),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RewriteCapability for ScriptedRewriter {
        async fn rewrite(&self, instruction: &str) -> Result<String, RewriteError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_instruction.lock().unwrap() = Some(instruction.to_string());
            self.response.clone()
        }
    }

    const WEAK_CV: &str = "Jane Doe\njane@example.com\nI worked at Acme on the website.";

    fn strong_cv() -> String {
        let body = "quiet harbour maple window copper meadow ribbon lantern ".repeat(40);
        format!(
            "JANE DOE\njane@example.com | +44 7700 900000 | linkedin.com/in/jane\n\
             PROFESSIONAL SUMMARY\nProfile of a backend engineer.\n\
             EXPERIENCE\n• Led a team of 6 people\n• Built and deployed Python services on AWS with Docker\n\
             • Reduced costs by 30% and improved uptime; developed Kubernetes tooling with Terraform\n\
             EDUCATION\nBSc, 2015\nSKILLS\n{body}"
        )
    }

    #[tokio::test]
    async fn test_perfect_analysis_makes_no_calls() {
        let text = strong_cv();
        let before = analyze(&text, None, PresetName::Analysis);
        assert!(before.is_perfect(), "fixture should be perfect: {:?}", before.issues);

        let rewriter = ScriptedRewriter::returning(Ok("unused".into()));
        let result = fix_cv(&text, &before, None, &rewriter).await.unwrap();

        assert_eq!(rewriter.calls(), 0);
        assert_eq!(result.before, result.after);
        assert_eq!(result.fixed_text, text);
        assert_eq!(result.score_delta, 0);
        assert_eq!(result.issues_resolved_count, 0);
    }

    #[tokio::test]
    async fn test_successful_fix_rescores_output() {
        let before = analyze(WEAK_CV, None, PresetName::Analysis);
        let rewriter = ScriptedRewriter::returning(Ok(format!("\n{}\n", strong_cv())));

        let result = fix_cv(WEAK_CV, &before, None, &rewriter).await.unwrap();

        assert_eq!(rewriter.calls(), 1);
        assert_eq!(result.fixed_text, strong_cv().trim());
        assert_eq!(result.after.score, 100);
        assert_eq!(result.score_delta, 100 - before.score as i32);
        assert_eq!(result.issues_resolved_count, before.issues.len() as i32);
        assert_eq!(result.after.preset, PresetName::Analysis);
    }

    #[tokio::test]
    async fn test_regression_is_surfaced_as_negative_count() {
        let text = strong_cv();
        let quick_before = analyze(&text, Some("harbour zeppelin walrus"), PresetName::Quick);
        assert!(!quick_before.is_perfect());

        let rewriter = ScriptedRewriter::returning(Ok("just one line".into()));
        let result = fix_cv(&text, &quick_before, Some("harbour zeppelin walrus"), &rewriter)
            .await
            .unwrap();

        assert!(result.issues_resolved_count < 0);
        assert!(result.score_delta < 0);
        assert_eq!(result.after.preset, PresetName::Quick);
    }

    #[tokio::test]
    async fn test_unavailable_capability_is_fatal() {
        let before = analyze(WEAK_CV, None, PresetName::Analysis);
        let rewriter =
            ScriptedRewriter::returning(Err(RewriteError::Unavailable("status 401".into())));

        let err = fix_cv(WEAK_CV, &before, None, &rewriter).await.unwrap_err();

        assert_eq!(err, FixError::RewriteCapabilityUnavailable("status 401".into()));
        assert_eq!(rewriter.calls(), 1);
    }

    #[tokio::test]
    async fn test_blank_response_is_empty_error() {
        let before = analyze(WEAK_CV, None, PresetName::Analysis);
        let rewriter = ScriptedRewriter::returning(Ok("   \n\t ".into()));

        let err = fix_cv(WEAK_CV, &before, None, &rewriter).await.unwrap_err();
        assert_eq!(err, FixError::RewriteEmptyResponse);
    }

    #[tokio::test]
    async fn test_capability_empty_error_maps_to_empty_response() {
        let before = analyze(WEAK_CV, None, PresetName::Analysis);
        let rewriter = ScriptedRewriter::returning(Err(RewriteError::EmptyResponse));

        let err = fix_cv(WEAK_CV, &before, None, &rewriter).await.unwrap_err();
        assert_eq!(err, FixError::RewriteEmptyResponse);
    }

    #[tokio::test]
    async fn test_instruction_sent_to_capability() {
        let before = analyze(WEAK_CV, None, PresetName::Analysis);
        let rewriter = ScriptedRewriter::returning(Ok(strong_cv()));
        fix_cv(WEAK_CV, &before, None, &rewriter).await.unwrap();

        let sent = rewriter.last_instruction.lock().unwrap().clone().unwrap();
        assert_eq!(sent, build_rewrite_instruction(WEAK_CV, &before, None));
    }

    #[test]
    fn test_instruction_embeds_text_issues_and_constraints() {
        let before = analyze(WEAK_CV, None, PresetName::Analysis);
        let instruction = build_rewrite_instruction(WEAK_CV, &before, None);

        assert!(instruction.contains(WEAK_CV));
        assert!(instruction.contains("1. [Contact Info] Add a professional email address"));
        for issue in &before.issues {
            assert!(instruction.contains(&issue.fix_description));
            // Diagnoses stay out of the instruction; only remediation goes in.
            assert!(!instruction.contains(&issue.message));
        }
        assert!(instruction.contains("Do NOT invent skills"));
        assert!(instruction.contains("between 300 and 900 words"));
        assert!(!instruction.contains("{keyword_guidance}"));
        assert!(!instruction.contains("target role uses these terms"));
    }

    #[test]
    fn test_instruction_lists_missing_jd_keywords() {
        let before = analyze(WEAK_CV, Some("website kubernetes"), PresetName::Quick);
        let instruction = build_rewrite_instruction(WEAK_CV, &before, Some("website kubernetes"));
        assert!(instruction.contains("target role uses these terms: kubernetes."));
        assert!(instruction.contains("between 250 and 1000 words"));
    }

    #[test]
    fn test_fix_result_serializes_deltas() {
        let before = analyze(WEAK_CV, None, PresetName::Analysis);
        let result = FixResult::unchanged(WEAK_CV, &before);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["score_delta"], 0);
        assert_eq!(json["issues_resolved_count"], 0);
        assert_eq!(json["fixed_text"], WEAK_CV);
    }
}
