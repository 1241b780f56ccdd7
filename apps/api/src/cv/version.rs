//! Stored CV versions and their lineage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::scoring::AnalysisResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionType {
    /// The document as the user supplied it.
    Base,
    /// Rewritten to resolve rubric issues.
    Fixed,
    /// Rewritten against a specific job description.
    Tailored,
}

impl VersionType {
    pub fn as_str(self) -> &'static str {
        match self {
            VersionType::Base => "base",
            VersionType::Fixed => "fixed",
            VersionType::Tailored => "tailored",
        }
    }
}

impl std::str::FromStr for VersionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "base" => Ok(VersionType::Base),
            "fixed" => Ok(VersionType::Fixed),
            "tailored" => Ok(VersionType::Tailored),
            other => Err(format!("unknown version type '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CvVersion {
    pub id: Uuid,
    pub raw_text: String,
    pub version_type: VersionType,
    pub analysis: AnalysisResult,
    /// Lineage: a fixed/tailored version points at the version it was derived from.
    pub parent_version_id: Option<Uuid>,
    /// The job description the analysis was scored against, if any.
    pub job_description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl CvVersion {
    pub fn base(
        raw_text: String,
        analysis: AnalysisResult,
        job_description: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            raw_text,
            version_type: VersionType::Base,
            analysis,
            parent_version_id: None,
            job_description,
            created_at: Utc::now(),
        }
    }

    /// A rewrite of `parent`. Tailored when a job description drove the rewrite.
    pub fn derived(
        parent: &CvVersion,
        raw_text: String,
        analysis: AnalysisResult,
        job_description: Option<String>,
    ) -> Self {
        let version_type = if job_description.is_some() {
            VersionType::Tailored
        } else {
            VersionType::Fixed
        };
        Self {
            id: Uuid::new_v4(),
            raw_text,
            version_type,
            analysis,
            parent_version_id: Some(parent.id),
            job_description,
            created_at: Utc::now(),
        }
    }
}
