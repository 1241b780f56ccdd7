use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use crate::cv::version::CvVersion;

#[derive(Debug, Clone, FromRow)]
pub struct CvVersionRow {
    pub id: Uuid,
    pub parent_version_id: Option<Uuid>,
    pub version_type: String,
    pub raw_text: String,
    pub job_description: Option<String>,
    pub analysis: Value,
    // Query column; the score is read back from `analysis`.
    #[allow(dead_code)]
    pub score: i32,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<CvVersionRow> for CvVersion {
    type Error = anyhow::Error;

    fn try_from(row: CvVersionRow) -> Result<Self, Self::Error> {
        Ok(CvVersion {
            id: row.id,
            raw_text: row.raw_text,
            version_type: row.version_type.parse().map_err(anyhow::Error::msg)?,
            analysis: serde_json::from_value(row.analysis)?,
            parent_version_id: row.parent_version_id,
            job_description: row.job_description,
            created_at: row.created_at,
        })
    }
}
