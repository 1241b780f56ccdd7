//! Append-only persistence for CV versions.
//!
//! CRITICAL: versions are INSERT-only. A fix produces a new row pointing at its
//! parent; nothing ever UPDATEs an existing version, so a failed fix cannot
//! disturb the version it started from.

use std::collections::HashSet;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::cv::version::CvVersion;
use crate::errors::AppError;
use crate::models::cv::CvVersionRow;

/// Lineage walks stop after this many hops.
pub const MAX_LINEAGE_DEPTH: usize = 64;

#[async_trait]
pub trait CvVersionStore: Send + Sync {
    async fn insert(&self, version: &CvVersion) -> Result<(), AppError>;

    async fn get(&self, id: Uuid) -> Result<Option<CvVersion>, AppError>;

    /// `id` and its ancestors, newest first, ending at the base version.
    /// Empty when `id` does not exist.
    async fn lineage(&self, id: Uuid) -> Result<Vec<CvVersion>, AppError> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut next = Some(id);

        while let Some(current) = next {
            if !seen.insert(current) || chain.len() >= MAX_LINEAGE_DEPTH {
                break;
            }
            let Some(version) = self.get(current).await? else {
                break;
            };
            next = version.parent_version_id;
            chain.push(version);
        }

        Ok(chain)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Postgres
// ────────────────────────────────────────────────────────────────────────────

pub struct PgCvVersionStore {
    pool: PgPool,
}

impl PgCvVersionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CvVersionStore for PgCvVersionStore {
    async fn insert(&self, version: &CvVersion) -> Result<(), AppError> {
        let analysis = serde_json::to_value(&version.analysis)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize analysis: {e}")))?;

        sqlx::query(
            r#"
            INSERT INTO cv_versions
                (id, parent_version_id, version_type, raw_text, job_description,
                 analysis, score, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(version.id)
        .bind(version.parent_version_id)
        .bind(version.version_type.as_str())
        .bind(&version.raw_text)
        .bind(&version.job_description)
        .bind(&analysis)
        .bind(version.analysis.score as i32)
        .bind(version.created_at)
        .execute(&self.pool)
        .await?;

        info!(
            "Stored {} CV version {} (score {})",
            version.version_type.as_str(),
            version.id,
            version.analysis.score
        );
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<CvVersion>, AppError> {
        let row = sqlx::query_as::<_, CvVersionRow>("SELECT * FROM cv_versions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(CvVersion::try_from)
            .transpose()
            .map_err(AppError::Internal)
    }

    async fn lineage(&self, id: Uuid) -> Result<Vec<CvVersion>, AppError> {
        let rows = sqlx::query_as::<_, CvVersionRow>(
            r#"
            WITH RECURSIVE chain AS (
                SELECT v.*, 0 AS depth FROM cv_versions v WHERE v.id = $1
                UNION ALL
                SELECT p.*, c.depth + 1
                FROM cv_versions p
                JOIN chain c ON p.id = c.parent_version_id
                WHERE c.depth < $2
            )
            SELECT id, parent_version_id, version_type, raw_text, job_description,
                   analysis, score, created_at
            FROM chain
            ORDER BY depth ASC
            "#,
        )
        .bind(id)
        .bind(MAX_LINEAGE_DEPTH as i32 - 1)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(CvVersion::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(AppError::Internal)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory (tests)
// ────────────────────────────────────────────────────────────────────────────


#[cfg(test)]
mod tests {
    use super::memory::MemoryCvVersionStore;
    use super::*;
    use crate::analysis::rubric::PresetName;
    use crate::analysis::scoring::analyze;

    fn version(text: &str) -> CvVersion {
        CvVersion::base(text.into(), analyze(text, None, PresetName::Analysis), None)
    }

    #[tokio::test]
    async fn test_lineage_walks_to_base() {
        let store = MemoryCvVersionStore::default();
        let base = version("base");
        let fixed = CvVersion::derived(&base, "fixed".into(), base.analysis.clone(), None);
        let tailored = CvVersion::derived(
            &fixed,
            "tailored".into(),
            base.analysis.clone(),
            Some("rust".into()),
        );
        for v in [&base, &fixed, &tailored] {
            store.insert(v).await.unwrap();
        }

        let chain = store.lineage(tailored.id).await.unwrap();
        let ids: Vec<Uuid> = chain.iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![tailored.id, fixed.id, base.id]);
    }

    #[tokio::test]
    async fn test_lineage_of_unknown_id_is_empty() {
        let store = MemoryCvVersionStore::default();
        assert!(store.lineage(Uuid::new_v4()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_lineage_stops_on_cycle() {
        let store = MemoryCvVersionStore::default();
        let mut a = version("a");
        let mut b = version("b");
        a.parent_version_id = Some(b.id);
        b.parent_version_id = Some(a.id);
        store.insert(&a).await.unwrap();
        store.insert(&b).await.unwrap();

        assert_eq!(store.lineage(a.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_memory_store_is_append_only() {
        let store = MemoryCvVersionStore::default();
        let v = version("once");
        store.insert(&v).await.unwrap();
        assert!(store.insert(&v).await.is_err());
        assert_eq!(store.len(), 1);
    }
}
