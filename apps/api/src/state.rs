use std::sync::Arc;

use crate::config::Config;
use crate::cv::pending::PendingFixes;
use crate::cv::store::CvVersionStore;
use crate::fix::RewriteCapability;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Append-only CV version store. Default: Postgres.
    pub store: Arc<dyn CvVersionStore>,
    /// Rewrite backend used by `fix_cv`. Default: `LlmClient`.
    pub rewriter: Arc<dyn RewriteCapability>,
    /// In-flight fixes, one per source version.
    pub pending_fixes: Arc<PendingFixes>,
    pub config: Config,
}
