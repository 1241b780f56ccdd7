use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::analysis::rubric::PresetName;
use crate::analysis::scoring::analyze;
use crate::analysis::signals::{extract, Signals};
use crate::cv::upload::extract_document_text;
use crate::cv::version::CvVersion;
use crate::errors::AppError;
use crate::fix::{fix_cv, FixResult};
use crate::render::{render, SemanticDocument};
use crate::state::AppState;

/// Upload size cap applied to the upload route.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub text: String,
    pub job_description: Option<String>,
    pub preset: Option<PresetName>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub version: CvVersion,
    pub signals: Signals,
}

#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct VersionResponse {
    pub version: CvVersion,
    pub document: SemanticDocument,
}

#[derive(Debug, Default, Deserialize)]
pub struct FixRequest {
    pub job_description: Option<String>,
    pub preset: Option<PresetName>,
}

#[derive(Debug, Serialize)]
pub struct FixResponse {
    /// The derived version; `None` when there was nothing to fix.
    pub version: Option<CvVersion>,
    pub fix: FixResult,
}

/// Blank job descriptions are treated as absent.
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn ensure_long_enough(text: &str, min: usize) -> Result<(), AppError> {
    let actual = text.trim().chars().count();
    if actual < min {
        return Err(AppError::InputTooShort { min, actual });
    }
    Ok(())
}

async fn analyze_and_store(
    state: &AppState,
    text: String,
    job_description: Option<String>,
    preset: Option<PresetName>,
) -> Result<AnalyzeResponse, AppError> {
    ensure_long_enough(&text, state.config.min_input_chars)?;

    let preset = preset.unwrap_or(state.config.default_preset);
    let job_description = non_blank(job_description);
    let jd = job_description.as_deref();

    let signals = extract(&text, jd);
    let analysis = analyze(&text, jd, preset);
    info!(
        "Analyzed CV: score {} ({:?}), {} issues",
        analysis.score,
        analysis.grade,
        analysis.issues.len()
    );

    let version = CvVersion::base(text, analysis, job_description);
    state.store.insert(&version).await?;

    Ok(AnalyzeResponse { version, signals })
}

async fn load_version(state: &AppState, id: Uuid) -> Result<CvVersion, AppError> {
    state
        .store
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("CV version {id} not found")))
}

/// POST /api/v1/cv/analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let response = analyze_and_store(&state, req.text, req.job_description, req.preset).await?;
    Ok(Json(response))
}

/// POST /api/v1/cv/upload
///
/// Multipart fields: `file` (required), `job_description`, `preset`.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let mut text = None;
    let mut job_description = None;
    let mut preset = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
                text = Some(
                    extract_document_text(file_name.as_deref(), content_type.as_deref(), bytes)
                        .await?,
                );
            }
            "job_description" => {
                job_description = Some(field.text().await.map_err(|e| {
                    AppError::Validation(format!("Invalid job_description field: {e}"))
                })?);
            }
            "preset" => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid preset field: {e}")))?;
                preset = Some(raw.parse::<PresetName>().map_err(AppError::Validation)?);
            }
            _ => {}
        }
    }

    let text = text.ok_or_else(|| AppError::Validation("Missing 'file' field".to_string()))?;
    let response = analyze_and_store(&state, text, job_description, preset).await?;
    Ok(Json(response))
}

/// POST /api/v1/cv/render
pub async fn handle_render(Json(req): Json<RenderRequest>) -> Json<SemanticDocument> {
    Json(render(&req.text))
}

/// GET /api/v1/cv/versions/:id
pub async fn handle_get_version(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<VersionResponse>, AppError> {
    let version = load_version(&state, id).await?;
    let document = render(&version.raw_text);
    Ok(Json(VersionResponse { version, document }))
}

/// GET /api/v1/cv/versions/:id/lineage
pub async fn handle_lineage(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<CvVersion>>, AppError> {
    let chain = state.store.lineage(id).await?;
    if chain.is_empty() {
        return Err(AppError::NotFound(format!("CV version {id} not found")));
    }
    Ok(Json(chain))
}

/// POST /api/v1/cv/versions/:id/fix
///
/// Re-analyzes the source version under the effective preset and job description,
/// runs one rewrite, and stores the result as a new child version. The source
/// version is never modified; on failure nothing is stored.
pub async fn handle_fix(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Option<Json<FixRequest>>,
) -> Result<Json<FixResponse>, AppError> {
    let req = body.map(|Json(req)| req).unwrap_or_default();
    let source = load_version(&state, id).await?;

    let _guard = state
        .pending_fixes
        .try_begin(id)
        .ok_or(AppError::FixInProgress(id))?;

    let preset = req.preset.unwrap_or(source.analysis.preset);
    let job_description =
        non_blank(req.job_description).or_else(|| non_blank(source.job_description.clone()));
    let jd = job_description.as_deref();

    let before = analyze(&source.raw_text, jd, preset);
    let fix = fix_cv(&source.raw_text, &before, jd, state.rewriter.as_ref()).await?;

    if before.is_perfect() {
        info!("CV version {id} has no issues; nothing stored");
        return Ok(Json(FixResponse { version: None, fix }));
    }

    let version = CvVersion::derived(
        &source,
        fix.fixed_text.clone(),
        fix.after.clone(),
        job_description,
    );
    state.store.insert(&version).await?;
    info!(
        "Stored {} version {} from {id} ({:+})",
        version.version_type.as_str(),
        version.id,
        fix.score_delta
    );

    Ok(Json(FixResponse {
        version: Some(version),
        fix,
    }))
}
