//! Stage endpoints. Each handler takes a snapshot, runs one stage against it, and
//! only then commits the stage's slot changes in a single store write.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::config::ModelTier;
use crate::errors::AppError;
use crate::extract::extract_text;
use crate::pipeline::extraction::Extraction;
use crate::pipeline::ledger::{log_application, LogApplication};
use crate::pipeline::listing::{analyze_listing, CompanySource};
use crate::pipeline::outreach::{draft_outreach, OutreachTarget};
use crate::pipeline::vault::{seed_vault, SeedMode};
use crate::pipeline::{
    assembly::assemble_application, contacts::identify_contacts, interview::probe_achievement,
    research::research_company, StageOutcome,
};
use crate::render::{render, RenderMode, PDF_FILENAME};
use crate::routes::sessions::SessionView;
use crate::session::{ApplicationRecord, Session};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct StageResponse {
    pub display: String,
    pub session: SessionView,
}

#[derive(Debug, Serialize)]
pub struct ListingResponse {
    #[serde(flatten)]
    pub stage: StageResponse,
    pub company: Extraction<String>,
    pub company_source: CompanySource,
}

#[derive(Debug, Default, Deserialize)]
pub struct TierRequest {
    #[serde(default)]
    pub tier: ModelTier,
}

#[derive(Debug, Deserialize)]
pub struct ListingRequest {
    pub listing_text: String,
    #[serde(default)]
    pub tier: ModelTier,
}

#[derive(Debug, Deserialize)]
pub struct CompanyRequest {
    pub company: Option<String>,
    #[serde(default)]
    pub tier: ModelTier,
}

#[derive(Debug, Deserialize)]
pub struct OutreachRequest {
    pub target: OutreachTarget,
    pub company: Option<String>,
    #[serde(default)]
    pub tier: ModelTier,
}

#[derive(Debug, Deserialize)]
pub struct InterviewRequest {
    pub statement: String,
    #[serde(default)]
    pub tier: ModelTier,
}

#[derive(Debug, Deserialize)]
pub struct PdfQuery {
    #[serde(default)]
    pub mode: RenderMode,
}

/// Writes the outcome's changes (if any) and builds the response.
async fn commit(
    state: &AppState,
    snapshot: Session,
    outcome: StageOutcome,
) -> Result<StageResponse, AppError> {
    let session = if outcome.changes.is_empty() {
        snapshot
    } else {
        state.sessions.apply(snapshot.id, outcome.changes).await?
    };
    Ok(StageResponse {
        display: outcome.display,
        session: session.into(),
    })
}

/// Parses a plain-text multipart field as one of the snake_case enums.
fn parse_field<T: serde::de::DeserializeOwned>(name: &str, value: &str) -> Result<T, AppError> {
    serde_json::from_value(serde_json::Value::String(value.trim().to_string()))
        .map_err(|_| AppError::Validation(format!("Invalid value '{value}' for field '{name}'")))
}

/// POST /api/v1/sessions/:id/vault
///
/// Multipart form: `file` (PDF, required), `mode` (`replace` | `append`), `tier`.
pub async fn handle_seed_vault(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<StageResponse>, AppError> {
    let snapshot = state.sessions.snapshot(id).await?;

    let mut document = None;
    let mut mode = SeedMode::default();
    let mut tier = ModelTier::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?;
                document = Some(bytes.to_vec());
            }
            "mode" | "tier" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?;
                if name == "mode" {
                    mode = parse_field(&name, &value)?;
                } else {
                    tier = parse_field(&name, &value)?;
                }
            }
            _ => {}
        }
    }

    let document = document
        .ok_or_else(|| AppError::Validation("Upload a PDF in the 'file' field.".to_string()))?;
    info!("Session {id}: extracting {} byte upload", document.len());
    let text = extract_text(document).await?;

    let outcome = seed_vault(
        &snapshot,
        &text,
        mode,
        state.gateway.as_ref(),
        state.models.resolve(tier),
    )
    .await?;
    Ok(Json(commit(&state, snapshot, outcome).await?))
}

/// POST /api/v1/sessions/:id/listing
pub async fn handle_analyze_listing(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ListingRequest>,
) -> Result<Json<ListingResponse>, AppError> {
    let snapshot = state.sessions.snapshot(id).await?;
    let outcome = analyze_listing(
        &snapshot,
        &req.listing_text,
        state.gateway.as_ref(),
        state.models.resolve(req.tier),
    )
    .await?;

    let stage = commit(&state, snapshot, outcome.stage).await?;
    Ok(Json(ListingResponse {
        stage,
        company: outcome.company,
        company_source: outcome.company_source,
    }))
}

/// POST /api/v1/sessions/:id/research
pub async fn handle_research_company(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<CompanyRequest>,
) -> Result<Json<StageResponse>, AppError> {
    let snapshot = state.sessions.snapshot(id).await?;
    let outcome = research_company(
        &snapshot,
        req.company.as_deref(),
        state.gateway.as_ref(),
        state.models.resolve(req.tier),
    )
    .await?;
    Ok(Json(commit(&state, snapshot, outcome).await?))
}

/// POST /api/v1/sessions/:id/contacts
pub async fn handle_identify_contacts(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<CompanyRequest>,
) -> Result<Json<StageResponse>, AppError> {
    let snapshot = state.sessions.snapshot(id).await?;
    let outcome = identify_contacts(
        &snapshot,
        req.company.as_deref(),
        state.gateway.as_ref(),
        state.models.resolve(req.tier),
    )
    .await?;
    Ok(Json(commit(&state, snapshot, outcome).await?))
}

/// POST /api/v1/sessions/:id/outreach
pub async fn handle_draft_outreach(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<OutreachRequest>,
) -> Result<Json<StageResponse>, AppError> {
    let snapshot = state.sessions.snapshot(id).await?;
    let outcome = draft_outreach(
        &snapshot,
        &req.target,
        req.company.as_deref(),
        state.gateway.as_ref(),
        state.models.resolve(req.tier),
    )
    .await?;
    Ok(Json(commit(&state, snapshot, outcome).await?))
}

/// POST /api/v1/sessions/:id/interview
pub async fn handle_interview_probe(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<InterviewRequest>,
) -> Result<Json<StageResponse>, AppError> {
    let snapshot = state.sessions.snapshot(id).await?;
    let outcome = probe_achievement(
        &snapshot,
        &req.statement,
        state.gateway.as_ref(),
        state.models.resolve(req.tier),
    )
    .await?;
    Ok(Json(commit(&state, snapshot, outcome).await?))
}

/// POST /api/v1/sessions/:id/documents
///
/// The body is optional; without one the fast tier is used.
pub async fn handle_assemble_application(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    req: Option<Json<TierRequest>>,
) -> Result<Json<StageResponse>, AppError> {
    let Json(req) = req.unwrap_or_default();
    let snapshot = state.sessions.snapshot(id).await?;
    let outcome = assemble_application(
        &snapshot,
        state.gateway.as_ref(),
        state.models.resolve(req.tier),
    )
    .await?;
    Ok(Json(commit(&state, snapshot, outcome).await?))
}

/// GET /api/v1/sessions/:id/documents/pdf?mode=both
pub async fn handle_download_pdf(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<PdfQuery>,
) -> Result<Response, AppError> {
    let snapshot = state.sessions.snapshot(id).await?;
    let documents = snapshot
        .documents()
        .cloned()
        .ok_or_else(|| AppError::NotFound("No documents generated yet".to_string()))?;

    let page_config = state.page_config.clone();
    let bytes = tokio::task::spawn_blocking(move || {
        render(
            &documents.resume,
            &documents.cover_letter,
            query.mode,
            &page_config,
        )
    })
    .await
    .map_err(anyhow::Error::from)?;
    info!("Session {id}: rendered {} byte PDF ({:?})", bytes.len(), query.mode);

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{PDF_FILENAME}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}

/// GET /api/v1/sessions/:id/applications
pub async fn handle_list_applications(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ApplicationRecord>>, AppError> {
    let snapshot = state.sessions.snapshot(id).await?;
    Ok(Json(snapshot.applications().to_vec()))
}

/// POST /api/v1/sessions/:id/applications
pub async fn handle_log_application(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<LogApplication>,
) -> Result<Json<StageResponse>, AppError> {
    let snapshot = state.sessions.snapshot(id).await?;
    let outcome = log_application(&snapshot, req)?;
    Ok(Json(commit(&state, snapshot, outcome).await?))
}
