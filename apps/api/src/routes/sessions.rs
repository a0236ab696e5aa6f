use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::pipeline::{readiness, Readiness};
use crate::session::{Session, Slot};
use crate::state::AppState;

/// Session as returned to clients: every slot's content plus what can run next.
#[derive(Debug, Serialize)]
pub struct SessionView {
    #[serde(flatten)]
    pub session: Session,
    pub present: Vec<Slot>,
    pub readiness: Readiness,
}

impl From<Session> for SessionView {
    fn from(session: Session) -> Self {
        Self {
            present: session.present_slots(),
            readiness: readiness(&session),
            session,
        }
    }
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionView>) {
    let session = state.sessions.create().await;
    (StatusCode::CREATED, Json(session.into()))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let session = state.sessions.snapshot(id).await?;
    Ok(Json(session.into()))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_end_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.sessions.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/sessions/:id/slots/:slot
pub async fn handle_clear_slot(
    State(state): State<AppState>,
    Path((id, slot)): Path<(Uuid, String)>,
) -> Result<Json<SessionView>, AppError> {
    let slot: Slot = slot.parse().map_err(AppError::Validation)?;
    let session = state.sessions.clear_slot(id, slot).await?;
    Ok(Json(session.into()))
}
