pub mod health;
pub mod sessions;
pub mod stages;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Session lifecycle
        .route("/api/v1/sessions", post(sessions::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(sessions::handle_get_session).delete(sessions::handle_end_session),
        )
        .route(
            "/api/v1/sessions/:id/slots/:slot",
            delete(sessions::handle_clear_slot),
        )
        // Stages
        .route("/api/v1/sessions/:id/vault", post(stages::handle_seed_vault))
        .route(
            "/api/v1/sessions/:id/listing",
            post(stages::handle_analyze_listing),
        )
        .route(
            "/api/v1/sessions/:id/research",
            post(stages::handle_research_company),
        )
        .route(
            "/api/v1/sessions/:id/contacts",
            post(stages::handle_identify_contacts),
        )
        .route(
            "/api/v1/sessions/:id/outreach",
            post(stages::handle_draft_outreach),
        )
        .route(
            "/api/v1/sessions/:id/interview",
            post(stages::handle_interview_probe),
        )
        .route(
            "/api/v1/sessions/:id/documents",
            post(stages::handle_assemble_application),
        )
        .route(
            "/api/v1/sessions/:id/documents/pdf",
            get(stages::handle_download_pdf),
        )
        // Application ledger
        .route(
            "/api/v1/sessions/:id/applications",
            get(stages::handle_list_applications).post(stages::handle_log_application),
        )
        .with_state(state)
}
