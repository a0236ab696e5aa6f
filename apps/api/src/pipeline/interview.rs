//! Interview Probe: one evidence-seeking follow-up question about something the
//! candidate describes. Display only.

use tracing::info;

use crate::errors::AppError;
use crate::llm_client::prompts::EMPTY_VAULT_PLACEHOLDER;
use crate::llm_client::Gateway;
use crate::pipeline::prompts::INTERVIEW_PROBE;
use crate::pipeline::StageOutcome;
use crate::session::{Session, Slot};

pub async fn probe_achievement(
    session: &Session,
    statement: &str,
    gateway: &dyn Gateway,
    model_id: &str,
) -> Result<StageOutcome, AppError> {
    let statement = statement.trim();
    if statement.is_empty() {
        return Err(AppError::Validation(
            "Describe a specific problem you solved in your last role.".to_string(),
        ));
    }

    let vault = session
        .text(Slot::ProfileSummary)
        .unwrap_or(EMPTY_VAULT_PLACEHOLDER);
    info!("Probing achievement for session {}", session.id);

    let prompt = INTERVIEW_PROBE.render(&[("statement", statement), ("vault", vault)]);
    let question = gateway.generate(model_id, &prompt).await?;
    Ok(StageOutcome::display_only(question.trim()))
}
