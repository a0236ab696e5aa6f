//! Research Company: strategic intel on the target company, grounded in the Vault.

use tracing::info;

use crate::errors::AppError;
use crate::llm_client::prompts::GROUNDING_INSTRUCTION;
use crate::llm_client::Gateway;
use crate::pipeline::prompts::RESEARCH_COMPANY;
use crate::pipeline::{require_vault, resolve_company, StageOutcome};
use crate::session::{Session, Slot, SlotChange};

pub async fn research_company(
    session: &Session,
    company: Option<&str>,
    gateway: &dyn Gateway,
    model_id: &str,
) -> Result<StageOutcome, AppError> {
    let company = resolve_company(session, company)?;
    let vault = require_vault(session, "Company research")?;

    info!("Researching '{company}' for session {}", session.id);
    let prompt = RESEARCH_COMPANY.render(&[
        ("company", company.as_str()),
        ("grounding_instruction", GROUNDING_INSTRUCTION),
        ("vault", vault),
    ]);
    let notes = gateway.generate(model_id, &prompt).await?;
    let notes = notes.trim().to_string();

    Ok(StageOutcome {
        changes: vec![SlotChange::text(Slot::ResearchNotes, notes.clone())],
        display: notes,
    })
}
