//! Seed Vault: turns extracted document text into the Profile Summary.

use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::llm_client::{Gateway, GenerationFailure};
use crate::pipeline::prompts::SEED_VAULT;
use crate::pipeline::StageOutcome;
use crate::session::{Session, Slot, SlotChange};

/// How a new summary combines with an existing one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedMode {
    #[default]
    Replace,
    Append,
}

pub async fn seed_vault(
    session: &Session,
    document_text: &str,
    mode: SeedMode,
    gateway: &dyn Gateway,
    model_id: &str,
) -> Result<StageOutcome, AppError> {
    if document_text.trim().is_empty() {
        return Err(AppError::Validation(
            "The uploaded document has no text to build a vault from.".to_string(),
        ));
    }

    info!(
        "Seeding vault for session {} ({} chars, {:?}, template {})",
        session.id,
        document_text.len(),
        mode,
        SEED_VAULT.id()
    );
    let prompt = SEED_VAULT.render(&[("document_text", document_text)]);
    let summary = gateway.generate(model_id, &prompt).await?;
    let summary = summary.trim();
    if summary.is_empty() {
        return Err(GenerationFailure::EmptyContent.into());
    }

    let change = match mode {
        SeedMode::Replace => SlotChange::text(Slot::ProfileSummary, summary),
        SeedMode::Append => SlotChange::AppendText(Slot::ProfileSummary, summary.to_string()),
    };

    info!("Vault seeded for session {} ({} chars, {:?})", session.id, summary.len(), mode);
    Ok(StageOutcome {
        changes: vec![change],
        display: summary.to_string(),
    })
}
