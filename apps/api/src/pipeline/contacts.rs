//! Identify Contacts: likely decision makers at the target company.

use tracing::info;

use crate::errors::AppError;
use crate::llm_client::Gateway;
use crate::pipeline::extraction::parse_contacts;
use crate::pipeline::prompts::IDENTIFY_CONTACTS;
use crate::pipeline::{resolve_company, StageOutcome};
use crate::session::{Session, Slot, SlotChange, SlotValue};

pub async fn identify_contacts(
    session: &Session,
    company: Option<&str>,
    gateway: &dyn Gateway,
    model_id: &str,
) -> Result<StageOutcome, AppError> {
    let company = resolve_company(session, company)?;

    let prompt = IDENTIFY_CONTACTS.render(&[("company", company.as_str())]);
    let response = gateway.generate(model_id, &prompt).await?;
    let contacts = parse_contacts(&response);
    info!(
        "Identified {} contact candidates at '{company}' for session {}",
        contacts.len(),
        session.id
    );

    let display = contacts
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join("\n");

    Ok(StageOutcome {
        changes: vec![SlotChange::Set(
            Slot::ContactCandidates,
            SlotValue::Contacts(contacts),
        )],
        display,
    })
}
