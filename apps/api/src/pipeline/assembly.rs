//! Assemble Application: one Gateway call producing a resume and a cover letter,
//! split on `DOCUMENT_SEPARATOR`.

use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::prompts::GROUNDING_INSTRUCTION;
use crate::llm_client::Gateway;
use crate::pipeline::extraction::{split_documents, DOCUMENT_SEPARATOR};
use crate::pipeline::prompts::{ASSEMBLE_APPLICATION, NO_RESEARCH_PLACEHOLDER};
use crate::pipeline::{require_vault, StageOutcome};
use crate::session::{Session, Slot, SlotChange, SlotValue};

pub async fn assemble_application(
    session: &Session,
    gateway: &dyn Gateway,
    model_id: &str,
) -> Result<StageOutcome, AppError> {
    let vault = require_vault(session, "Application assembly")?;
    let analysis = session.text(Slot::ListingAnalysis).ok_or_else(|| {
        AppError::Precondition("Analyze a job listing before generating documents.".to_string())
    })?;
    let listing_text = session.text(Slot::ListingText).unwrap_or_default();
    let research = session
        .text(Slot::ResearchNotes)
        .unwrap_or(NO_RESEARCH_PLACEHOLDER);

    info!(
        "Assembling application for session {} (research {})",
        session.id,
        if session.has(Slot::ResearchNotes) { "included" } else { "absent" }
    );
    let prompt = ASSEMBLE_APPLICATION.render(&[
        ("grounding_instruction", GROUNDING_INSTRUCTION),
        ("vault", vault),
        ("listing_text", listing_text),
        ("listing_analysis", analysis),
        ("research_notes", research),
        ("separator", DOCUMENT_SEPARATOR),
    ]);
    let response = gateway.generate(model_id, &prompt).await?;

    let documents = split_documents(&response);
    if documents.cover_letter.is_empty() {
        warn!(
            "Combined response for session {} had no cover letter section",
            session.id
        );
    }

    let display = if documents.cover_letter.is_empty() {
        documents.resume.clone()
    } else {
        format!("{}\n\n{}", documents.resume, documents.cover_letter)
    };

    Ok(StageOutcome {
        changes: vec![SlotChange::Set(
            Slot::Documents,
            SlotValue::Documents(documents),
        )],
        display,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::ScriptedGateway;
    use crate::llm_client::GenerationFailure;

    fn ready() -> Session {
        let mut session = Session::new();
        session.apply(vec![
            SlotChange::text(Slot::ProfileSummary, "Shipped 3 payment products"),
            SlotChange::text(Slot::ListingText, "PM, Payments"),
            SlotChange::text(Slot::ListingAnalysis, "Ghost Score: 10"),
        ]);
        session
    }

    #[tokio::test]
    async fn test_assembly_splits_documents() {
        let gateway = ScriptedGateway::replying(&[
            "JANE DOE\n- Shipped 3 payment products\n===COVER_LETTER===\nDear hiring team,",
        ]);
        let outcome = assemble_application(&ready(), &gateway, "deep")
            .await
            .unwrap();

        let mut session = ready();
        session.apply(outcome.changes);
        let docs = session.documents().unwrap();
        assert_eq!(docs.resume, "JANE DOE\n- Shipped 3 payment products");
        assert_eq!(docs.cover_letter, "Dear hiring team,");

        let prompt = gateway.last_prompt().unwrap();
        assert!(prompt.contains("PM, Payments"));
        assert!(prompt.contains("Ghost Score: 10"));
        assert!(prompt.contains(NO_RESEARCH_PLACEHOLDER));
    }

    #[tokio::test]
    async fn test_missing_separator_leaves_cover_letter_empty() {
        let gateway = ScriptedGateway::replying(&["JANE DOE\nResume only"]);
        let outcome = assemble_application(&ready(), &gateway, "m").await.unwrap();

        let mut session = ready();
        session.apply(outcome.changes);
        let docs = session.documents().unwrap();
        assert_eq!(docs.resume, "JANE DOE\nResume only");
        assert_eq!(docs.cover_letter, "");
    }

    #[tokio::test]
    async fn test_research_notes_are_included_when_present() {
        let mut session = ready();
        session.apply(vec![SlotChange::text(Slot::ResearchNotes, "Pain: fraud losses")]);
        let gateway = ScriptedGateway::replying(&["resume"]);

        assemble_application(&session, &gateway, "m").await.unwrap();
        let prompt = gateway.last_prompt().unwrap();
        assert!(prompt.contains("Pain: fraud losses"));
        assert!(!prompt.contains(NO_RESEARCH_PLACEHOLDER));
    }

    #[tokio::test]
    async fn test_assembly_refuses_without_vault() {
        let mut session = Session::new();
        session.apply(vec![SlotChange::text(Slot::ListingAnalysis, "report")]);
        let gateway = ScriptedGateway::new();

        let err = assemble_application(&session, &gateway, "m")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Precondition(_)));
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn test_assembly_refuses_without_listing_analysis() {
        let mut session = Session::new();
        session.apply(vec![SlotChange::text(Slot::ProfileSummary, "vault")]);
        let gateway = ScriptedGateway::new();

        let err = assemble_application(&session, &gateway, "m")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Precondition(_)));
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn test_gateway_failure_is_surfaced() {
        let gateway = ScriptedGateway::new();
        gateway.push_err(GenerationFailure::Malformed("truncated".to_string()));
        let err = assemble_application(&ready(), &gateway, "m")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("truncated"));
    }
}
