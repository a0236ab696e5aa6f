//! Analyze Listing: trust/risk report for a pasted job posting, plus a best-effort
//! company name.
//!
//! The company name comes from the `COMPANY_NAME:` marker line when the report has
//! one; otherwise a second, narrow Gateway call asks for the bare name. A failing
//! second call does not fail the analysis: the name is simply `NotFound`.

use serde::Serialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::prompts::{EMPTY_VAULT_PLACEHOLDER, GROUNDING_INSTRUCTION};
use crate::llm_client::Gateway;
use crate::pipeline::extraction::{find_company_marker, normalize_company_name, Extraction};
use crate::pipeline::prompts::{ANALYZE_LISTING, EXTRACT_COMPANY};
use crate::pipeline::StageOutcome;
use crate::session::{Session, Slot, SlotChange};

/// Where the company name came from, for the response and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompanySource {
    Marker,
    FollowUp,
    None,
}

#[derive(Debug, Clone)]
pub struct ListingOutcome {
    pub stage: StageOutcome,
    pub company: Extraction<String>,
    pub company_source: CompanySource,
}

pub async fn analyze_listing(
    session: &Session,
    listing_text: &str,
    gateway: &dyn Gateway,
    model_id: &str,
) -> Result<ListingOutcome, AppError> {
    let listing_text = listing_text.trim();
    if listing_text.is_empty() {
        return Err(AppError::Validation(
            "Please paste a job description first.".to_string(),
        ));
    }

    let vault = session
        .text(Slot::ProfileSummary)
        .unwrap_or(EMPTY_VAULT_PLACEHOLDER);

    info!(
        "Analyzing listing for session {} ({} chars, vault {}, template {})",
        session.id,
        listing_text.len(),
        if session.has(Slot::ProfileSummary) { "present" } else { "absent" },
        ANALYZE_LISTING.id()
    );
    let prompt = ANALYZE_LISTING.render(&[
        ("grounding_instruction", GROUNDING_INSTRUCTION),
        ("vault", vault),
        ("listing_text", listing_text),
    ]);
    let report = gateway.generate(model_id, &prompt).await?;
    let report = report.trim().to_string();

    let (company, company_source) = match find_company_marker(&report) {
        Some(found) => (found, CompanySource::Marker),
        None => {
            warn!(
                "Listing report for session {} has no company marker, asking separately",
                session.id
            );
            (
                extract_company(&report, listing_text, gateway, model_id).await,
                CompanySource::FollowUp,
            )
        }
    };
    let company_source = if company.is_found() {
        company_source
    } else {
        CompanySource::None
    };

    let mut changes = vec![
        SlotChange::text(Slot::ListingText, listing_text),
        SlotChange::text(Slot::ListingAnalysis, report.clone()),
    ];
    match &company {
        Extraction::Found(name) => {
            info!("Listing names company '{name}' ({company_source:?})");
            changes.push(SlotChange::text(Slot::CompanyName, name.clone()));
        }
        Extraction::NotFound => {
            warn!("No company name could be extracted for session {}", session.id);
            changes.push(SlotChange::Clear(Slot::CompanyName));
        }
    }

    Ok(ListingOutcome {
        stage: StageOutcome {
            changes,
            display: report,
        },
        company,
        company_source,
    })
}

async fn extract_company(
    report: &str,
    listing_text: &str,
    gateway: &dyn Gateway,
    model_id: &str,
) -> Extraction<String> {
    let prompt = EXTRACT_COMPANY.render(&[("report", report), ("listing_text", listing_text)]);
    match gateway.generate(model_id, &prompt).await {
        Ok(answer) => normalize_company_name(&answer),
        Err(e) => {
            warn!("Company name follow-up failed, continuing without it: {e}");
            Extraction::NotFound
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::ScriptedGateway;
    use crate::llm_client::GenerationFailure;

    const LISTING: &str = "Senior Rust Engineer at Acme Robotics. 5+ years Rust required.";

    fn applied(outcome: &ListingOutcome) -> Session {
        let mut session = Session::new();
        session.apply(vec![SlotChange::text(Slot::CompanyName, "Stale Co")]);
        session.apply(outcome.stage.changes.clone());
        session
    }

    #[tokio::test]
    async fn test_marker_supplies_company_with_single_call() {
        let gateway =
            ScriptedGateway::replying(&["Ghost Score: 12\nLooks real.\nCOMPANY_NAME: Acme Robotics"]);
        let outcome = analyze_listing(&Session::new(), LISTING, &gateway, "m")
            .await
            .unwrap();

        assert_eq!(gateway.call_count(), 1);
        assert_eq!(outcome.company, Extraction::Found("Acme Robotics".to_string()));
        assert_eq!(outcome.company_source, CompanySource::Marker);

        let session = applied(&outcome);
        assert_eq!(session.text(Slot::CompanyName), Some("Acme Robotics"));
        assert_eq!(session.text(Slot::ListingText), Some(LISTING));
        assert!(session
            .text(Slot::ListingAnalysis)
            .unwrap()
            .starts_with("Ghost Score"));
    }

    #[tokio::test]
    async fn test_missing_marker_triggers_follow_up_call() {
        let gateway = ScriptedGateway::replying(&["Ghost Score: 80", "Acme Robotics\n"]);
        let outcome = analyze_listing(&Session::new(), LISTING, &gateway, "m")
            .await
            .unwrap();

        assert_eq!(gateway.call_count(), 2);
        assert_eq!(outcome.company, Extraction::Found("Acme Robotics".to_string()));
        assert_eq!(outcome.company_source, CompanySource::FollowUp);
        assert!(gateway.last_prompt().unwrap().contains(LISTING));
    }

    #[tokio::test]
    async fn test_follow_up_failure_keeps_analysis_and_clears_company() {
        let gateway = ScriptedGateway::replying(&["Ghost Score: 80"]);
        gateway.push_err(GenerationFailure::EmptyContent);

        let outcome = analyze_listing(&Session::new(), LISTING, &gateway, "m")
            .await
            .unwrap();
        assert_eq!(outcome.company, Extraction::NotFound);
        assert_eq!(outcome.company_source, CompanySource::None);

        let session = applied(&outcome);
        assert!(!session.has(Slot::CompanyName));
        assert_eq!(session.text(Slot::ListingAnalysis), Some("Ghost Score: 80"));
    }

    #[tokio::test]
    async fn test_report_is_never_used_as_company_name() {
        let gateway = ScriptedGateway::replying(&[
            "Ghost Score: 80",
            "Ghost Score: 80\nBudget: $150k\nThis is the full report again",
        ]);
        let outcome = analyze_listing(&Session::new(), LISTING, &gateway, "m")
            .await
            .unwrap();
        assert_eq!(outcome.company, Extraction::NotFound);
    }

    #[tokio::test]
    async fn test_empty_listing_makes_no_call_and_no_changes() {
        let gateway = ScriptedGateway::new();
        let err = analyze_listing(&Session::new(), "   ", &gateway, "m")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn test_analysis_failure_is_reported() {
        let gateway = ScriptedGateway::new();
        gateway.push_err(GenerationFailure::Api {
            status: 500,
            message: "boom".to_string(),
        });
        let err = analyze_listing(&Session::new(), LISTING, &gateway, "m")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Generation(_)));
        assert_eq!(gateway.call_count(), 1);
    }

    #[tokio::test]
    async fn test_vault_is_embedded_when_present() {
        let mut session = Session::new();
        session.apply(vec![SlotChange::text(Slot::ProfileSummary, "Rust for 7 years")]);
        let gateway = ScriptedGateway::replying(&["report\nCOMPANY_NAME: Acme"]);

        analyze_listing(&session, LISTING, &gateway, "m")
            .await
            .unwrap();
        let prompt = gateway.last_prompt().unwrap();
        assert!(prompt.contains("Rust for 7 years"));
        assert!(!prompt.contains(EMPTY_VAULT_PLACEHOLDER));
    }
}
