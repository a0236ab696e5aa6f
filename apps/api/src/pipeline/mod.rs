//! The staged-context pipeline: Vault → Listing → Research → Outreach / Assembly.
//!
//! Every stage is a function of `(snapshot, input)` that may call the Gateway and
//! returns a `StageOutcome`. Stages never talk to each other; they only see what the
//! earlier stages left in the session. Preconditions are checked before any Gateway
//! call, and a failed call leaves the session untouched because changes are only
//! applied by the caller after success.

pub mod assembly;
pub mod contacts;
pub mod extraction;
pub mod interview;
pub mod ledger;
pub mod listing;
pub mod outreach;
pub mod prompts;
pub mod research;
pub mod vault;

use serde::Serialize;

use crate::errors::AppError;
use crate::session::{Session, Slot, SlotChange};

/// What a stage wants written back plus the text shown to the user.
#[derive(Debug, Clone, Default)]
pub struct StageOutcome {
    pub changes: Vec<SlotChange>,
    pub display: String,
}

impl StageOutcome {
    pub fn display_only(display: impl Into<String>) -> Self {
        Self {
            changes: Vec::new(),
            display: display.into(),
        }
    }
}

/// Which stages can currently run, derived from slot presence.
#[derive(Debug, Clone, Serialize)]
pub struct Readiness {
    pub vault_seeded: bool,
    pub listing_analyzed: bool,
    pub company_known: bool,
    pub research_ready: bool,
    pub can_assemble: bool,
    pub can_render: bool,
}

pub fn readiness(session: &Session) -> Readiness {
    let vault_seeded = session.has(Slot::ProfileSummary);
    let listing_analyzed = session.has(Slot::ListingAnalysis);
    let company_known = session.has(Slot::CompanyName);
    Readiness {
        vault_seeded,
        listing_analyzed,
        company_known,
        research_ready: vault_seeded && company_known,
        can_assemble: vault_seeded && listing_analyzed,
        can_render: session.documents().is_some(),
    }
}

/// The Vault text, or a precondition failure naming the action that needs it.
pub(crate) fn require_vault<'a>(session: &'a Session, action: &str) -> Result<&'a str, AppError> {
    session.text(Slot::ProfileSummary).ok_or_else(|| {
        AppError::Precondition(format!(
            "{action} needs a seeded Career Vault. Upload your resume first."
        ))
    })
}

/// An explicitly supplied company wins; otherwise the one extracted from the last
/// analyzed listing. Blank values count as missing.
pub(crate) fn resolve_company(
    session: &Session,
    explicit: Option<&str>,
) -> Result<String, AppError> {
    explicit
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .or_else(|| {
            session
                .text(Slot::CompanyName)
                .map(str::trim)
                .filter(|c| !c.is_empty())
        })
        .map(str::to_string)
        .ok_or_else(|| {
            AppError::Validation(
                "Enter a company name or analyze a listing that names one.".to_string(),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> Session {
        let mut session = Session::new();
        session.apply(vec![
            SlotChange::text(Slot::ProfileSummary, "vault"),
            SlotChange::text(Slot::CompanyName, "Acme"),
        ]);
        session
    }

    #[test]
    fn test_require_vault_rejects_absent_vault() {
        let err = require_vault(&Session::new(), "Research").unwrap_err();
        assert!(matches!(err, AppError::Precondition(_)));
    }

    #[test]
    fn test_require_vault_accepts_seeded_vault() {
        assert_eq!(require_vault(&seeded(), "Research").unwrap(), "vault");
    }

    #[test]
    fn test_resolve_company_prefers_explicit_value() {
        assert_eq!(
            resolve_company(&seeded(), Some("  Globex ")).unwrap(),
            "Globex"
        );
    }

    #[test]
    fn test_resolve_company_falls_back_to_slot() {
        assert_eq!(resolve_company(&seeded(), Some("   ")).unwrap(), "Acme");
        assert_eq!(resolve_company(&seeded(), None).unwrap(), "Acme");
    }

    #[test]
    fn test_resolve_company_without_any_source_fails() {
        let err = resolve_company(&Session::new(), None).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_readiness_tracks_slots() {
        let ready = readiness(&seeded());
        assert!(ready.vault_seeded);
        assert!(ready.research_ready);
        assert!(!ready.can_assemble);
        assert!(!ready.can_render);
    }
}
