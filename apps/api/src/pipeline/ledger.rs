//! Application ledger: a per-session log of where the candidate applied and how it
//! went. No Gateway call.

use chrono::Utc;
use serde::Deserialize;

use crate::errors::AppError;
use crate::pipeline::StageOutcome;
use crate::session::{ApplicationRecord, ApplicationStatus, Session, SlotChange};

#[derive(Debug, Clone, Deserialize)]
pub struct LogApplication {
    /// Falls back to the company of the last analyzed listing.
    pub company: Option<String>,
    pub status: ApplicationStatus,
    pub note: Option<String>,
}

pub fn log_application(session: &Session, entry: LogApplication) -> Result<StageOutcome, AppError> {
    let company = crate::pipeline::resolve_company(session, entry.company.as_deref())?;
    let record = ApplicationRecord {
        company,
        status: entry.status,
        note: entry
            .note
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty()),
        logged_at: Utc::now(),
    };

    let display = format!("{}: {:?}", record.company, record.status);
    Ok(StageOutcome {
        changes: vec![SlotChange::PushApplication(record)],
        display,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{Slot, SlotChange};

    #[test]
    fn test_log_appends_to_existing_records() {
        let mut session = Session::new();
        for (company, status) in [
            ("GlobalTech", ApplicationStatus::InterviewScheduled),
            ("CloudScale", ApplicationStatus::Ghosted),
        ] {
            let outcome = log_application(
                &session,
                LogApplication {
                    company: Some(company.to_string()),
                    status,
                    note: Some("  ".to_string()),
                },
            )
            .unwrap();
            session.apply(outcome.changes);
        }

        let records = session.applications();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].company, "GlobalTech");
        assert_eq!(records[1].status, ApplicationStatus::Ghosted);
        assert!(records[1].note.is_none());
    }

    #[test]
    fn test_log_uses_company_from_listing() {
        let mut session = Session::new();
        session.apply(vec![SlotChange::text(Slot::CompanyName, "InnovateIQ")]);
        let outcome = log_application(
            &session,
            LogApplication {
                company: None,
                status: ApplicationStatus::Applied,
                note: None,
            },
        )
        .unwrap();
        assert!(outcome.display.starts_with("InnovateIQ"));
    }

    #[test]
    fn test_log_without_company_is_rejected() {
        let err = log_application(
            &Session::new(),
            LogApplication {
                company: None,
                status: ApplicationStatus::Applied,
                note: None,
            },
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
