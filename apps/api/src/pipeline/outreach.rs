//! Draft Outreach: a short connection note to a chosen contact or role.
//! Display only; nothing is written to the session.

use serde::Deserialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::prompts::GROUNDING_INSTRUCTION;
use crate::llm_client::Gateway;
use crate::pipeline::prompts::{DRAFT_OUTREACH, OUTREACH_CHAR_BUDGET};
use crate::pipeline::{require_vault, resolve_company, StageOutcome};
use crate::session::{Contact, Session};

/// Who the note is addressed to.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutreachTarget {
    Contact(Contact),
    Role { role: String },
}

impl OutreachTarget {
    fn recipient(&self) -> Option<String> {
        match self {
            OutreachTarget::Contact(contact) if !contact.name.trim().is_empty() => {
                Some(if contact.title.trim().is_empty() {
                    contact.name.trim().to_string()
                } else {
                    format!("{} ({})", contact.name.trim(), contact.title.trim())
                })
            }
            OutreachTarget::Role { role } if !role.trim().is_empty() => {
                Some(format!("the {}", role.trim()))
            }
            _ => None,
        }
    }
}

pub async fn draft_outreach(
    session: &Session,
    target: &OutreachTarget,
    company: Option<&str>,
    gateway: &dyn Gateway,
    model_id: &str,
) -> Result<StageOutcome, AppError> {
    let recipient = target
        .recipient()
        .ok_or_else(|| AppError::Validation("Please specify a contact or role.".to_string()))?;
    let company = resolve_company(session, company)?;
    let vault = require_vault(session, "Outreach drafting")?;

    info!("Drafting outreach to {recipient} at '{company}' for session {}", session.id);
    let budget = OUTREACH_CHAR_BUDGET.to_string();
    let prompt = DRAFT_OUTREACH.render(&[
        ("recipient", recipient.as_str()),
        ("company", company.as_str()),
        ("char_budget", budget.as_str()),
        ("grounding_instruction", GROUNDING_INSTRUCTION),
        ("vault", vault),
    ]);
    let note = gateway.generate(model_id, &prompt).await?;
    let note = note.trim().to_string();

    // The budget is a request to the model; an over-long note is shown as-is.
    let length = note.chars().count();
    if length > OUTREACH_CHAR_BUDGET {
        warn!("Outreach note is {length} chars, over the {OUTREACH_CHAR_BUDGET}-char budget");
    }

    Ok(StageOutcome::display_only(note))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::ScriptedGateway;
    use crate::session::{Slot, SlotChange};

    fn seeded() -> Session {
        let mut session = Session::new();
        session.apply(vec![
            SlotChange::text(Slot::ProfileSummary, "Cut infra cost 30%"),
            SlotChange::text(Slot::CompanyName, "Acme"),
        ]);
        session
    }

    fn alice() -> OutreachTarget {
        OutreachTarget::Contact(Contact {
            name: "Alice Smith".to_string(),
            title: "VP of Product".to_string(),
        })
    }

    #[tokio::test]
    async fn test_outreach_is_display_only() {
        let gateway = ScriptedGateway::replying(&["Hi Alice, I cut infra cost 30%..."]);
        let outcome = draft_outreach(&seeded(), &alice(), None, &gateway, "m")
            .await
            .unwrap();

        assert!(outcome.changes.is_empty());
        assert_eq!(outcome.display, "Hi Alice, I cut infra cost 30%...");
        let prompt = gateway.last_prompt().unwrap();
        assert!(prompt.contains("Alice Smith (VP of Product) at Acme"));
        assert!(prompt.contains("At most 300 characters"));
    }

    #[tokio::test]
    async fn test_over_budget_note_is_not_truncated() {
        let long = "x".repeat(OUTREACH_CHAR_BUDGET + 50);
        let gateway = ScriptedGateway::replying(&[long.as_str()]);
        let outcome = draft_outreach(&seeded(), &alice(), None, &gateway, "m")
            .await
            .unwrap();
        assert_eq!(outcome.display.len(), OUTREACH_CHAR_BUDGET + 50);
    }

    #[tokio::test]
    async fn test_role_target_is_accepted() {
        let gateway = ScriptedGateway::replying(&["note"]);
        let target = OutreachTarget::Role {
            role: "VP of Engineering".to_string(),
        };
        draft_outreach(&seeded(), &target, Some("Globex"), &gateway, "m")
            .await
            .unwrap();
        assert!(gateway
            .last_prompt()
            .unwrap()
            .contains("the VP of Engineering at Globex"));
    }

    #[tokio::test]
    async fn test_blank_target_makes_no_call() {
        let gateway = ScriptedGateway::new();
        let target = OutreachTarget::Role {
            role: "  ".to_string(),
        };
        let err = draft_outreach(&seeded(), &target, None, &gateway, "m")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn test_outreach_refuses_without_vault() {
        let gateway = ScriptedGateway::new();
        let err = draft_outreach(&Session::new(), &alice(), Some("Acme"), &gateway, "m")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Precondition(_)));
        assert_eq!(gateway.call_count(), 0);
    }

    #[test]
    fn test_target_deserializes_tagged() {
        let target: OutreachTarget = serde_json::from_str(
            r#"{"kind": "contact", "name": "Carla Nunez", "title": "CTO"}"#,
        )
        .unwrap();
        assert_eq!(
            target,
            OutreachTarget::Contact(Contact {
                name: "Carla Nunez".to_string(),
                title: "CTO".to_string()
            })
        );
    }
}
