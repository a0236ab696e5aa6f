//! Session context: the named slots every stage reads from and writes to.
//!
//! One `Session` per interactive user. Stages never mutate it directly: they get a
//! snapshot and return `SlotChange`s, which the store applies in one write after the
//! stage succeeded.

pub mod models;
pub mod store;

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use models::{ApplicationRecord, ApplicationStatus, Contact, GeneratedDocuments};
pub use store::SessionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    ProfileSummary,
    ListingText,
    ListingAnalysis,
    CompanyName,
    ResearchNotes,
    ContactCandidates,
    Documents,
    Applications,
}

impl Slot {
    pub const ALL: [Slot; 8] = [
        Slot::ProfileSummary,
        Slot::ListingText,
        Slot::ListingAnalysis,
        Slot::CompanyName,
        Slot::ResearchNotes,
        Slot::ContactCandidates,
        Slot::Documents,
        Slot::Applications,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Slot::ProfileSummary => "profile_summary",
            Slot::ListingText => "listing_text",
            Slot::ListingAnalysis => "listing_analysis",
            Slot::CompanyName => "company_name",
            Slot::ResearchNotes => "research_notes",
            Slot::ContactCandidates => "contact_candidates",
            Slot::Documents => "documents",
            Slot::Applications => "applications",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Slot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Slot::ALL
            .into_iter()
            .find(|slot| slot.as_str() == s)
            .ok_or_else(|| format!("Unknown slot '{s}'"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum SlotValue {
    Text(String),
    Contacts(Vec<Contact>),
    Documents(GeneratedDocuments),
    Applications(Vec<ApplicationRecord>),
}

/// A pending write produced by a stage.
///
/// The append variants are resolved against the session as it is when the change
/// is applied, not against the snapshot the stage saw, so concurrent appends to one
/// session all land.
#[derive(Debug, Clone, PartialEq)]
pub enum SlotChange {
    Set(Slot, SlotValue),
    Clear(Slot),
    /// Adds a paragraph to a text slot, separated by a blank line.
    AppendText(Slot, String),
    PushApplication(ApplicationRecord),
}

impl SlotChange {
    pub fn text(slot: Slot, value: impl Into<String>) -> Self {
        SlotChange::Set(slot, SlotValue::Text(value.into()))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub id: Uuid,
    slots: HashMap<Slot, SlotValue>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            slots: HashMap::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn get(&self, slot: Slot) -> Option<&SlotValue> {
        self.slots.get(&slot)
    }

    pub fn set(&mut self, slot: Slot, value: SlotValue) {
        self.slots.insert(slot, value);
        self.updated_at = Utc::now();
    }

    pub fn clear(&mut self, slot: Slot) {
        if self.slots.remove(&slot).is_some() {
            self.updated_at = Utc::now();
        }
    }

    /// Presence check. A slot holding an empty string is still present.
    pub fn has(&self, slot: Slot) -> bool {
        self.get(slot).is_some()
    }

    /// The text held by `slot`, or `None` when absent or not a text slot.
    pub fn text(&self, slot: Slot) -> Option<&str> {
        match self.get(slot) {
            Some(SlotValue::Text(text)) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn contacts(&self) -> &[Contact] {
        match self.get(Slot::ContactCandidates) {
            Some(SlotValue::Contacts(contacts)) => contacts,
            _ => &[],
        }
    }

    pub fn documents(&self) -> Option<&GeneratedDocuments> {
        match self.get(Slot::Documents) {
            Some(SlotValue::Documents(docs)) => Some(docs),
            _ => None,
        }
    }

    pub fn applications(&self) -> &[ApplicationRecord] {
        match self.get(Slot::Applications) {
            Some(SlotValue::Applications(records)) => records,
            _ => &[],
        }
    }

    pub fn apply(&mut self, changes: Vec<SlotChange>) {
        for change in changes {
            match change {
                SlotChange::Set(slot, value) => self.set(slot, value),
                SlotChange::Clear(slot) => self.clear(slot),
                SlotChange::AppendText(slot, text) => self.append_text(slot, &text),
                SlotChange::PushApplication(record) => {
                    let mut records = self.applications().to_vec();
                    records.push(record);
                    self.set(Slot::Applications, SlotValue::Applications(records));
                }
            }
        }
    }

    fn append_text(&mut self, slot: Slot, text: &str) {
        let combined = match self.text(slot) {
            Some(existing) if !existing.trim().is_empty() => {
                format!("{}\n\n{text}", existing.trim_end())
            }
            _ => text.to_string(),
        };
        self.set(slot, SlotValue::Text(combined));
    }

    /// Slots currently present, in declaration order.
    pub fn present_slots(&self) -> Vec<Slot> {
        Slot::ALL.into_iter().filter(|s| self.has(*s)).collect()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
