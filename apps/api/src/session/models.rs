use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A decision-maker candidate parsed from a `Name | Title` line.
/// Nothing checks that the person exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    pub title: String,
}

impl fmt::Display for Contact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | {}", self.name, self.title)
    }
}

/// Resume and cover letter split out of one combined generation response.
/// `cover_letter` is empty when the response carried no separator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneratedDocuments {
    pub resume: String,
    pub cover_letter: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Applied,
    InterviewScheduled,
    Ghosted,
    Offer,
    Rejected,
}

/// One row of the per-session application ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub company: String,
    pub status: ApplicationStatus,
    pub note: Option<String>,
    pub logged_at: DateTime<Utc>,
}
