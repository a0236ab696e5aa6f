//! Best-effort parsers for the three structured bits pulled out of model prose:
//! the company-name marker, `Name | Title` contact lines, and the resume/cover-letter
//! separator. None of them fail; a missing shape is `NotFound`.

use serde::Serialize;

use crate::session::{Contact, GeneratedDocuments};

/// Marker line the listing analysis is asked to end with.
pub const COMPANY_MARKER: &str = "COMPANY_NAME:";
/// Delimiter between a contact's name and title.
pub const CONTACT_DELIMITER: char = '|';
/// Token separating the resume from the cover letter in the combined response.
pub const DOCUMENT_SEPARATOR: &str = "===COVER_LETTER===";
/// Longest string still accepted as a company name.
pub const MAX_COMPANY_NAME_CHARS: usize = 80;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Extraction<T> {
    Found(T),
    NotFound,
}

impl<T> Extraction<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, Extraction::Found(_))
    }
}

/// Looks for the last line starting with `COMPANY_MARKER` (case-insensitive, markdown
/// emphasis tolerated) and returns its cleaned value.
///
/// Returns `None` when no marker line exists at all, so the caller can fall back to a
/// second extraction call; returns `Some(NotFound)` when the marker is there but its
/// value is unusable.
pub fn find_company_marker(report: &str) -> Option<Extraction<String>> {
    let marker = COMPANY_MARKER.to_ascii_lowercase();
    report.lines().rev().find_map(|line| {
        let line = line
            .trim()
            .trim_start_matches(|c: char| matches!(c, '*' | '#' | '-' | ' '));
        let head = line.get(..marker.len())?;
        if head.to_ascii_lowercase() != marker {
            return None;
        }
        Some(normalize_company_name(&line[marker.len()..]))
    })
}

/// Cleans a candidate company name. Empty, `UNKNOWN`/`N/A`, multi-line or overlong
/// values are `NotFound`.
pub fn normalize_company_name(raw: &str) -> Extraction<String> {
    let trimmed = raw.trim();
    if trimmed.contains('\n') {
        return Extraction::NotFound;
    }

    let cleaned = trimmed
        .trim_matches(|c: char| matches!(c, '*' | '"' | '\'' | '`' | '.' | ' '))
        .trim();

    let lowered = cleaned.to_ascii_lowercase();
    if cleaned.is_empty()
        || matches!(lowered.as_str(), "unknown" | "n/a" | "none" | "not specified")
        || cleaned.chars().count() > MAX_COMPANY_NAME_CHARS
    {
        return Extraction::NotFound;
    }

    Extraction::Found(cleaned.to_string())
}

/// Keeps only lines containing the delimiter; everything else is dropped silently.
pub fn parse_contacts(response: &str) -> Vec<Contact> {
    response
        .lines()
        .filter_map(|line| {
            let (name, title) = line.split_once(CONTACT_DELIMITER)?;
            Some(Contact {
                name: name.trim().to_string(),
                title: title.trim().to_string(),
            })
        })
        .collect()
}

/// Splits the combined response on the first separator into two trimmed halves.
pub fn split_on_separator(response: &str) -> Extraction<(String, String)> {
    match response.split_once(DOCUMENT_SEPARATOR) {
        Some((resume, cover_letter)) => Extraction::Found((
            resume.trim().to_string(),
            cover_letter.trim().to_string(),
        )),
        None => Extraction::NotFound,
    }
}

/// Without a separator the whole response is the resume and the cover letter is empty.
pub fn split_documents(response: &str) -> GeneratedDocuments {
    match split_on_separator(response) {
        Extraction::Found((resume, cover_letter)) => GeneratedDocuments {
            resume,
            cover_letter,
        },
        Extraction::NotFound => GeneratedDocuments {
            resume: response.trim().to_string(),
            cover_letter: String::new(),
        },
    }
}
