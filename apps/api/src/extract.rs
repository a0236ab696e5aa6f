//! Document text extraction for uploaded PDFs.
//!
//! Thin wrapper over `pdf-extract`. Parsing is CPU-bound and the parser can panic on
//! hostile input, so it runs inside `tokio::task::spawn_blocking` and a panic is
//! reported like any other unreadable document.

use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum ExtractionFailure {
    #[error("the document could not be parsed: {0}")]
    Unreadable(String),

    #[error("the document contains no extractable text")]
    NoText,
}

/// Extracts the text of every page, in document order.
pub async fn extract_text(document: Vec<u8>) -> Result<String, ExtractionFailure> {
    let size = document.len();
    let result = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&document))
        .await
        .map_err(|e| {
            warn!("PDF parser aborted: {e}");
            ExtractionFailure::Unreadable("the parser aborted".to_string())
        })?;

    let text = result.map_err(|e| ExtractionFailure::Unreadable(e.to_string()))?;
    let text = non_empty_text(text)?;
    info!("Extracted {} chars from a {size}-byte document", text.len());
    Ok(text)
}

fn non_empty_text(text: String) -> Result<String, ExtractionFailure> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ExtractionFailure::NoText);
    }
    Ok(trimmed.to_string())
}
