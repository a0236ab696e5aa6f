//! Turns the assembled resume and cover letter into a downloadable PDF.
//!
//! Pipeline: `sanitize` -> `layout_document` -> `write_pdf`. Sanitization is lossy
//! and runs before measuring so wrapped widths match what is printed.

pub mod font_metrics;
pub mod layout;
pub mod pdf;
pub mod sanitize;

use serde::Deserialize;

pub use layout::{default_page_config, PageConfig};

pub const PDF_FILENAME: &str = "Jobberly_Application.pdf";

/// Which documents go into the rendered file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    Resume,
    CoverLetter,
    #[default]
    Both,
}

pub fn render(resume: &str, cover_letter: &str, mode: RenderMode, config: &PageConfig) -> Vec<u8> {
    let resume = sanitize::sanitize(resume);
    let cover_letter = sanitize::sanitize(cover_letter);

    let pages = match mode {
        RenderMode::Resume => layout::layout_document(&resume, config),
        RenderMode::CoverLetter => layout::layout_document(&cover_letter, config),
        RenderMode::Both => {
            let mut pages = layout::layout_document(&resume, config);
            if !cover_letter.trim().is_empty() {
                pages.extend(layout::layout_document(&cover_letter, config));
            }
            pages
        }
    };

    pdf::write_pdf(&pages, config)
}
