//! Single-column page layout for generated documents.
//!
//! Each source line is classified as a heading (markdown `#` prefix or ALL CAPS) or
//! body text, greedily word-wrapped to the text width using the static font tables,
//! and placed top-down. A line that would cross the bottom margin starts a new page.

use serde::Serialize;

use crate::render::font_metrics::PdfFont;

const MM_TO_PT: f32 = 72.0 / 25.4;

/// Page geometry and type sizes, all in points.
#[derive(Debug, Clone, Serialize)]
pub struct PageConfig {
    pub width_pt: f32,
    pub height_pt: f32,
    pub margin_pt: f32,
    pub body_size_pt: f32,
    pub body_leading_pt: f32,
    pub heading_size_pt: f32,
    pub heading_leading_pt: f32,
}

impl PageConfig {
    pub fn text_width_pt(&self) -> f32 {
        self.width_pt - 2.0 * self.margin_pt
    }
}

/// A4 portrait, 20 mm margins, Helvetica 11/14 body and Helvetica-Bold 13/18 headings.
pub fn default_page_config() -> PageConfig {
    PageConfig {
        width_pt: 595.28,
        height_pt: 841.89,
        margin_pt: 20.0 * MM_TO_PT,
        body_size_pt: 11.0,
        body_leading_pt: 14.0,
        heading_size_pt: 13.0,
        heading_leading_pt: 18.0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LineStyle {
    Heading,
    Body,
}

impl LineStyle {
    pub fn font(&self) -> PdfFont {
        match self {
            LineStyle::Heading => PdfFont::HelveticaBold,
            LineStyle::Body => PdfFont::Helvetica,
        }
    }

    fn size_and_leading(&self, config: &PageConfig) -> (f32, f32) {
        match self {
            LineStyle::Heading => (config.heading_size_pt, config.heading_leading_pt),
            LineStyle::Body => (config.body_size_pt, config.body_leading_pt),
        }
    }
}

/// One printed line at its final position. `y` is the baseline, measured from the
/// bottom edge as PDF coordinates are.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedLine {
    pub text: String,
    pub style: LineStyle,
    pub size_pt: f32,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PageLayout {
    pub lines: Vec<PlacedLine>,
}

/// Splits a source line into its style and display text.
pub fn classify(line: &str) -> (LineStyle, String) {
    let trimmed = line.trim();
    if trimmed.starts_with('#') {
        let text = trimmed.trim_start_matches('#').trim();
        return (LineStyle::Heading, strip_emphasis(text));
    }

    let text = strip_emphasis(trimmed);
    let has_letter = text.chars().any(char::is_alphabetic);
    let has_lower = text.chars().any(char::is_lowercase);
    if has_letter && !has_lower {
        (LineStyle::Heading, text)
    } else {
        (LineStyle::Body, text)
    }
}

fn strip_emphasis(text: &str) -> String {
    text.replace("**", "")
        .chars()
        .map(|c| if c == '\t' { ' ' } else { c })
        .filter(|c| !c.is_control())
        .collect()
}

/// Greedy word wrap. Words wider than the line are broken between characters.
pub fn wrap(text: &str, font: PdfFont, size_pt: f32, max_width_pt: f32) -> Vec<String> {
    let metrics = font.metrics();
    let space = metrics.space_width * size_pt;
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0.0_f32;

    for word in text.split_whitespace() {
        let word_width = metrics.measure_pt(word, size_pt);

        if word_width > max_width_pt {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            for piece in break_word(word, font, size_pt, max_width_pt) {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                current_width = metrics.measure_pt(&piece, size_pt);
                current = piece;
            }
            continue;
        }

        if current.is_empty() {
            current.push_str(word);
            current_width = word_width;
        } else if current_width + space + word_width <= max_width_pt {
            current.push(' ');
            current.push_str(word);
            current_width += space + word_width;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
            current_width = word_width;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn break_word(word: &str, font: PdfFont, size_pt: f32, max_width_pt: f32) -> Vec<String> {
    let metrics = font.metrics();
    let mut pieces = Vec::new();
    let mut piece = String::new();

    for c in word.chars() {
        piece.push(c);
        if piece.chars().count() > 1 && metrics.measure_pt(&piece, size_pt) > max_width_pt {
            piece.pop();
            pieces.push(std::mem::take(&mut piece));
            piece.push(c);
        }
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}

/// Lays out one document starting on a fresh page. Always returns at least one page.
pub fn layout_document(text: &str, config: &PageConfig) -> Vec<PageLayout> {
    let top = config.height_pt - config.margin_pt;
    let mut pages = Vec::new();
    let mut page = PageLayout::default();
    let mut cursor = top;

    for source in text.lines() {
        if source.trim().is_empty() {
            cursor -= config.body_leading_pt / 2.0;
            continue;
        }

        let (style, content) = classify(source);
        let (size, leading) = style.size_and_leading(config);
        for line in wrap(&content, style.font(), size, config.text_width_pt()) {
            if cursor - leading < config.margin_pt {
                pages.push(std::mem::take(&mut page));
                cursor = top;
            }
            page.lines.push(PlacedLine {
                text: line,
                style,
                size_pt: size,
                x: config.margin_pt,
                y: cursor - size,
            });
            cursor -= leading;
        }
    }

    pages.push(page);
    pages
}
