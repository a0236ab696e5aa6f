//! Character sanitization for the base-14 PDF fonts.
//!
//! Typographic punctuation is first mapped to ASCII through a fixed table, then every
//! character outside Latin-1 is dropped. The mapping is lossy and silent, and applying
//! it twice gives the same result as applying it once.

/// Fixed substitution table. Every replacement is plain ASCII.
pub const SUBSTITUTIONS: [(char, &str); 8] = [
    ('\u{2013}', "-"),   // en dash
    ('\u{2014}', "--"),  // em dash
    ('\u{2018}', "'"),   // left single quote
    ('\u{2019}', "'"),   // right single quote
    ('\u{201C}', "\""),  // left double quote
    ('\u{201D}', "\""),  // right double quote
    ('\u{2022}', "-"),   // bullet
    ('\u{2026}', "..."), // ellipsis
];

/// Highest code point the fonts can encode.
const MAX_SUPPORTED: char = '\u{FF}';

pub fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match SUBSTITUTIONS.iter().find(|(from, _)| *from == c) {
            Some((_, to)) => out.push_str(to),
            None if c <= MAX_SUPPORTED => out.push(c),
            None => {}
        }
    }
    out
}
