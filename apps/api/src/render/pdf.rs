//! Minimal PDF 1.4 writer for laid-out pages.
//!
//! Only what the renderer needs: the two base-14 Helvetica fonts with
//! `WinAnsiEncoding`, one uncompressed content stream per page, and a classic xref
//! table. Text must already be sanitized to Latin-1.

use crate::render::font_metrics::PdfFont;
use crate::render::layout::{PageConfig, PageLayout};

const FONTS: [PdfFont; 2] = [PdfFont::Helvetica, PdfFont::HelveticaBold];

struct PdfWriter {
    buf: Vec<u8>,
    /// Byte offset of each object, indexed by object number - 1.
    offsets: Vec<usize>,
}

impl PdfWriter {
    fn new() -> Self {
        let mut writer = Self {
            buf: Vec::new(),
            offsets: Vec::new(),
        };
        writer.push_str("%PDF-1.4\n");
        // Binary marker comment so transfer tools treat the file as binary.
        writer.buf.extend_from_slice(b"%\xE2\xE3\xCF\xD3\n");
        writer
    }

    fn push_str(&mut self, s: &str) {
        self.buf.extend_from_slice(s.as_bytes());
    }

    fn object(&mut self, number: usize, body: &[u8]) {
        if self.offsets.len() < number {
            self.offsets.resize(number, 0);
        }
        self.offsets[number - 1] = self.buf.len();
        self.push_str(&format!("{number} 0 obj\n"));
        self.buf.extend_from_slice(body);
        self.push_str("\nendobj\n");
    }

    fn finish(mut self, root: usize) -> Vec<u8> {
        let xref_offset = self.buf.len();
        let size = self.offsets.len() + 1;
        self.push_str(&format!("xref\n0 {size}\n0000000000 65535 f \n"));
        let entries: String = self
            .offsets
            .iter()
            .map(|offset| format!("{offset:010} 00000 n \n"))
            .collect();
        self.push_str(&entries);
        self.push_str(&format!(
            "trailer\n<< /Size {size} /Root {root} 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n"
        ));
        self.buf
    }
}

/// Encodes a Latin-1 string as a PDF literal string, escaping delimiters.
/// Characters above U+00FF are skipped.
fn literal(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len() + 2);
    out.push(b'(');
    for c in text.chars() {
        let Ok(byte) = u8::try_from(u32::from(c)) else {
            continue;
        };
        if matches!(byte, b'(' | b')' | b'\\') {
            out.push(b'\\');
        }
        out.push(byte);
    }
    out.push(b')');
    out
}

fn content_stream(page: &PageLayout) -> Vec<u8> {
    let mut stream = Vec::new();
    for line in &page.lines {
        let font = line.style.font();
        stream.extend_from_slice(
            format!(
                "BT /{} {:.1} Tf {:.2} {:.2} Td ",
                font.resource(),
                line.size_pt,
                line.x,
                line.y
            )
            .as_bytes(),
        );
        stream.extend_from_slice(&literal(&line.text));
        stream.extend_from_slice(b" Tj ET\n");
    }
    stream
}

/// Serializes pages into a complete PDF document.
///
/// Object layout: 1 catalog, 2 page tree, 3..=4 fonts, then a (page, content) pair
/// per page.
pub fn write_pdf(pages: &[PageLayout], config: &PageConfig) -> Vec<u8> {
    let mut writer = PdfWriter::new();
    let first_page_object = 3 + FONTS.len();
    let page_numbers: Vec<usize> = (0..pages.len())
        .map(|i| first_page_object + 2 * i)
        .collect();

    writer.object(1, b"<< /Type /Catalog /Pages 2 0 R >>");

    let kids: Vec<String> = page_numbers.iter().map(|n| format!("{n} 0 R")).collect();
    writer.object(
        2,
        format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            pages.len()
        )
        .as_bytes(),
    );

    for (i, font) in FONTS.iter().enumerate() {
        writer.object(
            3 + i,
            format!(
                "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
                font.base_font()
            )
            .as_bytes(),
        );
    }

    let font_resources: Vec<String> = FONTS
        .iter()
        .enumerate()
        .map(|(i, font)| format!("/{} {} 0 R", font.resource(), 3 + i))
        .collect();
    let resources = format!("<< /Font << {} >> >>", font_resources.join(" "));

    for (page, number) in pages.iter().zip(&page_numbers) {
        writer.object(
            *number,
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] /Resources {resources} /Contents {} 0 R >>",
                config.width_pt,
                config.height_pt,
                number + 1
            )
            .as_bytes(),
        );

        let stream = content_stream(page);
        let mut body = format!("<< /Length {} >>\nstream\n", stream.len()).into_bytes();
        body.extend_from_slice(&stream);
        body.extend_from_slice(b"\nendstream");
        writer.object(number + 1, &body);
    }

    writer.finish(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::layout::{default_page_config, layout_document};

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    #[test]
    fn test_literal_escapes_delimiters() {
        assert_eq!(literal(r"a(b)c\d"), br"(a\(b\)c\\d)".to_vec());
    }

    #[test]
    fn test_literal_encodes_latin1_as_single_bytes() {
        assert_eq!(literal("caf\u{E9}"), b"(caf\xE9)".to_vec());
        assert_eq!(literal("x\u{2014}y"), b"(xy)".to_vec());
    }

    #[test]
    fn test_document_structure() {
        let config = default_page_config();
        let pages = layout_document("# Jane Doe\nBuilt (and shipped) things", &config);
        let pdf = write_pdf(&pages, &config);

        assert!(pdf.starts_with(b"%PDF-1.4\n"));
        assert!(pdf.ends_with(b"%%EOF\n"));
        assert!(contains(&pdf, b"/BaseFont /Helvetica-Bold"));
        assert!(contains(&pdf, b"/Count 1"));
        assert!(contains(&pdf, br"(Built \(and shipped\) things) Tj"));
        assert!(contains(&pdf, b"/F2 13.0 Tf"));
    }

    #[test]
    fn test_xref_offsets_point_at_objects() {
        let config = default_page_config();
        let text = (0..120).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n");
        let pages = layout_document(&text, &config);
        assert!(pages.len() > 1);
        let pdf = write_pdf(&pages, &config);

        let text = String::from_utf8_lossy(&pdf);
        let xref_start = text.find("xref\n").unwrap();
        let entries: Vec<usize> = text[xref_start..]
            .lines()
            .skip(3)
            .take_while(|l| l.ends_with(" n "))
            .map(|l| l[..10].parse().unwrap())
            .collect();

        let expected_objects = 2 + FONTS.len() + 2 * pages.len();
        assert_eq!(entries.len(), expected_objects);
        for (i, offset) in entries.iter().enumerate() {
            let header = format!("{} 0 obj", i + 1);
            assert!(pdf[*offset..].starts_with(header.as_bytes()));
        }
    }
}
