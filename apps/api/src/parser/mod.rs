//! Parser: turns uploaded documents and pasted text into normalized plain text.
//!
//! Line structure survives normalization: the section heuristics in `scoring`
//! look for header lines and bullet lines.

use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use thiserror::Error;
use tracing::debug;

const PDF_MAGIC: &[u8] = b"%PDF-";

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("document is not a PDF (missing %PDF- header)")]
    NotPdf,

    #[error("failed to extract PDF text: {0}")]
    Pdf(String),

    #[error("document is not valid UTF-8 text")]
    InvalidUtf8,

    #[error("invalid base64 payload: {0}")]
    Base64(String),
}

/// Returns true when the bytes carry the PDF magic header.
pub fn is_pdf(bytes: &[u8]) -> bool {
    // Some generators prepend whitespace or a BOM before the header.
    let head = &bytes[..bytes.len().min(1024)];
    head.windows(PDF_MAGIC.len()).any(|w| w == PDF_MAGIC)
}

/// Extracts raw text from an in-memory PDF.
pub fn extract_text_from_pdf(bytes: &[u8]) -> Result<String, ParseError> {
    if !is_pdf(bytes) {
        return Err(ParseError::NotPdf);
    }

    // pdf-extract panics on some malformed documents instead of returning an error.
    let text = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes))
        .map_err(|_| ParseError::Pdf("malformed document structure".to_string()))?
        .map_err(|e| ParseError::Pdf(e.to_string()))?;

    debug!("Extracted {} chars from {} byte PDF", text.len(), bytes.len());
    Ok(text)
}

/// Strict UTF-8 decode for plain-text uploads.
pub fn decode_text(bytes: &[u8]) -> Result<String, ParseError> {
    let text = std::str::from_utf8(bytes).map_err(|_| ParseError::InvalidUtf8)?;
    Ok(text.strip_prefix('\u{feff}').unwrap_or(text).to_string())
}

/// Parses a document of unknown kind: PDF when the magic header is present,
/// UTF-8 text otherwise. The result is normalized.
pub fn parse_document(bytes: &[u8]) -> Result<String, ParseError> {
    let raw = if is_pdf(bytes) {
        extract_text_from_pdf(bytes)?
    } else {
        decode_text(bytes)?
    };
    Ok(normalize_text(&raw))
}

/// Decodes a base64 PDF payload and returns its normalized text.
pub fn parse_pdf_base64(payload: &str) -> Result<String, ParseError> {
    let bytes = BASE64_STANDARD
        .decode(payload.trim())
        .map_err(|e| ParseError::Base64(e.to_string()))?;
    let raw = extract_text_from_pdf(&bytes)?;
    Ok(normalize_text(&raw))
}

/// Normalizes text for scoring.
///
/// - CRLF / CR become LF
/// - control and zero-width characters are dropped (tabs become spaces)
/// - runs of horizontal whitespace collapse to a single space, lines are trimmed
/// - runs of blank lines collapse to one blank line
pub fn normalize_text(text: &str) -> String {
    let unified = text.replace("\r\n", "\n").replace('\r', "\n");

    let mut lines: Vec<String> = Vec::new();
    let mut previous_blank = true;

    for line in unified.split('\n') {
        let collapsed = collapse_line(line);
        if collapsed.is_empty() {
            if !previous_blank {
                lines.push(String::new());
            }
            previous_blank = true;
        } else {
            lines.push(collapsed);
            previous_blank = false;
        }
    }

    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }

    lines.join("\n")
}

fn collapse_line(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut pending_space = false;

    for c in line.chars() {
        if is_zero_width(c) {
            continue;
        }
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if c.is_control() {
            continue;
        }
        if pending_space && !out.is_empty() {
            out.push(' ');
        }
        pending_space = false;
        out.push(c);
    }

    out
}

fn is_zero_width(c: char) -> bool {
    matches!(c, '\u{200b}' | '\u{200c}' | '\u{200d}' | '\u{2060}' | '\u{feff}')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_horizontal_whitespace() {
        let input = "Jane   Doe\t\tEngineer  ";
        assert_eq!(normalize_text(input), "Jane Doe Engineer");
    }

    #[test]
    fn test_normalize_keeps_lines_and_squashes_blank_runs() {
        let input = "\n\nEXPERIENCE\r\n\r\n\r\n- Built things\r\n\n\n\nSKILLS\n\n";
        assert_eq!(normalize_text(input), "EXPERIENCE\n\n- Built things\n\nSKILLS");
    }

    #[test]
    fn test_normalize_strips_control_and_zero_width_chars() {
        let input = "Py\u{0007}thon\u{200b} and\u{00a0}SQL\u{0000}";
        assert_eq!(normalize_text(input), "Python and SQL");
    }

    #[test]
    fn test_normalize_empty_and_whitespace_only() {
        assert_eq!(normalize_text(""), "");
        assert_eq!(normalize_text(" \n\t\n \r\n"), "");
    }

    #[test]
    fn test_is_pdf_detects_magic() {
        assert!(is_pdf(b"%PDF-1.7\n..."));
        assert!(is_pdf(b"\n\n%PDF-1.4"));
        assert!(!is_pdf(b"Jane Doe resume"));
        assert!(!is_pdf(b""));
    }

    #[test]
    fn test_extract_rejects_non_pdf_bytes() {
        let err = extract_text_from_pdf(b"plain text").unwrap_err();
        assert!(matches!(err, ParseError::NotPdf));
    }

    #[test]
    fn test_extract_reads_generated_pdf() {
        let bytes = crate::export::pdf::render_lines(
            &["Experienced in Python and SQL".to_string()],
            &crate::export::layout::PageConfig::default(),
        )
        .unwrap();
        let text = parse_document(&bytes).unwrap();
        assert!(text.contains("Python"), "extracted: {text:?}");
    }

    #[test]
    fn test_decode_text_rejects_invalid_utf8() {
        let err = decode_text(&[0xff, 0xfe, 0x00, 0x41]).unwrap_err();
        assert!(matches!(err, ParseError::InvalidUtf8));
    }

    #[test]
    fn test_decode_text_drops_bom() {
        assert_eq!(decode_text("\u{feff}Hello".as_bytes()).unwrap(), "Hello");
    }

    #[test]
    fn test_parse_document_plain_text_is_normalized() {
        let text = parse_document(b"  SKILLS \r\n Rust,   SQL ").unwrap();
        assert_eq!(text, "SKILLS\nRust, SQL");
    }

    #[test]
    fn test_parse_pdf_base64_rejects_bad_payload() {
        let err = parse_pdf_base64("not base64 at all!!").unwrap_err();
        assert!(matches!(err, ParseError::Base64(_)));
    }

    #[test]
    fn test_parse_pdf_base64_rejects_non_pdf_content() {
        let payload = BASE64_STANDARD.encode(b"just text");
        let err = parse_pdf_base64(&payload).unwrap_err();
        assert!(matches!(err, ParseError::NotPdf));
    }
}
