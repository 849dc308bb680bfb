//! Paginated PDF export, built directly with `lopdf`.
//!
//! Pages use the standard Type1 Courier font, so no font program is embedded.
//! Text is reduced to ASCII before encoding.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use tracing::debug;

use crate::export::layout::{paginate, PageConfig};
use crate::export::text::to_text;
use crate::export::ExportError;
use crate::models::review::ReviewResult;

/// Renders a review as its text report laid out on pages.
pub fn to_pdf(result: &ReviewResult, config: &PageConfig) -> Result<Vec<u8>, ExportError> {
    let lines: Vec<String> = to_text(result).lines().map(str::to_string).collect();
    render_lines(&lines, config)
}

/// Word-wraps and paginates `lines`, then encodes them as a PDF document.
pub fn render_lines(lines: &[String], config: &PageConfig) -> Result<Vec<u8>, ExportError> {
    let pages = paginate(lines, config);
    let page_count = pages.len();

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(page_count);
    for (index, page_lines) in pages.iter().enumerate() {
        let content = page_content(page_lines, index + 1, page_count, config);
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => page_count as i64,
        "Resources" => resources_id,
        "MediaBox" => vec![
            0.into(),
            0.into(),
            config.page_width_pt.into(),
            config.page_height_pt.into(),
        ],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    debug!("Rendered {} line(s) onto {page_count} PDF page(s)", lines.len());
    Ok(bytes)
}

fn page_content(lines: &[String], page: usize, page_count: usize, config: &PageConfig) -> Content {
    let mut operations = vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), config.font_size_pt.into()]),
        Operation::new("TL", vec![config.leading_pt.into()]),
        Operation::new(
            "Td",
            vec![config.margin_pt.into(), config.first_baseline_pt().into()],
        ),
    ];
    for line in lines {
        operations.push(Operation::new(
            "Tj",
            vec![Object::string_literal(to_pdf_ascii(line))],
        ));
        operations.push(Operation::new("T*", vec![]));
    }
    operations.push(Operation::new("ET", vec![]));

    // footer
    operations.extend([
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), config.font_size_pt.into()]),
        Operation::new(
            "Td",
            vec![config.margin_pt.into(), (config.margin_pt * 0.5).into()],
        ),
        Operation::new(
            "Tj",
            vec![Object::string_literal(format!("Page {page} of {page_count}"))],
        ),
        Operation::new("ET", vec![]),
    ]);

    Content { operations }
}

/// Maps typographic characters to ASCII look-alikes; anything else outside
/// printable ASCII becomes '?'.
pub fn to_pdf_ascii(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    for c in line.chars() {
        match c {
            ' '..='~' => out.push(c),
            '\t' => out.push_str("    "),
            '•' | '▪' | '◦' | '·' | '‣' | '●' | '○' | '■' => out.push('-'),
            '–' | '—' | '‐' | '−' => out.push('-'),
            '‘' | '’' | '′' => out.push('\''),
            '“' | '”' | '″' => out.push('"'),
            '…' => out.push_str("..."),
            '\u{a0}' => out.push(' '),
            _ => out.push('?'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::Utc;

    use super::*;
    use crate::models::review::{FeedbackSource, SectionKind, SectionScore};

    fn page_count(bytes: &[u8]) -> usize {
        Document::load_mem(bytes).unwrap().get_pages().len()
    }

    #[test]
    fn test_render_lines_produces_loadable_pdf() {
        let bytes = render_lines(&["Hello".to_string()], &PageConfig::default()).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));
        assert_eq!(page_count(&bytes), 1);
    }

    #[test]
    fn test_render_lines_paginates() {
        let lines: Vec<String> = (0..120).map(|i| format!("line {i}")).collect();
        let bytes = render_lines(&lines, &PageConfig::default()).unwrap();
        assert_eq!(page_count(&bytes), 3);
    }

    #[test]
    fn test_to_pdf_renders_review() {
        let mut sections = BTreeMap::new();
        sections.insert(SectionKind::Structure, SectionScore::new(75.0, vec![]));
        let result = ReviewResult {
            id: "f00d".to_string(),
            target_role: None,
            jd_provided: true,
            keywords: vec![],
            found_keywords: vec![],
            missing_keywords: vec![],
            match_percentage: 100,
            sections,
            narrative: "Great resume — ship it…".to_string(),
            narrative_source: FeedbackSource::RuleBased,
            warnings: vec![],
            improved_draft: None,
            model: None,
            created_at: Utc::now(),
        };
        let bytes = to_pdf(&result, &PageConfig::default()).unwrap();
        assert_eq!(page_count(&bytes), 1);
    }

    #[test]
    fn test_to_pdf_ascii() {
        assert_eq!(to_pdf_ascii("• Led — “team” … 10×"), "- Led - \"team\" ... 10?");
        assert_eq!(to_pdf_ascii("plain (text)"), "plain (text)");
    }
}
