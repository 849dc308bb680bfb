//! Plain-text report. The narrative and the draft sit between marker lines so
//! they can be read back verbatim.

use crate::models::review::{FeedbackSource, ReviewResult};

pub const FEEDBACK_BLOCK: &str = "FEEDBACK";
pub const DRAFT_BLOCK: &str = "IMPROVED DRAFT";

fn begin_marker(block: &str) -> String {
    format!("----- BEGIN {block} -----")
}

fn end_marker(block: &str) -> String {
    format!("----- END {block} -----")
}

/// Header and list values are written on one line, so nothing before a
/// block can start a line with its marker.
fn one_line(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn list_or_dash(items: &[String]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        one_line(&items.join(", "))
    }
}

pub fn to_text(result: &ReviewResult) -> String {
    let mut out = String::new();

    out.push_str("RESUME REVIEW\n=============\n");
    out.push_str(&format!("Review ID: {}\n", result.id));
    out.push_str(&format!("Generated: {}\n", result.created_at.to_rfc3339()));
    out.push_str(&format!(
        "Target role: {}\n",
        result.target_role.as_deref().map(one_line).unwrap_or_else(|| "-".to_string())
    ));
    out.push_str(&format!(
        "Job description provided: {}\n",
        if result.jd_provided { "yes" } else { "no" }
    ));
    let source = match (result.narrative_source, result.model.as_deref()) {
        (FeedbackSource::Llm, Some(model)) => format!("LLM ({})", one_line(model)),
        (FeedbackSource::Llm, None) => "LLM".to_string(),
        (FeedbackSource::RuleBased, _) => "rule-based".to_string(),
    };
    out.push_str(&format!("Feedback source: {source}\n"));
    out.push_str(&format!("Overall score: {}/100\n", result.overall_score()));
    out.push_str(&format!("Keyword match: {}%\n", result.match_percentage));
    out.push_str(&format!("Found keywords: {}\n", list_or_dash(&result.found_keywords)));
    out.push_str(&format!(
        "Missing keywords: {}\n",
        list_or_dash(&result.missing_keywords)
    ));

    out.push_str("\nSECTION SCORES\n--------------\n");
    for (kind, section) in &result.sections {
        out.push_str(&format!("{}: {}/100\n", kind.title(), section.score));
        for suggestion in &section.suggestions {
            out.push_str(&format!("  - {}\n", one_line(suggestion)));
        }
    }

    if !result.warnings.is_empty() {
        out.push_str("\nNOTES\n-----\n");
        for warning in &result.warnings {
            out.push_str(&format!("- {}\n", one_line(warning)));
        }
    }

    push_block(&mut out, FEEDBACK_BLOCK, &result.narrative);
    if let Some(draft) = &result.improved_draft {
        push_block(&mut out, DRAFT_BLOCK, draft);
    }

    out
}

fn push_block(out: &mut String, block: &str, body: &str) {
    out.push('\n');
    out.push_str(&begin_marker(block));
    out.push('\n');
    out.push_str(body);
    out.push('\n');
    out.push_str(&end_marker(block));
    out.push('\n');
}

/// Body of a marked block, exactly as written by `to_text`. Markers only
/// count at the start of a line.
pub fn read_block(report: &str, block: &str) -> Option<String> {
    let begin = format!("\n{}\n", begin_marker(block));
    let end = format!("\n{}", end_marker(block));

    let start = report.find(&begin)? + begin.len();
    let len = report[start..].find(&end)?;
    Some(report[start..start + len].to_string())
}

pub fn read_narrative(report: &str) -> Option<String> {
    read_block(report, FEEDBACK_BLOCK)
}
