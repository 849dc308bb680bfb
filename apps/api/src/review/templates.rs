//! Rule-based narrative: the feedback text used when no LLM answer is available.
//!
//! `render_narrative` is pure: the same metrics and role always render the
//! same string.

use crate::models::review::{overall_score, SectionKind, SectionScore};
use crate::scoring::{build_recommendation, ReviewMetrics};

const MAX_NEXT_STEPS: usize = 4;
const MAX_SUGGESTIONS_PER_SECTION: usize = 3;

fn verdict(score: u8) -> &'static str {
    match score {
        80..=100 => "strong",
        60..=79 => "solid, with room to improve",
        40..=59 => "in need of work",
        _ => "weak",
    }
}

fn section_summary(kind: SectionKind, score: u8) -> &'static str {
    let strong = score >= 70;
    match (kind, strong) {
        (SectionKind::Structure, true) => "The standard sections are easy to find.",
        (SectionKind::Structure, false) => {
            "Recruiters may struggle to find the sections they scan for first."
        }
        (SectionKind::Content, true) => "Length and bullet use are in a good range.",
        (SectionKind::Content, false) => "The amount or shape of the content needs attention.",
        (SectionKind::Impact, true) => "Most achievements carry measurable results.",
        (SectionKind::Impact, false) => "Too few achievements show measurable results.",
        (SectionKind::Tone, true) => "The writing is direct and action-oriented.",
        (SectionKind::Tone, false) => "The wording reads passively in places.",
    }
}

/// Sections ordered weakest first; ties keep `SectionKind` order.
fn weakest_first(metrics: &ReviewMetrics) -> Vec<(SectionKind, &SectionScore)> {
    let mut ranked: Vec<(SectionKind, &SectionScore)> =
        metrics.sections.iter().map(|(k, s)| (*k, s)).collect();
    ranked.sort_by_key(|(kind, s)| (s.score, *kind));
    ranked
}

pub fn render_narrative(metrics: &ReviewMetrics, target_role: Option<&str>) -> String {
    let overall = overall_score(&metrics.sections);
    let mut out = String::new();

    match target_role {
        Some(role) => out.push_str(&format!(
            "Overall, this resume is {} for a {role} role ({overall}/100 across structure, content, impact and tone).\n\n",
            verdict(overall)
        )),
        None => out.push_str(&format!(
            "Overall, this resume is {} ({overall}/100 across structure, content, impact and tone).\n\n",
            verdict(overall)
        )),
    }

    out.push_str("Keyword match: ");
    out.push_str(&build_recommendation(
        metrics.match_percentage,
        &metrics.missing_keywords,
    ));
    out.push_str("\n\n");

    for (kind, section) in &metrics.sections {
        out.push_str(&format!(
            "{} ({}/100): {}\n",
            kind.title(),
            section.score,
            section_summary(*kind, section.score)
        ));
        for suggestion in section.suggestions.iter().take(MAX_SUGGESTIONS_PER_SECTION) {
            out.push_str(&format!("- {suggestion}\n"));
        }
        out.push('\n');
    }

    let steps = next_steps(metrics);
    if !steps.is_empty() {
        out.push_str("Next steps:\n");
        for (i, step) in steps.iter().enumerate() {
            out.push_str(&format!("{}. {step}\n", i + 1));
        }
    }

    out.trim_end().to_string()
}

/// Highest-leverage actions: weakest sections first, then missing keywords.
fn next_steps(metrics: &ReviewMetrics) -> Vec<String> {
    let mut steps: Vec<String> = Vec::new();

    for (_, section) in weakest_first(metrics) {
        if section.score >= 90 {
            continue;
        }
        if let Some(first) = section.suggestions.first() {
            if !steps.contains(first) {
                steps.push(first.clone());
            }
        }
        if steps.len() >= MAX_NEXT_STEPS - 1 {
            break;
        }
    }

    if !metrics.missing_keywords.is_empty() {
        let top: Vec<&str> = metrics
            .missing_keywords
            .iter()
            .take(5)
            .map(String::as_str)
            .collect();
        steps.push(format!(
            "Where it is true for you, mention {} explicitly.",
            top.join(", ")
        ));
    }

    steps.truncate(MAX_NEXT_STEPS);
    steps
}
