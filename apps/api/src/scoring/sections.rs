//! Section heuristics: structure, content, impact and tone scores for a resume.
//!
//! Every scorer returns 0 for empty text and clamps to 0–100.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::models::review::{SectionKind, SectionScore};
use crate::scoring::impact::check_impact;
use crate::scoring::keywords::{contains_term, normalize_haystack};
use crate::scoring::tone::{count_first_person, find_weak_phrases, STRONG_VERBS, WEAK_PHRASES};

const EMPTY_RESUME: &str = "Resume text is empty: paste your resume or upload a readable PDF.";

/// (label, weight, header aliases)
const HEADERS: &[(&str, f64, &[&str])] = &[
    (
        "Experience",
        25.0,
        &[
            "experience",
            "work experience",
            "professional experience",
            "employment",
            "employment history",
            "work history",
        ],
    ),
    ("Education", 20.0, &["education", "academic background", "qualifications"]),
    (
        "Skills",
        20.0,
        &["skills", "technical skills", "core competencies", "competencies", "technologies"],
    ),
    (
        "Summary",
        10.0,
        &["summary", "professional summary", "profile", "objective", "about me"],
    ),
    (
        "Projects",
        10.0,
        &["projects", "certifications", "certificates", "publications", "awards"],
    ),
];

const CONTACT_WEIGHT: f64 = 15.0;
const MAX_HEADER_WORDS: usize = 4;

const IDEAL_MIN_WORDS: usize = 300;
const IDEAL_MAX_WORDS: usize = 900;
const TARGET_BULLET_DENSITY: f64 = 0.3;

const IDEAL_MIN_SENTENCE_WORDS: f64 = 8.0;
const IDEAL_MAX_SENTENCE_WORDS: f64 = 22.0;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(?:\.[A-Za-z0-9-]+)+").expect("email regex is valid")
});

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\+?\d[\d\s().-]{7,}\d").expect("phone regex is valid"));

static NUMBERED_BULLET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,2}[.)]\s").expect("numbered bullet regex is valid"));

static SENTENCE_SPLIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+(?:\s+|$)|\n").expect("sentence regex is valid"));

const BULLET_MARKERS: &[char] = &['-', '*', '•', '▪', '◦', '·', '–', '‣', '●', '○', '■'];

/// Scores every section in `SectionKind::ALL`.
pub fn score_sections(text: &str) -> BTreeMap<SectionKind, SectionScore> {
    if text.trim().is_empty() {
        return SectionKind::ALL
            .into_iter()
            .map(|kind| (kind, SectionScore::zero(EMPTY_RESUME)))
            .collect();
    }

    let haystack = normalize_haystack(text);
    let lines: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();

    let mut sections = BTreeMap::new();
    sections.insert(SectionKind::Structure, score_structure(text, &haystack, &lines));
    sections.insert(SectionKind::Content, score_content(text, &lines));
    sections.insert(SectionKind::Impact, score_impact(text, &lines));
    sections.insert(SectionKind::Tone, score_tone(text, &haystack));
    sections
}

// ────────────────────────────────────────────────────────────────────────────
// Structure
// ────────────────────────────────────────────────────────────────────────────

fn score_structure(text: &str, haystack: &str, lines: &[&str]) -> SectionScore {
    let header_lines: Vec<String> = lines
        .iter()
        .filter_map(|line| header_candidate(line))
        .collect();

    let mut score = 0.0_f64;
    let mut suggestions = Vec::new();

    for (label, weight, aliases) in HEADERS {
        let as_header = header_lines
            .iter()
            .any(|h| aliases.iter().any(|alias| starts_with_term(h, alias)));
        if as_header {
            score += *weight;
            continue;
        }

        let mentioned = aliases.iter().any(|alias| contains_term(haystack, alias));
        if mentioned {
            score += weight / 2.0;
            suggestions.push(format!(
                "Put '{label}' on its own line as a section header so screening software can find it."
            ));
        } else {
            suggestions.push(format!("Add a clearly labelled {label} section."));
        }
    }

    if EMAIL_RE.is_match(text) || PHONE_RE.is_match(text) {
        score += CONTACT_WEIGHT;
    } else {
        suggestions.push("Add contact details (email and phone) at the top.".to_string());
    }

    SectionScore::new(score, suggestions)
}

/// Returns the lowercased header text when the line looks like a section header.
/// True when `header` opens with `alias` as whole words ("experience 2019",
/// not "experienced engineer").
fn starts_with_term(header: &str, alias: &str) -> bool {
    header
        .strip_prefix(alias)
        .is_some_and(|rest| !rest.starts_with(|c: char| c.is_alphanumeric() || c == '_'))
}

fn header_candidate(line: &str) -> Option<String> {
    let cleaned = line
        .trim_start_matches(|c: char| c == '#' || c.is_whitespace())
        .trim_end_matches(|c: char| c == ':' || c.is_whitespace())
        .to_lowercase();
    let words = cleaned.split_whitespace().count();
    (words > 0 && words <= MAX_HEADER_WORDS).then_some(cleaned)
}

// ────────────────────────────────────────────────────────────────────────────
// Content
// ────────────────────────────────────────────────────────────────────────────

fn score_content(text: &str, lines: &[&str]) -> SectionScore {
    let word_count = text.split_whitespace().count();
    let mut suggestions = Vec::new();

    let word_points = if word_count < IDEAL_MIN_WORDS {
        suggestions.push(format!(
            "Your resume is short ({word_count} words); aim for {IDEAL_MIN_WORDS}–{IDEAL_MAX_WORDS} words with concrete detail."
        ));
        60.0 * word_count as f64 / IDEAL_MIN_WORDS as f64
    } else if word_count <= IDEAL_MAX_WORDS {
        60.0
    } else {
        suggestions.push(format!(
            "Your resume is long ({word_count} words); trim older or less relevant items."
        ));
        (60.0 - (word_count - IDEAL_MAX_WORDS) as f64 / 20.0).max(30.0)
    };

    let bullets = lines.iter().filter(|l| is_bullet(l)).count();
    let density = if lines.is_empty() {
        0.0
    } else {
        bullets as f64 / lines.len() as f64
    };
    let bullet_points = (density / TARGET_BULLET_DENSITY).min(1.0) * 40.0;
    if density < TARGET_BULLET_DENSITY {
        suggestions.push(
            "Use bullet points for achievements instead of long paragraphs.".to_string(),
        );
    }

    SectionScore::new(word_points + bullet_points, suggestions)
}

pub fn is_bullet(line: &str) -> bool {
    let line = line.trim_start();
    line.starts_with(BULLET_MARKERS) || NUMBERED_BULLET_RE.is_match(line)
}

/// Strips a leading bullet marker (symbol or `1.` style) from a line.
pub fn strip_bullet(line: &str) -> &str {
    let line = line.trim_start();
    if let Some(m) = NUMBERED_BULLET_RE.find(line) {
        return line[m.end()..].trim_start();
    }
    line.trim_start_matches(BULLET_MARKERS).trim_start()
}

// ────────────────────────────────────────────────────────────────────────────
// Impact
// ────────────────────────────────────────────────────────────────────────────

fn score_impact(text: &str, lines: &[&str]) -> SectionScore {
    let bullets: Vec<&str> = lines
        .iter()
        .filter(|l| is_bullet(l))
        .map(|l| strip_bullet(l))
        .filter(|l| !l.is_empty())
        .collect();

    let units: Vec<&str> = if bullets.is_empty() {
        split_sentences(text)
            .into_iter()
            .filter(|s| s.split_whitespace().count() >= 3)
            .collect()
    } else {
        bullets
    };

    if units.is_empty() {
        return SectionScore::zero(
            "Describe your achievements as bullet points with measurable results.",
        );
    }

    let mut quantified = 0;
    let mut suggestions: Vec<String> = Vec::new();
    for unit in &units {
        let check = check_impact(unit);
        if check.quantified {
            quantified += 1;
            continue;
        }
        for suggestion in check.suggestions {
            if !suggestions.contains(&suggestion) {
                suggestions.push(suggestion);
            }
        }
    }
    suggestions.truncate(3);

    let share = quantified as f64 / units.len() as f64;
    if share < 0.5 {
        suggestions.push(format!(
            "Only {quantified} of {} achievements carry a metric; aim for at least half.",
            units.len()
        ));
    }

    SectionScore::new(share * 100.0, suggestions)
}

fn split_sentences(text: &str) -> Vec<&str> {
    SENTENCE_SPLIT_RE
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Tone
// ────────────────────────────────────────────────────────────────────────────

fn score_tone(text: &str, haystack: &str) -> SectionScore {
    let sentences = split_sentences(text);
    if sentences.is_empty() {
        return SectionScore::zero(EMPTY_RESUME);
    }

    let total_words: usize = sentences.iter().map(|s| s.split_whitespace().count()).sum();
    let average = total_words as f64 / sentences.len() as f64;

    let mut suggestions = Vec::new();

    let length_points = if average < IDEAL_MIN_SENTENCE_WORDS {
        suggestions.push(format!(
            "Lines average {average:.0} words; add context (what, how, result) to thin bullets."
        ));
        50.0 * average / IDEAL_MIN_SENTENCE_WORDS
    } else if average <= IDEAL_MAX_SENTENCE_WORDS {
        50.0
    } else {
        suggestions.push(format!(
            "Sentences average {average:.0} words; keep them under {IDEAL_MAX_SENTENCE_WORDS:.0}."
        ));
        (50.0 - (average - IDEAL_MAX_SENTENCE_WORDS) * 3.0).max(0.0)
    };

    let weak = find_weak_phrases(haystack);
    let weak_total: usize = weak.iter().map(|(_, count)| count).sum();
    let weak_points = (30.0 - 8.0 * weak_total as f64).max(0.0);
    for (phrase, _) in weak.iter().take(3) {
        let replacement = WEAK_PHRASES
            .iter()
            .find(|(w, _)| w == phrase)
            .map(|(_, strong)| *strong)
            .unwrap_or("Led");
        suggestions.push(format!(
            "Replace '{phrase}' with a direct action verb such as '{replacement}'."
        ));
    }

    let pronouns = count_first_person(haystack);
    let pronoun_points = (20.0 - 4.0 * pronouns as f64).max(0.0);
    if pronouns > 0 {
        suggestions.push(format!(
            "Drop first-person pronouns (I, me, my); start lines with an action verb ({}).",
            STRONG_VERBS[..4].join(", ")
        ));
    }

    SectionScore::new(length_points + weak_points + pronoun_points, suggestions)
}
