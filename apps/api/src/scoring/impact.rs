use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::scoring::keywords::{contains_term, normalize_haystack};

/// Result of checking one bullet (or sentence) for a quantified outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImpactCheck {
    pub quantified: bool,
    pub suggestions: Vec<String>,
}

const VAGUE_VERBS: &[&str] = &[
    "improved",
    "enhanced",
    "helped",
    "worked on",
    "assisted",
    "supported",
    "participated",
    "involved",
];

const VAGUE_SCALE_WORDS: &[&str] = &[
    "significant",
    "significantly",
    "major",
    "large",
    "huge",
    "massive",
    "substantial",
    "considerable",
    "many",
    "numerous",
    "various",
    "several",
];

/// Outcome words that quantify without digits.
const MULTIPLIER_WORDS: &[&str] = &["doubled", "tripled", "quadrupled", "halved"];

static YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:19|20)\d{2}\b").expect("year regex is valid"));

/// Checks a single line for impact quantification.
///
/// PASS conditions:
/// - contains a digit that is not part of a bare year (dates do not count)
/// - contains `%`, `$`, `€`, `£`
/// - contains a multiplier word (`doubled`, `halved`, ...)
///
/// FAIL suggestions name the first vague verb and the first vague scale word.
pub fn check_impact(text: &str) -> ImpactCheck {
    let text_lower = text.to_lowercase();
    let haystack = normalize_haystack(text);
    let without_years = YEAR_RE.replace_all(&text_lower, "");

    let has_digit = without_years.chars().any(|c| c.is_ascii_digit());
    let has_percent = text.contains('%');
    let has_currency = text.contains('$') || text.contains('€') || text.contains('£');
    let has_multiplier = MULTIPLIER_WORDS.iter().any(|w| text_lower.contains(w));

    if has_digit || has_percent || has_currency || has_multiplier {
        return ImpactCheck {
            quantified: true,
            suggestions: vec![],
        };
    }

    let mut suggestions = Vec::new();

    if let Some(vague) = VAGUE_VERBS.iter().find(|v| contains_term(&haystack, v)) {
        suggestions.push(format!(
            "Quantify '{vague}': how much? Add a number, percentage, or time saved."
        ));
    }

    if let Some(vague_scale) = VAGUE_SCALE_WORDS.iter().find(|w| contains_term(&haystack, w)) {
        suggestions.push(format!(
            "Replace '{vague_scale}' with a specific number or percentage."
        ));
    }

    if suggestions.is_empty() {
        suggestions.push(
            "Add a measurable outcome (number, %, time or money saved) to each achievement."
                .to_string(),
        );
    }

    ImpactCheck {
        quantified: false,
        suggestions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digits_pass() {
        assert!(check_impact("Cut build times by 40 minutes").quantified);
    }

    #[test]
    fn test_percent_and_currency_pass() {
        assert!(check_impact("Reduced churn by a third (%)").quantified);
        assert!(check_impact("Saved $ on hosting").quantified);
    }

    #[test]
    fn test_multiplier_word_passes() {
        assert!(check_impact("Doubled weekly active users").quantified);
    }

    #[test]
    fn test_bare_years_do_not_count() {
        let check = check_impact("Software Engineer, Acme 2019 - 2022");
        assert!(!check.quantified);
    }

    #[test]
    fn test_vague_verb_without_metric_fails() {
        let check = check_impact("Helped the team with deployments");
        assert!(!check.quantified);
        assert!(check.suggestions[0].contains("helped"));
    }

    #[test]
    fn test_vague_scale_word_flagged() {
        let check = check_impact("Delivered significant savings");
        assert!(!check.quantified);
        assert!(check.suggestions.iter().any(|s| s.contains("significant")));
    }

    #[test]
    fn test_vague_words_match_whole_words_only() {
        let check = check_impact("Majored in economics in Germany and enlarged the wiki");
        assert!(!check.quantified);
        assert_eq!(check.suggestions.len(), 1);
        assert!(check.suggestions[0].starts_with("Add a measurable outcome"));

        let check = check_impact("Grew revenue significantly");
        assert!(check.suggestions.iter().any(|s| s.contains("'significantly'")));
    }

    #[test]
    fn test_generic_failure_has_suggestion() {
        let check = check_impact("Wrote documentation");
        assert!(!check.quantified);
        assert_eq!(check.suggestions.len(), 1);
    }
}
