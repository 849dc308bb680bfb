//! Tone tables: weak openers, their stronger replacements, and first-person pronouns.

use crate::scoring::keywords::count_term;

/// Weak phrase → stronger action verb used by suggestions and the rule-based draft.
pub const WEAK_PHRASES: &[(&str, &str)] = &[
    ("responsible for", "Owned"),
    ("duties included", "Delivered"),
    ("tasked with", "Drove"),
    ("in charge of", "Led"),
    ("worked on", "Delivered"),
    ("participated in", "Contributed to"),
    ("involved in", "Contributed to"),
    ("was part of", "Collaborated on"),
    ("helped with", "Contributed to"),
    ("helped", "Contributed to"),
    ("assisted with", "Supported"),
    ("assisted", "Supported"),
];

pub const STRONG_VERBS: &[&str] = &[
    "Led",
    "Built",
    "Delivered",
    "Launched",
    "Reduced",
    "Increased",
    "Designed",
    "Automated",
];

const FIRST_PERSON: &[&str] = &["i", "me", "my", "myself"];

/// Weak phrases present in a normalized haystack, with their counts.
pub fn find_weak_phrases(haystack: &str) -> Vec<(&'static str, usize)> {
    WEAK_PHRASES
        .iter()
        // "helped with" / "assisted with" only refine rewriting; their base verb is counted.
        .filter(|(weak, _)| !weak.ends_with(" with") || weak.starts_with("tasked"))
        .filter_map(|(weak, _)| {
            let count = count_term(haystack, weak);
            (count > 0).then_some((*weak, count))
        })
        .collect()
}

pub fn count_first_person(haystack: &str) -> usize {
    FIRST_PERSON.iter().map(|p| count_term(haystack, p)).sum()
}

/// Rewrites a weak opener at the start of a line (after any bullet marker).
/// Lines without a weak opener are returned unchanged.
pub fn strengthen_line(line: &str) -> String {
    let body = line.trim_start();

    for (weak, strong) in WEAK_PHRASES {
        let Some(head) = body.get(..weak.len()) else {
            continue;
        };
        if !head.eq_ignore_ascii_case(weak) {
            continue;
        }
        let tail = &body[weak.len()..];
        if tail.chars().next().is_some_and(|c| c.is_alphanumeric()) {
            continue;
        }
        return format!("{strong}{tail}");
    }

    line.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::keywords::normalize_haystack;

    #[test]
    fn test_find_weak_phrases_counts_each() {
        let hay = normalize_haystack("Responsible for billing. Helped QA. helped ops.");
        let found = find_weak_phrases(&hay);
        assert!(found.contains(&("responsible for", 1)));
        assert!(found.contains(&("helped", 2)));
    }

    #[test]
    fn test_first_person_count() {
        let hay = normalize_haystack("I built my first compiler. Improved imports.");
        assert_eq!(count_first_person(&hay), 2);
    }

    #[test]
    fn test_strengthen_line_replaces_opener() {
        assert_eq!(
            strengthen_line("Responsible for the billing pipeline"),
            "Owned the billing pipeline"
        );
        assert_eq!(
            strengthen_line("helped with the AWS migration"),
            "Contributed to the AWS migration"
        );
    }

    #[test]
    fn test_strengthen_line_ignores_partial_words() {
        assert_eq!(strengthen_line("Helpedesk rollout"), "Helpedesk rollout");
        assert_eq!(strengthen_line("Built a CLI"), "Built a CLI");
    }
}
