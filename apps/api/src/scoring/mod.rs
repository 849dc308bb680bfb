//! Scoring: keyword match and section heuristics for a resume.
//!
//! Pure and deterministic: the same resume and KeywordSet always produce the
//! same `ReviewMetrics`. No LLM involvement.

pub mod impact;
pub mod keywords;
pub mod sections;
pub mod tone;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::review::{SectionKind, SectionScore};
use crate::scoring::keywords::{contains_term, normalize_haystack, KeywordSet};

pub use keywords::{extract_keywords, RoleTemplate};

/// Structured metrics handed to the reviewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewMetrics {
    pub keywords: KeywordSet,
    pub found_keywords: Vec<String>,
    /// KeywordSet minus found terms, in KeywordSet order.
    pub missing_keywords: Vec<String>,
    pub match_percentage: u8, // 0 – 100
    pub sections: BTreeMap<SectionKind, SectionScore>,
}

/// Keyword side of the metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordMatch {
    pub found: Vec<String>,
    pub missing: Vec<String>,
    pub match_percentage: u8,
}

/// Scores a resume against a KeywordSet.
///
/// An empty KeywordSet has no requirements to miss, so it matches 100%.
pub fn score(resume_text: &str, keywords: &KeywordSet) -> ReviewMetrics {
    let keyword_match = compute_keyword_match(resume_text, keywords);

    ReviewMetrics {
        keywords: keywords.clone(),
        found_keywords: keyword_match.found,
        missing_keywords: keyword_match.missing,
        match_percentage: keyword_match.match_percentage,
        sections: sections::score_sections(resume_text),
    }
}

/// match_percentage = round(found / |K| × 100)
pub fn compute_keyword_match(resume_text: &str, keywords: &KeywordSet) -> KeywordMatch {
    if keywords.is_empty() {
        return KeywordMatch {
            found: vec![],
            missing: vec![],
            match_percentage: 100,
        };
    }

    let haystack = normalize_haystack(resume_text);
    let (found, missing): (Vec<String>, Vec<String>) = keywords
        .terms()
        .iter()
        .cloned()
        .partition(|term| contains_term(&haystack, term));

    let match_percentage =
        ((found.len() as f64 / keywords.len() as f64) * 100.0).round().clamp(0.0, 100.0) as u8;

    KeywordMatch {
        found,
        missing,
        match_percentage,
    }
}

/// One-line verdict on the keyword match.
pub fn build_recommendation(match_percentage: u8, missing: &[String]) -> String {
    let top_missing: Vec<&str> = missing.iter().take(5).map(String::as_str).collect();

    if missing.is_empty() {
        "Strong keyword coverage: every target keyword appears in your resume.".to_string()
    } else if match_percentage >= 75 {
        format!(
            "Good keyword coverage ({match_percentage}%). Consider adding: {}.",
            top_missing.join(", ")
        )
    } else if match_percentage >= 50 {
        format!(
            "Moderate keyword coverage ({match_percentage}%). Work these in where they are true for you: {}.",
            top_missing.join(", ")
        )
    } else {
        format!(
            "Low keyword coverage ({match_percentage}%). Significant gaps: {}. Tailor your resume to the role before applying.",
            top_missing.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keywords(terms: &[&str]) -> KeywordSet {
        KeywordSet::from_terms(terms.iter().copied())
    }

    #[test]
    fn test_python_sql_aws_example() {
        let metrics = score("Experienced in Python and SQL", &keywords(&["Python", "SQL", "AWS"]));
        assert_eq!(metrics.match_percentage, 67);
        assert_eq!(metrics.missing_keywords, vec!["AWS".to_string()]);
        assert_eq!(metrics.found_keywords, vec!["Python".to_string(), "SQL".to_string()]);
    }

    #[test]
    fn test_empty_resume_misses_everything() {
        let k = keywords(&["Rust", "Kafka", "gRPC"]);
        let metrics = score("", &k);
        assert_eq!(metrics.match_percentage, 0);
        assert_eq!(metrics.missing_keywords, k.terms().to_vec());
        assert!(metrics.found_keywords.is_empty());
        assert!(metrics.sections.values().all(|s| s.score == 0));
    }

    #[test]
    fn test_all_terms_present_is_100() {
        let metrics = score(
            "Rust services on Kubernetes with Kafka",
            &keywords(&["rust", "KAFKA", "kubernetes"]),
        );
        assert_eq!(metrics.match_percentage, 100);
        assert!(metrics.missing_keywords.is_empty());
    }

    #[test]
    fn test_empty_keyword_set_is_full_match() {
        let metrics = score("Anything at all", &KeywordSet::default());
        assert_eq!(metrics.match_percentage, 100);
        assert!(metrics.missing_keywords.is_empty());
    }

    #[test]
    fn test_missing_is_subset_and_disjoint_from_found() {
        let k = keywords(&["Go", "Java", "Docker", "Terraform", "Linux", "C++"]);
        let metrics = score("Go and Docker on Linux; some JavaScript", &k);
        for term in &metrics.missing_keywords {
            assert!(k.contains(term));
            assert!(!metrics.found_keywords.contains(term));
        }
        assert_eq!(
            metrics.found_keywords.len() + metrics.missing_keywords.len(),
            k.len()
        );
        // "Java" must not match inside "JavaScript"
        assert!(metrics.missing_keywords.contains(&"Java".to_string()));
        assert!(metrics.match_percentage <= 100);
    }

    #[test]
    fn test_missing_preserves_keyword_order() {
        let k = keywords(&["zeta", "alpha", "mid", "beta"]);
        let metrics = score("mid", &k);
        assert_eq!(metrics.missing_keywords, vec!["zeta", "alpha", "beta"]);
    }

    #[test]
    fn test_recommendation_tiers() {
        assert!(build_recommendation(100, &[]).contains("Strong"));
        let missing = vec!["Kafka".to_string()];
        assert!(build_recommendation(80, &missing).contains("Kafka"));
        assert!(build_recommendation(60, &missing).contains("60%"));
        let low = build_recommendation(20, &missing);
        assert!(low.contains("Low") && low.contains("Kafka"));
    }
}
