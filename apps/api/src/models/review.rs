use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The closed set of resume sections that receive an independent score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Structure,
    Content,
    Impact,
    Tone,
}

impl SectionKind {
    pub const ALL: [SectionKind; 4] = [
        SectionKind::Structure,
        SectionKind::Content,
        SectionKind::Impact,
        SectionKind::Tone,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::Structure => "structure",
            SectionKind::Content => "content",
            SectionKind::Impact => "impact",
            SectionKind::Tone => "tone",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            SectionKind::Structure => "Structure",
            SectionKind::Content => "Content",
            SectionKind::Impact => "Impact",
            SectionKind::Tone => "Tone",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionScore {
    pub score: u8, // 0 – 100
    pub suggestions: Vec<String>,
}

impl SectionScore {
    pub fn new(score: f64, suggestions: Vec<String>) -> Self {
        Self {
            score: score.round().clamp(0.0, 100.0) as u8,
            suggestions,
        }
    }

    pub fn zero(suggestion: &str) -> Self {
        Self {
            score: 0,
            suggestions: vec![suggestion.to_string()],
        }
    }
}

/// Where the narrative text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackSource {
    Llm,
    RuleBased,
}

/// The aggregate output of one review. Built once per request and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewResult {
    /// Content fingerprint of resume + role + job description.
    pub id: String,
    pub target_role: Option<String>,
    pub jd_provided: bool,
    pub keywords: Vec<String>,
    pub found_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub match_percentage: u8, // 0 – 100
    pub sections: BTreeMap<SectionKind, SectionScore>,
    pub narrative: String,
    pub narrative_source: FeedbackSource,
    /// Non-fatal notes, e.g. why the LLM path fell back to templates.
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub improved_draft: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Unweighted mean of the section scores; 0 when there are none.
pub fn overall_score(sections: &BTreeMap<SectionKind, SectionScore>) -> u8 {
    if sections.is_empty() {
        return 0;
    }
    let total: u32 = sections.values().map(|s| s.score as u32).sum();
    ((total as f64) / (sections.len() as f64)).round() as u8
}

impl ReviewResult {
    pub fn overall_score(&self) -> u8 {
        overall_score(&self.sections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_kind_serde_snake_case() {
        let json = serde_json::to_string(&SectionKind::Structure).unwrap();
        assert_eq!(json, r#""structure""#);
        let kind: SectionKind = serde_json::from_str(r#""tone""#).unwrap();
        assert_eq!(kind, SectionKind::Tone);
    }

    #[test]
    fn test_section_score_is_clamped() {
        assert_eq!(SectionScore::new(140.0, vec![]).score, 100);
        assert_eq!(SectionScore::new(-3.0, vec![]).score, 0);
        assert_eq!(SectionScore::new(66.6, vec![]).score, 67);
    }

    #[test]
    fn test_sections_serialize_as_named_map() {
        let mut sections = BTreeMap::new();
        sections.insert(SectionKind::Impact, SectionScore::new(50.0, vec![]));
        let json = serde_json::to_value(&sections).unwrap();
        assert_eq!(json["impact"]["score"], 50);
    }

    #[test]
    fn test_overall_score_is_mean_of_sections() {
        let mut sections = BTreeMap::new();
        assert_eq!(overall_score(&sections), 0);
        sections.insert(SectionKind::Structure, SectionScore::new(80.0, vec![]));
        sections.insert(SectionKind::Tone, SectionScore::new(55.0, vec![]));
        assert_eq!(overall_score(&sections), 68);
    }

    #[test]
    fn test_feedback_source_serde() {
        let json = serde_json::to_string(&FeedbackSource::RuleBased).unwrap();
        assert_eq!(json, r#""rule_based""#);
    }
}
