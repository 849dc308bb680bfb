//! Keyword extraction and matching.
//!
//! JD terms come from a plain tokenizer with stopword removal; role templates
//! contribute curated lists. Matching is case-insensitive on word boundaries.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Predefined target roles, each with a fixed keyword list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleTemplate {
    SoftwareEngineer,
    DataScientist,
    DataAnalyst,
    ProductManager,
    DevopsEngineer,
    UxDesigner,
    MarketingManager,
}

impl RoleTemplate {
    pub const ALL: [RoleTemplate; 7] = [
        RoleTemplate::SoftwareEngineer,
        RoleTemplate::DataScientist,
        RoleTemplate::DataAnalyst,
        RoleTemplate::ProductManager,
        RoleTemplate::DevopsEngineer,
        RoleTemplate::UxDesigner,
        RoleTemplate::MarketingManager,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            RoleTemplate::SoftwareEngineer => "Software Engineer",
            RoleTemplate::DataScientist => "Data Scientist",
            RoleTemplate::DataAnalyst => "Data Analyst",
            RoleTemplate::ProductManager => "Product Manager",
            RoleTemplate::DevopsEngineer => "DevOps Engineer",
            RoleTemplate::UxDesigner => "UX Designer",
            RoleTemplate::MarketingManager => "Marketing Manager",
        }
    }

    fn aliases(&self) -> &'static [&'static str] {
        match self {
            RoleTemplate::SoftwareEngineer => &[
                "software engineer",
                "software developer",
                "backend engineer",
                "backend developer",
                "full stack developer",
                "fullstack engineer",
                "swe",
            ],
            RoleTemplate::DataScientist => &["data scientist", "ml engineer", "machine learning engineer"],
            RoleTemplate::DataAnalyst => &["data analyst", "business analyst", "bi analyst"],
            RoleTemplate::ProductManager => &["product manager", "product owner", "pm"],
            RoleTemplate::DevopsEngineer => &[
                "devops engineer",
                "site reliability engineer",
                "sre",
                "platform engineer",
                "cloud engineer",
            ],
            RoleTemplate::UxDesigner => &["ux designer", "ui ux designer", "product designer", "ui designer"],
            RoleTemplate::MarketingManager => &["marketing manager", "digital marketer", "growth marketer"],
        }
    }

    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            RoleTemplate::SoftwareEngineer => &[
                "Python", "Java", "JavaScript", "SQL", "Git", "REST", "APIs", "Docker",
                "AWS", "CI/CD", "testing", "algorithms", "data structures", "microservices",
            ],
            RoleTemplate::DataScientist => &[
                "Python", "SQL", "machine learning", "statistics", "pandas", "scikit-learn",
                "TensorFlow", "PyTorch", "deep learning", "data visualization", "A/B testing",
                "feature engineering",
            ],
            RoleTemplate::DataAnalyst => &[
                "SQL", "Excel", "Tableau", "Power BI", "Python", "dashboards", "reporting",
                "statistics", "data cleaning", "KPIs", "stakeholders",
            ],
            RoleTemplate::ProductManager => &[
                "roadmap", "stakeholders", "user research", "metrics", "agile", "Jira",
                "prioritization", "A/B testing", "go-to-market", "requirements", "KPIs",
            ],
            RoleTemplate::DevopsEngineer => &[
                "Linux", "Docker", "Kubernetes", "Terraform", "AWS", "CI/CD", "monitoring",
                "Ansible", "Bash", "Prometheus", "incident response", "infrastructure as code",
            ],
            RoleTemplate::UxDesigner => &[
                "Figma", "wireframes", "prototyping", "user research", "usability testing",
                "design systems", "accessibility", "personas", "interaction design",
            ],
            RoleTemplate::MarketingManager => &[
                "SEO", "campaigns", "Google Analytics", "content strategy", "social media",
                "email marketing", "brand", "conversion", "budget", "CRM",
            ],
        }
    }

    /// Resolves free-text role input ("Sr. Software Engineer", "data_scientist")
    /// to a template. Exact snake_case names and aliases contained in the input
    /// both resolve.
    pub fn from_name(name: &str) -> Option<RoleTemplate> {
        let cleaned: String = name
            .to_lowercase()
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { ' ' })
            .collect();
        let cleaned = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
        if cleaned.is_empty() {
            return None;
        }

        RoleTemplate::ALL.into_iter().find(|role| {
            role.aliases().iter().any(|alias| {
                cleaned == *alias || contains_term(&cleaned, alias)
            })
        })
    }
}

/// Ordered set of terms; de-duplicated case-insensitively, first display form wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeywordSet {
    terms: Vec<String>,
}

impl KeywordSet {
    pub fn from_terms<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = KeywordSet::default();
        for term in terms {
            set.insert(term.as_ref());
        }
        set
    }

    /// Inserts a trimmed term; returns false for blanks and duplicates.
    pub fn insert(&mut self, term: &str) -> bool {
        let term = term.trim();
        if term.is_empty() || self.contains(term) {
            return false;
        }
        self.terms.push(term.to_string());
        true
    }

    pub fn contains(&self, term: &str) -> bool {
        let lower = term.trim().to_lowercase();
        self.terms.iter().any(|t| t.to_lowercase() == lower)
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Common English words plus job-posting filler that never make useful keywords.
const STOPWORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "again", "all", "also", "am", "an", "and", "any",
    "are", "as", "at", "be", "because", "been", "before", "being", "best", "between", "both",
    "but", "by", "can", "could", "did", "do", "does", "doing", "during", "each", "etc", "every",
    "few", "for", "from", "further", "had", "has", "have", "having", "he", "her", "here", "his",
    "how", "if", "in", "into", "is", "it", "its", "itself", "just", "may", "more", "most", "must",
    "my", "no", "nor", "not", "of", "off", "on", "once", "only", "or", "other", "our", "ours",
    "out", "over", "own", "per", "plus", "same", "she", "should", "so", "some", "such", "than",
    "that", "the", "their", "them", "then", "there", "these", "they", "this", "those", "through",
    "to", "too", "under", "until", "up", "us", "very", "via", "was", "we", "well", "were", "what",
    "when", "where", "which", "while", "who", "whom", "why", "will", "with", "within", "without",
    "would", "you", "your", "yours",
    // abbreviations that survive the dot handling
    "e.g", "i.e", "vs",
    // job-posting filler
    "ability", "able", "apply", "applicant", "applicants", "benefits", "bonus", "candidate",
    "candidates", "company", "competitive", "environment", "equal", "excellent", "experience",
    "experienced", "familiarity", "good", "great", "help", "ideal", "including", "join",
    "job", "knowledge", "like", "looking", "nice", "opportunity", "preferred", "proficiency",
    "proficient", "qualifications", "required", "requirements", "responsibilities", "role",
    "salary", "seeking", "skills", "strong", "team", "understanding", "using", "work",
    "working", "year", "years",
];

fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(&token)
}

/// Contraction endings dropped from a token, leaving the base word.
const CLITICS: &[&str] = &["'ll", "'re", "'ve", "'s", "'d", "'m"];

/// Reduces a token that carries an apostrophe. Negations ("don't") are
/// dropped entirely; other contractions keep their base word.
fn strip_clitic(token: &str) -> Option<String> {
    let token = token.trim_matches('\'');
    if !token.contains('\'') {
        return Some(token.to_string());
    }
    if token.ends_with("n't") {
        return None;
    }
    match CLITICS.iter().find_map(|clitic| token.strip_suffix(*clitic)) {
        Some(base) => Some(base.to_string()),
        None => Some(token.replace('\'', "")),
    }
}

fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase().replace('\u{2019}', "'");
    lower
        .split(|c: char| !(c.is_alphanumeric() || matches!(c, '+' | '#' | '.' | '&' | '\'')))
        .filter_map(|raw| {
            let token = strip_clitic(raw.trim_end_matches('.'))?;
            let token = token.trim_matches('&');
            let token = if token == ".net" {
                token
            } else {
                token.trim_start_matches('.')
            };
            keep_token(token).then(|| token.to_string())
        })
        .collect()
}

fn keep_token(token: &str) -> bool {
    if token.is_empty() || is_stopword(token) {
        return false;
    }
    if !token.chars().any(|c| c.is_alphabetic()) {
        return false;
    }
    token.chars().count() >= 2 || matches!(token, "c" | "r")
}

/// Builds the KeywordSet for a review: role template terms first, then up to
/// `max_jd_terms` JD terms ranked by frequency and restored to first-occurrence
/// order. `max_jd_terms == 0` disables the cap.
pub fn extract_keywords(
    jd_text: &str,
    role: Option<RoleTemplate>,
    max_jd_terms: usize,
) -> KeywordSet {
    let mut set = KeywordSet::default();

    if let Some(role) = role {
        for term in role.keywords() {
            set.insert(term);
        }
    }

    // token -> (frequency, first position)
    let mut stats: HashMap<String, (u32, usize)> = HashMap::new();
    for (position, token) in tokenize(jd_text).into_iter().enumerate() {
        stats
            .entry(token)
            .and_modify(|(freq, _)| *freq += 1)
            .or_insert((1, position));
    }

    let mut ranked: Vec<(String, u32, usize)> = stats
        .into_iter()
        .map(|(token, (freq, first))| (token, freq, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
    if max_jd_terms > 0 {
        ranked.truncate(max_jd_terms);
    }
    ranked.sort_by_key(|(_, _, first)| *first);

    for (token, _, _) in ranked {
        set.insert(&token);
    }

    set
}

/// Lowercases and collapses all whitespace so phrases match across line breaks.
pub fn normalize_haystack(text: &str) -> String {
    text.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// '+' and '#' extend a language name, so "c" must not match inside "c++".
fn extends_term(c: char) -> bool {
    is_word_char(c) || matches!(c, '+' | '#')
}

/// Counts occurrences of `term` in an already-normalized haystack where the
/// neighbours on both sides are not word characters. A trailing '+' or '#'
/// also counts as part of the word.
pub fn count_term(haystack: &str, term: &str) -> usize {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return 0;
    }

    haystack
        .match_indices(needle.as_str())
        .filter(|(idx, _)| {
            let before = haystack[..*idx].chars().next_back();
            let after = haystack[idx + needle.len()..].chars().next();
            !before.is_some_and(is_word_char) && !after.is_some_and(extends_term)
        })
        .count()
}

pub fn contains_term(haystack: &str, term: &str) -> bool {
    count_term(haystack, term) > 0
}
