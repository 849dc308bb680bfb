//! Reviewer: turns a `ReviewRequest` into a `ReviewResult`.
//!
//! Narrative path per request:
//!
//! ```text
//! use_llm && provider available ──► LlmAttempt ──ok──► LlmSuccess
//!                                        └──err──► LlmFailureFallback
//! otherwise ─────────────────────► RuleBasedDirect
//! ```
//!
//! Every path ends in a populated `ReviewResult`. Provider errors only ever
//! surface as warnings.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use chrono::Utc;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::errors::AppError;
use crate::fingerprint::review_fingerprint;
use crate::llm_client::{strip_json_fences, GenerationRequest, LlmError, LlmProvider};
use crate::models::review::{FeedbackSource, ReviewResult, SectionKind, SectionScore};
use crate::parser::{normalize_text, parse_pdf_base64};
use crate::review::draft::build_draft;
use crate::review::prompts::{build_review_prompt, review_system};
use crate::review::templates::render_narrative;
use crate::scoring::{self, extract_keywords, ReviewMetrics, RoleTemplate};

const MAX_SUGGESTIONS_PER_SECTION: usize = 6;

const EMPTY_RESUME_MESSAGE: &str =
    "Resume text is empty: paste your resume or upload a readable PDF.";
const MISSING_TARGET_MESSAGE: &str = "Provide a target role or a job description.";
const EMPTY_KEYWORDS_WARNING: &str = "No keywords could be derived from the target role or job \
    description; keyword match is reported as 100%.";
const OFFLINE_WARNING: &str =
    "No LLM provider is configured (OPENAI_API_KEY unset); feedback is rule-based.";

/// Body of `POST /api/v1/reviews`. A PDF wins over pasted text.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReviewRequest {
    pub resume_text: Option<String>,
    pub resume_pdf_base64: Option<String>,
    pub target_role: Option<String>,
    pub job_description: Option<String>,
    pub jd_pdf_base64: Option<String>,
    pub use_llm: bool,
    pub include_draft: bool,
}

impl Default for ReviewRequest {
    fn default() -> Self {
        Self {
            resume_text: None,
            resume_pdf_base64: None,
            target_role: None,
            job_description: None,
            jd_pdf_base64: None,
            use_llm: true,
            include_draft: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewPath {
    LlmAttempt,
    LlmSuccess,
    LlmFailureFallback,
    RuleBasedDirect,
}

impl fmt::Display for ReviewPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ReviewPath::LlmAttempt => "llm_attempt",
            ReviewPath::LlmSuccess => "llm_success",
            ReviewPath::LlmFailureFallback => "llm_failure_fallback",
            ReviewPath::RuleBasedDirect => "rule_based_direct",
        };
        f.write_str(label)
    }
}

/// Validated, normalized inputs of one review.
#[derive(Debug, Clone)]
pub struct ReviewInput {
    pub resume_text: String,
    pub target_role: Option<String>,
    pub role_template: Option<RoleTemplate>,
    pub jd_text: String,
}

/// JSON shape requested from the LLM.
#[derive(Debug, Deserialize)]
struct LlmFeedback {
    narrative: String,
    #[serde(default)]
    suggestions: BTreeMap<String, Vec<String>>,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Parses and validates the request. PDF parse failures are `AppError::Parse`.
pub fn prepare_input(request: &ReviewRequest) -> Result<ReviewInput, AppError> {
    let resume_text = match non_blank(&request.resume_pdf_base64) {
        Some(payload) => parse_pdf_base64(payload)?,
        None => normalize_text(request.resume_text.as_deref().unwrap_or_default()),
    };
    if resume_text.trim().is_empty() {
        return Err(AppError::Validation(EMPTY_RESUME_MESSAGE.to_string()));
    }

    let jd_text = match non_blank(&request.jd_pdf_base64) {
        Some(payload) => parse_pdf_base64(payload)?,
        None => normalize_text(request.job_description.as_deref().unwrap_or_default()),
    };

    // roles are single-line labels in reports and prompts
    let target_role = non_blank(&request.target_role)
        .map(|role| role.split_whitespace().collect::<Vec<_>>().join(" "));
    if target_role.is_none() && jd_text.trim().is_empty() {
        return Err(AppError::Validation(MISSING_TARGET_MESSAGE.to_string()));
    }

    let role_template = target_role.as_deref().and_then(RoleTemplate::from_name);

    Ok(ReviewInput {
        resume_text,
        target_role,
        role_template,
        jd_text,
    })
}

pub async fn review(
    request: &ReviewRequest,
    llm: &dyn LlmProvider,
    config: &Config,
) -> Result<ReviewResult, AppError> {
    let input = prepare_input(request)?;

    let keywords = extract_keywords(&input.jd_text, input.role_template, config.max_keywords);
    let metrics = scoring::score(&input.resume_text, &keywords);
    info!(
        "Resume scored: match={}% keywords={} missing={}",
        metrics.match_percentage,
        keywords.len(),
        metrics.missing_keywords.len()
    );

    let mut warnings: Vec<String> = Vec::new();
    if let (Some(role), None) = (&input.target_role, input.role_template) {
        if input.jd_text.trim().is_empty() {
            warnings.push(format!(
                "'{role}' is not a built-in role template; add a job description for keyword matching."
            ));
        }
    }
    if keywords.is_empty() {
        warn!("Empty keyword set, reporting 100% match");
        warnings.push(EMPTY_KEYWORDS_WARNING.to_string());
    }

    let role_label = input
        .target_role
        .clone()
        .or_else(|| input.role_template.map(|r| r.display_name().to_string()))
        .unwrap_or_else(|| "the role in the job description".to_string());

    let path = if request.use_llm && llm.is_available() {
        ReviewPath::LlmAttempt
    } else {
        ReviewPath::RuleBasedDirect
    };
    if request.use_llm && !llm.is_available() {
        warnings.push(OFFLINE_WARNING.to_string());
    }
    debug!("Review path: {path}");

    let (path, narrative, source, sections) = match path {
        ReviewPath::LlmAttempt => {
            match llm_feedback(llm, config, &role_label, &metrics, &input).await {
                Ok(feedback) => (
                    ReviewPath::LlmSuccess,
                    feedback.narrative.trim().to_string(),
                    FeedbackSource::Llm,
                    merge_suggestions(&metrics.sections, &feedback.suggestions),
                ),
                Err(e) => {
                    warn!("LLM feedback failed, falling back to rule-based narrative: {e}");
                    warnings.push(format!(
                        "LLM feedback unavailable ({e}); showing rule-based feedback."
                    ));
                    (
                        ReviewPath::LlmFailureFallback,
                        render_narrative(&metrics, input.target_role.as_deref()),
                        FeedbackSource::RuleBased,
                        metrics.sections.clone(),
                    )
                }
            }
        }
        _ => (
            ReviewPath::RuleBasedDirect,
            render_narrative(&metrics, input.target_role.as_deref()),
            FeedbackSource::RuleBased,
            metrics.sections.clone(),
        ),
    };
    info!("Review path: {path} (provider: {})", llm.name());

    let improved_draft = if request.include_draft {
        // A failed feedback call is not retried for the draft.
        let (draft, warning) = build_draft(
            llm,
            config,
            path == ReviewPath::LlmSuccess,
            &role_label,
            &metrics.missing_keywords,
            &input.jd_text,
            &input.resume_text,
        )
        .await;
        warnings.extend(warning);
        Some(draft)
    } else {
        None
    };

    let model = match source {
        FeedbackSource::Llm => llm.model().map(str::to_string),
        FeedbackSource::RuleBased => None,
    };

    Ok(ReviewResult {
        id: review_fingerprint(
            &input.resume_text,
            input.target_role.as_deref(),
            &input.jd_text,
        ),
        target_role: input.target_role,
        jd_provided: !input.jd_text.trim().is_empty(),
        keywords: keywords.terms().to_vec(),
        found_keywords: metrics.found_keywords,
        missing_keywords: metrics.missing_keywords,
        match_percentage: metrics.match_percentage,
        sections,
        narrative,
        narrative_source: source,
        warnings,
        improved_draft,
        model,
        created_at: Utc::now(),
    })
}

/// Runs one provider call under the configured timeout.
pub async fn generate_with_timeout(
    llm: &dyn LlmProvider,
    request: &GenerationRequest,
    timeout_secs: u64,
) -> Result<String, LlmError> {
    match tokio::time::timeout(Duration::from_secs(timeout_secs), llm.generate(request)).await {
        Ok(result) => result,
        Err(_) => Err(LlmError::Timeout(timeout_secs)),
    }
}

async fn llm_feedback(
    llm: &dyn LlmProvider,
    config: &Config,
    role_label: &str,
    metrics: &ReviewMetrics,
    input: &ReviewInput,
) -> Result<LlmFeedback, LlmError> {
    let metrics_json = serde_json::to_string_pretty(metrics)?;
    let request = GenerationRequest {
        system: review_system(),
        prompt: build_review_prompt(role_label, &metrics_json, &input.jd_text, &input.resume_text),
        max_tokens: config.max_tokens,
        temperature: config.temperature,
    };

    let text = generate_with_timeout(llm, &request, config.llm_timeout_secs).await?;
    let feedback: LlmFeedback = serde_json::from_str(strip_json_fences(&text))?;
    if feedback.narrative.trim().is_empty() {
        return Err(LlmError::EmptyContent);
    }
    Ok(feedback)
}

/// Appends LLM suggestions to the heuristic ones. Scores stay heuristic;
/// unknown section names are ignored.
fn merge_suggestions(
    sections: &BTreeMap<SectionKind, SectionScore>,
    extra: &BTreeMap<String, Vec<String>>,
) -> BTreeMap<SectionKind, SectionScore> {
    let mut merged = sections.clone();

    for (name, suggestions) in extra {
        let Some(kind) = SectionKind::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(name.trim()))
        else {
            debug!("Ignoring LLM suggestions for unknown section '{name}'");
            continue;
        };
        let Some(section) = merged.get_mut(&kind) else {
            continue;
        };

        for suggestion in suggestions {
            let suggestion = suggestion.trim();
            if suggestion.is_empty()
                || section.suggestions.len() >= MAX_SUGGESTIONS_PER_SECTION
                || section
                    .suggestions
                    .iter()
                    .any(|s| s.eq_ignore_ascii_case(suggestion))
            {
                continue;
            }
            section.suggestions.push(suggestion.to_string());
        }
    }

    merged
}
