//! Improved draft: a rewritten resume, from the LLM or from rules.

use tracing::{info, warn};

use crate::config::Config;
use crate::llm_client::{GenerationRequest, LlmError, LlmProvider};
use crate::review::prompts::{build_draft_prompt, DRAFT_SYSTEM};
use crate::review::reviewer::generate_with_timeout;
use crate::scoring::sections::{is_bullet, strip_bullet};
use crate::scoring::tone::strengthen_line;

pub const KEYWORDS_BLOCK_HEADER: &str =
    "KEYWORDS TO WEAVE IN (only where they reflect real experience)";

/// Rewrites the resume line by line: bullets are normalized to "- " and weak
/// openers become action verbs. Missing keywords are listed at the end, never
/// inserted into the text.
pub fn rule_based_draft(resume_text: &str, missing_keywords: &[String]) -> String {
    let mut lines: Vec<String> = Vec::new();

    for line in resume_text.lines() {
        if is_bullet(line) {
            let body = strip_bullet(line);
            if body.is_empty() {
                continue;
            }
            lines.push(format!("- {}", strengthen_line(body)));
        } else {
            lines.push(strengthen_line(line));
        }
    }

    let mut draft = lines.join("\n").trim_end().to_string();

    if !missing_keywords.is_empty() {
        draft.push_str("\n\n");
        draft.push_str(KEYWORDS_BLOCK_HEADER);
        for keyword in missing_keywords {
            draft.push_str("\n- ");
            draft.push_str(keyword);
        }
    }

    draft
}

/// Asks the provider for a rewritten resume.
pub async fn llm_draft(
    llm: &dyn LlmProvider,
    config: &Config,
    target_role: &str,
    missing_keywords: &[String],
    jd_text: &str,
    resume_text: &str,
) -> Result<String, LlmError> {
    let request = GenerationRequest {
        system: DRAFT_SYSTEM.to_string(),
        prompt: build_draft_prompt(target_role, missing_keywords, jd_text, resume_text),
        max_tokens: config.max_tokens,
        temperature: config.temperature,
    };

    let text = generate_with_timeout(llm, &request, config.llm_timeout_secs).await?;
    let text = strip_text_fences(&text);
    if text.is_empty() {
        return Err(LlmError::EmptyContent);
    }

    info!("Improved draft generated by {}", llm.name());
    Ok(text.to_string())
}

/// LLM draft when `try_llm` is set, rule-based otherwise or on failure.
/// Returns the draft and a warning when the LLM attempt failed.
pub async fn build_draft(
    llm: &dyn LlmProvider,
    config: &Config,
    try_llm: bool,
    target_role: &str,
    missing_keywords: &[String],
    jd_text: &str,
    resume_text: &str,
) -> (String, Option<String>) {
    if try_llm {
        match llm_draft(llm, config, target_role, missing_keywords, jd_text, resume_text).await {
            Ok(draft) => return (draft, None),
            Err(e) => {
                warn!("LLM draft failed, falling back to rule-based rewrite: {e}");
                return (
                    rule_based_draft(resume_text, missing_keywords),
                    Some(format!("Improved draft is rule-based: LLM call failed ({e}).")),
                );
            }
        }
    }

    (rule_based_draft(resume_text, missing_keywords), None)
}

fn strip_text_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // drop an optional language tag on the opening fence line
    let rest = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}
