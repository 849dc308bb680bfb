// All LLM prompt constants for the review module.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::llm_client::prompts::{JSON_ONLY_SYSTEM, NO_FABRICATION_INSTRUCTION};

/// Resume and JD text are cut to this many characters before prompting.
pub const MAX_PROMPT_TEXT_CHARS: usize = 12_000;

/// System prompt for narrative feedback. Combined with `JSON_ONLY_SYSTEM`.
pub const REVIEW_SYSTEM_PREAMBLE: &str = "You are an experienced technical recruiter and \
    resume coach. You give specific, honest, actionable feedback.";

/// Feedback prompt template.
/// Replace: {no_fabrication}, {target_role}, {metrics_json}, {jd_text}, {resume_text}
pub const REVIEW_PROMPT_TEMPLATE: &str = r#"{no_fabrication}

Review the resume below for the target role and return a JSON object with this EXACT schema:
{
  "narrative": "4-8 short paragraphs of feedback: overall verdict, strengths, the biggest gaps, and concrete next steps",
  "suggestions": {
    "structure": ["..."],
    "content": ["..."],
    "impact": ["..."],
    "tone": ["..."]
  }
}

Rules:
1. Each suggestion is one actionable sentence. At most 3 per section.
2. Refer to the heuristic scores below; explain low scores, do not contradict them.
3. Mention missing keywords only where the resume suggests the candidate could truthfully add them.

TARGET ROLE: {target_role}

HEURISTIC METRICS (0-100 scores, keyword match):
{metrics_json}

JOB DESCRIPTION:
{jd_text}

RESUME:
{resume_text}"#;

/// System prompt for the improved draft: plain text, not JSON.
pub const DRAFT_SYSTEM: &str = "You are an expert resume writer. You rewrite resumes to be \
    concise, results-oriented and tailored to a target role. Respond with the rewritten resume \
    as plain text only: no markdown fences, no commentary.";

/// Draft prompt template.
/// Replace: {no_fabrication}, {target_role}, {missing_keywords}, {jd_text}, {resume_text}
pub const DRAFT_PROMPT_TEMPLATE: &str = r#"{no_fabrication}

Rewrite the resume below for the target role.
- Keep every section the candidate has; order them Summary, Experience, Projects, Skills, Education.
- Start each bullet with a strong action verb and keep it to one or two lines.
- Keep existing metrics; where a bullet lacks one, append "[add metric]".
- Work in these missing keywords only where the resume already supports them: {missing_keywords}

TARGET ROLE: {target_role}

JOB DESCRIPTION:
{jd_text}

RESUME:
{resume_text}"#;

pub fn review_system() -> String {
    format!("{REVIEW_SYSTEM_PREAMBLE} {JSON_ONLY_SYSTEM}")
}

pub fn build_review_prompt(
    target_role: &str,
    metrics_json: &str,
    jd_text: &str,
    resume_text: &str,
) -> String {
    REVIEW_PROMPT_TEMPLATE
        .replace("{no_fabrication}", NO_FABRICATION_INSTRUCTION)
        .replace("{target_role}", target_role)
        .replace("{metrics_json}", metrics_json)
        .replace("{jd_text}", &prompt_text(jd_text))
        .replace("{resume_text}", &prompt_text(resume_text))
}

pub fn build_draft_prompt(
    target_role: &str,
    missing_keywords: &[String],
    jd_text: &str,
    resume_text: &str,
) -> String {
    let missing = if missing_keywords.is_empty() {
        "(none)".to_string()
    } else {
        missing_keywords.join(", ")
    };

    DRAFT_PROMPT_TEMPLATE
        .replace("{no_fabrication}", NO_FABRICATION_INSTRUCTION)
        .replace("{target_role}", target_role)
        .replace("{missing_keywords}", &missing)
        .replace("{jd_text}", &prompt_text(jd_text))
        .replace("{resume_text}", &prompt_text(resume_text))
}

fn prompt_text(text: &str) -> String {
    if text.trim().is_empty() {
        return "(not provided)".to_string();
    }
    match text.char_indices().nth(MAX_PROMPT_TEXT_CHARS) {
        Some((cut, _)) => format!("{}\n[truncated]", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_prompt_embeds_all_inputs() {
        let prompt = build_review_prompt(
            "Data Scientist",
            r#"{"match_percentage": 67}"#,
            "Need pandas",
            "Experienced in Python and SQL",
        );
        assert!(prompt.contains("TARGET ROLE: Data Scientist"));
        assert!(prompt.contains(r#""match_percentage": 67"#));
        assert!(prompt.contains("Need pandas"));
        assert!(prompt.contains("Experienced in Python and SQL"));
        assert!(prompt.contains("Do NOT invent"));
        assert!(!prompt.contains("{resume_text}"));
    }

    #[test]
    fn test_missing_jd_is_marked() {
        let prompt = build_review_prompt("PM", "{}", "  ", "resume");
        assert!(prompt.contains("JOB DESCRIPTION:\n(not provided)"));
    }

    #[test]
    fn test_long_text_is_truncated() {
        let resume = "x".repeat(MAX_PROMPT_TEXT_CHARS + 50);
        let prompt = build_draft_prompt("SWE", &[], "", &resume);
        assert!(prompt.contains("[truncated]"));
        assert!(prompt.contains("(none)"));
        assert!(!prompt.contains(&"x".repeat(MAX_PROMPT_TEXT_CHARS + 1)));
    }

    #[test]
    fn test_review_system_requires_json() {
        assert!(review_system().contains("valid JSON only"));
    }
}
