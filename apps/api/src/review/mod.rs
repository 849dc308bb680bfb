// Reviewer: validates input, scores the resume and produces the feedback
// narrative (LLM or rule-based) plus an optional improved draft.

pub mod draft;
pub mod handlers;
pub mod prompts;
pub mod reviewer;
pub mod templates;

pub use reviewer::{review, ReviewRequest};
