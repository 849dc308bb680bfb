// Shared prompt fragments. Each module that calls the LLM keeps its own
// prompts.rs next to it and composes these.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Instruction appended to every prompt that embeds resume text.
pub const NO_FABRICATION_INSTRUCTION: &str = "\
    CRITICAL: Only use facts present in the resume text. Do NOT invent employers, \
    dates, degrees, metrics or skills. Where a metric is missing, suggest that the \
    candidate add one instead of making one up.";
