// Shared prompt fragments. Each module that calls the model keeps its own
// prompts.rs alongside it; only cross-cutting text lives here.

/// Appended to every document generation system prompt.
pub const GROUNDING_INSTRUCTION: &str = "\
    CRITICAL: Use only facts present in the candidate profile provided. \
    Do NOT invent employers, dates, degrees, certificates or metrics. \
    If the profile does not support a claim, omit it entirely.";

/// Plain text output, no markup.
pub const PLAIN_TEXT_INSTRUCTION: &str = "\
    Respond with the finished document as plain text only. \
    Do NOT use markdown, code fences or placeholders such as [Company Name]. \
    Do NOT include explanations before or after the document.";
