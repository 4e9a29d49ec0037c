// Prompt constants for document generation.
// Reuses cross-cutting fragments from llm_client::prompts.

pub const COVER_LETTER_SYSTEM: &str = "You are an experienced career coach who writes \
    concise, specific cover letters. Write in the first person as the candidate. \
    Keep it under 400 words, in four short paragraphs: opening, relevant experience, \
    skills fit for the role, closing.";

pub const CV_SYSTEM: &str = "You are an experienced resume writer. Produce a one-page CV \
    tailored to the target job with these sections in order: Header, Summary, Skills, \
    Experience, Education, Certifications, Languages. Omit any section the candidate \
    has no data for. Use short bullet lines starting with '- ' under Experience.";

/// User prompt for one document. Inputs are inserted verbatim.
pub fn document_prompt(kind: &str, candidate: &str, job: &str) -> String {
    format!(
        "Write a {kind} for the candidate below, targeted at the job that follows.

CANDIDATE PROFILE:
{candidate}

TARGET JOB:
{job}"
    )
}
