// Cover letter and CV generation.
// All model calls go through llm_client; prompts live in prompts.rs.

pub mod generator;
pub mod handlers;
pub mod prompts;
