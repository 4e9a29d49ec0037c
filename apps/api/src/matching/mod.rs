// Job matching: profile/job scoring, title-based retrieval, score cache and
// job selection.

pub mod cache;
pub mod handlers;
pub mod retrieval;
pub mod scoring;
pub mod selection;
pub mod text;
