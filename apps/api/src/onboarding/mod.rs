// Seeker onboarding: the data-entry wizard, its progress timeline and the
// profile views built on top of it.

pub mod completeness;
pub mod handlers;
pub mod mutators;
pub mod service;
pub mod summary;
pub mod timeline;
pub mod validation;
