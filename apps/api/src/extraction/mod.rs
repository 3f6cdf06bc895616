//! Heuristic signal extraction (skills, years of experience, acronym
//! expansion) and the document-to-text collaborator.
//!
//! Everything here except `document` is infallible by contract: generative
//! fallbacks degrade to "no extra signal" instead of surfacing errors.

pub mod acronyms;
pub mod document;
pub mod experience;
pub mod skills;

pub use acronyms::expand_acronyms;
pub use document::{DocumentExtractor, ExtractionError, TextExtractor};
pub use experience::ExperienceEstimator;
pub use skills::SkillExtractor;
