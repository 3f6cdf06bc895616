// Resume ↔ job-description matching: the scoring pipeline, its tuning
// configuration, score math, recommendations, and the HTTP handlers that
// wrap it.

pub mod config;
pub mod engine;
pub mod handlers;
pub mod recommendations;
pub mod scoring;

pub use config::{MatchConfig, MatchParams};
pub use engine::MatchEngine;
pub use scoring::ScoringWeights;
