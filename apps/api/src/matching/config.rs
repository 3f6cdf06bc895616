use serde::{Deserialize, Serialize};

use crate::errors::MatchError;
use crate::matching::scoring::{ScoringWeights, DEFAULT_SEMANTIC_OFFSET};
use crate::text::ChunkWindow;

pub const DEFAULT_TOP_K_CHUNKS: usize = 4;
pub const DEFAULT_RANK_CONCURRENCY: usize = 4;

/// Tuning constants of the matching pipeline.
///
/// The defaults are calibration values without a derivation of their own;
/// every one can be overridden from the environment (see `Config`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchConfig {
    pub resume_window: ChunkWindow,
    pub jd_window: ChunkWindow,
    /// Raw semantic score that squashes to 0.5.
    pub semantic_offset: f64,
    /// Characters of each text passed to the cross-encoder.
    pub rerank_char_budget: usize,
    pub max_snippets: usize,
    pub max_bullet_suggestions: usize,
    pub preview_chars: usize,
    /// Rewrite acronyms through the generator before scoring.
    pub expand_acronyms: bool,
    /// Candidates matched at once by `rank_candidates`.
    pub rank_concurrency: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            resume_window: ChunkWindow::resume(),
            jd_window: ChunkWindow::job_description(),
            semantic_offset: DEFAULT_SEMANTIC_OFFSET,
            rerank_char_budget: 512,
            max_snippets: 8,
            max_bullet_suggestions: 6,
            preview_chars: 4000,
            expand_acronyms: false,
            rank_concurrency: DEFAULT_RANK_CONCURRENCY,
        }
    }
}

impl MatchConfig {
    pub fn validate(&self) -> Result<(), MatchError> {
        self.resume_window
            .validate()
            .map_err(|e| MatchError::InvalidInput(format!("resume window: {e}")))?;
        self.jd_window
            .validate()
            .map_err(|e| MatchError::InvalidInput(format!("job description window: {e}")))?;
        if !self.semantic_offset.is_finite() {
            return Err(MatchError::InvalidInput("semantic offset must be finite".to_string()));
        }
        if self.rerank_char_budget == 0 {
            return Err(MatchError::InvalidInput("rerank character budget must be at least 1".to_string()));
        }
        if self.rank_concurrency == 0 {
            return Err(MatchError::InvalidInput("rank concurrency must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Per-request parameters of a match.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchParams {
    pub weights: ScoringWeights,
    /// 0 means no explicit requirement.
    pub required_years: u32,
    pub top_k_chunks: usize,
}

impl Default for MatchParams {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            required_years: 0,
            top_k_chunks: DEFAULT_TOP_K_CHUNKS,
        }
    }
}

impl MatchParams {
    pub fn validate(&self) -> Result<(), MatchError> {
        if self.top_k_chunks == 0 {
            return Err(MatchError::InvalidInput("top_k_chunks must be at least 1".to_string()));
        }
        self.weights.validate().map_err(MatchError::InvalidInput)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(MatchConfig::default().validate().is_ok());
    }

    #[test]
    fn test_config_rejects_bad_window() {
        let config = MatchConfig {
            jd_window: ChunkWindow::new(10, 10),
            ..MatchConfig::default()
        };
        assert!(matches!(config.validate(), Err(MatchError::InvalidInput(_))));
    }

    #[test]
    fn test_config_rejects_zero_rank_concurrency() {
        let config = MatchConfig {
            rank_concurrency: 0,
            ..MatchConfig::default()
        };
        assert!(matches!(config.validate(), Err(MatchError::InvalidInput(msg)) if msg.contains("concurrency")));
    }

    #[test]
    fn test_params_reject_zero_top_k() {
        let params = MatchParams {
            top_k_chunks: 0,
            ..MatchParams::default()
        };
        assert!(matches!(params.validate(), Err(MatchError::InvalidInput(msg)) if msg.contains("top_k_chunks")));
    }

    #[test]
    fn test_default_params() {
        let params = MatchParams::default();
        assert_eq!(params.top_k_chunks, 4);
        assert_eq!(params.required_years, 0);
        assert!(params.validate().is_ok());
    }
}
