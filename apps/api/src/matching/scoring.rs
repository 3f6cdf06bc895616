//! Score math for the match: semantic squashing, skill overlap, experience
//! match and the weighted blend. Pure functions, no collaborators.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Raw semantic score that maps to exactly 0.5 after squashing.
pub const DEFAULT_SEMANTIC_OFFSET: f64 = 2.0;
/// Keeps skill overlap defined when the job description yields no skills.
pub const SKILL_EPSILON: f64 = 1e-6;

/// Blend weights. Used exactly as given: they are not required to sum to 1
/// and are never silently re-normalized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub skills: f64,
    pub semantic: f64,
    pub experience: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            skills: 0.35,
            semantic: 0.45,
            experience: 0.20,
        }
    }
}

impl ScoringWeights {
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("skills", self.skills),
            ("semantic", self.semantic),
            ("experience", self.experience),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("weight '{name}' must be a non-negative number, got {value}"));
            }
        }
        Ok(())
    }

    /// Rescales the weights to sum to 1. Only applied when a caller asks for it.
    pub fn normalized(&self) -> Result<Self, String> {
        self.validate()?;
        let total = self.skills + self.semantic + self.experience;
        if total <= 0.0 {
            return Err("weights must sum to more than 0".to_string());
        }
        Ok(Self {
            skills: self.skills / total,
            semantic: self.semantic / total,
            experience: self.experience / total,
        })
    }
}

/// Mean of the per-JD-chunk best rerank scores; 0 when there are none.
pub fn aggregate_semantic(per_jd_best: &[f64]) -> f64 {
    if per_jd_best.is_empty() {
        return 0.0;
    }
    per_jd_best.iter().sum::<f64>() / per_jd_best.len() as f64
}

/// Logistic squashing of the unbounded raw score into `(0, 1)`, centred on `offset`.
pub fn squash_semantic(raw: f64, offset: f64) -> f64 {
    1.0 / (1.0 + (-(raw - offset)).exp())
}

/// `|resume ∩ jd| / (|jd| + ε)`.
pub fn skill_overlap(resume_skills: &BTreeSet<String>, jd_skills: &BTreeSet<String>) -> f64 {
    let shared = jd_skills.intersection(resume_skills).count();
    shared as f64 / (jd_skills.len() as f64 + SKILL_EPSILON)
}

/// `min(years / required, 1)` when a requirement is given; otherwise any
/// detected experience fully satisfies and none scores 0.
pub fn experience_match(years: u32, required_years: u32) -> f64 {
    if required_years > 0 {
        (years as f64 / required_years as f64).min(1.0)
    } else if years > 0 {
        1.0
    } else {
        0.0
    }
}

/// Weighted sum of the three components. Not clamped: weights summing above
/// 1 produce a blend above 1.
pub fn blend(weights: &ScoringWeights, skill_overlap: f64, semantic_norm: f64, experience_match: f64) -> f64 {
    weights.skills * skill_overlap + weights.semantic * semantic_norm + weights.experience * experience_match
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round() / factor
}

/// Fraction in `[0, 1]` to a percentage with two decimals.
pub fn to_pct(fraction: f64) -> f64 {
    round_to(fraction * 100.0, 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_squash_is_half_at_offset() {
        assert_eq!(squash_semantic(2.0, DEFAULT_SEMANTIC_OFFSET), 0.5);
        assert_eq!(squash_semantic(-1.0, -1.0), 0.5);
    }

    #[test]
    fn test_squash_is_monotonic() {
        let mut last = 0.0;
        for step in -40..=40 {
            let value = squash_semantic(step as f64 * 0.5, DEFAULT_SEMANTIC_OFFSET);
            assert!(value >= last, "not monotonic at {step}");
            assert!((0.0..=1.0).contains(&value));
            last = value;
        }
    }

    #[test]
    fn test_aggregate_semantic_mean() {
        assert_eq!(aggregate_semantic(&[]), 0.0);
        assert!((aggregate_semantic(&[1.0, 2.0, 6.0]) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_overlap_full_when_jd_subset() {
        let overlap = skill_overlap(&set(&["rust", "sql", "kafka"]), &set(&["rust", "sql"]));
        assert!((overlap - 1.0).abs() < 1e-5);
        assert_eq!(to_pct(overlap), 100.0);
    }

    #[test]
    fn test_overlap_zero_when_disjoint() {
        assert_eq!(skill_overlap(&set(&["java"]), &set(&["rust", "sql"])), 0.0);
    }

    #[test]
    fn test_overlap_defined_for_empty_jd() {
        assert_eq!(skill_overlap(&set(&["rust"]), &set(&[])), 0.0);
    }

    #[test]
    fn test_overlap_partial() {
        let overlap = skill_overlap(&set(&["rust"]), &set(&["rust", "go", "sql", "aws"]));
        assert_eq!(to_pct(overlap), 25.0);
    }

    #[test]
    fn test_experience_match_with_requirement() {
        assert!((experience_match(3, 5) - 0.6).abs() < 1e-12);
        assert_eq!(experience_match(5, 5), 1.0);
        assert_eq!(experience_match(12, 5), 1.0);
        assert_eq!(experience_match(0, 5), 0.0);
    }

    #[test]
    fn test_experience_match_without_requirement() {
        assert_eq!(experience_match(1, 0), 1.0);
        assert_eq!(experience_match(0, 0), 0.0);
    }

    #[test]
    fn test_blend_with_default_weights() {
        let w = ScoringWeights::default();
        // 0.35*1 + 0.45*0.5 + 0.2*0.6 = 0.35 + 0.225 + 0.12 = 0.695
        assert!((blend(&w, 1.0, 0.5, 0.6) - 0.695).abs() < 1e-12);
    }

    #[test]
    fn test_blend_in_unit_range_for_unit_weights() {
        let w = ScoringWeights::default();
        for a in [0.0, 0.3, 1.0] {
            for b in [0.0, 0.7, 1.0] {
                for c in [0.0, 0.5, 1.0] {
                    let pct = to_pct(blend(&w, a, b, c));
                    assert!((0.0..=100.0).contains(&pct), "{pct}");
                }
            }
        }
    }

    #[test]
    fn test_blend_not_clamped_when_weights_exceed_one() {
        let w = ScoringWeights {
            skills: 1.0,
            semantic: 1.0,
            experience: 0.0,
        };
        assert_eq!(to_pct(blend(&w, 1.0, 1.0, 1.0)), 200.0);
    }

    #[test]
    fn test_weights_validation() {
        assert!(ScoringWeights::default().validate().is_ok());
        let negative = ScoringWeights {
            skills: -0.1,
            ..ScoringWeights::default()
        };
        assert!(negative.validate().is_err());
        let nan = ScoringWeights {
            semantic: f64::NAN,
            ..ScoringWeights::default()
        };
        assert!(nan.validate().is_err());
    }

    #[test]
    fn test_normalized_weights_sum_to_one() {
        let w = ScoringWeights {
            skills: 1.0,
            semantic: 2.0,
            experience: 1.0,
        }
        .normalized()
        .unwrap();
        assert!((w.skills + w.semantic + w.experience - 1.0).abs() < 1e-12);
        assert!((w.semantic - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_normalized_rejects_zero_sum() {
        let zero = ScoringWeights {
            skills: 0.0,
            semantic: 0.0,
            experience: 0.0,
        };
        assert!(zero.normalized().is_err());
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.23456, 3), 1.235);
        assert_eq!(to_pct(0.123456), 12.35);
    }
}
