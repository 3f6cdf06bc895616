use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// One job-description chunk shown next to the resume chunk that best answered it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentSnippet {
    pub jd_snippet: String,
    pub resume_snippet: String,
    /// Raw cross-encoder score, rounded to 3 decimals.
    pub score: f64,
}

/// Complete, explainable outcome of matching one resume against one job description.
///
/// Percentages are `0–100` for weights summing to 1, rounded to 2 decimals.
/// Weights summing above 1 can push `final_score_pct` past 100; that is reported as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub final_score_pct: f64,
    pub semantic_score_pct: f64,
    /// Average of per-JD-chunk best rerank scores before squashing.
    pub semantic_raw: f64,
    pub skill_overlap_pct: f64,
    pub experience_match_pct: f64,
    pub years_experience: u32,
    pub resume_skills: BTreeSet<String>,
    pub jd_skills: BTreeSet<String>,
    pub top_matches: Vec<AlignmentSnippet>,
    /// JD skills absent from the resume, most frequently mentioned first.
    pub missing_skills: Vec<String>,
    pub bullet_suggestions: BTreeMap<String, Vec<String>>,
    pub learning_plan: String,
    pub recommendation: String,
    pub resume_preview: String,
}

/// A named resume submitted for batch ranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateDocument {
    pub name: String,
    pub resume_text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedCandidate {
    pub name: String,
    pub result: MatchResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedCandidate {
    pub name: String,
    pub error: String,
}

/// Candidates ordered by `final_score_pct` (best first); failures listed separately.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Leaderboard {
    pub ranked: Vec<RankedCandidate>,
    pub failed: Vec<FailedCandidate>,
}
