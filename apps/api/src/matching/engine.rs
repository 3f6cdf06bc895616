//! Matching Orchestrator: composes normalization, chunking, embedding,
//! retrieval, cross-encoder reranking and the heuristic extractors into one
//! scored, explainable `MatchResult`.
//!
//! Pipeline:
//! 1. normalize both texts (optionally expand acronyms)
//! 2. chunk resume (90/20 words) and JD (60/10 words)
//! 3. embed both chunk sets concurrently
//! 4. index resume embeddings, retrieve top-k resume chunks per JD chunk
//! 5. rerank every retrieved pair, texts truncated to the character budget
//! 6. semantic = squash(mean over JD chunks of the best rerank score)
//! 7. blend with skill overlap and experience match
//!
//! Collaborators are injected once and shared read-only; every intermediate
//! structure lives only for the duration of one call.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use crate::errors::MatchError;
use crate::extraction::{expand_acronyms, ExperienceEstimator, SkillExtractor};
use crate::inference::{CrossEncoder, Embedder, InferenceError};
use crate::llm_client::TextGenerator;
use crate::matching::config::{MatchConfig, MatchParams};
use crate::matching::recommendations::{
    build_recommendation, bullet_suggestions, learning_plan, rank_missing_skills,
};
use crate::matching::scoring::{
    aggregate_semantic, blend, experience_match, round_to, skill_overlap, squash_semantic, to_pct,
};
use crate::models::{
    AlignmentSnippet, CandidateDocument, Chunk, DocumentKind, FailedCandidate, Leaderboard,
    MatchResult, RankedCandidate, RetrievalHit, ScoredPair,
};
use crate::retrieval::{FlatIndex, IndexError};
use crate::text::{chunk_text, normalize};

/// Semantic half of a match: the raw and squashed scores plus every scored pair.
#[derive(Debug, Default)]
struct SemanticOutcome {
    raw: f64,
    normalized: f64,
    scored: Vec<ScoredPair>,
}

pub struct MatchEngine {
    embedder: Arc<dyn Embedder>,
    cross_encoder: Arc<dyn CrossEncoder>,
    generator: Option<Arc<dyn TextGenerator>>,
    skills: SkillExtractor,
    experience: ExperienceEstimator,
    config: MatchConfig,
}

impl MatchEngine {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        cross_encoder: Arc<dyn CrossEncoder>,
        generator: Option<Arc<dyn TextGenerator>>,
        config: MatchConfig,
    ) -> Result<Self, MatchError> {
        config.validate()?;
        Ok(Self {
            skills: SkillExtractor::new(generator.clone()),
            experience: ExperienceEstimator::new(generator.clone()),
            embedder,
            cross_encoder,
            generator,
            config,
        })
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Scores one resume against one job description.
    ///
    /// Embedding, rerank and index failures abort with the failing
    /// collaborator named; skill/experience fallbacks never do. Either text
    /// being blank yields a zero semantic score without calling any model.
    pub async fn match_documents(
        &self,
        resume_text: &str,
        jd_text: &str,
        params: &MatchParams,
    ) -> Result<MatchResult, MatchError> {
        params.validate()?;

        let (resume, jd) = tokio::join!(self.prepare(resume_text), self.prepare(jd_text));

        let resume_chunks = Chunk::from_windows(
            DocumentKind::Resume,
            chunk_text(&resume, self.config.resume_window),
        );
        let jd_chunks = Chunk::from_windows(
            DocumentKind::JobDescription,
            chunk_text(&jd, self.config.jd_window),
        );
        debug!(
            "chunked resume into {} and job description into {} chunks",
            resume_chunks.len(),
            jd_chunks.len()
        );

        let (semantic, resume_skills, jd_skills, years) = tokio::join!(
            self.semantic(&resume_chunks, &jd_chunks, params.top_k_chunks),
            self.skills.extract(&resume),
            self.skills.extract(&jd),
            self.experience.estimate(&resume),
        );
        let semantic = semantic?;

        let overlap = skill_overlap(&resume_skills, &jd_skills);
        let experience = experience_match(years, params.required_years);
        let final_score_pct = to_pct(blend(&params.weights, overlap, semantic.normalized, experience));

        let top_matches = top_snippets(
            &semantic.scored,
            &resume_chunks,
            &jd_chunks,
            self.config.max_snippets,
        );
        let missing_skills = rank_missing_skills(&jd_skills, &resume_skills, &jd);
        let bullet_suggestions = bullet_suggestions(&missing_skills, self.config.max_bullet_suggestions);
        let learning_plan = learning_plan(&missing_skills);
        let recommendation = build_recommendation(final_score_pct, &missing_skills);

        info!(
            "match scored {final_score_pct}% (semantic raw {:.3}, {} of {} jd skills, {years} years)",
            semantic.raw,
            jd_skills.len() - missing_skills.len(),
            jd_skills.len()
        );

        Ok(MatchResult {
            final_score_pct,
            semantic_score_pct: to_pct(semantic.normalized),
            semantic_raw: round_to(semantic.raw, 3),
            skill_overlap_pct: to_pct(overlap),
            experience_match_pct: to_pct(experience),
            years_experience: years,
            resume_skills,
            jd_skills,
            top_matches,
            missing_skills,
            bullet_suggestions,
            learning_plan,
            recommendation,
            resume_preview: resume.chars().take(self.config.preview_chars).collect(),
        })
    }

    /// Scores many resumes against one job description, at most
    /// `rank_concurrency` candidates in flight at a time.
    ///
    /// Each candidate is an independent match; a failing candidate is
    /// reported in `failed` and never aborts the others.
    pub async fn rank_candidates(
        &self,
        candidates: &[CandidateDocument],
        jd_text: &str,
        params: &MatchParams,
    ) -> Result<Leaderboard, MatchError> {
        params.validate()?;

        let pending: Vec<_> = candidates
            .iter()
            .map(|candidate| async move {
                let outcome = self
                    .match_documents(&candidate.resume_text, jd_text, params)
                    .await;
                (candidate, outcome)
            })
            .collect();
        let outcomes: Vec<_> = stream::iter(pending)
            .buffered(self.config.rank_concurrency)
            .collect()
            .await;

        let mut board = Leaderboard::default();
        for (candidate, outcome) in outcomes {
            match outcome {
                Ok(result) => board.ranked.push(RankedCandidate {
                    name: candidate.name.clone(),
                    result,
                }),
                Err(e) => {
                    warn!("candidate '{}' could not be scored: {e}", candidate.name);
                    board.failed.push(FailedCandidate {
                        name: candidate.name.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        board.ranked.sort_by(|a, b| {
            b.result
                .final_score_pct
                .total_cmp(&a.result.final_score_pct)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(board)
    }

    async fn prepare(&self, text: &str) -> String {
        let normalized = normalize(text);
        match &self.generator {
            Some(generator) if self.config.expand_acronyms => {
                normalize(&expand_acronyms(&normalized, generator.as_ref()).await)
            }
            _ => normalized,
        }
    }

    async fn semantic(
        &self,
        resume_chunks: &[Chunk],
        jd_chunks: &[Chunk],
        top_k: usize,
    ) -> Result<SemanticOutcome, MatchError> {
        if resume_chunks.is_empty() || jd_chunks.is_empty() {
            debug!("one side has no text; semantic score is 0");
            return Ok(SemanticOutcome::default());
        }

        let resume_texts: Vec<String> = resume_chunks.iter().map(|c| c.text.clone()).collect();
        let jd_texts: Vec<String> = jd_chunks.iter().map(|c| c.text.clone()).collect();
        let (resume_vectors, jd_vectors) =
            tokio::try_join!(self.embed(&resume_texts), self.embed(&jd_texts))?;

        let index = FlatIndex::build(&resume_vectors)?;
        let hits = retrieve(&index, &jd_vectors, top_k)?;
        if let Some(closest) = hits.iter().map(|h| h.distance).reduce(f32::min) {
            debug!("retrieved {} candidate pairs, closest distance {closest:.4}", hits.len());
        }

        let budget = self.config.rerank_char_budget;
        let pairs: Vec<(String, String)> = hits
            .iter()
            .map(|hit| {
                (
                    truncate_chars(&jd_chunks[hit.jd_chunk].text, budget),
                    truncate_chars(&resume_chunks[hit.resume_chunk].text, budget),
                )
            })
            .collect();

        let scores = self
            .cross_encoder
            .score_pairs(&pairs)
            .await
            .map_err(MatchError::Rerank)?;
        if scores.len() != pairs.len() {
            return Err(MatchError::Rerank(InferenceError::Malformed(format!(
                "cross-encoder returned {} scores for {} pairs",
                scores.len(),
                pairs.len()
            ))));
        }

        let scored: Vec<ScoredPair> = hits
            .iter()
            .zip(scores)
            .map(|(hit, score)| ScoredPair {
                jd_chunk: hit.jd_chunk,
                resume_chunk: hit.resume_chunk,
                score,
            })
            .collect();

        let raw = aggregate_semantic(&best_per_jd_chunk(&scored, jd_chunks.len()));
        Ok(SemanticOutcome {
            raw,
            normalized: squash_semantic(raw, self.config.semantic_offset),
            scored,
        })
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, MatchError> {
        let vectors = self
            .embedder
            .embed(texts)
            .await
            .map_err(MatchError::Embedding)?;
        if vectors.len() != texts.len() {
            return Err(MatchError::Embedding(InferenceError::Malformed(format!(
                "embedder returned {} vectors for {} chunks",
                vectors.len(),
                texts.len()
            ))));
        }
        Ok(vectors)
    }
}

/// Top-k resume chunks for every JD chunk, in JD order then distance order.
fn retrieve(
    index: &FlatIndex,
    jd_vectors: &[Vec<f32>],
    top_k: usize,
) -> Result<Vec<RetrievalHit>, IndexError> {
    let mut hits = Vec::with_capacity(jd_vectors.len() * top_k.min(index.len()));
    for (jd_chunk, query) in jd_vectors.iter().enumerate() {
        for (resume_chunk, distance) in index.search(query, top_k)? {
            hits.push(RetrievalHit {
                jd_chunk,
                resume_chunk,
                distance,
            });
        }
    }
    Ok(hits)
}

/// Best rerank score per JD chunk; 0 for a chunk without candidates.
fn best_per_jd_chunk(scored: &[ScoredPair], jd_chunk_count: usize) -> Vec<f64> {
    let mut best: Vec<Option<f64>> = vec![None; jd_chunk_count];
    for pair in scored {
        let score = pair.score as f64;
        let slot = &mut best[pair.jd_chunk];
        *slot = Some(slot.map_or(score, |current| current.max(score)));
    }
    best.into_iter().map(|b| b.unwrap_or(0.0)).collect()
}

/// Highest-scoring pairs first; equal scores keep retrieval order.
fn top_snippets(
    scored: &[ScoredPair],
    resume_chunks: &[Chunk],
    jd_chunks: &[Chunk],
    limit: usize,
) -> Vec<AlignmentSnippet> {
    let mut ranked: Vec<&ScoredPair> = scored.iter().collect();
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked
        .into_iter()
        .take(limit)
        .map(|pair| AlignmentSnippet {
            jd_snippet: jd_chunks[pair.jd_chunk].text.clone(),
            resume_snippet: resume_chunks[pair.resume_chunk].text.clone(),
            score: round_to(pair.score as f64, 3),
        })
        .collect()
}

fn truncate_chars(text: &str, budget: usize) -> String {
    text.chars().take(budget).collect()
}
