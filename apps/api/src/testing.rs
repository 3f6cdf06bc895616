//! Deterministic in-process collaborators for unit tests.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::inference::{CrossEncoder, Embedder, InferenceError};
use crate::llm_client::{LlmError, TextGenerator};

fn tokens(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Hashed bag-of-words vectors, L2-normalized.
pub struct BagOfWordsEmbedder {
    pub dim: usize,
}

impl Default for BagOfWordsEmbedder {
    fn default() -> Self {
        Self { dim: 64 }
    }
}

#[async_trait]
impl Embedder for BagOfWordsEmbedder {
    async fn embed(&self, chunks: &[String]) -> Result<Vec<Vec<f32>>, InferenceError> {
        Ok(chunks
            .iter()
            .map(|chunk| {
                let mut v = vec![0.0_f32; self.dim];
                for token in tokens(chunk) {
                    let mut hasher = DefaultHasher::new();
                    token.hash(&mut hasher);
                    v[(hasher.finish() % self.dim as u64) as usize] += 1.0;
                }
                let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
                if norm > 0.0 {
                    v.iter_mut().for_each(|x| *x /= norm);
                }
                v
            })
            .collect())
    }
}

/// Scores a pair as `10 * jaccard(tokens)`: identical text scores 10, disjoint text 0.
pub struct OverlapCrossEncoder;

#[async_trait]
impl CrossEncoder for OverlapCrossEncoder {
    async fn score_pairs(&self, pairs: &[(String, String)]) -> Result<Vec<f32>, InferenceError> {
        Ok(pairs
            .iter()
            .map(|(a, b)| {
                let a: HashSet<String> = tokens(a).into_iter().collect();
                let b: HashSet<String> = tokens(b).into_iter().collect();
                let union = a.union(&b).count();
                if union == 0 {
                    0.0
                } else {
                    10.0 * a.intersection(&b).count() as f32 / union as f32
                }
            })
            .collect())
    }
}

/// Records the longest text it was asked to score.
#[derive(Default)]
pub struct RecordingCrossEncoder {
    pub longest_text: AtomicUsize,
    pub pairs_seen: AtomicUsize,
}

#[async_trait]
impl CrossEncoder for RecordingCrossEncoder {
    async fn score_pairs(&self, pairs: &[(String, String)]) -> Result<Vec<f32>, InferenceError> {
        self.pairs_seen.fetch_add(pairs.len(), Ordering::SeqCst);
        for (a, b) in pairs {
            self.longest_text
                .fetch_max(a.chars().count().max(b.chars().count()), Ordering::SeqCst);
        }
        Ok(vec![1.0; pairs.len()])
    }
}

/// Scores every pair 1.0 after a short sleep, tracking the most calls
/// ever in flight at once.
#[derive(Default)]
pub struct InFlightCrossEncoder {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl InFlightCrossEncoder {
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CrossEncoder for InFlightCrossEncoder {
    async fn score_pairs(&self, pairs: &[(String, String)]) -> Result<Vec<f32>, InferenceError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(vec![1.0; pairs.len()])
    }
}

pub struct FailingEmbedder;

#[async_trait]
impl Embedder for FailingEmbedder {
    async fn embed(&self, _chunks: &[String]) -> Result<Vec<Vec<f32>>, InferenceError> {
        Err(InferenceError::Api {
            status: 503,
            message: "embedding model unavailable".to_string(),
        })
    }
}

pub struct FailingCrossEncoder;

#[async_trait]
impl CrossEncoder for FailingCrossEncoder {
    async fn score_pairs(&self, _pairs: &[(String, String)]) -> Result<Vec<f32>, InferenceError> {
        Err(InferenceError::Api {
            status: 503,
            message: "reranker unavailable".to_string(),
        })
    }
}

/// Replies with a fixed string (or fails), counting calls.
pub struct ScriptedGenerator {
    reply: Option<String>,
    pub calls: AtomicUsize,
}

impl ScriptedGenerator {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn complete(&self, _prompt: &str) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.clone().ok_or(LlmError::EmptyContent)
    }
}

/// Bag-of-words embeddings, except any batch containing `marker` fails.
pub struct FailOnMarkerEmbedder {
    pub marker: &'static str,
}

#[async_trait]
impl Embedder for FailOnMarkerEmbedder {
    async fn embed(&self, chunks: &[String]) -> Result<Vec<Vec<f32>>, InferenceError> {
        if chunks.iter().any(|c| c.contains(self.marker)) {
            return Err(InferenceError::Malformed(format!("refusing chunk containing {}", self.marker)));
        }
        BagOfWordsEmbedder::default().embed(chunks).await
    }
}

/// Returns one vector fewer than asked for.
pub struct ShortEmbedder;

#[async_trait]
impl Embedder for ShortEmbedder {
    async fn embed(&self, chunks: &[String]) -> Result<Vec<Vec<f32>>, InferenceError> {
        Ok(vec![vec![1.0, 0.0]; chunks.len().saturating_sub(1)])
    }
}
