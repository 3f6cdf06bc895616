use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{http_client, post_json, InferenceError};

/// Scores (query, candidate) text pairs jointly.
///
/// One score per pair, in input order. Scores are unbounded; larger means
/// more relevant. Callers are responsible for truncating inputs.
#[async_trait]
pub trait CrossEncoder: Send + Sync {
    async fn score_pairs(&self, pairs: &[(String, String)]) -> Result<Vec<f32>, InferenceError>;
}

#[derive(Debug, Serialize)]
struct RerankRequest<'a> {
    query: &'a str,
    texts: Vec<&'a str>,
    raw_scores: bool,
    truncate: bool,
}

#[derive(Debug, Deserialize)]
struct RankedText {
    index: usize,
    score: f32,
}

/// Cross-encoder backed by a text-embeddings-inference server (`POST /rerank`).
///
/// TEI ranks many texts against one query, so pairs are grouped by their
/// query text and the scores scattered back into pair order. `raw_scores`
/// is requested so the model logits come back unsquashed.
#[derive(Clone)]
pub struct TeiReranker {
    client: Client,
    endpoint: String,
    batch_size: usize,
}

impl TeiReranker {
    pub fn new(base_url: &str, timeout: Duration, batch_size: usize) -> Result<Self, InferenceError> {
        Ok(Self {
            client: http_client(timeout)?,
            endpoint: format!("{}/rerank", base_url.trim_end_matches('/')),
            batch_size: batch_size.max(1),
        })
    }
}

#[async_trait]
impl CrossEncoder for TeiReranker {
    async fn score_pairs(&self, pairs: &[(String, String)]) -> Result<Vec<f32>, InferenceError> {
        let mut scores: Vec<Option<f32>> = vec![None; pairs.len()];

        for (query, positions) in group_by_query(pairs) {
            for batch in positions.chunks(self.batch_size) {
                let request = RerankRequest {
                    query,
                    texts: batch.iter().map(|&p| pairs[p].1.as_str()).collect(),
                    raw_scores: true,
                    truncate: true,
                };
                let ranked: Vec<RankedText> = post_json(&self.client, &self.endpoint, &request).await?;
                for item in ranked {
                    let position = batch.get(item.index).ok_or_else(|| {
                        InferenceError::Malformed(format!(
                            "rerank index {} out of range for batch of {}",
                            item.index,
                            batch.len()
                        ))
                    })?;
                    scores[*position] = Some(item.score);
                }
            }
        }

        let scores = scores
            .into_iter()
            .enumerate()
            .map(|(i, s)| s.ok_or_else(|| InferenceError::Malformed(format!("no score returned for pair {i}"))))
            .collect::<Result<Vec<_>, _>>()?;
        debug!("reranked {} pairs", scores.len());
        Ok(scores)
    }
}

/// Groups pair positions by query text, keeping first-seen query order.
fn group_by_query(pairs: &[(String, String)]) -> Vec<(&str, Vec<usize>)> {
    let mut groups: Vec<(&str, Vec<usize>)> = Vec::new();
    let mut slot: HashMap<&str, usize> = HashMap::new();
    for (position, (query, _)) in pairs.iter().enumerate() {
        let idx = *slot.entry(query.as_str()).or_insert_with(|| {
            groups.push((query.as_str(), Vec::new()));
            groups.len() - 1
        });
        groups[idx].1.push(position);
    }
    groups
}
