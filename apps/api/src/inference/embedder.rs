use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use super::{http_client, post_json, InferenceError};

/// Maps chunks of text to fixed-length dense vectors.
///
/// Implementations must return exactly one vector per input, in input order,
/// with the same dimensionality across calls.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, chunks: &[String]) -> Result<Vec<Vec<f32>>, InferenceError>;
}

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    inputs: &'a [String],
    truncate: bool,
}

/// Embedder backed by a text-embeddings-inference server (`POST /embed`).
#[derive(Clone)]
pub struct TeiEmbedder {
    client: Client,
    endpoint: String,
    batch_size: usize,
}

impl TeiEmbedder {
    pub fn new(base_url: &str, timeout: Duration, batch_size: usize) -> Result<Self, InferenceError> {
        Ok(Self {
            client: http_client(timeout)?,
            endpoint: format!("{}/embed", base_url.trim_end_matches('/')),
            batch_size: batch_size.max(1),
        })
    }
}

#[async_trait]
impl Embedder for TeiEmbedder {
    async fn embed(&self, chunks: &[String]) -> Result<Vec<Vec<f32>>, InferenceError> {
        let mut vectors = Vec::with_capacity(chunks.len());
        for batch in chunks.chunks(self.batch_size) {
            let request = EmbedRequest {
                inputs: batch,
                truncate: true,
            };
            let embedded: Vec<Vec<f32>> = post_json(&self.client, &self.endpoint, &request).await?;
            if embedded.len() != batch.len() {
                return Err(InferenceError::Malformed(format!(
                    "embedding server returned {} vectors for {} inputs",
                    embedded.len(),
                    batch.len()
                )));
            }
            vectors.extend(embedded);
        }
        check_dimensions(&vectors)?;
        debug!("embedded {} chunks", vectors.len());
        Ok(vectors)
    }
}

/// All vectors must share one nonzero dimension.
pub(crate) fn check_dimensions(vectors: &[Vec<f32>]) -> Result<(), InferenceError> {
    let Some(first) = vectors.first() else {
        return Ok(());
    };
    let dim = first.len();
    if dim == 0 {
        return Err(InferenceError::Malformed("zero-dimension embedding".to_string()));
    }
    if let Some(bad) = vectors.iter().find(|v| v.len() != dim) {
        return Err(InferenceError::Malformed(format!(
            "inconsistent embedding dimensions: {} vs {}",
            dim,
            bad.len()
        )));
    }
    Ok(())
}
