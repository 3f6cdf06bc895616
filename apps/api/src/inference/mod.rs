//! Model-serving collaborators: chunk embedding and cross-encoder reranking.
//!
//! Both are consumed through narrow async traits so the matching engine never
//! knows whether inference runs locally or behind an HTTP server. The bundled
//! implementations talk to a text-embeddings-inference (TEI) deployment.

use std::time::Duration;

use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::warn;

pub mod embedder;
pub mod reranker;

pub use embedder::{Embedder, TeiEmbedder};
pub use reranker::{CrossEncoder, TeiReranker};

const MAX_RETRIES: u32 = 3;

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("gave up after {retries} retries")]
    Exhausted { retries: u32 },
}

/// Builds the shared HTTP client used by the TEI collaborators.
pub(crate) fn http_client(timeout: Duration) -> Result<Client, InferenceError> {
    Ok(Client::builder().timeout(timeout).build()?)
}

/// POSTs `body` as JSON and decodes the JSON reply.
/// Retries on transport errors, 429 and 5xx with exponential backoff.
pub(crate) async fn post_json<B, T>(client: &Client, url: &str, body: &B) -> Result<T, InferenceError>
where
    B: Serialize + ?Sized,
    T: DeserializeOwned,
{
    let mut last_error: Option<InferenceError> = None;

    for attempt in 0..MAX_RETRIES {
        if attempt > 0 {
            // 500ms, 1s
            let delay = Duration::from_millis(500 * (1 << (attempt - 1)));
            warn!(
                "inference call to {url} failed (attempt {attempt}), retrying after {}ms",
                delay.as_millis()
            );
            tokio::time::sleep(delay).await;
        }

        let response = match client.post(url).json(body).send().await {
            Ok(r) => r,
            Err(e) => {
                last_error = Some(InferenceError::Http(e));
                continue;
            }
        };

        let status = response.status();
        if status.as_u16() == 429 || status.is_server_error() {
            let message = response.text().await.unwrap_or_default();
            last_error = Some(InferenceError::Api {
                status: status.as_u16(),
                message,
            });
            continue;
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(InferenceError::Api {
                status: status.as_u16(),
                message,
            });
        }

        return Ok(response.json::<T>().await?);
    }

    Err(last_error.unwrap_or(InferenceError::Exhausted {
        retries: MAX_RETRIES,
    }))
}
