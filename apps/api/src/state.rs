use std::sync::Arc;

use crate::extraction::TextExtractor;
use crate::matching::MatchEngine;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Read-only after startup; concurrent requests share one engine.
    pub engine: Arc<MatchEngine>,
    /// Pluggable document extractor. Default: DocumentExtractor (PDF, txt, md).
    pub extractor: Arc<dyn TextExtractor>,
}
