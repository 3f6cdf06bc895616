use tracing::{debug, warn};

use crate::llm_client::prompts::{render, ACRONYM_PROMPT};
use crate::llm_client::TextGenerator;

/// Asks the generator to spell out acronyms ("ML" -> "machine learning").
/// Returns `text` unchanged on any failure or an empty reply.
pub async fn expand_acronyms(text: &str, generator: &dyn TextGenerator) -> String {
    if text.trim().is_empty() {
        return text.to_string();
    }
    match generator.complete(&render(ACRONYM_PROMPT, text)).await {
        Ok(expanded) if !expanded.trim().is_empty() => {
            debug!("acronym expansion: {} -> {} chars", text.len(), expanded.len());
            expanded
        }
        Ok(_) => text.to_string(),
        Err(e) => {
            warn!("acronym expansion failed, keeping original text: {e}");
            text.to_string()
        }
    }
}
