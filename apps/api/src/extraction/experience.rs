use std::sync::{Arc, OnceLock};

use regex::Regex;
use tracing::{debug, warn};

use crate::llm_client::prompts::{render, EXPERIENCE_PROMPT};
use crate::llm_client::TextGenerator;

fn years_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\b(\d{1,2})\+?\s*(?:years|yrs)\b").expect("valid years pattern"))
}

fn integer_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+").expect("valid integer pattern"))
}

/// Best-effort count of years of professional experience.
#[derive(Clone, Default)]
pub struct ExperienceEstimator {
    generator: Option<Arc<dyn TextGenerator>>,
}

impl ExperienceEstimator {
    pub fn new(generator: Option<Arc<dyn TextGenerator>>) -> Self {
        Self { generator }
    }

    /// Explicit "N years"/"N yrs" mentions win (largest N); otherwise the
    /// generator is asked for an estimate; otherwise 0.
    pub async fn estimate(&self, text: &str) -> u32 {
        if let Some(years) = stated_years(text) {
            return years;
        }
        if text.trim().is_empty() {
            return 0;
        }
        let Some(generator) = &self.generator else {
            return 0;
        };

        match generator.complete(&render(EXPERIENCE_PROMPT, text)).await {
            Ok(reply) => {
                let years = first_integer(&reply).unwrap_or(0);
                debug!("experience fallback estimated {years} years");
                years
            }
            Err(e) => {
                warn!("experience estimation fallback failed, assuming 0 years: {e}");
                0
            }
        }
    }
}

/// Largest `N` in any "N years" / "N+ yrs" mention.
pub fn stated_years(text: &str) -> Option<u32> {
    years_pattern()
        .captures_iter(text)
        .filter_map(|caps| caps[1].parse::<u32>().ok())
        .max()
}

/// First run of digits in a generated reply.
pub fn first_integer(reply: &str) -> Option<u32> {
    integer_pattern()
        .find(reply)
        .and_then(|m| m.as_str().parse::<u32>().ok())
}
