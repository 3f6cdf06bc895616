use std::str::FromStr;

use anyhow::{bail, Context, Result};

use crate::llm_client::DEFAULT_MODEL;
use crate::matching::MatchConfig;
use crate::text::ChunkWindow;

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing or a value does not parse.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the text-embeddings-inference embedding server.
    pub embedding_url: String,
    /// Base URL of the text-embeddings-inference reranker server.
    pub reranker_url: String,
    /// Enables the generative fallbacks; absent means heuristics only.
    pub anthropic_api_key: Option<String>,
    pub anthropic_model: String,
    pub inference_timeout_secs: u64,
    pub inference_batch_size: usize,
    pub port: u16,
    pub rust_log: String,
    pub matching: MatchConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = MatchConfig::default();
        let matching = MatchConfig {
            resume_window: ChunkWindow::new(
                parse_or(&lookup, "RESUME_CHUNK_WORDS", defaults.resume_window.max_words)?,
                parse_or(&lookup, "RESUME_CHUNK_OVERLAP", defaults.resume_window.overlap)?,
            ),
            jd_window: ChunkWindow::new(
                parse_or(&lookup, "JD_CHUNK_WORDS", defaults.jd_window.max_words)?,
                parse_or(&lookup, "JD_CHUNK_OVERLAP", defaults.jd_window.overlap)?,
            ),
            semantic_offset: parse_or(&lookup, "SEMANTIC_OFFSET", defaults.semantic_offset)?,
            expand_acronyms: flag_or(&lookup, "ENABLE_ACRONYM_EXPANSION", defaults.expand_acronyms)?,
            rank_concurrency: parse_or(&lookup, "RANK_CONCURRENCY", defaults.rank_concurrency)?,
            ..defaults
        };
        matching.validate().context("Invalid matching configuration")?;

        Ok(Config {
            embedding_url: require(&lookup, "EMBEDDING_URL")?,
            reranker_url: require(&lookup, "RERANKER_URL")?,
            anthropic_api_key: lookup("ANTHROPIC_API_KEY").filter(|key| !key.trim().is_empty()),
            anthropic_model: lookup("ANTHROPIC_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            inference_timeout_secs: parse_or(&lookup, "INFERENCE_TIMEOUT_SECS", 60)?,
            inference_batch_size: parse_or(&lookup, "INFERENCE_BATCH_SIZE", 32)?,
            port: parse_or(&lookup, "PORT", 8080)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            matching,
        })
    }
}

fn require<F>(lookup: &F, key: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        None => Ok(default),
    }
}

/// Accepts `true/false`, `1/0`, `yes/no` and `on/off`, case-insensitively.
fn flag_or<F>(lookup: &F, key: &str, default: bool) -> Result<bool>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" | "" => Ok(false),
        _ => bail!("Environment variable '{key}' must be true/false, 1/0, yes/no or on/off, got '{raw}'"),
    }
}
