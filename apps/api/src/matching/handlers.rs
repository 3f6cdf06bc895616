//! Axum route handlers for the Match API.

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::matching::config::{MatchParams, DEFAULT_TOP_K_CHUNKS};
use crate::matching::scoring::ScoringWeights;
use crate::models::{CandidateDocument, Leaderboard, MatchResult};
use crate::state::AppState;

/// Largest batch accepted by `/api/v1/match/rank`.
pub const MAX_RANK_CANDIDATES: usize = 100;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

/// Tuning parameters as they arrive over the wire. Integers are signed so a
/// negative value is reported as a validation error rather than a parse failure.
#[derive(Debug, Default, Deserialize)]
pub struct MatchParamsInput {
    pub weights: Option<ScoringWeights>,
    pub required_years: Option<i64>,
    pub top_k_chunks: Option<i64>,
    #[serde(default)]
    pub normalize_weights: bool,
}

impl MatchParamsInput {
    pub fn into_params(self) -> Result<MatchParams, AppError> {
        let weights = self.weights.unwrap_or_default();
        let weights = if self.normalize_weights {
            weights.normalized().map_err(AppError::Validation)?
        } else {
            weights.validate().map_err(AppError::Validation)?;
            weights
        };

        let required_years = match self.required_years {
            None => 0,
            Some(years) if years < 0 => {
                return Err(AppError::Validation(format!(
                    "required_years must be non-negative, got {years}"
                )))
            }
            Some(years) => u32::try_from(years)
                .map_err(|_| AppError::Validation(format!("required_years is too large: {years}")))?,
        };

        let top_k_chunks = match self.top_k_chunks {
            None => DEFAULT_TOP_K_CHUNKS,
            Some(k) if k < 1 => {
                return Err(AppError::Validation(format!(
                    "top_k_chunks must be at least 1, got {k}"
                )))
            }
            Some(k) => usize::try_from(k)
                .map_err(|_| AppError::Validation(format!("top_k_chunks is too large: {k}")))?,
        };

        Ok(MatchParams {
            weights,
            required_years,
            top_k_chunks,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    pub resume_text: String,
    pub jd_text: String,
    #[serde(flatten)]
    pub params: MatchParamsInput,
}

#[derive(Debug, Deserialize)]
pub struct RankRequest {
    pub jd_text: String,
    pub candidates: Vec<CandidateDocument>,
    #[serde(flatten)]
    pub params: MatchParamsInput,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/match
///
/// Scores one resume against one job description. Blank texts are accepted
/// and score zero on the affected components.
pub async fn handle_match(
    State(state): State<AppState>,
    Json(request): Json<MatchRequest>,
) -> Result<Json<MatchResult>, AppError> {
    let params = request.params.into_params()?;

    let result = state
        .engine
        .match_documents(&request.resume_text, &request.jd_text, &params)
        .await?;

    Ok(Json(result))
}

/// POST /api/v1/match/rank
///
/// Scores every candidate against one job description and returns them best
/// first. Candidates that fail are listed under `failed`.
pub async fn handle_rank(
    State(state): State<AppState>,
    Json(request): Json<RankRequest>,
) -> Result<Json<Leaderboard>, AppError> {
    if request.candidates.is_empty() {
        return Err(AppError::Validation("candidates cannot be empty".to_string()));
    }
    if request.candidates.len() > MAX_RANK_CANDIDATES {
        return Err(AppError::Validation(format!(
            "at most {MAX_RANK_CANDIDATES} candidates per request, got {}",
            request.candidates.len()
        )));
    }
    let params = request.params.into_params()?;

    info!("ranking {} candidates", request.candidates.len());
    let board = state
        .engine
        .rank_candidates(&request.candidates, &request.jd_text, &params)
        .await?;

    Ok(Json(board))
}

/// POST /api/v1/match/upload
///
/// Multipart form: `resume` (PDF, txt or md file), `jd_text`, and optional
/// `required_years` / `top_k_chunks`. Extraction runs on the blocking pool.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<MatchResult>, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "resume" => {
                let file_name = field.file_name().unwrap_or("resume.txt").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Could not read resume upload: {e}")))?;
                form.resume = Some((file_name, bytes.to_vec()));
            }
            "jd_text" | "required_years" | "top_k_chunks" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Could not read field '{name}': {e}")))?;
                form.set_text(&name, value);
            }
            _ => {}
        }
    }

    let (file_name, bytes, jd_text, params) = form.into_parts()?;
    info!("extracting text from uploaded '{file_name}' ({} bytes)", bytes.len());

    let extractor = Arc::clone(&state.extractor);
    let resume_text = tokio::task::spawn_blocking(move || extractor.extract(&file_name, &bytes))
        .await
        .map_err(|e| AppError::Internal(e.into()))??;

    let result = state
        .engine
        .match_documents(&resume_text, &jd_text, &params)
        .await?;

    Ok(Json(result))
}

/// Fields collected from the upload form before validation.
#[derive(Debug, Default)]
struct UploadForm {
    resume: Option<(String, Vec<u8>)>,
    jd_text: Option<String>,
    required_years: Option<String>,
    top_k_chunks: Option<String>,
}

impl UploadForm {
    fn set_text(&mut self, name: &str, value: String) {
        match name {
            "jd_text" => self.jd_text = Some(value),
            "required_years" => self.required_years = Some(value),
            "top_k_chunks" => self.top_k_chunks = Some(value),
            _ => {}
        }
    }

    fn into_parts(self) -> Result<(String, Vec<u8>, String, MatchParams), AppError> {
        let (file_name, bytes) = self
            .resume
            .ok_or_else(|| AppError::Validation("missing 'resume' file field".to_string()))?;
        let jd_text = self
            .jd_text
            .ok_or_else(|| AppError::Validation("missing 'jd_text' field".to_string()))?;

        let params = MatchParamsInput {
            required_years: parse_int_field("required_years", self.required_years)?,
            top_k_chunks: parse_int_field("top_k_chunks", self.top_k_chunks)?,
            ..MatchParamsInput::default()
        }
        .into_params()?;

        Ok((file_name, bytes, jd_text, params))
    }
}

fn parse_int_field(name: &str, raw: Option<String>) -> Result<Option<i64>, AppError> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse::<i64>()
            .map(Some)
            .map_err(|_| AppError::Validation(format!("'{name}' must be an integer, got '{value}'"))),
    }
}
