//! Axum route handlers for the Matching API.

use axum::{extract::State, Json};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::matching::scorer::ResumeInput;
use crate::models::job::JobRequirements;
use crate::models::result::MatchResult;
use crate::models::resume::ResumeEntities;
use crate::parsing::handlers::{evaluation_context, validate_resume_text};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Exactly one of `resume_text` and `resume` must be set.
#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    #[serde(default)]
    pub resume_text: Option<String>,
    #[serde(default)]
    pub resume: Option<ResumeEntities>,
    pub requirements: JobRequirements,
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    #[serde(flatten)]
    pub result: MatchResult,
    pub scorer_backend: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/match
///
/// Scores a resume (raw text or pre-structured entities) against structured
/// job requirements.
pub async fn handle_match(
    State(state): State<AppState>,
    Json(request): Json<MatchRequest>,
) -> Result<Json<MatchResponse>, AppError> {
    let input = match (request.resume_text, request.resume) {
        (Some(text), None) => {
            validate_resume_text(&text, state.config.max_resume_chars)?;
            ResumeInput::Text(text)
        }
        (None, Some(entities)) => ResumeInput::Parsed(entities),
        (Some(_), Some(_)) => {
            return Err(AppError::Validation(
                "provide either resume_text or resume, not both".to_string(),
            ))
        }
        (None, None) => {
            return Err(AppError::Validation(
                "one of resume_text or resume is required".to_string(),
            ))
        }
    };
    let ctx = evaluation_context(request.as_of);
    info!(as_of = %ctx.now, backend = state.scorer.backend(), "Match requested");

    let result = state.scorer.score(input, request.requirements, ctx).await?;

    Ok(Json(MatchResponse {
        result,
        scorer_backend: state.scorer.backend().to_string(),
    }))
}
