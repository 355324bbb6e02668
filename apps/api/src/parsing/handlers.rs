//! Axum route handlers for the Parsing API.

use axum::{extract::State, Json};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::resume::{DegreeLevel, ResumeEntities};
use crate::models::timeline::EvaluationContext;
use crate::parsing::{classify_degree, degree_field, expand_degree};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ParseResumeRequest {
    pub resume_text: String,
    /// Pins "present" for reproducible results. Defaults to today.
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct ClassifyDegreeRequest {
    pub degree: String,
}

#[derive(Debug, Serialize)]
pub struct ClassifyDegreeResponse {
    pub level: DegreeLevel,
    pub expanded_degree: String,
    pub field: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Shared request checks
// ────────────────────────────────────────────────────────────────────────────

/// The single clock read of a request.
pub fn evaluation_context(as_of: Option<NaiveDate>) -> EvaluationContext {
    as_of.map_or_else(EvaluationContext::today, EvaluationContext::pinned)
}

pub fn validate_resume_text(text: &str, max_chars: usize) -> Result<(), AppError> {
    if text.trim().is_empty() {
        return Err(AppError::Validation("resume_text cannot be empty".to_string()));
    }
    let chars = text.chars().count();
    if chars > max_chars {
        return Err(AppError::Validation(format!(
            "resume_text is {chars} characters, limit is {max_chars}"
        )));
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resumes/parse
///
/// Reconstructs experience, education, skills and summary claims from raw
/// extracted resume text.
pub async fn handle_parse_resume(
    State(state): State<AppState>,
    Json(request): Json<ParseResumeRequest>,
) -> Result<Json<ResumeEntities>, AppError> {
    validate_resume_text(&request.resume_text, state.config.max_resume_chars)?;
    let ctx = evaluation_context(request.as_of);

    let entities = state.scorer.parse(request.resume_text, ctx).await?;

    Ok(Json(entities))
}

/// POST /api/v1/education/classify
pub async fn handle_classify_degree(
    Json(request): Json<ClassifyDegreeRequest>,
) -> Result<Json<ClassifyDegreeResponse>, AppError> {
    if request.degree.trim().is_empty() {
        return Err(AppError::Validation("degree cannot be empty".to_string()));
    }

    Ok(Json(ClassifyDegreeResponse {
        level: classify_degree(&request.degree),
        expanded_degree: expand_degree(&request.degree),
        field: degree_field(&request.degree),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_of_pins_context() {
        let date = NaiveDate::from_ymd_opt(2020, 1, 31).unwrap();
        assert_eq!(evaluation_context(Some(date)).now, date);
    }

    #[test]
    fn test_resume_text_limits() {
        assert!(validate_resume_text("   ", 100).is_err());
        assert!(validate_resume_text("abcdef", 5).is_err());
        assert!(validate_resume_text("abcde", 5).is_ok());
    }
}
