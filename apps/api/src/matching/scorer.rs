//! Match Scorer: async seam between the HTTP layer and the engine.
//!
//! Default: `RuleBasedScorer`, the deterministic engine in this crate.
//! `AppState` holds an `Arc<dyn MatchScorer>` so handlers never call the
//! engine directly and tests can substitute a stub.

use async_trait::async_trait;

use crate::errors::AppError;
use crate::matching::{match_resume, match_resume_text};
use crate::models::job::JobRequirements;
use crate::models::result::MatchResult;
use crate::models::resume::ResumeEntities;
use crate::models::timeline::EvaluationContext;
use crate::parsing::parse_resume;

/// A resume as it arrives from a caller.
#[derive(Debug, Clone)]
pub enum ResumeInput {
    /// Raw text from the extraction collaborator.
    Text(String),
    /// Entities already structured by an upstream parser.
    Parsed(ResumeEntities),
}

#[async_trait]
pub trait MatchScorer: Send + Sync {
    async fn parse(&self, text: String, ctx: EvaluationContext)
        -> Result<ResumeEntities, AppError>;

    async fn score(
        &self,
        resume: ResumeInput,
        requirements: JobRequirements,
        ctx: EvaluationContext,
    ) -> Result<MatchResult, AppError>;

    /// Backend name, reported for transparency.
    fn backend(&self) -> &'static str;
}

// ────────────────────────────────────────────────────────────────────────────
// RuleBasedScorer
// ────────────────────────────────────────────────────────────────────────────

/// Runs the CPU-bound engine on the blocking pool.
pub struct RuleBasedScorer;

#[async_trait]
impl MatchScorer for RuleBasedScorer {
    async fn parse(
        &self,
        text: String,
        ctx: EvaluationContext,
    ) -> Result<ResumeEntities, AppError> {
        tokio::task::spawn_blocking(move || parse_resume(&text, &ctx))
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in parse: {e}")))
    }

    async fn score(
        &self,
        resume: ResumeInput,
        requirements: JobRequirements,
        ctx: EvaluationContext,
    ) -> Result<MatchResult, AppError> {
        let result = tokio::task::spawn_blocking(move || match &resume {
            ResumeInput::Text(text) => match_resume_text(text, &requirements, &ctx),
            ResumeInput::Parsed(entities) => match_resume(entities, &requirements, &ctx),
        })
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in match: {e}")))?;

        Ok(result?)
    }

    fn backend(&self) -> &'static str {
        "rule_based"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ctx() -> EvaluationContext {
        EvaluationContext::pinned(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap())
    }

    #[tokio::test]
    async fn test_parse_runs_engine() {
        let entities = RuleBasedScorer
            .parse("EXPERIENCE\nAnalyst | Globex | 2020 - 2022".to_string(), ctx())
            .await
            .unwrap();
        assert_eq!(entities.experience.len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_requirements_become_validation_error() {
        let reqs = JobRequirements {
            min_years: -1.0,
            ..Default::default()
        };
        let err = RuleBasedScorer
            .score(ResumeInput::Text("text".to_string()), reqs, ctx())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_parsed_input_scored() {
        let result = RuleBasedScorer
            .score(
                ResumeInput::Parsed(ResumeEntities::default()),
                JobRequirements::default(),
                ctx(),
            )
            .await
            .unwrap();
        assert_eq!(result.comprehensive_score, 100);
    }
}
