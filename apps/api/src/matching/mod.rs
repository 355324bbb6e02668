// Matching engine: ResumeEntities + JobRequirements → MatchResult.
// Category scorers are pure; the composite layer combines their rounded scores.
// `scorer` wraps the engine behind an async trait for the HTTP layer.

pub mod composite;
pub mod domain;
pub mod duration;
pub mod education;
pub mod handlers;
pub mod role;
pub mod scorer;
pub mod skills;
pub mod tenure;

use thiserror::Error;
use tracing::{info, warn};

use crate::models::job::JobRequirements;
use crate::models::result::{CategoryScores, MatchResult};
use crate::models::resume::ResumeEntities;
use crate::models::timeline::EvaluationContext;
use crate::parsing::parse_resume;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatchError {
    #[error("Invalid job requirements: {0}")]
    InvalidRequirements(String),
}

pub fn match_resume(
    resume: &ResumeEntities,
    requirements: &JobRequirements,
    ctx: &EvaluationContext,
) -> Result<MatchResult, MatchError> {
    if let Err(e) = requirements.validate() {
        warn!("Rejected job requirements: {e}");
        return Err(e);
    }

    let tenure = tenure::summarize(&resume.experience, resume.summary_years, ctx);
    let duration = duration::score_duration(
        tenure.effective_years,
        requirements.min_years,
        requirements.max_years,
    );
    let role = role::score_role(&resume.experience, &requirements.role_title, ctx);
    let domain = domain::score_domain(resume, &requirements.domain);
    let (skills, matched_skills, missing_skills) =
        skills::score_skills(resume, &requirements.normalized_skills());
    let education = education::score_education(&resume.education, requirements.degree.as_ref());

    let layer = composite::experience_layer(duration.score, role.score, domain.score);
    let comprehensive = composite::comprehensive(layer.score, skills.score, education.score);

    let result = MatchResult {
        comprehensive_score: composite::round_score(comprehensive),
        experience_score: composite::round_score(layer.score),
        career_pivot_applied: layer.career_pivot,
        category_scores: CategoryScores {
            duration,
            role,
            domain,
            skills,
            education,
        },
        matched_skills,
        missing_skills,
        tenure,
    };

    info!(
        score = result.comprehensive_score,
        experience = result.experience_score,
        career_pivot = result.career_pivot_applied,
        "Matched resume"
    );
    Ok(result)
}

/// Parses raw resume text with the same evaluation context, then matches.
/// Requirements are validated before any parsing work.
pub fn match_resume_text(
    text: &str,
    requirements: &JobRequirements,
    ctx: &EvaluationContext,
) -> Result<MatchResult, MatchError> {
    if let Err(e) = requirements.validate() {
        warn!("Rejected job requirements: {e}");
        return Err(e);
    }
    let resume = parse_resume(text, ctx);
    match_resume(&resume, requirements, ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{DegreeLevel, EducationEntry, ExperienceEntry};
    use crate::models::timeline::{DateInterval, DateToken};
    use chrono::NaiveDate;

    fn ctx() -> EvaluationContext {
        EvaluationContext::pinned(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap())
    }

    fn make_resume() -> ResumeEntities {
        let ctx = ctx();
        ResumeEntities {
            experience: vec![ExperienceEntry {
                position: "Credit Analyst".to_string(),
                company: "Axis Bank".to_string(),
                interval: DateInterval::new(
                    DateToken::new(Some(0), 2018),
                    DateToken::present(&ctx),
                    &ctx,
                ),
                description_lines: vec![
                    "Assessed credit risk for SME loans".to_string(),
                    "Built loan portfolio dashboards in Excel".to_string(),
                ],
                ..Default::default()
            }],
            education: vec![EducationEntry {
                raw_degree: "MBA (Finance)".to_string(),
                level: DegreeLevel::Master,
                field: Some("Finance".to_string()),
                ..Default::default()
            }],
            skills: vec!["Credit Appraisal".to_string(), "Excel".to_string()],
            ..Default::default()
        }
    }

    fn make_requirements() -> JobRequirements {
        JobRequirements {
            role_title: "Credit Analyst".to_string(),
            min_years: 3.0,
            max_years: Some(8.0),
            domain: "Banking".to_string(),
            required_skills: vec!["Credit Appraisal".to_string(), "MS Excel".to_string()],
            degree: None,
        }
    }

    #[test]
    fn test_strong_match() {
        let result = match_resume(&make_resume(), &make_requirements(), &ctx()).unwrap();
        assert_eq!(result.category_scores.duration.score, 100);
        assert_eq!(result.category_scores.role.score, 100);
        assert_eq!(result.category_scores.domain.score, 100);
        assert_eq!(result.category_scores.skills.score, 100);
        assert_eq!(result.comprehensive_score, 100);
        assert!(!result.career_pivot_applied);
        assert!(result.missing_skills.is_empty());
    }

    #[test]
    fn test_invalid_requirements_rejected() {
        let reqs = JobRequirements {
            min_years: -2.0,
            ..make_requirements()
        };
        let err = match_resume(&make_resume(), &reqs, &ctx()).unwrap_err();
        assert!(matches!(err, MatchError::InvalidRequirements(_)));
        assert!(match_resume_text("anything", &reqs, &ctx()).is_err());
    }

    #[test]
    fn test_deterministic() {
        let a = match_resume(&make_resume(), &make_requirements(), &ctx()).unwrap();
        let b = match_resume(&make_resume(), &make_requirements(), &ctx()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_requirements_permissive() {
        let result = match_resume(&make_resume(), &JobRequirements::default(), &ctx()).unwrap();
        assert_eq!(result.comprehensive_score, 100);
    }
}
