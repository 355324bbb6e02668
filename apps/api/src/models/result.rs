use serde::{Deserialize, Serialize};

/// Score and justification for one matching dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub score: u32, // 0 – 100
    pub feedback: Vec<String>,
}

impl CategoryScore {
    /// Rounds and clamps a raw 0–100 value.
    pub fn new(raw: f64, feedback: Vec<String>) -> Self {
        Self {
            score: raw.clamp(0.0, 100.0).round() as u32,
            feedback,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryScores {
    pub duration: CategoryScore,
    pub role: CategoryScore,
    pub domain: CategoryScore,
    pub skills: CategoryScore,
    pub education: CategoryScore,
}

/// Where the effective years figure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TenureSource {
    /// Dated roles only.
    Calendar,
    /// The summary claim was adopted outright (low-confidence extraction).
    Summary,
    /// Partially trusted summary claim between the confidence bounds.
    Blended,
}

/// Aggregated experience figures for one resume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenureSummary {
    pub total_months: u32,
    pub total_years: f64,
    pub internship_years: f64,
    pub effective_years: f64,
    pub summary_years: Option<f64>,
    pub source: TenureSource,
}

/// Full match report returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub comprehensive_score: u32, // 0 – 100
    pub category_scores: CategoryScores,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    /// Duration/role/domain layer after the career-pivot dampener.
    pub experience_score: u32,
    pub career_pivot_applied: bool,
    pub tenure: TenureSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_score_clamped_and_rounded() {
        assert_eq!(CategoryScore::new(104.2, vec![]).score, 100);
        assert_eq!(CategoryScore::new(-3.0, vec![]).score, 0);
        assert_eq!(CategoryScore::new(66.5, vec![]).score, 67);
    }

    #[test]
    fn test_tenure_source_snake_case() {
        let json = serde_json::to_string(&TenureSource::Blended).unwrap();
        assert_eq!(json, r#""blended""#);
    }
}
