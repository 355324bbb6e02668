//! Job requirements as delivered by the upstream JD parser.
//!
//! The payload is already structured; missing fields fall back to permissive
//! defaults. Only structural violations are rejected.

use serde::{Deserialize, Serialize};

use crate::matching::MatchError;
use crate::models::resume::DegreeLevel;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DegreeRequirement {
    #[serde(default)]
    pub level: DegreeLevel,
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub mandatory: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobRequirements {
    #[serde(default)]
    pub role_title: String,
    #[serde(default)]
    pub min_years: f64,
    #[serde(default)]
    pub max_years: Option<f64>,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub degree: Option<DegreeRequirement>,
}

impl JobRequirements {
    /// Rejects requirement objects that can only come from a broken upstream
    /// collaborator. Empty strings and missing optionals are fine.
    pub fn validate(&self) -> Result<(), MatchError> {
        if !self.min_years.is_finite() || self.min_years < 0.0 {
            return Err(MatchError::InvalidRequirements(format!(
                "min_years must be a non-negative number, got {}",
                self.min_years
            )));
        }
        if let Some(max) = self.max_years {
            if !max.is_finite() || max < 0.0 {
                return Err(MatchError::InvalidRequirements(format!(
                    "max_years must be a non-negative number, got {max}"
                )));
            }
            if max < self.min_years {
                return Err(MatchError::InvalidRequirements(format!(
                    "max_years ({max}) is below min_years ({})",
                    self.min_years
                )));
            }
        }
        Ok(())
    }

    /// Required skills trimmed, blank entries dropped, duplicates removed
    /// case-insensitively. Order of first appearance is kept.
    pub fn normalized_skills(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        self.required_skills
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .filter(|s| seen.insert(s.to_lowercase()))
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_payload_is_permissive() {
        let reqs: JobRequirements = serde_json::from_str("{}").unwrap();
        assert_eq!(reqs.min_years, 0.0);
        assert!(reqs.max_years.is_none());
        assert!(reqs.degree.is_none());
        assert!(reqs.validate().is_ok());
    }

    #[test]
    fn test_negative_min_years_rejected() {
        let reqs = JobRequirements {
            min_years: -1.0,
            ..Default::default()
        };
        let err = reqs.validate().unwrap_err();
        assert!(err.to_string().contains("min_years"));
    }

    #[test]
    fn test_max_below_min_rejected() {
        let reqs = JobRequirements {
            min_years: 5.0,
            max_years: Some(3.0),
            ..Default::default()
        };
        assert!(reqs.validate().is_err());
    }

    #[test]
    fn test_nan_min_years_rejected() {
        let reqs = JobRequirements {
            min_years: f64::NAN,
            ..Default::default()
        };
        assert!(reqs.validate().is_err());
    }

    #[test]
    fn test_degree_mandatory_defaults_false() {
        let json = r#"{"degree": {"level": 1}}"#;
        let reqs: JobRequirements = serde_json::from_str(json).unwrap();
        let degree = reqs.degree.unwrap();
        assert_eq!(degree.level, DegreeLevel::Bachelor);
        assert!(!degree.mandatory);
    }

    #[test]
    fn test_normalized_skills_dedupes_and_trims() {
        let reqs = JobRequirements {
            required_skills: vec![
                " Rust ".to_string(),
                "rust".to_string(),
                "".to_string(),
                "SQL".to_string(),
            ],
            ..Default::default()
        };
        assert_eq!(reqs.normalized_skills(), vec!["Rust", "SQL"]);
    }
}
