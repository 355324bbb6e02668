use serde::{Deserialize, Serialize};

use crate::models::timeline::DateInterval;

/// Ordinal education level. Serialized as its integer (0–3).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum DegreeLevel {
    #[default]
    None = 0,
    Bachelor = 1,
    Master = 2,
    Phd = 3,
}

impl DegreeLevel {
    pub fn label(&self) -> &'static str {
        match self {
            DegreeLevel::None => "no degree",
            DegreeLevel::Bachelor => "Bachelor's",
            DegreeLevel::Master => "Master's",
            DegreeLevel::Phd => "Doctorate",
        }
    }
}

impl TryFrom<u8> for DegreeLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(DegreeLevel::None),
            1 => Ok(DegreeLevel::Bachelor),
            2 => Ok(DegreeLevel::Master),
            3 => Ok(DegreeLevel::Phd),
            other => Err(format!("degree level must be 0-3, got {other}")),
        }
    }
}

impl From<DegreeLevel> for u8 {
    fn from(level: DegreeLevel) -> Self {
        level as u8
    }
}

/// One role reconstructed from the Experience (or Internship) section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub location: Option<String>,
    /// `None` when no date range could be parsed; such entries are skipped
    /// by tenure aggregation but still count for role and domain matching.
    #[serde(default)]
    pub interval: Option<DateInterval>,
    #[serde(default)]
    pub description_lines: Vec<String>,
    #[serde(default)]
    pub is_internship: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub raw_degree: String,
    #[serde(default)]
    pub level: DegreeLevel,
    #[serde(default)]
    pub expanded_degree: String,
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub institution: Option<String>,
    #[serde(default)]
    pub graduation_year: Option<i32>,
}

/// Structured resume facts consumed by the scoring engine.
///
/// Produced by `parsing::parse_resume` from raw text, or supplied already
/// structured by an upstream parser. Scoring does not care which.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeEntities {
    #[serde(default)]
    pub experience: Vec<ExperienceEntry>,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
    #[serde(default)]
    pub skills: Vec<String>,
    /// Years claimed in the free-text summary ("8+ years of experience").
    #[serde(default)]
    pub summary_years: Option<f64>,
    /// Normalized resume text, used for phrase-level skill and domain lookups.
    #[serde(default)]
    pub full_text: String,
}

impl ResumeEntities {
    pub fn highest_degree(&self) -> DegreeLevel {
        self.education
            .iter()
            .map(|e| e.level)
            .max()
            .unwrap_or(DegreeLevel::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degree_level_serializes_as_integer() {
        let json = serde_json::to_string(&DegreeLevel::Master).unwrap();
        assert_eq!(json, "2");
    }

    #[test]
    fn test_degree_level_rejects_out_of_range() {
        let parsed: Result<DegreeLevel, _> = serde_json::from_str("7");
        assert!(parsed.is_err());
    }

    #[test]
    fn test_degree_levels_are_ordered() {
        assert!(DegreeLevel::Phd > DegreeLevel::Master);
        assert!(DegreeLevel::Bachelor > DegreeLevel::None);
    }

    #[test]
    fn test_partial_payload_deserializes_with_defaults() {
        let json = r#"{"experience": [{"position": "Analyst"}]}"#;
        let resume: ResumeEntities = serde_json::from_str(json).unwrap();
        assert_eq!(resume.experience.len(), 1);
        assert!(resume.experience[0].interval.is_none());
        assert!(resume.education.is_empty());
        assert_eq!(resume.highest_degree(), DegreeLevel::None);
    }
}
