use std::collections::BTreeSet;

use crate::models::job::DegreeRequirement;
use crate::models::result::CategoryScore;
use crate::models::resume::{DegreeLevel, EducationEntry};

pub const FIELD_MISMATCH_SCORE: f64 = 75.0;
pub const MANDATORY_NO_DEGREE_SCORE: f64 = 0.0;
pub const MANDATORY_LOWER_DEGREE_SCORE: f64 = 20.0;
pub const PREFERRED_LOWER_DEGREE_SCORE: f64 = 60.0;
pub const PREFERRED_NO_DEGREE_SCORE: f64 = 40.0;

const FIELD_ABBREVIATIONS: &[(&str, &str)] = &[
    ("cs", "computer science"),
    ("cse", "computer science engineering"),
    ("it", "information technology"),
    ("hr", "human resources"),
    ("hrm", "human resource management"),
    ("ece", "electronics communication engineering"),
    ("eee", "electrical electronics engineering"),
    ("ee", "electrical engineering"),
    ("me", "mechanical engineering"),
    ("ai", "artificial intelligence"),
    ("ml", "machine learning"),
];

const FIELD_STOP_WORDS: &[&str] = &["and", "of", "in", "&", "the", "with", "studies"];

fn field_tokens(field: &str) -> BTreeSet<String> {
    let lowered = field.to_lowercase();
    let expanded = FIELD_ABBREVIATIONS
        .iter()
        .find(|(short, _)| *short == lowered.trim())
        .map_or(lowered.as_str(), |(_, long)| *long);

    expanded
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty() && !FIELD_STOP_WORDS.contains(w))
        // "resources" and "resource" are the same field
        .map(|w| w.trim_end_matches('s').to_string())
        .collect()
}

/// Fields match when either token set contains the other.
pub fn field_matches(required: &str, held: &str) -> bool {
    let required = field_tokens(required);
    let held = field_tokens(held);
    if required.is_empty() || held.is_empty() {
        return false;
    }
    required.is_subset(&held) || held.is_subset(&required)
}

pub fn score_education(
    education: &[EducationEntry],
    requirement: Option<&DegreeRequirement>,
) -> CategoryScore {
    let Some(requirement) = requirement else {
        return CategoryScore::new(100.0, vec!["No degree requirement".to_string()]);
    };
    if requirement.level == DegreeLevel::None && requirement.field.is_none() {
        return CategoryScore::new(100.0, vec!["No degree requirement".to_string()]);
    }

    let highest = education
        .iter()
        .map(|e| e.level)
        .max()
        .unwrap_or(DegreeLevel::None);

    if highest >= requirement.level {
        let Some(field) = requirement.field.as_deref().filter(|f| !f.trim().is_empty()) else {
            return CategoryScore::new(
                100.0,
                vec![format!("Holds {} (required {})", highest.label(), requirement.level.label())],
            );
        };
        let qualifying = education.iter().filter(|e| e.level >= requirement.level);
        let mut held_fields = qualifying.filter_map(|e| e.field.as_deref());
        return if held_fields.any(|held| field_matches(field, held)) {
            CategoryScore::new(
                100.0,
                vec![format!("Holds {} in {field}", requirement.level.label())],
            )
        } else {
            CategoryScore::new(
                FIELD_MISMATCH_SCORE,
                vec![format!(
                    "Holds {} but not in {field}",
                    requirement.level.label()
                )],
            )
        };
    }

    let has_degree = highest > DegreeLevel::None;
    let (raw, message) = match (requirement.mandatory, has_degree) {
        (true, false) => (
            MANDATORY_NO_DEGREE_SCORE,
            format!("No degree found; {} is mandatory", requirement.level.label()),
        ),
        (true, true) => (
            MANDATORY_LOWER_DEGREE_SCORE,
            format!(
                "Holds {}; {} is mandatory",
                highest.label(),
                requirement.level.label()
            ),
        ),
        (false, true) => (
            PREFERRED_LOWER_DEGREE_SCORE,
            format!(
                "Holds {}; {} preferred",
                highest.label(),
                requirement.level.label()
            ),
        ),
        (false, false) => (
            PREFERRED_NO_DEGREE_SCORE,
            format!("No degree found; {} preferred", requirement.level.label()),
        ),
    };
    CategoryScore::new(raw, vec![message])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_entry(level: DegreeLevel, field: Option<&str>) -> EducationEntry {
        EducationEntry {
            raw_degree: "degree".to_string(),
            level,
            field: field.map(str::to_string),
            ..Default::default()
        }
    }

    fn make_requirement(level: DegreeLevel, field: Option<&str>, mandatory: bool) -> DegreeRequirement {
        DegreeRequirement {
            level,
            field: field.map(str::to_string),
            mandatory,
        }
    }

    #[test]
    fn test_no_requirement() {
        assert_eq!(score_education(&[], None).score, 100);
    }

    #[test]
    fn test_level_and_field_met() {
        let education = vec![make_entry(DegreeLevel::Bachelor, Some("Computer Science"))];
        let req = make_requirement(DegreeLevel::Bachelor, Some("CS"), true);
        assert_eq!(score_education(&education, Some(&req)).score, 100);
    }

    #[test]
    fn test_higher_degree_satisfies() {
        let education = vec![make_entry(DegreeLevel::Master, Some("Finance"))];
        let req = make_requirement(DegreeLevel::Bachelor, None, true);
        assert_eq!(score_education(&education, Some(&req)).score, 100);
    }

    #[test]
    fn test_field_mismatch() {
        let education = vec![make_entry(DegreeLevel::Bachelor, Some("Commerce"))];
        let req = make_requirement(DegreeLevel::Bachelor, Some("Computer Science"), false);
        assert_eq!(score_education(&education, Some(&req)).score, 75);
    }

    #[test]
    fn test_mandatory_degree_missing() {
        let req = make_requirement(DegreeLevel::Bachelor, None, true);
        let score = score_education(&[], Some(&req)).score;
        assert!(score <= 25);

        let education = vec![make_entry(DegreeLevel::Bachelor, None)];
        let req = make_requirement(DegreeLevel::Master, None, true);
        assert_eq!(score_education(&education, Some(&req)).score, 20);
    }

    #[test]
    fn test_preferred_degree_missing() {
        let education = vec![make_entry(DegreeLevel::Bachelor, None)];
        let req = make_requirement(DegreeLevel::Master, None, false);
        assert_eq!(score_education(&education, Some(&req)).score, 60);
        assert_eq!(score_education(&[], Some(&req)).score, 40);
    }

    #[test]
    fn test_field_matches_plural_and_abbreviation() {
        assert!(field_matches("HR", "Human Resources"));
        assert!(field_matches("Finance", "Finance and Accounting"));
        assert!(!field_matches("Marketing", "Finance"));
    }
}
