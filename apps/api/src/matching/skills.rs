use crate::models::result::CategoryScore;
use crate::models::resume::ResumeEntities;

/// Coverage from which the score enters the 90–100 band.
pub const FRINGE_COVERAGE: f64 = 0.8;
pub const FRINGE_FLOOR: f64 = 90.0;

/// Groups of interchangeable spellings. Lookups are symmetric.
const ALIASES: &[&[&str]] = &[
    &["javascript", "js", "ecmascript"],
    &["typescript", "ts"],
    &["kubernetes", "k8s"],
    &["golang", "go"],
    &["postgresql", "postgres", "psql"],
    &["node.js", "nodejs", "node"],
    &["react", "react.js", "reactjs"],
    &["power bi", "powerbi"],
    &["machine learning", "ml"],
    &["artificial intelligence", "ai"],
    &["ms excel", "excel", "microsoft excel", "advanced excel"],
    &["amazon web services", "aws"],
    &["google cloud platform", "gcp", "google cloud"],
    &["c#", "csharp", "c sharp"],
    &["ci/cd", "cicd", "ci cd"],
    &["natural language processing", "nlp"],
    &["user experience", "ux"],
];

/// Short spellings that are everyday words or fragments in prose ("go-live",
/// "go to market"). They only match a listed skill, never the full text.
const LISTED_ONLY_ALIASES: &[&str] = &["go", "ts", "ai", "ml", "node"];

fn spellings(skill: &str) -> Vec<String> {
    let key = skill.trim().to_lowercase();
    let mut all = vec![key.clone()];
    if let Some(group) = ALIASES.iter().find(|group| group.contains(&key.as_str())) {
        all.extend(
            group
                .iter()
                .filter(|alias| **alias != key)
                .map(|alias| alias.to_string()),
        );
    }
    all
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '+' || c == '#'
}

/// Case-insensitive phrase search that refuses partial words, so `C`
/// does not match inside `C++` and `Java` does not match `JavaScript`.
pub fn contains_phrase(haystack: &str, phrase: &str) -> bool {
    let haystack = haystack.to_lowercase();
    let phrase = phrase.trim().to_lowercase();
    if phrase.is_empty() {
        return false;
    }

    let mut from = 0;
    while let Some(offset) = haystack[from..].find(&phrase) {
        let start = from + offset;
        let end = start + phrase.len();
        let before_ok = haystack[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !is_word_char(c));
        let after_ok = haystack[end..]
            .chars()
            .next()
            .map_or(true, |c| !is_word_char(c));
        if before_ok && after_ok {
            return true;
        }
        from = start + haystack[start..].chars().next().map_or(1, char::len_utf8);
    }
    false
}

pub fn has_skill(resume: &ResumeEntities, skill: &str) -> bool {
    let variants = spellings(skill);
    let listed = resume
        .skills
        .iter()
        .map(|s| s.trim().to_lowercase())
        .any(|s| variants.contains(&s));
    listed
        || variants
            .iter()
            .filter(|variant| !LISTED_ONLY_ALIASES.contains(&variant.as_str()))
            .any(|variant| contains_phrase(&resume.full_text, variant))
}

/// Maps coverage to a score with an allowance for a few fringe skills.
pub fn coverage_score(coverage: f64) -> f64 {
    if coverage >= FRINGE_COVERAGE {
        FRINGE_FLOOR + (coverage - FRINGE_COVERAGE) / (1.0 - FRINGE_COVERAGE) * (100.0 - FRINGE_FLOOR)
    } else {
        coverage / FRINGE_COVERAGE * FRINGE_FLOOR
    }
}

/// Returns the category score plus matched and missing skills, each in the
/// order the job listed them.
pub fn score_skills(
    resume: &ResumeEntities,
    required: &[String],
) -> (CategoryScore, Vec<String>, Vec<String>) {
    if required.is_empty() {
        return (
            CategoryScore::new(100.0, vec!["No required skills given".to_string()]),
            Vec::new(),
            Vec::new(),
        );
    }

    let (matched, missing): (Vec<String>, Vec<String>) = required
        .iter()
        .cloned()
        .partition(|skill| has_skill(resume, skill));

    let coverage = matched.len() as f64 / required.len() as f64;
    let mut feedback = vec![format!(
        "{} of {} required skills found",
        matched.len(),
        required.len()
    )];
    if !missing.is_empty() {
        feedback.push(format!("Missing: {}", missing.join(", ")));
    }

    (
        CategoryScore::new(coverage_score(coverage), feedback),
        matched,
        missing,
    )
}
