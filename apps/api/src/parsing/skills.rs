use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::parsing::normalizer::strip_bullet;

/// Longer fragments are sentences, not skills.
const SKILL_MAX_WORDS: usize = 4;

/// `Languages:` / `Tools & Platforms -` style category labels.
static CATEGORY_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z /&+]{0,40}\s*[:–—]\s*").unwrap());

static LEADING_CONJUNCTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:and|&|or)\s+").unwrap());

/// Splits the body of a Skills section into individual skills, deduplicated
/// case-insensitively in order of appearance.
pub fn extract_skills(section_text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut skills = Vec::new();

    for line in section_text.lines() {
        let line = strip_bullet(line);
        let line = CATEGORY_PREFIX_RE.replace(line, "");
        let line = line.replace(" / ", ",").replace(['(', ')'], ",");

        for token in line.split([',', ';', '|', '•', '·']) {
            let token = LEADING_CONJUNCTION_RE.replace(token.trim(), "");
            let token = token.trim().trim_end_matches('.').trim();
            if token.is_empty() || token.split_whitespace().count() > SKILL_MAX_WORDS {
                continue;
            }
            if seen.insert(token.to_lowercase()) {
                skills.push(token.to_string());
            }
        }
    }
    skills
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comma_separated() {
        assert_eq!(
            extract_skills("Rust, SQL, Kafka"),
            vec!["Rust", "SQL", "Kafka"]
        );
    }

    #[test]
    fn test_category_prefix_and_bullets() {
        let skills = extract_skills("• Languages: Python, C++, C#\n• Tools: Docker | Kubernetes");
        assert_eq!(skills, vec!["Python", "C++", "C#", "Docker", "Kubernetes"]);
    }

    #[test]
    fn test_parenthetical_sub_skills() {
        let skills = extract_skills("Python (Pandas, NumPy), .NET");
        assert_eq!(skills, vec!["Python", "Pandas", "NumPy", ".NET"]);
    }

    #[test]
    fn test_dedupes_case_insensitively() {
        let skills = extract_skills("SQL, sql\nExcel and SQL");
        assert_eq!(skills, vec!["SQL", "Excel and SQL"]);
    }

    #[test]
    fn test_drops_sentences() {
        let skills = extract_skills("Strong ability to build relationships with clients, CRM");
        assert_eq!(skills, vec!["CRM"]);
    }

    #[test]
    fn test_keeps_slash_compounds() {
        assert_eq!(extract_skills("CI/CD, TCP/IP"), vec!["CI/CD", "TCP/IP"]);
    }
}
