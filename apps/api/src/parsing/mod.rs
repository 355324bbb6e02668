// Resume parsing: raw extracted text → ResumeEntities.
// Normalizer → section segmenter → per-section extractors. Every heuristic is
// a pure function of (text, EvaluationContext); nothing here errors on messy input.

pub mod dates;
pub mod education;
pub mod experience;
pub mod handlers;
pub mod normalizer;
pub mod sections;
pub mod skills;
pub mod summary;

use tracing::{debug, info};

use crate::models::resume::{DegreeLevel, ResumeEntities};
use crate::models::timeline::EvaluationContext;
use crate::parsing::experience::is_anchor_line;
use crate::parsing::normalizer::{is_bullet_line, RawLine};
use crate::parsing::sections::{find_section, first_header_index, SectionKind, SectionRange};

pub use education::{classify_degree, degree_field, expand_degree};

/// Sections whose dated lines must not be read as employment.
const NON_EMPLOYMENT_SECTIONS: &[SectionKind] = &[
    SectionKind::Education,
    SectionKind::Internships,
    SectionKind::Projects,
    SectionKind::Certifications,
    SectionKind::Additional,
];

pub fn parse_resume(text: &str, ctx: &EvaluationContext) -> ResumeEntities {
    let lines = normalizer::normalize_lines(text, ctx);

    let experience_range = find_section(&lines, SectionKind::Experience);
    let experience_lines = if experience_range.header_found {
        experience_range.lines(&lines).to_vec()
    } else {
        lines_outside(&lines, NON_EMPLOYMENT_SECTIONS)
    };
    let mut experience = experience::extract_experience(&experience_lines, false, ctx);

    let internship_range = find_section(&lines, SectionKind::Internships);
    if internship_range.header_found {
        experience.extend(experience::extract_experience(
            internship_range.lines(&lines),
            true,
            ctx,
        ));
    }

    let education_range = find_section(&lines, SectionKind::Education);
    let education = if education_range.header_found {
        education::extract_education(education_range.lines(&lines), ctx)
    } else {
        education::extract_education(&education_candidates(&lines, ctx), ctx)
    };

    let skills_range = find_section(&lines, SectionKind::Skills);
    let skills = if skills_range.header_found {
        skills::extract_skills(&skills_range.text(&lines))
    } else {
        debug!("no skills section, skills left to full-text matching");
        Vec::new()
    };

    let summary_years = summary::extract_summary_years(&summary_text(&lines));

    info!(
        lines = lines.len(),
        experience = experience.len(),
        education = education.len(),
        skills = skills.len(),
        summary_years = ?summary_years,
        "Parsed resume"
    );

    ResumeEntities {
        experience,
        education,
        skills,
        summary_years,
        full_text: lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// The Summary section, or the preamble before the first header.
fn summary_text(lines: &[RawLine]) -> String {
    let range = find_section(lines, SectionKind::Summary);
    if range.header_found {
        return range.text(lines);
    }
    let end = first_header_index(lines).unwrap_or(lines.len());
    lines[..end]
        .iter()
        .map(|l| l.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Lines a headerless education scan may read: employment blocks and the
/// skills section are left out. Dated lines that lead with a degree stay.
fn education_candidates(lines: &[RawLine], ctx: &EvaluationContext) -> Vec<RawLine> {
    let skills = find_section(lines, SectionKind::Skills);
    let skills_lines = match (skills.header_found, &skills.inline) {
        (false, _) => 0..0,
        (true, Some(_)) => skills.start.saturating_sub(1)..skills.start,
        (true, None) => skills.start.saturating_sub(1)..skills.end,
    };

    let mut in_employment = false;
    lines
        .iter()
        .filter(|line| {
            if skills_lines.contains(&line.index) {
                return false;
            }
            if is_anchor_line(&line.text, ctx) {
                in_employment = !opens_with_degree(&line.text);
                return !in_employment;
            }
            if is_bullet_line(&line.text) {
                return !in_employment;
            }
            in_employment = false;
            true
        })
        .cloned()
        .collect()
}

fn opens_with_degree(line: &str) -> bool {
    line.split(['|', ',', ';'])
        .next()
        .is_some_and(|first| classify_degree(first) != DegreeLevel::None)
}

fn lines_outside(lines: &[RawLine], kinds: &[SectionKind]) -> Vec<RawLine> {
    let excluded: Vec<SectionRange> = kinds
        .iter()
        .map(|kind| find_section(lines, *kind))
        .filter(|range| range.header_found)
        .collect();

    lines
        .iter()
        .filter(|line| {
            !excluded
                .iter()
                .any(|r| (r.start.saturating_sub(1)..r.end).contains(&line.index))
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ctx() -> EvaluationContext {
        EvaluationContext::pinned(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap())
    }

    const RESUME: &str = "\
Priya Sharma
priya@example.com

PROFESSIONAL SUMMARY
Credit operations leader with 9+ years of experience in microfinance lending.

WORK EXPERIENCE
Branch Manager | Ujjivan Small Finance Bank | Apr 2019 - Present
• Grew the loan book from 40 Cr to 95 Cr
• Managed a team of 18 loan officers
Loan Officer
Bandhan Bank
Jun 2015 - Mar 2019
• Disbursed group loans to 1,200 borrowers

EDUCATION
MBA (Finance), Symbiosis Institute of Business Management, 2015
B.Com, Delhi University, 2013

SKILLS
Credit Appraisal, Portfolio Management, MS Excel, Tally
";

    #[test]
    fn test_parse_full_resume() {
        let entities = parse_resume(RESUME, &ctx());

        assert_eq!(entities.experience.len(), 2);
        assert_eq!(entities.experience[0].position, "Branch Manager");
        assert_eq!(entities.experience[0].company, "Ujjivan Small Finance Bank");
        assert_eq!(entities.experience[0].description_lines.len(), 2);
        assert_eq!(entities.experience[1].position, "Loan Officer");
        assert_eq!(entities.experience[1].company, "Bandhan Bank");

        assert_eq!(entities.education.len(), 2);
        assert_eq!(entities.highest_degree(), DegreeLevel::Master);
        assert_eq!(entities.education[0].field.as_deref(), Some("Finance"));

        assert_eq!(entities.skills.len(), 4);
        assert_eq!(entities.summary_years, Some(9.0));
    }

    #[test]
    fn test_internships_flagged() {
        let text = "EXPERIENCE\nAnalyst | Globex | 2021 - Present\n\nINTERNSHIPS\nResearch Assistant | IIT Delhi | May 2019 - Jul 2019";
        let entities = parse_resume(text, &ctx());
        assert_eq!(entities.experience.len(), 2);
        assert!(!entities.experience[0].is_internship);
        assert!(entities.experience[1].is_internship);
    }

    #[test]
    fn test_headerless_resume_skips_education_dates() {
        let text = "Sales Executive | Acme | 2018 - 2022\n• Closed deals\nEDUCATION\nB.Tech, NIT Trichy, 2014 - 2018";
        let entities = parse_resume(text, &ctx());
        assert_eq!(entities.experience.len(), 1);
        assert_eq!(entities.education.len(), 1);
    }

    #[test]
    fn test_headerless_education_ignores_skills_and_titles() {
        let text = "\
Scrum Master | Acme Corp | 2018 - 2022
• Ran sprint planning for three teams
• Coached the MS Dynamics rollout team
Skills: MS Excel, CRM
B.Com, Delhi University, 2014";
        let entities = parse_resume(text, &ctx());
        assert_eq!(entities.education.len(), 1);
        assert_eq!(entities.highest_degree(), DegreeLevel::Bachelor);
        assert_eq!(entities.education[0].graduation_year, Some(2014));
    }

    #[test]
    fn test_headerless_degree_with_date_range_kept() {
        let text = "Analyst | Globex | 2019 - 2022\n• Built dashboards\nMBA, IIM Ahmedabad, 2017 - 2019";
        let entities = parse_resume(text, &ctx());
        assert_eq!(entities.highest_degree(), DegreeLevel::Master);
    }

    #[test]
    fn test_empty_text() {
        let entities = parse_resume("", &ctx());
        assert!(entities.experience.is_empty());
        assert!(entities.education.is_empty());
        assert!(entities.summary_years.is_none());
    }
}
