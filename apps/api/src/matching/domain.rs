//! Coarse industry/function classification by keyword clusters.
//!
//! Profiles are `BTreeMap`s keyed by `Domain`, so iteration order (and
//! therefore tie-breaking) is the enum declaration order on every run.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::matching::role::stem;
use crate::models::result::CategoryScore;
use crate::models::resume::ResumeEntities;

/// Resume share of the JD domain that still earns partial credit.
pub const PARTIAL_SHARE: f64 = 0.2;
pub const PARTIAL_BASE: f64 = 40.0;
pub const PARTIAL_CAP: f64 = 60.0;
pub const MISMATCH_CAP: f64 = 20.0;
pub const UNKNOWN_RESUME_SCORE: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Software,
    Data,
    Sales,
    Marketing,
    Finance,
    HumanResources,
    Operations,
    Design,
    Healthcare,
    Education,
    Product,
    CustomerSupport,
    Legal,
    Consulting,
}

impl Domain {
    pub fn label(&self) -> &'static str {
        match self {
            Domain::Software => "software engineering",
            Domain::Data => "data & analytics",
            Domain::Sales => "sales",
            Domain::Marketing => "marketing",
            Domain::Finance => "finance & banking",
            Domain::HumanResources => "human resources",
            Domain::Operations => "operations & supply chain",
            Domain::Design => "design",
            Domain::Healthcare => "healthcare",
            Domain::Education => "education",
            Domain::Product => "product management",
            Domain::CustomerSupport => "customer support",
            Domain::Legal => "legal",
            Domain::Consulting => "consulting",
        }
    }
}

const DOMAIN_KEYWORDS: &[(Domain, &[&str])] = &[
    (
        Domain::Software,
        &[
            "software", "backend", "frontend", "full stack", "fullstack", "api", "apis",
            "microservices", "java", "python", "javascript", "typescript", "react", "node",
            "golang", "rust", "kubernetes", "docker", "devops", "cloud", "aws", "programming",
            "coding", "git", "web application", "mobile app", "android", "ios",
            "distributed systems", "ci cd", "debugging", "code review", "software engineering",
        ],
    ),
    (
        Domain::Data,
        &[
            "data", "analytics", "machine learning", "statistics", "statistical", "sql", "tableau",
            "power bi", "etl", "data warehouse", "big data", "spark", "pandas", "forecasting",
            "dashboards", "data science", "nlp", "deep learning", "business intelligence",
        ],
    ),
    (
        Domain::Sales,
        &[
            "sales", "selling", "revenue", "quota", "b2b", "b2c", "business development",
            "lead generation", "crm", "salesforce", "deals", "client acquisition", "territory",
            "channel partners", "distributors", "cold calling", "prospecting", "negotiation",
            "key accounts",
        ],
    ),
    (
        Domain::Marketing,
        &[
            "marketing", "brand", "branding", "campaigns", "seo", "sem", "social media", "content",
            "digital marketing", "advertising", "market research", "growth", "email marketing",
            "public relations",
        ],
    ),
    (
        Domain::Finance,
        &[
            "finance", "financial", "accounting", "audit", "tax", "taxation", "budgeting",
            "treasury", "investment", "banking", "bank", "loans", "lending", "credit",
            "microfinance", "mfi", "nbfc", "portfolio", "underwriting", "risk", "gst", "ledger",
            "tally", "reconciliation", "equity", "valuation", "insurance", "collections",
        ],
    ),
    (
        Domain::HumanResources,
        &[
            "hr", "human resources", "recruitment", "recruiting", "talent acquisition", "hiring",
            "onboarding", "payroll", "employee engagement", "compensation", "benefits", "hrbp",
            "performance management", "sourcing candidates",
        ],
    ),
    (
        Domain::Operations,
        &[
            "operations", "supply chain", "logistics", "procurement", "inventory", "warehouse",
            "vendor management", "process improvement", "lean", "six sigma", "manufacturing",
            "production", "quality control", "fleet", "dispatch",
        ],
    ),
    (
        Domain::Design,
        &[
            "design", "ux", "ui", "figma", "sketch", "photoshop", "illustrator", "wireframes",
            "prototyping", "user research", "graphic design", "visual design", "typography",
        ],
    ),
    (
        Domain::Healthcare,
        &[
            "healthcare", "hospital", "clinical", "patients", "nursing", "medical", "pharma",
            "pharmaceutical", "diagnosis", "clinic", "therapy", "health",
        ],
    ),
    (
        Domain::Education,
        &[
            "teaching", "teacher", "curriculum", "students", "classroom", "school", "tutoring",
            "lessons", "edtech", "pedagogy", "faculty", "lecturer",
        ],
    ),
    (
        Domain::Product,
        &[
            "product management", "product manager", "roadmap", "product owner", "user stories",
            "backlog", "product strategy", "go to market", "prd", "feature prioritization",
        ],
    ),
    (
        Domain::CustomerSupport,
        &[
            "customer support", "customer service", "helpdesk", "help desk", "tickets", "zendesk",
            "call center", "customer success", "customer experience", "escalations", "complaints",
        ],
    ),
    (
        Domain::Legal,
        &[
            "legal", "law", "lawyer", "litigation", "contracts", "compliance", "regulatory",
            "counsel", "paralegal", "intellectual property", "drafting",
        ],
    ),
    (
        Domain::Consulting,
        &[
            "consulting", "consultant", "advisory", "strategy", "client engagements",
            "due diligence", "transformation", "management consulting",
        ],
    ),
];

/// Adjacent domains that share skills and vocabulary.
const RELATED_DOMAINS: &[(Domain, Domain)] = &[
    (Domain::Software, Domain::Data),
    (Domain::Software, Domain::Product),
    (Domain::Data, Domain::Product),
    (Domain::Sales, Domain::Marketing),
    (Domain::Sales, Domain::CustomerSupport),
    (Domain::Marketing, Domain::Product),
    (Domain::Marketing, Domain::Design),
    (Domain::Design, Domain::Product),
    (Domain::Finance, Domain::Consulting),
    (Domain::Finance, Domain::Operations),
    (Domain::Finance, Domain::Legal),
    (Domain::Operations, Domain::Consulting),
    (Domain::HumanResources, Domain::Operations),
];

pub fn are_related(a: Domain, b: Domain) -> bool {
    RELATED_DOMAINS
        .iter()
        .any(|&(x, y)| (x == a && y == b) || (x == b && y == a))
}

fn stemmed_words(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(stem)
        .collect()
}

fn count_phrase(words: &[String], phrase: &[String]) -> usize {
    if phrase.is_empty() || phrase.len() > words.len() {
        return 0;
    }
    words.windows(phrase.len()).filter(|w| *w == phrase).count()
}

/// Keyword hit share per domain. Domains without hits are absent.
pub fn domain_profile(text: &str) -> BTreeMap<Domain, f64> {
    let words = stemmed_words(text);
    let mut hits: BTreeMap<Domain, usize> = BTreeMap::new();

    for (domain, keywords) in DOMAIN_KEYWORDS {
        let count: usize = keywords
            .iter()
            .map(|k| count_phrase(&words, &stemmed_words(k)))
            .sum();
        if count > 0 {
            hits.insert(*domain, count);
        }
    }

    let total: usize = hits.values().sum();
    hits.into_iter()
        .map(|(domain, count)| (domain, count as f64 / total as f64))
        .collect()
}

/// Domain with the largest share; ties go to the earlier enum variant.
pub fn primary_domain(profile: &BTreeMap<Domain, f64>) -> Option<Domain> {
    profile
        .iter()
        .fold(None, |best: Option<(Domain, f64)>, (&domain, &share)| match best {
            Some((_, top)) if top >= share => best,
            _ => Some((domain, share)),
        })
        .map(|(domain, _)| domain)
}

pub fn classify_domain(text: &str) -> Option<Domain> {
    primary_domain(&domain_profile(text))
}

/// Text describing what the candidate has actually done. Titles count twice.
fn resume_domain_text(resume: &ResumeEntities) -> String {
    if resume.experience.is_empty() {
        return resume.full_text.clone();
    }
    let mut parts: Vec<&str> = Vec::new();
    for entry in &resume.experience {
        parts.push(&entry.position);
        parts.push(&entry.position);
        parts.push(&entry.company);
        parts.extend(entry.description_lines.iter().map(String::as_str));
    }
    parts.extend(resume.skills.iter().map(String::as_str));
    parts.join("\n")
}

pub fn score_domain(resume: &ResumeEntities, jd_domain: &str) -> CategoryScore {
    let Some(target) = classify_domain(jd_domain) else {
        return CategoryScore::new(100.0, vec!["No target domain given".to_string()]);
    };

    let profile = domain_profile(&resume_domain_text(resume));
    let Some(primary) = primary_domain(&profile) else {
        return CategoryScore::new(
            UNKNOWN_RESUME_SCORE,
            vec!["Could not determine the candidate's domain".to_string()],
        );
    };

    if primary == target {
        return CategoryScore::new(
            100.0,
            vec![format!("Background is primarily {}", target.label())],
        );
    }

    let share = profile.get(&target).copied().unwrap_or(0.0);
    if are_related(primary, target) || share >= PARTIAL_SHARE {
        let raw = (PARTIAL_BASE + share * 100.0).min(PARTIAL_CAP);
        return CategoryScore::new(
            raw,
            vec![format!(
                "Background is primarily {}, adjacent to {}",
                primary.label(),
                target.label()
            )],
        );
    }

    CategoryScore::new(
        (share * 100.0).min(MISMATCH_CAP),
        vec![format!(
            "Background is primarily {}, not {}",
            primary.label(),
            target.label()
        )],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::ExperienceEntry;

    fn make_resume(position: &str, lines: &[&str]) -> ResumeEntities {
        ResumeEntities {
            experience: vec![ExperienceEntry {
                position: position.to_string(),
                description_lines: lines.iter().map(|l| l.to_string()).collect(),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_classify_jd_domain() {
        assert_eq!(classify_domain("Sales"), Some(Domain::Sales));
        assert_eq!(classify_domain("Microfinance / Lending"), Some(Domain::Finance));
        assert_eq!(classify_domain("Software"), Some(Domain::Software));
        assert_eq!(classify_domain(""), None);
        assert_eq!(classify_domain("Widgets"), None);
    }

    #[test]
    fn test_profile_shares_sum_to_one() {
        let profile = domain_profile("Built Python APIs and SQL dashboards");
        let total: f64 = profile.values().sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_tie_breaks_by_enum_order() {
        let profile = BTreeMap::from([(Domain::Sales, 0.5), (Domain::Software, 0.5)]);
        assert_eq!(primary_domain(&profile), Some(Domain::Software));
    }

    #[test]
    fn test_same_domain_full_score() {
        let resume = make_resume(
            "Loan Officer",
            &["Disbursed microfinance loans", "Managed credit risk for the portfolio"],
        );
        assert_eq!(score_domain(&resume, "Microfinance").score, 100);
    }

    #[test]
    fn test_mismatch_capped() {
        let resume = make_resume(
            "Software Engineer",
            &["Built Java microservices on Kubernetes", "Wrote Python APIs and code review tooling"],
        );
        assert!(score_domain(&resume, "Sales").score <= 20);
    }

    #[test]
    fn test_related_domain_partial() {
        let resume = make_resume(
            "Marketing Associate",
            &["Ran social media campaigns", "Owned SEO and content"],
        );
        let score = score_domain(&resume, "Sales").score;
        assert!((40..=60).contains(&score), "{score}");
    }

    #[test]
    fn test_unknown_jd_domain_is_permissive() {
        let resume = make_resume("Chef", &["Cooked"]);
        assert_eq!(score_domain(&resume, "").score, 100);
    }

    #[test]
    fn test_unclassifiable_resume_neutral() {
        let resume = make_resume("Chef", &["Cooked dinners"]);
        assert_eq!(score_domain(&resume, "Sales").score, 50);
    }
}
