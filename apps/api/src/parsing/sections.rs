use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::parsing::normalizer::{is_bullet_line, RawLine};

const HEADER_MAX_WORDS: usize = 5;
const HEADER_MAX_CHARS: usize = 48;

static DURATION_STATEMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*\d+(?:\.\d+)?\s*\+?\s*(?:years?|yrs?|months?)\b").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Summary,
    Experience,
    Internships,
    Education,
    Skills,
    Certifications,
    Projects,
    Languages,
    /// Awards, interests, references and the like. Only used as a stop boundary.
    Additional,
}

const SECTION_KEYWORDS: &[(SectionKind, &[&str])] = &[
    (
        SectionKind::Summary,
        &[
            "summary", "profile", "profile summary", "career summary", "about me", "objective",
            "career objective", "executive summary", "overview", "career profile",
        ],
    ),
    (
        SectionKind::Experience,
        &[
            "experience", "work history", "employment", "employment history", "career history",
            "professional background", "experience details", "work experience details",
        ],
    ),
    (
        SectionKind::Internships,
        &["internship", "internships", "internship experience", "internship details"],
    ),
    (
        SectionKind::Education,
        &[
            "education", "educational background", "educational qualifications",
            "academic background", "academics", "qualifications", "education and training",
            "academic details", "education details",
        ],
    ),
    (
        SectionKind::Skills,
        &[
            "skills", "skill set", "skillset", "competencies", "areas of expertise", "expertise",
            "technologies", "tools and technologies", "technical proficiency", "strengths",
        ],
    ),
    (
        SectionKind::Certifications,
        &[
            "certifications", "certification", "certificates", "licenses",
            "licenses and certifications", "courses", "trainings", "training",
        ],
    ),
    (
        SectionKind::Projects,
        &["projects", "project", "project experience", "project details"],
    ),
    (SectionKind::Languages, &["languages", "languages known"]),
    (
        SectionKind::Additional,
        &[
            "achievements", "awards", "honors", "honours", "awards and achievements",
            "accomplishments", "publications", "interests", "hobbies", "activities",
            "extracurricular activities", "volunteering", "volunteer experience", "references",
            "declaration", "personal details", "personal information", "contact",
        ],
    ),
];

/// Words that may precede a keyword without changing the section it names.
const QUALIFIERS: &[&str] = &[
    "professional", "work", "relevant", "technical", "key", "core", "academic", "my", "other",
    "additional", "selected", "recent", "personal",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderMatch {
    pub kind: SectionKind,
    /// Content following `Keyword:` on the same line.
    pub inline: Option<String>,
    /// ALL CAPS or colon-terminated.
    pub strong: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionRange {
    pub kind: SectionKind,
    /// First body line (exclusive of the header).
    pub start: usize,
    pub end: usize,
    pub header_found: bool,
    pub inline: Option<String>,
}

impl SectionRange {
    pub fn lines<'a>(&self, lines: &'a [RawLine]) -> &'a [RawLine] {
        &lines[self.start.min(lines.len())..self.end.min(lines.len())]
    }

    /// Body text, inline header content first.
    pub fn text(&self, lines: &[RawLine]) -> String {
        self.inline
            .iter()
            .map(String::as_str)
            .chain(self.lines(lines).iter().map(|l| l.text.as_str()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Header recognition
// ────────────────────────────────────────────────────────────────────────────

pub fn is_section_header(line: &str) -> bool {
    match_header(line).is_some()
}

pub fn match_header(line: &str) -> Option<HeaderMatch> {
    let trimmed = line.trim();
    if trimmed.is_empty() || is_bullet_line(trimmed) {
        return None;
    }

    if let Some(kind) = keyword_kind(trimmed) {
        return Some(HeaderMatch {
            kind,
            inline: None,
            strong: is_strong(trimmed),
        });
    }

    // `Skills: Rust, SQL`
    let (prefix, rest) = trimmed.split_once(':')?;
    let rest = rest.trim();
    if rest.is_empty() || DURATION_STATEMENT_RE.is_match(rest) {
        return None;
    }
    let kind = keyword_kind(prefix)?;
    Some(HeaderMatch {
        kind,
        inline: Some(rest.to_string()),
        strong: true,
    })
}

fn keyword_kind(candidate: &str) -> Option<SectionKind> {
    if candidate.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    let cleaned = clean_header_text(candidate);
    if cleaned.is_empty()
        || cleaned.len() > HEADER_MAX_CHARS
        || cleaned.split(' ').count() > HEADER_MAX_WORDS
    {
        return None;
    }

    if let Some(kind) = exact_kind(&cleaned) {
        return Some(kind);
    }

    // Strip qualifier words one at a time: "relevant work experience".
    let mut words: &[&str] = &cleaned.split(' ').collect::<Vec<_>>();
    while let Some((first, rest)) = words.split_first() {
        if !QUALIFIERS.contains(first) || rest.is_empty() {
            break;
        }
        if let Some(kind) = exact_kind(&rest.join(" ")) {
            return Some(kind);
        }
        words = rest;
    }
    None
}

fn exact_kind(cleaned: &str) -> Option<SectionKind> {
    SECTION_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.contains(&cleaned))
        .map(|(kind, _)| *kind)
}

/// Lowercase, decoration stripped, `&` spelled out, whitespace collapsed.
fn clean_header_text(text: &str) -> String {
    text.trim()
        .trim_matches(|c: char| !c.is_alphanumeric() && c != '&' && c != '\'')
        .replace('&', " and ")
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_strong(line: &str) -> bool {
    if line.trim_end().ends_with(':') {
        return true;
    }
    let letters: Vec<char> = line.chars().filter(|c| c.is_alphabetic()).collect();
    letters.len() >= 3 && letters.iter().all(|c| c.is_uppercase())
}

// ────────────────────────────────────────────────────────────────────────────
// Segmentation
// ────────────────────────────────────────────────────────────────────────────

/// Locates the body of the first section of `kind`. Without a header the
/// whole document is returned so downstream extraction still runs.
pub fn find_section(lines: &[RawLine], kind: SectionKind) -> SectionRange {
    let found = lines.iter().enumerate().find_map(|(i, line)| {
        match_header(&line.text)
            .filter(|h| h.kind == kind)
            .map(|h| (i, h))
    });

    let Some((header_idx, header)) = found else {
        debug!(section = ?kind, "no section header found, using whole document");
        return SectionRange {
            kind,
            start: 0,
            end: lines.len(),
            header_found: false,
            inline: None,
        };
    };

    let end = (header_idx + 1..lines.len())
        .find(|&j| is_stop_header(lines, j, kind))
        .unwrap_or(lines.len());

    SectionRange {
        kind,
        start: header_idx + 1,
        end,
        header_found: true,
        inline: header.inline,
    }
}

/// Index of the first recognised header of any kind.
pub fn first_header_index(lines: &[RawLine]) -> Option<usize> {
    (0..lines.len()).find(|&i| match_header(&lines[i].text).is_some())
}

fn is_stop_header(lines: &[RawLine], idx: usize, current: SectionKind) -> bool {
    let Some(header) = match_header(&lines[idx].text) else {
        return false;
    };
    if header.kind == current {
        return false;
    }
    if header.strong {
        return true;
    }
    // A weak header sandwiched between bullets is body text ("• Sales\nTraining\n• ...").
    let prev_bullet = lines[..idx]
        .iter()
        .rev()
        .find(|l| !l.text.trim().is_empty())
        .is_some_and(|l| is_bullet_line(&l.text));
    let next_bullet = lines[idx + 1..]
        .iter()
        .find(|l| !l.text.trim().is_empty())
        .is_some_and(|l| is_bullet_line(&l.text));
    !(prev_bullet && next_bullet)
}
