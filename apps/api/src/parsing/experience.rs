//! Experience Block Extractor.
//!
//! Blocks are anchored on date-range lines. Everything between two anchors
//! belongs to the earlier role, except up to `LOOKBACK_LINES` trailing
//! heading lines, which are the title/company of the next role.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::resume::ExperienceEntry;
use crate::models::timeline::EvaluationContext;
use crate::parsing::dates::{contains_date_range, parse_date_range, strip_dates};
use crate::parsing::normalizer::{
    ends_with_terminal, is_bullet_line, is_heading_like, starts_new_clause, strip_bullet,
    word_count, RawLine,
};

/// Heading candidates must be shorter than this.
pub const HEADING_MAX_WORDS: usize = 10;

const LOOKBACK_LINES: usize = 2;
/// An anchor line with more words than this once dates are stripped is prose.
const ANCHOR_MAX_WORDS: usize = 12;
const PRE_ANCHOR_HEADINGS: usize = 3;
const POST_ANCHOR_HEADINGS: usize = 2;
const LONG_PART_WORDS: usize = 6;

const TITLE_WORDS: &[&str] = &[
    "accountant", "administrator", "advisor", "adviser", "agent", "analyst", "apprentice",
    "architect", "assistant", "associate", "attorney", "auditor", "banker", "buyer", "ceo", "cfo",
    "chef", "clerk", "cmo", "consultant", "contractor", "controller", "coo", "coordinator",
    "counsel", "cto", "designer", "developer", "director", "doctor", "editor", "engineer",
    "executive", "expert", "fellow", "founder", "co-founder", "freelancer", "head", "instructor",
    "intern", "lawyer", "lead", "leader", "lecturer", "manager", "marketer", "member", "mentor",
    "nurse", "officer", "operator", "owner", "paralegal", "partner", "pharmacist", "physician",
    "planner", "president", "principal", "professor", "programmer", "recruiter", "representative",
    "researcher", "scientist", "specialist", "sre", "strategist", "supervisor", "teacher",
    "technician", "tester", "therapist", "trainee", "trainer", "tutor", "underwriter", "vp",
    "writer",
];

/// Legal-entity suffixes. A part carrying one is a company even if it
/// also contains a title word ("Lead Generation Pvt Ltd").
const LEGAL_SUFFIXES: &[&str] = &[
    "ltd", "limited", "inc", "llc", "llp", "pvt", "private", "corp", "corporation", "plc", "gmbh",
];

const COMPANY_WORDS: &[&str] = &[
    "bank", "capital", "college", "company", "consulting", "enterprises", "finance", "financial",
    "foundation", "group", "holdings", "hospital", "industries", "institute", "insurance", "labs",
    "media", "networks", "partners", "services", "software", "solutions", "systems", "technologies",
    "university", "ventures",
];

/// A bullet ending on one of these was hard-wrapped mid-phrase.
const DANGLING_WORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "of", "with", "to", "for", "in", "on", "at", "by", "from",
    "into", "across", "our", "their", "its", "&",
];

const KNOWN_CITIES: &[&str] = &[
    "bangalore", "bengaluru", "berlin", "chennai", "delhi", "dubai", "gurgaon", "gurugram",
    "hyderabad", "kolkata", "london", "mumbai", "new delhi", "new york", "noida", "pune",
    "san francisco", "seattle", "singapore", "sydney", "toronto",
];

static HEADING_SPLIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\|\s*|\s+(?:at|@)\s+|\s+[–—-]\s+|\s+·\s+|\s*@\s*").unwrap());

static CITY_REGION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Z][A-Za-z.'\- ]{1,30},\s*[A-Z][A-Za-z.'\- ]{1,30}$").unwrap()
});

static WORK_MODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:remote|hybrid|on-?site|work from home|wfh)\b").unwrap());

static INTERNSHIP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:intern|interns|internship|summer analyst)\b").unwrap());

// ────────────────────────────────────────────────────────────────────────────
// Blocking
// ────────────────────────────────────────────────────────────────────────────

/// One role's worth of lines. `anchor` is the position of the first
/// date-range line inside `lines`.
#[derive(Debug, Default)]
struct Block<'a> {
    lines: Vec<&'a str>,
    anchor: Option<usize>,
}

pub fn extract_experience(
    lines: &[RawLine],
    internship: bool,
    ctx: &EvaluationContext,
) -> Vec<ExperienceEntry> {
    split_blocks(lines, ctx)
        .into_iter()
        .filter_map(|block| build_entry(&block, internship, ctx))
        .collect()
}

pub fn is_anchor_line(line: &str, ctx: &EvaluationContext) -> bool {
    !is_bullet_line(line)
        && contains_date_range(line, ctx)
        && word_count(&strip_dates(line, ctx)) <= ANCHOR_MAX_WORDS
}

fn split_blocks<'a>(lines: &'a [RawLine], ctx: &EvaluationContext) -> Vec<Block<'a>> {
    let mut blocks = Vec::new();
    let mut current = Block::default();
    let mut last_anchor = 0;

    for line in lines.iter().map(|l| l.text.as_str()) {
        if line.trim().is_empty() {
            continue;
        }
        if is_anchor_line(line, ctx) {
            if current.anchor.is_some() {
                let carried = if anchor_names_role(line, ctx) {
                    Vec::new()
                } else {
                    take_trailing_headings(&mut current.lines, last_anchor + 1)
                };
                blocks.push(std::mem::take(&mut current));
                current.lines = carried;
            }
            current.anchor.get_or_insert(current.lines.len());
            last_anchor = current.lines.len();
        }
        current.lines.push(line);
    }

    if current.anchor.is_some() || current.lines.iter().any(|l| !is_bullet_line(l)) {
        blocks.push(current);
    }
    blocks
}

/// Pops up to `LOOKBACK_LINES` heading lines off the end of a closing
/// block, never reaching back past `floor`. A line that finishes a
/// wrapped bullet stays where it is.
fn take_trailing_headings<'a>(lines: &mut Vec<&'a str>, floor: usize) -> Vec<&'a str> {
    let mut carried = Vec::new();
    while carried.len() < LOOKBACK_LINES && lines.len() > floor {
        let continues_bullet = lines
            .len()
            .checked_sub(2)
            .and_then(|i| lines.get(i))
            .is_some_and(|prev| ends_mid_phrase(prev));
        match lines.last() {
            Some(last) if is_role_heading(last) && !continues_bullet => {
                if let Some(line) = lines.pop() {
                    carried.push(line);
                }
            }
            _ => break,
        }
    }
    carried.reverse();
    carried
}

fn ends_mid_phrase(line: &str) -> bool {
    is_bullet_line(line)
        && line
            .split_whitespace()
            .last()
            .is_some_and(|w| DANGLING_WORDS.contains(&w.to_lowercase().as_str()))
}

/// The anchor line alone already carries both title and company.
fn anchor_names_role(line: &str, ctx: &EvaluationContext) -> bool {
    let parts = split_heading(&strip_dates(line, ctx));
    let heading = classify_parts(parts);
    !heading.position.is_empty() && !heading.company.is_empty()
}

fn is_heading_candidate(line: &str) -> bool {
    !is_bullet_line(line) && word_count(line) < HEADING_MAX_WORDS
}

/// Short, non-bullet, unpunctuated, and either title vocabulary or capitalised.
fn is_role_heading(line: &str) -> bool {
    !is_bullet_line(line)
        && word_count(line) < HEADING_MAX_WORDS
        && !ends_with_terminal(line)
        && (has_title_word(line) || is_heading_like(line))
}

// ────────────────────────────────────────────────────────────────────────────
// Entry building
// ────────────────────────────────────────────────────────────────────────────

fn build_entry(
    block: &Block<'_>,
    internship: bool,
    ctx: &EvaluationContext,
) -> Option<ExperienceEntry> {
    let mut candidates: Vec<String> = Vec::new();
    let mut interval = None;

    let body_start = match block.anchor {
        Some(a) => {
            let mut top = a;
            while top > 0
                && a - top < PRE_ANCHOR_HEADINGS
                && is_heading_candidate(block.lines[top - 1])
            {
                top -= 1;
            }
            candidates.extend(block.lines[top..a].iter().map(|l| l.to_string()));

            let anchor_line = block.lines[a];
            interval = parse_date_range(anchor_line, ctx);
            let rest = strip_dates(anchor_line, ctx);
            if !rest.is_empty() {
                candidates.push(rest);
            }

            let mut body_start = a + 1;
            for line in block.lines[a + 1..].iter().take(POST_ANCHOR_HEADINGS) {
                if !is_role_heading(line) || contains_date_range(line, ctx) {
                    break;
                }
                candidates.push(line.to_string());
                body_start += 1;
            }
            body_start
        }
        None => {
            let top = block
                .lines
                .iter()
                .take_while(|l| is_heading_candidate(l))
                .count();
            candidates.extend(block.lines[..top].iter().map(|l| l.to_string()));
            top
        }
    };

    let parts: Vec<String> = candidates.iter().flat_map(|c| split_heading(c)).collect();
    let heading = classify_parts(parts);

    let mut description = heading.leftover.clone();
    description.extend(merge_description_lines(&block.lines[body_start..]));

    if heading.position.is_empty() && heading.company.is_empty() && interval.is_none() {
        return None;
    }

    let is_internship = internship
        || [&heading.position, &heading.company]
            .iter()
            .any(|s| INTERNSHIP_RE.is_match(s))
        || heading.leftover.iter().any(|s| INTERNSHIP_RE.is_match(s));

    Some(ExperienceEntry {
        position: heading.position,
        company: heading.company,
        location: heading.location,
        interval,
        description_lines: description,
        is_internship,
    })
}

#[derive(Debug, Default, PartialEq)]
struct Heading {
    position: String,
    company: String,
    location: Option<String>,
    leftover: Vec<String>,
}

fn classify_parts(parts: Vec<String>) -> Heading {
    let mut heading = Heading::default();

    for part in parts {
        if heading.position.is_empty() && looks_like_title(&part) {
            heading.position = part;
        } else if heading.location.is_none() && looks_like_location(&part) {
            heading.location = Some(part);
        } else if heading.company.is_empty()
            && word_count(&part) <= LONG_PART_WORDS + 2
            && !looks_like_title(&part)
        {
            heading.company = part;
        } else {
            heading.leftover.push(part);
        }
    }
    heading
}

/// Splits a heading line on the usual separators, then on commas where
/// the comma evidently separates different kinds of part.
pub fn split_heading(line: &str) -> Vec<String> {
    HEADING_SPLIT_RE
        .split(line)
        .map(|p| p.trim().trim_matches(|c: char| c == ',' || c == '(' || c == ')').trim())
        .filter(|p| !p.is_empty())
        .flat_map(split_on_commas)
        .collect()
}

fn split_on_commas(part: &str) -> Vec<String> {
    if !part.contains(", ") || looks_like_location(part) {
        return vec![part.to_string()];
    }

    // "Acme Corp, Pune, India" → company + location
    for (idx, _) in part.match_indices(", ") {
        let (left, right) = (&part[..idx], &part[idx + 2..]);
        if looks_like_location(right) {
            return vec![left.trim().to_string(), right.trim().to_string()];
        }
    }

    let pieces: Vec<&str> = part.split(", ").map(str::trim).collect();
    let later_is_company = pieces[1..].iter().any(|p| has_company_word(p));
    if later_is_company || word_count(part) > LONG_PART_WORDS {
        pieces.into_iter().map(str::to_string).collect()
    } else {
        vec![part.to_string()]
    }
}

fn lower_words(text: &str) -> Vec<String> {
    text.split(|c: char| c.is_whitespace() || c == ',' || c == '/' || c == '(' || c == ')')
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric() && c != '-').to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}

fn has_title_word(text: &str) -> bool {
    lower_words(text).iter().any(|w| TITLE_WORDS.contains(&w.as_str()))
}

fn has_legal_suffix(text: &str) -> bool {
    lower_words(text).iter().any(|w| LEGAL_SUFFIXES.contains(&w.as_str()))
}

fn has_company_word(text: &str) -> bool {
    has_legal_suffix(text) || lower_words(text).iter().any(|w| COMPANY_WORDS.contains(&w.as_str()))
}

pub fn looks_like_title(part: &str) -> bool {
    word_count(part) <= LONG_PART_WORDS + 2 && has_title_word(part) && !has_legal_suffix(part)
}

pub fn looks_like_location(part: &str) -> bool {
    let lower = part.trim().to_lowercase();
    if WORK_MODE_RE.is_match(part) {
        return true;
    }
    if KNOWN_CITIES.contains(&lower.as_str()) {
        return true;
    }
    if has_company_word(part) || has_title_word(part) {
        return false;
    }
    CITY_REGION_RE.is_match(part.trim())
        && part
            .split(',')
            .all(|seg| (1..=3).contains(&word_count(seg)))
}

// ────────────────────────────────────────────────────────────────────────────
// Description
// ────────────────────────────────────────────────────────────────────────────

/// A bullet always opens a new description line; a plain line continues
/// the previous one unless the previous is a complete sentence and the new
/// line starts a fresh one.
pub fn merge_description_lines(lines: &[&str]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();

    for line in lines.iter().map(|l| l.trim()).filter(|l| !l.is_empty()) {
        if is_bullet_line(line) {
            let text = strip_bullet(line);
            if !text.is_empty() {
                out.push(text.to_string());
            }
            continue;
        }
        match out.last_mut() {
            Some(prev) if !starts_new_clause(prev, line) => {
                prev.push(' ');
                prev.push_str(line);
            }
            _ => out.push(line.to_string()),
        }
    }
    out
}
