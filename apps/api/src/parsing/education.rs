//! Education Classifier.
//!
//! Degree strings arrive in every spelling imaginable: `B.Com`, `B Com`,
//! `BCom`, `Batchelor of Commerce`. Classification works on canonical
//! tokens (dots removed, stray initials fused) so all of them meet the same
//! keyword table.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::resume::{DegreeLevel, EducationEntry};
use crate::models::timeline::EvaluationContext;
use crate::parsing::dates::scan_tokens;
use crate::parsing::normalizer::{strip_bullet, RawLine};

static PHD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bph\.?\s*d\b\.?").unwrap());

static INSTITUTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:university|universit[äa]t|college|institute|institution|school|academy|polytechnic|iit|iim|nit|iiit|bits|vidyalaya|vidyapeeth|campus|faculty)\b",
    )
    .unwrap()
});

static PART_SPLIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*[|,;]\s*|\s+[–—-]\s+").unwrap());

static IN_FIELD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:in|specialization|specialisation|major)\s*:?\s+([A-Za-z&][A-Za-z&.' ]*)")
        .unwrap()
});

static OF_FIELD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bof\s+([A-Za-z&][A-Za-z&.' ]*)").unwrap());

static PARENTHETICAL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(([^)]*)\)").unwrap());

static FIELD_STOP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s+(?:from|at|with|and minor)\b.*$").unwrap());

const PHD_TOKENS: &[&str] = &["phd", "doctorate", "dphil", "doctoral"];

const MASTER_TOKENS: &[&str] = &[
    "master", "masters", "mastr", "mastrs", "mastar", "mastars", "mba", "mtech", "ms", "msc",
    "ma", "mca", "mcom", "me", "mphil", "pgdm", "pgp", "pgpm", "pgdba", "llm", "mfa", "mpa",
    "mph", "mpharm", "mdes", "postgraduate", "pg",
];

const BACHELOR_TOKENS: &[&str] = &[
    "bachelor", "bachelors", "batchelor", "batchelors", "bachlor", "bachlors", "bachelore",
    "bachellor", "btech", "be", "bs", "bsc", "ba", "bca", "bba", "bcom", "llb", "mbbs", "barch",
    "bpharm", "bdes", "bms", "bfa", "bed", "undergraduate", "ug",
];

/// Tokens that are also ordinary words ("be", "me", "Ms"). They only count
/// when written as an abbreviation: all caps or dotted.
const AMBIGUOUS_TOKENS: &[&str] = &["be", "me", "ms", "ma", "ba", "bs", "bed", "pg", "ug"];

/// `Master` on its own is a job title word ("Scrum Master"); it names a
/// degree only before one of these or another degree word.
const BARE_MASTER_TOKENS: &[&str] = &["master", "mastr", "mastar"];

const MASTER_QUALIFIERS: &[&str] = &["of", "in", "degree", "program", "programme"];

/// Products that follow `MS` in skill lists.
const MS_PRODUCTS: &[&str] = &[
    "excel", "office", "word", "project", "sql", "powerpoint", "access", "outlook", "visio",
    "teams", "dynamics", "azure", "paint",
];

const EXPANSIONS: &[(&str, &str)] = &[
    ("ba", "Bachelor of Arts"),
    ("barch", "Bachelor of Architecture"),
    ("bba", "Bachelor of Business Administration"),
    ("bca", "Bachelor of Computer Applications"),
    ("bcom", "Bachelor of Commerce"),
    ("bdes", "Bachelor of Design"),
    ("be", "Bachelor of Engineering"),
    ("bed", "Bachelor of Education"),
    ("bfa", "Bachelor of Fine Arts"),
    ("bms", "Bachelor of Management Studies"),
    ("bpharm", "Bachelor of Pharmacy"),
    ("bs", "Bachelor of Science"),
    ("bsc", "Bachelor of Science"),
    ("btech", "Bachelor of Technology"),
    ("dphil", "Doctor of Philosophy"),
    ("llb", "Bachelor of Laws"),
    ("llm", "Master of Laws"),
    ("ma", "Master of Arts"),
    ("mba", "Master of Business Administration"),
    ("mbbs", "Bachelor of Medicine and Bachelor of Surgery"),
    ("mca", "Master of Computer Applications"),
    ("mcom", "Master of Commerce"),
    ("mdes", "Master of Design"),
    ("me", "Master of Engineering"),
    ("mfa", "Master of Fine Arts"),
    ("mpa", "Master of Public Administration"),
    ("mph", "Master of Public Health"),
    ("mpharm", "Master of Pharmacy"),
    ("mphil", "Master of Philosophy"),
    ("ms", "Master of Science"),
    ("msc", "Master of Science"),
    ("mtech", "Master of Technology"),
    ("pgdba", "Post Graduate Diploma in Business Administration"),
    ("pgdm", "Post Graduate Diploma in Management"),
    ("pgp", "Post Graduate Program"),
    ("pgpm", "Post Graduate Program in Management"),
    ("phd", "Doctor of Philosophy"),
];

const MISSPELLINGS: &[(&str, &str)] = &[
    ("bachelore", "Bachelor"),
    ("bachellor", "Bachelor"),
    ("bachlor", "Bachelor"),
    ("bachlors", "Bachelor's"),
    ("batchelor", "Bachelor"),
    ("batchelors", "Bachelor's"),
    ("mastar", "Master"),
    ("mastars", "Master's"),
    ("mastr", "Master"),
    ("mastrs", "Master's"),
];

// ────────────────────────────────────────────────────────────────────────────
// Canonical tokens
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
struct DegreeToken {
    text: String,
    /// Written as an abbreviation (all caps, dotted or fused from initials).
    abbreviated: bool,
}

fn canonical_tokens(raw: &str) -> Vec<DegreeToken> {
    let raw = PHD_RE.replace_all(raw, " PHD ");
    let words: Vec<(String, bool)> = raw
        .split(|c: char| {
            c.is_whitespace() || (!c.is_alphanumeric() && c != '.' && c != '\'' && c != '’')
        })
        .filter(|w| !w.is_empty())
        .filter_map(|w| {
            let dotted = w.trim_end_matches('.').contains('.');
            let letters: String = w.chars().filter(|c| c.is_alphanumeric()).collect();
            let upper = letters.len() > 1 && letters.chars().all(|c| !c.is_lowercase());
            let mixed = letters.chars().skip(1).any(|c| c.is_uppercase());
            if letters.is_empty() {
                None
            } else {
                Some((letters.to_lowercase(), dotted || upper || mixed))
            }
        })
        .collect();

    let mut tokens = Vec::new();
    let mut i = 0;
    while i < words.len() {
        let (word, abbreviated) = &words[i];
        if !is_initial(word) {
            tokens.push(DegreeToken {
                text: word.clone(),
                abbreviated: *abbreviated,
            });
            i += 1;
            continue;
        }

        // A run of initials: "P G D M" → pgdm, "B Com" → bcom
        let run_end = (i..words.len())
            .find(|&j| !is_initial(&words[j].0))
            .unwrap_or(words.len());
        let mut fused: String = words[i..run_end].iter().map(|(w, _)| w.as_str()).collect();
        let mut next = run_end;
        if run_end - i == 1 {
            if let Some((follow, _)) = words.get(run_end) {
                if follow.len() <= 5 && follow.chars().all(|c| c.is_ascii_alphabetic()) {
                    fused.push_str(follow);
                    next += 1;
                }
            }
        }
        tokens.push(DegreeToken {
            text: fused,
            abbreviated: true,
        });
        i = next;
    }
    tokens
}

fn is_initial(word: &str) -> bool {
    word.len() == 1 && word.chars().all(|c| c.is_ascii_alphabetic())
}

fn token_level(token: &DegreeToken) -> DegreeLevel {
    let text = token.text.as_str();
    if AMBIGUOUS_TOKENS.contains(&text) && !token.abbreviated {
        return DegreeLevel::None;
    }
    if PHD_TOKENS.contains(&text) {
        DegreeLevel::Phd
    } else if MASTER_TOKENS.contains(&text) {
        DegreeLevel::Master
    } else if BACHELOR_TOKENS.contains(&text) {
        DegreeLevel::Bachelor
    } else {
        DegreeLevel::None
    }
}

/// Level of `tokens[i]` given its neighbour: `MS Excel` and a bare
/// `Master` are not degrees.
fn contextual_level(tokens: &[DegreeToken], i: usize) -> DegreeLevel {
    let text = tokens[i].text.as_str();
    let next = tokens.get(i + 1);
    let next_text = next.map(|t| t.text.as_str());

    if text == "ms" && next_text.is_some_and(|n| MS_PRODUCTS.contains(&n)) {
        return DegreeLevel::None;
    }
    if BARE_MASTER_TOKENS.contains(&text) {
        let qualified = next.is_some_and(|n| {
            MASTER_QUALIFIERS.contains(&n.text.as_str()) || token_level(n) != DegreeLevel::None
        });
        if !qualified {
            return DegreeLevel::None;
        }
    }
    token_level(&tokens[i])
}

/// A lone undotted short form after another part reads as a US state code:
/// the `MA` in `Boston University, Boston, MA`.
fn is_region_code(part: &str) -> bool {
    if part.contains('.') {
        return false;
    }
    let tokens: Vec<DegreeToken> = canonical_tokens(part)
        .into_iter()
        .filter(|t| !t.text.chars().all(|c| c.is_ascii_digit()))
        .collect();
    matches!(tokens.as_slice(), [t] if t.text.len() == 2 && AMBIGUOUS_TOKENS.contains(&t.text.as_str()))
}

// ────────────────────────────────────────────────────────────────────────────
// Public API
// ────────────────────────────────────────────────────────────────────────────

/// Highest degree level mentioned in `raw`.
pub fn classify_degree(raw: &str) -> DegreeLevel {
    let tokens = canonical_tokens(raw);
    let mut level = (0..tokens.len())
        .map(|i| contextual_level(&tokens, i))
        .max()
        .unwrap_or_default();

    let joined = tokens
        .iter()
        .map(|t| t.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    if joined.contains("doctor of philosophy") {
        level = level.max(DegreeLevel::Phd);
    }
    if joined.contains("post graduate") {
        level = level.max(DegreeLevel::Master);
    }
    level
}

/// Leading abbreviation replaced by its full name, misspellings fixed, the
/// rest of the string kept: `PGPM(HR)` → `Post Graduate Program in Management (HR)`.
pub fn expand_degree(raw: &str) -> String {
    let (full, rest) = split_abbreviation(raw);
    let rest = fix_misspellings(&rest);
    match full {
        Some(full) if rest.is_empty() => full.to_string(),
        Some(full) if rest.starts_with([',', ':', ';']) => format!("{full}{rest}"),
        Some(full) => format!("{full} {rest}"),
        None => rest,
    }
}

/// Specialisation: `in X`, a parenthetical, a trailing segment after a
/// comma or dash, or the `of X` tail of the full degree name.
pub fn degree_field(raw: &str) -> Option<String> {
    let (full, rest) = split_abbreviation(raw);
    let rest = fix_misspellings(&rest);

    if let Some(caps) = IN_FIELD_RE.captures(&rest) {
        if let Some(field) = clean_field(&caps[1]) {
            return Some(field);
        }
    }
    if let Some(caps) = PARENTHETICAL_RE.captures(&rest) {
        if let Some(field) = clean_field(&caps[1]) {
            return Some(field);
        }
    }
    if let Some((_, tail)) = rest.split_once([',', '–', '—', ':']) {
        if let Some(field) = clean_field(tail) {
            return Some(field);
        }
    }
    if let Some(caps) = OF_FIELD_RE.captures(&rest) {
        if let Some(field) = clean_field(&caps[1]) {
            return Some(field);
        }
    }

    match full {
        // "M.Sc Physics"
        Some(_) if !rest.is_empty() => clean_field(&rest),
        Some("Doctor of Philosophy") | None => None,
        Some(full) => IN_FIELD_RE
            .captures(full)
            .or_else(|| OF_FIELD_RE.captures(full))
            .and_then(|caps| clean_field(&caps[1])),
    }
}

fn clean_field(candidate: &str) -> Option<String> {
    let cut = candidate
        .split(['(', ')', ',', '|', '-', '–', '—', ';'])
        .next()
        .unwrap_or_default();
    let cut = FIELD_STOP_RE.replace(cut, "");
    let cut = cut
        .split(|c: char| c.is_ascii_digit() || c == '%')
        .next()
        .unwrap_or_default()
        .trim()
        .trim_end_matches('.')
        .trim();
    let has_letters = cut.chars().filter(|c| c.is_alphabetic()).count() >= 2;
    if !has_letters || classify_degree(cut) != DegreeLevel::None || INSTITUTION_RE.is_match(cut) {
        return None;
    }
    Some(cut.to_string())
}

/// Splits a leading abbreviation (up to four words, e.g. `M. B. A.`) off
/// the raw degree string.
fn split_abbreviation(raw: &str) -> (Option<&'static str>, String) {
    let spaced = raw.trim().replace('(', " (");
    let words: Vec<&str> = spaced.split_whitespace().collect();

    for n in (1..=words.len().min(4)).rev() {
        let head = words[..n].join(" ");
        let trailing = head
            .chars()
            .rev()
            .take_while(|c| matches!(c, ',' | ':' | ';'))
            .collect::<String>();
        let tokens = canonical_tokens(head.trim_end_matches([',', ':', ';']));
        let [token] = tokens.as_slice() else {
            continue;
        };
        if AMBIGUOUS_TOKENS.contains(&token.text.as_str()) && !token.abbreviated {
            continue;
        }
        if let Some((_, full)) = EXPANSIONS.iter().find(|(abbr, _)| *abbr == token.text) {
            let rest = format!("{trailing} {}", words[n..].join(" "));
            let rest = rest.trim().trim_end_matches([',', ':', ';']).trim();
            return (Some(full), tidy_parens(rest));
        }
    }
    (None, tidy_parens(raw.trim()))
}

fn tidy_parens(text: &str) -> String {
    text.replace(" (", "(").replace('(', " (").trim().to_string()
}

fn fix_misspellings(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let lower = word.to_lowercase();
            MISSPELLINGS
                .iter()
                .find(|(wrong, _)| *wrong == lower)
                .map(|(_, right)| right.to_string())
                .unwrap_or_else(|| word.to_string())
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// ────────────────────────────────────────────────────────────────────────────
// Entry extraction
// ────────────────────────────────────────────────────────────────────────────

/// Degree lines open entries. Institution and year lines attach to the
/// entry they follow, or to the next one when they come first.
pub fn extract_education(lines: &[RawLine], ctx: &EvaluationContext) -> Vec<EducationEntry> {
    let mut entries: Vec<EducationEntry> = Vec::new();
    let mut pending_institution: Option<String> = None;
    let mut pending_year: Option<i32> = None;
    // Whether the last entry may still absorb institution/year lines.
    let mut open = false;

    for line in lines.iter().map(|l| strip_bullet(&l.text)) {
        if line.is_empty() {
            continue;
        }
        let parts: Vec<&str> = PART_SPLIT_RE
            .split(line)
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();
        let year = latest_year(line, ctx);
        let institution = parts
            .iter()
            .find(|p| INSTITUTION_RE.is_match(p) && classify_degree(p) == DegreeLevel::None)
            .map(|p| p.to_string());

        let degree_idx = parts
            .iter()
            .enumerate()
            .position(|(i, p)| {
                classify_degree(p) != DegreeLevel::None && !(i > 0 && is_region_code(p))
            });
        if let Some(degree_idx) = degree_idx {
            let raw_degree = degree_text(&parts, degree_idx);
            entries.push(EducationEntry {
                level: classify_degree(&raw_degree),
                expanded_degree: expand_degree(&raw_degree),
                field: degree_field(&raw_degree),
                raw_degree,
                institution: institution.or(pending_institution.take()),
                graduation_year: year.or(pending_year.take()),
            });
            open = true;
            continue;
        }

        match entries.last_mut().filter(|_| open) {
            Some(entry) => {
                if let Some(inst) = institution {
                    if entry.institution.is_none() {
                        entry.institution = Some(inst);
                    } else {
                        open = false;
                        pending_institution = Some(inst);
                    }
                }
                if let Some(y) = year {
                    if open {
                        entry.graduation_year = entry.graduation_year.max(Some(y));
                    } else {
                        pending_year = Some(y);
                    }
                }
            }
            None => {
                pending_institution = institution.or(pending_institution);
                pending_year = year.or(pending_year);
            }
        }
    }
    entries
}

/// The degree part plus any following parts that read as a field of study.
fn degree_text(parts: &[&str], degree_idx: usize) -> String {
    let mut text = parts[degree_idx].to_string();
    for part in &parts[degree_idx + 1..] {
        let is_field = !INSTITUTION_RE.is_match(part)
            && !part.chars().any(|c| c.is_ascii_digit())
            && classify_degree(part) == DegreeLevel::None
            && part.split_whitespace().count() <= 5;
        if !is_field {
            break;
        }
        text.push_str(", ");
        text.push_str(part);
    }
    text
}

fn latest_year(line: &str, ctx: &EvaluationContext) -> Option<i32> {
    scan_tokens(line, ctx)
        .into_iter()
        .filter(|t| !t.token.is_present)
        .map(|t| t.token.year)
        .max()
}
