//! Text Normalizer: repairs text fragmented by PDF/DOCX extraction.
//!
//! Passes run in a fixed order: cleanup → inline bullet split → split-word
//! repair → bullet canonicalisation → wrap joining. Each pass is a plain
//! function so its edge cases can be pinned down separately.
//!
//! Splitting is line-driven: two sentences on one physical line ("MFIs.
//! Trained 40 staff") stay together. Only wrap joining decides whether a
//! line break was a real boundary.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::timeline::EvaluationContext;
use crate::parsing::dates::contains_date_range;
use crate::parsing::sections::is_section_header;

/// Canonical bullet glyph. Every normalized bullet line starts with it.
pub const BULLET_MARKER: char = '•';

/// Fewer words than this and a fragment is never treated as a complete clause.
pub const MIN_CLAUSE_WORDS: usize = 6;

const HEADING_LIKE_MAX_WORDS: usize = 6;

/// Glyphs that start a new line even when they appear mid-line.
const INLINE_BULLET_GLYPHS: &[char] = &[
    '•', '●', '○', '◦', '➢', '➤', '►', '▪', '■', '□', '◆', '♦', '✓', '✔', '❖', '\u{f0b7}',
    '\u{f0a7}', '\u{f0d8}',
];

/// Extra glyphs that only count as bullets at the start of a line.
const LEADING_ONLY_GLYPHS: &[char] = &['-', '*', '–', '—', '»', '·', '>'];

/// Real words that must never be glued onto their neighbour.
const SHORT_WORDS: &[&str] = &[
    "a", "ai", "am", "an", "as", "at", "be", "by", "do", "eg", "go", "he", "hr", "id", "ie", "if",
    "in", "io", "is", "it", "kg", "km", "me", "ml", "ms", "my", "no", "of", "ok", "on", "or", "pm",
    "qa", "so", "to", "ui", "up", "us", "ux", "vs", "we",
];

/// Words a single-letter skill like "C" or "R" is commonly followed by.
const STOP_WORDS: &[&str] = &[
    "and", "are", "for", "from", "into", "over", "plus", "the", "was", "with",
];

const CONNECTOR_WORDS: &[&str] = &[
    "of", "and", "&", "at", "in", "for", "the", "de", "la", "on", "to", "-", "–", "—", "|", "@",
    "/", "·",
];

/// Abbreviations that end with a period without ending a sentence.
const NON_TERMINAL_ABBREVIATIONS: &[&str] = &[
    "ltd.", "inc.", "co.", "corp.", "llc.", "pvt.", "jr.", "sr.", "st.", "etc.", "vs.",
];

/// Education and award lines end in a year; nothing wraps onto them.
static TRAILING_YEAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:19|20)\d{2}\)?\s*$").unwrap());

/// A single line of normalized text with its position in the normalized document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLine {
    pub index: usize,
    pub text: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Public entry points
// ────────────────────────────────────────────────────────────────────────────

pub fn normalize(text: &str, ctx: &EvaluationContext) -> String {
    normalize_lines(text, ctx)
        .into_iter()
        .map(|l| l.text)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn normalize_lines(text: &str, ctx: &EvaluationContext) -> Vec<RawLine> {
    let physical: Vec<String> = text
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .lines()
        .map(clean_line)
        .flat_map(|line| split_inline_bullets(&line))
        .map(|line| normalize_bullet(&repair_split_words(&line)))
        .collect();

    join_wrapped_lines(&physical, ctx)
        .into_iter()
        .enumerate()
        .map(|(index, text)| RawLine { index, text })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Passes
// ────────────────────────────────────────────────────────────────────────────

/// Drops zero-width characters and soft hyphens, maps NBSP/tabs to spaces,
/// collapses runs of whitespace.
pub fn clean_line(line: &str) -> String {
    line.chars()
        .filter(|c| !matches!(c, '\u{200b}' | '\u{200c}' | '\u{200d}' | '\u{feff}' | '\u{ad}'))
        .map(|c| if c == '\u{a0}' || c == '\t' { ' ' } else { c })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Breaks a line before every bullet glyph that is not at its start.
pub fn split_inline_bullets(line: &str) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();

    for c in line.chars() {
        if INLINE_BULLET_GLYPHS.contains(&c) && !current.trim().is_empty() {
            pieces.push(current.trim().to_string());
            current.clear();
        }
        current.push(c);
    }
    let last = current.trim();
    if !last.is_empty() || pieces.is_empty() {
        pieces.push(last.to_string());
    }
    pieces
}

/// Glues kerning fragments back onto their word: "develop ed" → "developed",
/// "M anaged" → "Managed". Real short words are left alone.
pub fn repair_split_words(line: &str) -> String {
    let mut out: Vec<String> = Vec::new();

    for token in line.split(' ').filter(|t| !t.is_empty()) {
        if let Some(prev) = out.last_mut() {
            if is_suffix_fragment(token) && is_gluable_stem(prev) {
                prev.push_str(token);
                continue;
            }
            if is_stray_capital(prev) && is_lowercase_run(token) {
                prev.push_str(token);
                continue;
            }
        }
        out.push(token.to_string());
    }
    out.join(" ")
}

fn is_suffix_fragment(token: &str) -> bool {
    (1..=2).contains(&token.len())
        && token.chars().all(|c| c.is_ascii_lowercase())
        && !SHORT_WORDS.contains(&token)
}

fn is_gluable_stem(token: &str) -> bool {
    token.len() >= 3
        && token.chars().all(|c| c.is_ascii_alphabetic())
        && token.ends_with(|c: char| c.is_ascii_lowercase())
        && !SHORT_WORDS.contains(&token.to_ascii_lowercase().as_str())
}

fn is_stray_capital(token: &str) -> bool {
    let mut chars = token.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_ascii_uppercase() && c != 'A' && c != 'I')
}

fn is_lowercase_run(token: &str) -> bool {
    token.len() >= 3
        && token.chars().all(|c| c.is_ascii_lowercase())
        && !STOP_WORDS.contains(&token)
}

/// Replaces any leading bullet glyph (or a run of them) with `BULLET_MARKER`.
/// A line made only of glyphs ("-----") becomes empty.
pub fn normalize_bullet(line: &str) -> String {
    let trimmed = line.trim();
    let Some(first) = trimmed.chars().next() else {
        return String::new();
    };
    if !is_bullet_glyph(first) {
        return trimmed.to_string();
    }
    let rest = trimmed
        .trim_start_matches(|c: char| is_bullet_glyph(c) || c.is_whitespace())
        .trim();
    if rest.is_empty() {
        String::new()
    } else {
        format!("{BULLET_MARKER} {rest}")
    }
}

fn is_bullet_glyph(c: char) -> bool {
    INLINE_BULLET_GLYPHS.contains(&c) || LEADING_ONLY_GLYPHS.contains(&c)
}

/// Re-joins sentence fragments that extraction hard-wrapped.
pub fn join_wrapped_lines(lines: &[String], ctx: &EvaluationContext) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        let next = lines.get(i + 1).map(String::as_str);
        match out.last_mut() {
            Some(prev) if should_join(prev, line, next, ctx) => {
                prev.push(' ');
                prev.push_str(line);
            }
            _ => out.push(line.clone()),
        }
    }
    out
}

fn should_join(prev: &str, current: &str, next: Option<&str>, ctx: &EvaluationContext) -> bool {
    if prev.is_empty() || current.is_empty() || is_bullet_line(current) {
        return false;
    }
    if is_section_header(prev) || is_section_header(current) {
        return false;
    }
    if contains_date_range(prev, ctx)
        || contains_date_range(current, ctx)
        || next.is_some_and(|n| contains_date_range(n, ctx))
    {
        return false;
    }
    if is_heading_like(prev) || is_heading_like(current) || TRAILING_YEAR_RE.is_match(prev) {
        return false;
    }
    !starts_new_clause(prev, current)
}

/// The period+capital rule, applied only once the previous text is long
/// enough to stand on its own.
pub fn starts_new_clause(prev: &str, current: &str) -> bool {
    ends_with_terminal(prev) && starts_uppercase(current) && word_count(prev) >= MIN_CLAUSE_WORDS
}

// ────────────────────────────────────────────────────────────────────────────
// Line predicates shared with the segmenter and the extractor
// ────────────────────────────────────────────────────────────────────────────

pub fn is_bullet_line(line: &str) -> bool {
    line.trim_start()
        .chars()
        .next()
        .is_some_and(|c| c == BULLET_MARKER || INLINE_BULLET_GLYPHS.contains(&c))
}

/// Text of a bullet line without its marker.
pub fn strip_bullet(line: &str) -> &str {
    line.trim()
        .trim_start_matches(|c: char| is_bullet_glyph(c) || c.is_whitespace())
}

pub fn word_count(line: &str) -> usize {
    line.split_whitespace().count()
}

pub fn ends_with_terminal(line: &str) -> bool {
    let trimmed = line.trim_end();
    if !trimmed.ends_with(['.', '!', '?']) {
        return false;
    }
    let last_word = trimmed
        .split_whitespace()
        .last()
        .unwrap_or_default()
        .to_lowercase();
    !NON_TERMINAL_ABBREVIATIONS.contains(&last_word.as_str())
}

pub fn starts_uppercase(line: &str) -> bool {
    strip_bullet(line)
        .chars()
        .next()
        .is_some_and(|c| c.is_uppercase())
}

/// Short, capitalised, unpunctuated lines: role titles, company names, places.
pub fn is_heading_like(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() || is_bullet_line(trimmed) {
        return false;
    }
    if word_count(trimmed) > HEADING_LIKE_MAX_WORDS || ends_with_terminal(trimmed) {
        return false;
    }
    if trimmed.ends_with([',', ';']) {
        return false;
    }

    let mut has_word = false;
    for word in trimmed.split_whitespace() {
        if CONNECTOR_WORDS.contains(&word.to_lowercase().as_str()) {
            continue;
        }
        match word.chars().find(|c| c.is_alphabetic()) {
            Some(c) if c.is_uppercase() => has_word = true,
            Some(_) => {
                if word.starts_with(|c: char| c.is_alphabetic()) {
                    return false;
                }
            }
            None => {}
        }
    }
    has_word
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
