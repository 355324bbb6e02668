//! Date Range Parser: fuzzy month/year tokens and ranges.
//!
//! Two ordered chains of small pure matchers:
//! - token matchers find single points ("Mar 2021", "03/2021", "2021", "'21", "Present")
//! - range matchers combine them ("Mar 2021 – Present", "2015-16", "Since 2019")
//!
//! The first range matcher that succeeds wins. Nothing here errors: text that
//! matches no pattern yields `None`.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::timeline::{DateInterval, DateToken, EvaluationContext};

static MONTH_YEAR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\.?(?:\s+\d{1,2}(?:st|nd|rd|th)?,?\s*((?:19|20)\d{2})|[\s,'’\-]*((?:19|20)\d{2}|\d{2}))\b",
    )
    .unwrap()
});

static NUMERIC_MONTH_YEAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(0?[1-9]|1[0-2])\s*/\s*((?:19|20)\d{2}|\d{2})\b").unwrap());

static PRESENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:present|now|current(?:ly)?|till\s+date|to\s+date|ongoing|today)\b")
        .unwrap()
});

static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b((?:19|20)\d{2})\b").unwrap());

static SHORT_YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"['’](\d{2})\b").unwrap());

static SEPARATOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(?:-+|–|—|to|till|until|through|thru|~|→|>)\s*$").unwrap()
});

static COMPACT_YEAR_RANGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b((?:19|20)\d{2})\s*[-–—/]\s*(\d{2})\b").unwrap());

static SINCE_PREFIX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bsince\s*$").unwrap());

static ONWARDS_SUFFIX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^\s*onwards?\b").unwrap());

static EMPTY_PARENS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(\s*\)|\[\s*\]").unwrap());

static REPEATED_PIPE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\|(?:\s*\|)+").unwrap());

/// Two-digit years below this pivot land in the 2000s, the rest in the 1900s.
pub const TWO_DIGIT_YEAR_PIVOT: i32 = 50;

/// A date token together with its byte span in the source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocatedToken {
    pub token: DateToken,
    pub start: usize,
    pub end: usize,
}

type TokenMatcher = fn(&str, &EvaluationContext) -> Vec<LocatedToken>;
type RangeMatcher = fn(&str, &EvaluationContext) -> Option<DateInterval>;

/// Priority order matters: earlier matchers claim their spans first.
const TOKEN_MATCHERS: &[TokenMatcher] = &[
    match_month_year,
    match_numeric_month_year,
    match_present,
    match_year,
    match_short_year,
];

const RANGE_MATCHERS: &[RangeMatcher] =
    &[match_token_pair, match_compact_year_range, match_open_range];

// ────────────────────────────────────────────────────────────────────────────
// Public entry points
// ────────────────────────────────────────────────────────────────────────────

/// Parses the first date range on a line.
pub fn parse_date_range(line: &str, ctx: &EvaluationContext) -> Option<DateInterval> {
    RANGE_MATCHERS.iter().find_map(|matcher| matcher(line, ctx))
}

/// The block anchor signal used by the experience extractor.
pub fn contains_date_range(line: &str, ctx: &EvaluationContext) -> bool {
    parse_date_range(line, ctx).is_some()
}

/// First non-present date token on a line, if any.
pub fn parse_date_token(line: &str, ctx: &EvaluationContext) -> Option<DateToken> {
    scan_tokens(line, ctx)
        .into_iter()
        .map(|t| t.token)
        .find(|t| !t.is_present)
}

/// All non-overlapping date tokens on a line, in source order.
pub fn scan_tokens(line: &str, ctx: &EvaluationContext) -> Vec<LocatedToken> {
    let mut accepted: Vec<LocatedToken> = Vec::new();
    for matcher in TOKEN_MATCHERS {
        for candidate in matcher(line, ctx) {
            let overlaps = accepted
                .iter()
                .any(|t| candidate.start < t.end && t.start < candidate.end);
            if !overlaps {
                accepted.push(candidate);
            }
        }
    }
    accepted.sort_by_key(|t| t.start);
    accepted
}

/// Removes date tokens and range separators, leaving any heading text that
/// shared the line ("Software Engineer | Jan 2020 – Present" → "Software Engineer").
pub fn strip_dates(line: &str, ctx: &EvaluationContext) -> String {
    let tokens = scan_tokens(line, ctx);
    let mut remove: Vec<(usize, usize)> = Vec::new();

    for (i, t) in tokens.iter().enumerate() {
        let paired_with_prev = i > 0 && is_range_gap(line, &tokens[i - 1], t);
        let paired_with_next = tokens
            .get(i + 1)
            .map(|next| is_range_gap(line, t, next))
            .unwrap_or(false);

        // A lone "current" is more likely prose than a date.
        if t.token.is_present && !paired_with_prev {
            continue;
        }
        remove.push((t.start, t.end));
        if paired_with_next {
            if let Some(next) = tokens.get(i + 1) {
                remove.push((t.end, next.start));
            }
        }
        if let Some(prefix) = SINCE_PREFIX_RE.find(&line[..t.start]) {
            remove.push((prefix.start(), prefix.end()));
        }
        if let Some(suffix) = ONWARDS_SUFFIX_RE.find(&line[t.end..]) {
            remove.push((t.end + suffix.start(), t.end + suffix.end()));
        }
    }
    for caps in COMPACT_YEAR_RANGE_RE.find_iter(line) {
        remove.push((caps.start(), caps.end()));
    }

    let kept: String = line
        .char_indices()
        .filter(|(idx, _)| !remove.iter().any(|(s, e)| idx >= s && idx < e))
        .map(|(_, c)| c)
        .collect();

    let cleaned = EMPTY_PARENS_RE.replace_all(&kept, " ");
    let cleaned = REPEATED_PIPE_RE.replace_all(&cleaned, "|");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .trim_matches(|c: char| c.is_whitespace() || "|,;:-–—@/".contains(c))
        .to_string()
}

/// Resolves a two-digit year with the fixed pivot.
pub fn expand_two_digit_year(yy: i32) -> i32 {
    if yy < TWO_DIGIT_YEAR_PIVOT {
        2000 + yy
    } else {
        1900 + yy
    }
}

/// Zero-based month index from an English month name or abbreviation.
pub fn month_from_name(name: &str) -> Option<u32> {
    let lower = name.to_ascii_lowercase();
    let prefix = lower.get(..3)?;
    let month = match prefix {
        "jan" => 0,
        "feb" => 1,
        "mar" => 2,
        "apr" => 3,
        "may" => 4,
        "jun" => 5,
        "jul" => 6,
        "aug" => 7,
        "sep" => 8,
        "oct" => 9,
        "nov" => 10,
        "dec" => 11,
        _ => return None,
    };
    Some(month)
}

// ────────────────────────────────────────────────────────────────────────────
// Token matchers
// ────────────────────────────────────────────────────────────────────────────

fn parse_year_digits(digits: &str) -> Option<i32> {
    let value: i32 = digits.parse().ok()?;
    if digits.len() == 2 {
        Some(expand_two_digit_year(value))
    } else {
        Some(value)
    }
}

pub fn match_month_year(line: &str, _ctx: &EvaluationContext) -> Vec<LocatedToken> {
    MONTH_YEAR_RE
        .captures_iter(line)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let month = month_from_name(caps.get(1)?.as_str())?;
            // Group 2 follows a day of month, group 3 directly follows the month.
            let digits = caps.get(2).or_else(|| caps.get(3))?;
            let year = parse_year_digits(digits.as_str())?;
            Some(LocatedToken {
                token: DateToken::new(Some(month), year),
                start: whole.start(),
                end: whole.end(),
            })
        })
        .collect()
}

pub fn match_numeric_month_year(line: &str, _ctx: &EvaluationContext) -> Vec<LocatedToken> {
    NUMERIC_MONTH_YEAR_RE
        .captures_iter(line)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let month: u32 = caps.get(1)?.as_str().parse().ok()?;
            let year = parse_year_digits(caps.get(2)?.as_str())?;
            Some(LocatedToken {
                token: DateToken::new(Some(month - 1), year),
                start: whole.start(),
                end: whole.end(),
            })
        })
        .collect()
}

pub fn match_present(line: &str, ctx: &EvaluationContext) -> Vec<LocatedToken> {
    PRESENT_RE
        .find_iter(line)
        .map(|m| LocatedToken {
            token: DateToken::present(ctx),
            start: m.start(),
            end: m.end(),
        })
        .collect()
}

pub fn match_year(line: &str, _ctx: &EvaluationContext) -> Vec<LocatedToken> {
    YEAR_RE
        .captures_iter(line)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let year: i32 = caps.get(1)?.as_str().parse().ok()?;
            Some(LocatedToken {
                token: DateToken::year_only(year),
                start: whole.start(),
                end: whole.end(),
            })
        })
        .collect()
}

pub fn match_short_year(line: &str, _ctx: &EvaluationContext) -> Vec<LocatedToken> {
    SHORT_YEAR_RE
        .captures_iter(line)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let yy: i32 = caps.get(1)?.as_str().parse().ok()?;
            Some(LocatedToken {
                token: DateToken::year_only(expand_two_digit_year(yy)),
                start: whole.start(),
                end: whole.end(),
            })
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Range matchers
// ────────────────────────────────────────────────────────────────────────────

fn is_range_gap(line: &str, left: &LocatedToken, right: &LocatedToken) -> bool {
    if left.token.is_present || right.start < left.end {
        return false;
    }
    let gap = &line[left.end..right.start];
    SEPARATOR_RE.is_match(gap) || (right.token.is_present && gap.trim().is_empty())
}

/// "Jan 2020 – Mar 2022", "2019 to Present", "03/2020 - 04/2021".
pub fn match_token_pair(line: &str, ctx: &EvaluationContext) -> Option<DateInterval> {
    let tokens = scan_tokens(line, ctx);
    tokens.windows(2).find_map(|pair| {
        let (left, right) = (&pair[0], &pair[1]);
        if is_range_gap(line, left, right) {
            DateInterval::new(left.token, right.token, ctx)
        } else {
            None
        }
    })
}

/// "2015-16", "2019–21".
pub fn match_compact_year_range(line: &str, ctx: &EvaluationContext) -> Option<DateInterval> {
    let caps = COMPACT_YEAR_RANGE_RE.captures(line)?;
    let start_year: i32 = caps.get(1)?.as_str().parse().ok()?;
    let yy: i32 = caps.get(2)?.as_str().parse().ok()?;
    let mut end_year = start_year / 100 * 100 + yy;
    if end_year < start_year {
        end_year += 100;
    }
    DateInterval::new(
        DateToken::year_only(start_year),
        DateToken::year_only(end_year),
        ctx,
    )
}

/// "Since March 2019", "2019 onwards": open ranges ending at the present.
pub fn match_open_range(line: &str, ctx: &EvaluationContext) -> Option<DateInterval> {
    scan_tokens(line, ctx)
        .into_iter()
        .filter(|t| !t.token.is_present)
        .find(|t| {
            SINCE_PREFIX_RE.is_match(&line[..t.start]) || ONWARDS_SUFFIX_RE.is_match(&line[t.end..])
        })
        .and_then(|t| DateInterval::new(t.token, DateToken::present(ctx), ctx))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
