use std::collections::BTreeSet;

use crate::models::result::CategoryScore;
use crate::models::resume::ExperienceEntry;
use crate::models::timeline::EvaluationContext;

/// Weight applied to every role except the most recent one.
pub const PAST_ROLE_WEIGHT: f64 = 0.7;

/// Seniority and rank words carry no information about the function.
const FILLER_WORDS: &[&str] = &[
    "senior", "sr", "junior", "jr", "lead", "principal", "staff", "manager", "head", "associate",
    "assistant", "chief", "executive", "intern", "trainee", "i", "ii", "iii", "iv", "v", "of",
    "and", "the", "for", "in", "at", "to", "a", "an", "with",
];

const SUFFIXES: &[&str] = &["ment", "ing", "er", "s"];

/// Light suffix stripping: "engineering" → "engine", "developer" → "develop".
pub fn stem(word: &str) -> String {
    let mut word = word.to_string();
    'strip: loop {
        for suffix in SUFFIXES {
            if word.len() > suffix.len() + 2 && word.ends_with(suffix) {
                word.truncate(word.len() - suffix.len());
                continue 'strip;
            }
        }
        break;
    }
    word
}

fn title_words(title: &str) -> Vec<String> {
    title
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

/// A non-empty title with nothing but seniority and rank words: "Manager".
pub fn is_filler_only(title: &str) -> bool {
    let words = title_words(title);
    !words.is_empty() && words.iter().all(|w| FILLER_WORDS.contains(&w.as_str()))
}

/// Every stemmed word of a title, filler included.
pub fn all_title_tokens(title: &str) -> BTreeSet<String> {
    title_words(title).iter().map(|w| stem(w)).collect()
}

/// Stemmed function words of a title. A title made only of filler words
/// ("Manager") keeps them rather than vanishing.
pub fn title_tokens(title: &str) -> BTreeSet<String> {
    let meaningful: BTreeSet<String> = title_words(title)
        .iter()
        .filter(|w| !FILLER_WORDS.contains(&w.as_str()))
        .map(|w| stem(w))
        .collect();
    if !meaningful.is_empty() {
        return meaningful;
    }
    all_title_tokens(title)
}

/// Share of the JD title's tokens present in `held`. When the JD title is
/// all filler, the held title keeps its filler words too.
pub fn title_overlap(jd_title: &str, held: &str) -> f64 {
    let jd_tokens = title_tokens(jd_title);
    if jd_tokens.is_empty() {
        return 0.0;
    }
    let held = if is_filler_only(jd_title) {
        all_title_tokens(held)
    } else {
        title_tokens(held)
    };
    jd_tokens.intersection(&held).count() as f64 / jd_tokens.len() as f64
}

/// Index of the most recent role: ongoing first, then latest end, then
/// first listed.
pub fn most_recent_index(
    experience: &[ExperienceEntry],
    ctx: &EvaluationContext,
) -> Option<usize> {
    experience
        .iter()
        .enumerate()
        .max_by(|(ia, a), (ib, b)| {
            recency_key(a, ctx)
                .cmp(&recency_key(b, ctx))
                .then(ib.cmp(ia))
        })
        .map(|(i, _)| i)
}

fn recency_key(entry: &ExperienceEntry, ctx: &EvaluationContext) -> (bool, i32) {
    match &entry.interval {
        Some(interval) => (interval.is_ongoing(), interval.end.month_index(ctx)),
        None => (false, i32::MIN),
    }
}

pub fn score_role(
    experience: &[ExperienceEntry],
    jd_title: &str,
    ctx: &EvaluationContext,
) -> CategoryScore {
    if title_tokens(jd_title).is_empty() {
        return CategoryScore::new(100.0, vec!["No target role title given".to_string()]);
    }
    let Some(recent) = most_recent_index(experience, ctx) else {
        return CategoryScore::new(0.0, vec!["No roles found on the resume".to_string()]);
    };

    let best = experience
        .iter()
        .enumerate()
        .filter(|(_, e)| !e.position.trim().is_empty())
        .map(|(i, e)| {
            let weight = if i == recent { 1.0 } else { PAST_ROLE_WEIGHT };
            (title_overlap(jd_title, &e.position) * weight, i)
        })
        .max_by(|a, b| a.0.total_cmp(&b.0).then(b.1.cmp(&a.1)));

    let feedback = match best {
        Some((value, i)) if value > 0.0 => {
            let when = if i == recent { "most recent" } else { "past" };
            vec![format!(
                "{when} role \"{}\" matches \"{}\"",
                experience[i].position, jd_title
            )]
        }
        _ => vec![format!("No held title resembles \"{jd_title}\"")],
    };

    CategoryScore::new(best.map(|(v, _)| v).unwrap_or(0.0) * 100.0, feedback)
}
