use once_cell::sync::Lazy;
use regex::Regex;

/// Claims above this are extraction noise ("2005 years").
pub const SUMMARY_YEARS_CAP: f64 = 50.0;

const NUMBER_WORDS: &[(&str, f64)] = &[
    ("one", 1.0),
    ("two", 2.0),
    ("three", 3.0),
    ("four", 4.0),
    ("five", 5.0),
    ("six", 6.0),
    ("seven", 7.0),
    ("eight", 8.0),
    ("nine", 9.0),
    ("ten", 10.0),
    ("eleven", 11.0),
    ("twelve", 12.0),
    ("fifteen", 15.0),
    ("twenty", 20.0),
];

/// "8+ years of B2B sales experience", "5 yrs experience"
static YEARS_CLAIM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(\d{1,2}(?:\.\d{1,2})?|one|two|three|four|five|six|seven|eight|nine|ten|eleven|twelve|fifteen|twenty)\s*\+?\s*(?:years?|yrs?)\.?(?:\s+of)?(?:\s+[\w&/\-]+,?){0,4}?\s+(?:experience|exp)\b",
    )
    .unwrap()
});

/// "experience of over 6 years"
static EXPERIENCE_OF_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\bexperience\s+of\s+(?:over\s+|more\s+than\s+|around\s+|about\s+|nearly\s+)?(\d{1,2}(?:\.\d{1,2})?)\s*\+?\s*(?:years?|yrs?)\b",
    )
    .unwrap()
});

/// Largest "N years of experience" claim in `text`, capped at
/// `SUMMARY_YEARS_CAP`.
pub fn extract_summary_years(text: &str) -> Option<f64> {
    YEARS_CLAIM_RE
        .captures_iter(text)
        .chain(EXPERIENCE_OF_RE.captures_iter(text))
        .filter_map(|caps| parse_amount(&caps[1]))
        .filter(|years| *years > 0.0)
        .map(|years| years.min(SUMMARY_YEARS_CAP))
        .max_by(|a, b| a.total_cmp(b))
}

fn parse_amount(raw: &str) -> Option<f64> {
    let lower = raw.to_lowercase();
    NUMBER_WORDS
        .iter()
        .find(|(word, _)| *word == lower)
        .map(|(_, value)| *value)
        .or_else(|| lower.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plus_years_of_experience() {
        assert_eq!(
            extract_summary_years("Sales leader with 10+ years of experience in microfinance."),
            Some(10.0)
        );
    }

    #[test]
    fn test_domain_words_between() {
        assert_eq!(
            extract_summary_years("Over 8 years of B2B enterprise sales experience"),
            Some(8.0)
        );
    }

    #[test]
    fn test_abbreviated_years() {
        assert_eq!(extract_summary_years("5 yrs exp in Java"), Some(5.0));
    }

    #[test]
    fn test_word_numbers() {
        assert_eq!(
            extract_summary_years("Seven years of experience managing teams"),
            Some(7.0)
        );
    }

    #[test]
    fn test_experience_of_form() {
        assert_eq!(
            extract_summary_years("Professional experience of over 6 years in audit"),
            Some(6.0)
        );
    }

    #[test]
    fn test_largest_claim_wins() {
        assert_eq!(
            extract_summary_years(
                "12 years of experience overall, including 3 years of leadership experience"
            ),
            Some(12.0)
        );
    }

    #[test]
    fn test_no_claim() {
        assert_eq!(extract_summary_years("Managed a team of 12 across 3 regions"), None);
        assert_eq!(extract_summary_years("Graduated in 2015 years ago"), None);
    }

    #[test]
    fn test_capped() {
        assert_eq!(extract_summary_years("99 years of experience"), Some(50.0));
    }
}
