//! Duration Aggregator.
//!
//! Calendar tenure is the union of dated roles in months, so overlapping
//! jobs are never double-counted. A summary claim ("10+ years of
//! experience") only tops the figure up while the dated roles are too thin
//! to be trusted on their own.

use crate::models::result::{TenureSource, TenureSummary};
use crate::models::resume::ExperienceEntry;
use crate::models::timeline::{DateInterval, EvaluationContext};

/// At or below this many calendar years a larger summary claim is adopted outright.
pub const LOW_CONFIDENCE_YEARS: f64 = 2.0;
/// At or above this many calendar years the summary claim is ignored.
pub const FULL_CONFIDENCE_YEARS: f64 = 5.0;

/// Unions month ranges. Overlapping and touching ranges merge.
pub fn merge_intervals<'a>(
    intervals: impl IntoIterator<Item = &'a DateInterval>,
    ctx: &EvaluationContext,
) -> Vec<(i32, i32)> {
    let mut bounds: Vec<(i32, i32)> = intervals
        .into_iter()
        .filter_map(|interval| interval.month_bounds(ctx))
        .collect();
    bounds.sort_unstable();

    let mut merged: Vec<(i32, i32)> = Vec::with_capacity(bounds.len());
    for (start, end) in bounds {
        match merged.last_mut() {
            Some(last) if start <= last.1 => last.1 = last.1.max(end),
            _ => merged.push((start, end)),
        }
    }
    merged
}

pub fn covered_months(merged: &[(i32, i32)]) -> u32 {
    merged.iter().map(|(s, e)| (e - s).max(0) as u32).sum()
}

/// How much of a larger summary claim to trust, given calendar years.
/// 1.0 up to `LOW_CONFIDENCE_YEARS`, falling linearly to 0.0 at `FULL_CONFIDENCE_YEARS`.
pub fn summary_trust(calendar_years: f64) -> f64 {
    if calendar_years <= LOW_CONFIDENCE_YEARS {
        1.0
    } else if calendar_years >= FULL_CONFIDENCE_YEARS {
        0.0
    } else {
        (FULL_CONFIDENCE_YEARS - calendar_years) / (FULL_CONFIDENCE_YEARS - LOW_CONFIDENCE_YEARS)
    }
}

/// Effective years and where they came from. Continuous in `calendar_years`.
pub fn effective_years(calendar_years: f64, summary_years: Option<f64>) -> (f64, TenureSource) {
    let Some(claim) = summary_years.filter(|s| *s > calendar_years) else {
        return (calendar_years, TenureSource::Calendar);
    };
    let trust = summary_trust(calendar_years);
    let effective = calendar_years + (claim - calendar_years) * trust;
    let source = if trust >= 1.0 {
        TenureSource::Summary
    } else if trust <= 0.0 {
        TenureSource::Calendar
    } else {
        TenureSource::Blended
    };
    (effective, source)
}

pub fn summarize(
    experience: &[ExperienceEntry],
    summary_years: Option<f64>,
    ctx: &EvaluationContext,
) -> TenureSummary {
    let (internships, roles): (Vec<&ExperienceEntry>, Vec<&ExperienceEntry>) =
        experience.iter().partition(|e| e.is_internship);

    let role_months = covered_months(&merge_intervals(
        roles.iter().filter_map(|e| e.interval.as_ref()),
        ctx,
    ));
    let internship_months = covered_months(&merge_intervals(
        internships.iter().filter_map(|e| e.interval.as_ref()),
        ctx,
    ));

    let total_years = f64::from(role_months) / 12.0;
    let (effective, source) = effective_years(total_years, summary_years);

    TenureSummary {
        total_months: role_months,
        total_years,
        internship_years: f64::from(internship_months) / 12.0,
        effective_years: effective,
        summary_years,
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::timeline::DateToken;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn ctx() -> EvaluationContext {
        EvaluationContext::pinned(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap())
    }

    fn make_interval(start: (i32, u32), end: (i32, u32)) -> DateInterval {
        DateInterval::new(
            DateToken::new(Some(start.1), start.0),
            DateToken::new(Some(end.1), end.0),
            &ctx(),
        )
        .unwrap()
    }

    fn make_entry(start: (i32, u32), end: (i32, u32), is_internship: bool) -> ExperienceEntry {
        ExperienceEntry {
            interval: Some(make_interval(start, end)),
            is_internship,
            ..Default::default()
        }
    }

    #[test]
    fn test_overlapping_roles_are_unioned() {
        let entries = vec![
            make_entry((2020, 0), (2021, 0), false),
            make_entry((2020, 0), (2021, 0), false),
            make_entry((2020, 0), (2022, 0), false),
        ];
        let summary = summarize(&entries, None, &ctx());
        assert_eq!(summary.total_months, 24);
        assert!((summary.total_years - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_touching_ranges_merge() {
        let a = make_interval((2018, 0), (2019, 0));
        let b = make_interval((2019, 0), (2020, 0));
        assert_eq!(merge_intervals([&a, &b], &ctx()), vec![(2018 * 12, 2020 * 12)]);
    }

    #[test]
    fn test_gap_between_roles_not_counted() {
        let entries = vec![
            make_entry((2015, 0), (2016, 0), false),
            make_entry((2018, 0), (2019, 0), false),
        ];
        assert_eq!(summarize(&entries, None, &ctx()).total_months, 24);
    }

    #[test]
    fn test_present_role_clipped_to_now() {
        let present = DateInterval::new(
            DateToken::new(Some(5), 2023),
            DateToken::present(&ctx()),
            &ctx(),
        )
        .unwrap();
        let entry = ExperienceEntry {
            interval: Some(present),
            ..Default::default()
        };
        assert_eq!(summarize(&[entry], None, &ctx()).total_months, 12);
    }

    #[test]
    fn test_single_month_role_counts_one_month() {
        let entries = vec![make_entry((2022, 3), (2022, 3), false)];
        assert_eq!(summarize(&entries, None, &ctx()).total_months, 1);
    }

    #[test]
    fn test_internships_excluded_from_total() {
        let entries = vec![
            make_entry((2019, 4), (2019, 7), true),
            make_entry((2020, 0), (2022, 0), false),
        ];
        let summary = summarize(&entries, None, &ctx());
        assert_eq!(summary.total_months, 24);
        assert!((summary.internship_years - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_undated_entries_ignored() {
        let entries = vec![ExperienceEntry::default()];
        assert_eq!(summarize(&entries, None, &ctx()).total_months, 0);
    }

    #[test]
    fn test_threshold_continuity() {
        let (below, _) = effective_years(0.9, Some(10.0));
        let (above, _) = effective_years(1.1, Some(10.0));
        assert!((below - 10.0).abs() < 1e-9);
        assert!((above - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_summary_ignored_for_solid_calendar() {
        let (effective, source) = effective_years(6.0, Some(12.0));
        assert!((effective - 6.0).abs() < 1e-9);
        assert_eq!(source, TenureSource::Calendar);
    }

    #[test]
    fn test_blended_between_bounds() {
        let (effective, source) = effective_years(3.5, Some(9.5));
        assert!((effective - 6.5).abs() < 1e-9);
        assert_eq!(source, TenureSource::Blended);
    }

    #[test]
    fn test_smaller_claim_never_lowers_tenure() {
        let (effective, source) = effective_years(1.0, Some(0.5));
        assert!((effective - 1.0).abs() < 1e-9);
        assert_eq!(source, TenureSource::Calendar);
    }

    proptest! {
        #[test]
        fn prop_union_never_exceeds_sum(
            ranges in proptest::collection::vec((2000i32..2024, 0u32..12, 0i32..60), 0..8)
        ) {
            let ctx = ctx();
            let intervals: Vec<DateInterval> = ranges
                .iter()
                .filter_map(|(y, m, len)| {
                    let start = DateToken::new(Some(*m), *y);
                    let end_idx = y * 12 + *m as i32 + len;
                    let end = DateToken::new(Some((end_idx % 12) as u32), end_idx / 12);
                    DateInterval::new(start, end, &ctx)
                })
                .collect();

            let merged = merge_intervals(&intervals, &ctx);
            let union = covered_months(&merged);
            let sum: u32 = intervals
                .iter()
                .filter_map(|i| i.month_bounds(&ctx))
                .map(|(s, e)| (e - s) as u32)
                .sum();
            let longest = intervals
                .iter()
                .filter_map(|i| i.month_bounds(&ctx))
                .map(|(s, e)| (e - s) as u32)
                .max()
                .unwrap_or(0);

            prop_assert!(union <= sum);
            prop_assert!(union >= longest);
            for pair in merged.windows(2) {
                prop_assert!(pair[0].1 < pair[1].0);
            }
        }

        #[test]
        fn prop_effective_years_continuous(t in 0.0f64..10.0, claim in 0.0f64..50.0) {
            let (a, _) = effective_years(t, Some(claim));
            let (b, _) = effective_years(t + 1e-6, Some(claim));
            prop_assert!((a - b).abs() < 1e-3);
            prop_assert!(a >= t);
        }
    }
}
