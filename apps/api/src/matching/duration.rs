use crate::models::result::CategoryScore;

/// Overshoot above `max_years` tolerated without penalty.
pub const OVERSHOOT_GRACE_YEARS: f64 = 2.0;
/// Overshoot at which the score bottoms out.
pub const OVERSHOOT_FLOOR_YEARS: f64 = 8.0;
pub const OVERQUALIFIED_FLOOR: f64 = 25.0;

pub fn score_duration(
    effective_years: f64,
    min_years: f64,
    max_years: Option<f64>,
) -> CategoryScore {
    let mut feedback = Vec::new();

    let mut raw = if min_years <= 0.0 || effective_years >= min_years {
        100.0
    } else {
        feedback.push(format!(
            "{effective_years:.1} years of experience against {min_years:.1} required"
        ));
        effective_years / min_years * 100.0
    };

    if let Some(max) = max_years {
        let overshoot = effective_years - max;
        if overshoot > OVERSHOOT_GRACE_YEARS {
            raw = raw.min(overqualified_score(overshoot));
            feedback.push(format!(
                "{effective_years:.1} years is {overshoot:.1} above the {max:.1}-year ceiling"
            ));
        }
    }

    if feedback.is_empty() {
        feedback.push(format!("{effective_years:.1} years meets the requirement"));
    }
    CategoryScore::new(raw, feedback)
}

/// Linear from 100 at the grace limit down to the floor.
fn overqualified_score(overshoot: f64) -> f64 {
    if overshoot >= OVERSHOOT_FLOOR_YEARS {
        return OVERQUALIFIED_FLOOR;
    }
    let span = OVERSHOOT_FLOOR_YEARS - OVERSHOOT_GRACE_YEARS;
    let progress = (overshoot - OVERSHOOT_GRACE_YEARS) / span;
    100.0 - progress * (100.0 - OVERQUALIFIED_FLOOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meets_minimum() {
        assert_eq!(score_duration(5.0, 3.0, None).score, 100);
    }

    #[test]
    fn test_no_minimum() {
        assert_eq!(score_duration(0.0, 0.0, None).score, 100);
    }

    #[test]
    fn test_proportional_below_minimum() {
        assert_eq!(score_duration(2.0, 4.0, None).score, 50);
    }

    #[test]
    fn test_grace_above_maximum() {
        assert_eq!(score_duration(5.0, 1.0, Some(3.0)).score, 100);
    }

    #[test]
    fn test_overqualified_linear() {
        // 5 years over the ceiling is halfway between grace and floor
        assert_eq!(score_duration(5.0, 0.0, Some(0.0)).score, 63);
        assert_eq!(score_duration(8.0, 0.0, Some(2.0)).score, 50);
    }

    #[test]
    fn test_overqualified_floor() {
        assert_eq!(score_duration(20.0, 0.0, Some(2.0)).score, 25);
    }

    #[test]
    fn test_feedback_mentions_shortfall() {
        let score = score_duration(1.0, 5.0, None);
        assert!(score.feedback[0].contains("5.0 required"));
    }
}
