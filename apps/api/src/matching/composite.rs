//! Weighted combination of the category scores.
//!
//! Works on the already rounded category scores so the reported breakdown
//! and the headline number always agree.

pub const DURATION_WEIGHT: f64 = 0.4;
pub const ROLE_WEIGHT: f64 = 0.3;
pub const DOMAIN_WEIGHT: f64 = 0.3;

pub const EXPERIENCE_WEIGHT: f64 = 0.6;
pub const SKILLS_WEIGHT: f64 = 0.25;
pub const EDUCATION_WEIGHT: f64 = 0.15;

/// Below this mean of role and domain the experience layer is dampened.
pub const PIVOT_THRESHOLD: f64 = 30.0;
pub const PIVOT_DAMPENER: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExperienceLayer {
    pub score: f64,
    pub career_pivot: bool,
}

pub fn experience_layer(duration: u32, role: u32, domain: u32) -> ExperienceLayer {
    let (duration, role, domain) = (f64::from(duration), f64::from(role), f64::from(domain));
    let base = DURATION_WEIGHT * duration + ROLE_WEIGHT * role + DOMAIN_WEIGHT * domain;
    let career_pivot = (role + domain) / 2.0 < PIVOT_THRESHOLD;
    let score = if career_pivot {
        base * PIVOT_DAMPENER
    } else {
        base
    };
    ExperienceLayer {
        score,
        career_pivot,
    }
}

pub fn comprehensive(experience: f64, skills: u32, education: u32) -> f64 {
    EXPERIENCE_WEIGHT * experience
        + SKILLS_WEIGHT * f64::from(skills)
        + EDUCATION_WEIGHT * f64::from(education)
}

pub fn round_score(raw: f64) -> u32 {
    raw.clamp(0.0, 100.0).round() as u32
}
