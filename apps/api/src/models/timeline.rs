//! Time points and ranges recovered from resume text.
//!
//! Month positions are compared as a single integer (`year * 12 + month`),
//! where `month` is zero-based. A `DateToken` flagged `is_present` always
//! resolves to the pinned evaluation date, never to the wall clock.

use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// The pinned "present" for a single matching invocation.
///
/// Every interval resolved during one call receives the same context, so a
/// `Present` end date cannot move while a score is being computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationContext {
    pub now: NaiveDate,
}

impl EvaluationContext {
    pub fn pinned(now: NaiveDate) -> Self {
        Self { now }
    }

    /// Reads the wall clock. Called once per request by the HTTP layer.
    pub fn today() -> Self {
        Self {
            now: Utc::now().date_naive(),
        }
    }

    pub fn now_index(&self) -> i32 {
        self.now.year() * 12 + self.now.month0() as i32
    }
}

/// A parsed point in time. `month` is 0–11; year-only tokens leave it empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateToken {
    pub month: Option<u32>,
    pub year: i32,
    #[serde(default)]
    pub is_present: bool,
}

impl DateToken {
    pub fn new(month: Option<u32>, year: i32) -> Self {
        Self {
            month: month.filter(|m| *m < 12),
            year,
            is_present: false,
        }
    }

    pub fn year_only(year: i32) -> Self {
        Self::new(None, year)
    }

    /// "Present" / "Now" / "Current", stamped with the pinned date.
    pub fn present(ctx: &EvaluationContext) -> Self {
        Self {
            month: Some(ctx.now.month0()),
            year: ctx.now.year(),
            is_present: true,
        }
    }

    /// Comparable month position. Year-only tokens resolve to January.
    pub fn month_index(&self, ctx: &EvaluationContext) -> i32 {
        if self.is_present {
            return ctx.now_index();
        }
        self.year * 12 + self.month.unwrap_or(0).min(11) as i32
    }
}

/// A resolved `[start, end]` range. `end >= start` holds for every interval
/// built through [`DateInterval::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateInterval {
    pub start: DateToken,
    pub end: DateToken,
}

impl DateInterval {
    /// Returns `None` for reversed ranges; those are excluded from
    /// aggregation like any other unparseable date.
    pub fn new(start: DateToken, end: DateToken, ctx: &EvaluationContext) -> Option<Self> {
        if end.month_index(ctx) < start.month_index(ctx) {
            return None;
        }
        Some(Self { start, end })
    }

    pub fn is_ongoing(&self) -> bool {
        self.end.is_present
    }

    /// Half-open month range `[start, end)` clipped to the evaluation date.
    ///
    /// A role that starts and ends in the same month still occupies that
    /// month. Roles starting after `now` and reversed ranges (possible when
    /// an interval arrives pre-structured) yield `None`.
    pub fn month_bounds(&self, ctx: &EvaluationContext) -> Option<(i32, i32)> {
        let now = ctx.now_index();
        let start = self.start.month_index(ctx);
        let raw_end = self.end.month_index(ctx);
        if raw_end < start || start > now {
            return None;
        }
        let end = raw_end.min(now).max(start + 1);
        Some((start, end))
    }
}
