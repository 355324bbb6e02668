// Data model shared by the parsers, the scoring engine and the HTTP layer.
// Everything here is created per invocation; nothing is persisted.

pub mod job;
pub mod result;
pub mod resume;
pub mod timeline;

pub use job::{DegreeRequirement, JobRequirements};
pub use result::{CategoryScore, CategoryScores, MatchResult, TenureSource, TenureSummary};
pub use resume::{DegreeLevel, EducationEntry, ExperienceEntry, ResumeEntities};
pub use timeline::{DateInterval, DateToken, EvaluationContext};
