//! Deterministic resume-to-job matching.
//!
//! `parsing` reconstructs structured entities from noisy extracted resume
//! text, `matching` scores them against structured job requirements. The
//! remaining modules are the thin axum service around the engine.

pub mod config;
pub mod errors;
pub mod matching;
pub mod models;
pub mod parsing;
pub mod routes;
pub mod state;

pub use matching::{match_resume, match_resume_text, MatchError};
pub use parsing::parse_resume;
