use std::sync::Arc;

use crate::config::Config;
use crate::matching::scorer::{MatchScorer, RuleBasedScorer};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable scorer. Default: RuleBasedScorer.
    pub scorer: Arc<dyn MatchScorer>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        AppState {
            config,
            scorer: Arc::new(RuleBasedScorer),
        }
    }
}
