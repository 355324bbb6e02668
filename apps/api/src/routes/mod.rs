pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::matching::handlers as matching;
use crate::parsing::handlers as parsing;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Parsing API
        .route("/api/v1/resumes/parse", post(parsing::handle_parse_resume))
        .route(
            "/api/v1/education/classify",
            post(parsing::handle_classify_degree),
        )
        // Matching API
        .route("/api/v1/match", post(matching::handle_match))
        .with_state(state)
}
