//! HTTP surface exercised in-process through the router.

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use resumatch::config::Config;
use resumatch::routes::build_router;
use resumatch::state::AppState;

fn make_app() -> Router {
    build_router(AppState::new(Config::default()))
}

fn make_small_app(max_resume_chars: usize) -> Router {
    build_router(AppState::new(Config {
        max_resume_chars,
        ..Config::default()
    }))
}

async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

const RESUME_TEXT: &str = "EXPERIENCE\nCredit Analyst | Axis Bank | Jan 2018 - Present\n• Assessed credit risk for SME loans\n\nEDUCATION\nMBA (Finance), XLRI, 2017";

#[tokio::test]
async fn test_health() {
    let response = make_app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["service"], "resumatch-api");
}

#[tokio::test]
async fn test_parse_resume() {
    let (status, json) = post_json(
        make_app(),
        "/api/v1/resumes/parse",
        json!({ "resume_text": RESUME_TEXT, "as_of": "2024-06-15" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["experience"][0]["position"], "Credit Analyst");
    assert_eq!(json["education"][0]["level"], 2);
}

#[tokio::test]
async fn test_parse_rejects_empty_text() {
    let (status, json) = post_json(
        make_app(),
        "/api/v1/resumes/parse",
        json!({ "resume_text": "   " }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_parse_rejects_oversized_text() {
    let (status, _) = post_json(
        make_small_app(10),
        "/api/v1/resumes/parse",
        json!({ "resume_text": RESUME_TEXT }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_match_from_text() {
    let (status, json) = post_json(
        make_app(),
        "/api/v1/match",
        json!({
            "resume_text": RESUME_TEXT,
            "as_of": "2024-06-15",
            "requirements": {
                "role_title": "Credit Analyst",
                "min_years": 3,
                "domain": "Banking",
                "required_skills": ["Credit Risk"],
                "degree": { "level": 2, "field": "Finance", "mandatory": true }
            }
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["scorer_backend"], "rule_based");
    assert_eq!(json["category_scores"]["role"]["score"], 100);
    assert_eq!(json["category_scores"]["education"]["score"], 100);
    assert_eq!(json["matched_skills"], json!(["Credit Risk"]));
    assert!(json["comprehensive_score"].as_u64().unwrap() >= 90);
}

#[tokio::test]
async fn test_match_from_structured_resume() {
    let (status, json) = post_json(
        make_app(),
        "/api/v1/match",
        json!({
            "resume": { "skills": ["Rust"] },
            "requirements": { "required_skills": ["Rust", "Go"] }
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["missing_skills"], json!(["Go"]));
}

#[tokio::test]
async fn test_match_requires_exactly_one_resume() {
    let requirements = json!({ "role_title": "Analyst" });

    let (status, _) = post_json(
        make_app(),
        "/api/v1/match",
        json!({ "requirements": requirements }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post_json(
        make_app(),
        "/api/v1/match",
        json!({ "resume_text": RESUME_TEXT, "resume": {}, "requirements": requirements }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_match_rejects_invalid_requirements() {
    let (status, json) = post_json(
        make_app(),
        "/api/v1/match",
        json!({
            "resume_text": RESUME_TEXT,
            "requirements": { "min_years": 5, "max_years": 2 }
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"]["message"]
        .as_str()
        .unwrap()
        .contains("max_years"));
}

#[tokio::test]
async fn test_classify_degree() {
    let (status, json) = post_json(
        make_app(),
        "/api/v1/education/classify",
        json!({ "degree": "PGPM(HR)" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["level"], 2);
    assert_eq!(
        json["expanded_degree"],
        "Post Graduate Program in Management (HR)"
    );
    assert_eq!(json["field"], "HR");
}
