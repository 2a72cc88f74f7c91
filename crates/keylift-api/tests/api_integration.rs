use axum_test::TestServer;
use keylift_api::{create_router, AppState};
use keylift_core::Settings;
use serde_json::json;

/// Settings with every external dependency unconfigured: the engine runs
/// entirely on templates, the embedded population table and heuristics, so
/// these tests never touch the network.
fn offline_state() -> AppState {
    let mut settings = Settings::default();
    settings.llm.enabled = false;
    AppState::new(settings).expect("app state")
}

fn server() -> TestServer {
    TestServer::new(create_router(offline_state())).unwrap()
}

#[tokio::test]
async fn health_endpoint_returns_ok() {
    let server = server();

    let resp = server.get("/health").await;
    assert_eq!(resp.status_code(), 200);
    let body: serde_json::Value = resp.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["llm"], "not_configured");
    assert_eq!(body["keyword_stats"], "not_configured");
}

#[tokio::test]
async fn business_types_lists_known_categories() {
    let server = server();

    let resp = server.get("/api/business-types").await;
    assert_eq!(resp.status_code(), 200);
    let body: serde_json::Value = resp.json();
    let types: Vec<&str> = body["business_types"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|v| v.as_str())
        .collect();
    assert!(types.contains(&"카페"));
    assert!(types.contains(&"음식점"));
}

#[tokio::test]
async fn analyze_cafe_scenario_end_to_end() {
    let server = server();

    let payload = json!({
        "business_type": "카페",
        "location": "서울 강남구",
        "specialty": ["브런치 전문"],
        "current_daily_visitors": 50,
        "target_daily_visitors": 200
    });
    let resp = server.post("/api/analyze").json(&payload).await;
    assert_eq!(resp.status_code(), 200);
    let body: serde_json::Value = resp.json();

    assert_eq!(body["summary"]["gap"], 150);
    assert_eq!(body["summary"]["total_phases"], 4);

    let roadmap = body["roadmap"].as_array().unwrap();
    assert_eq!(roadmap.len(), 4);
    let levels: Vec<u64> = roadmap
        .iter()
        .map(|p| p["target_level"].as_u64().unwrap())
        .collect();
    assert_eq!(levels, vec![5, 4, 3, 2]);

    let grouped = body["keywords_by_level"].as_object().unwrap();
    assert_eq!(grouped.len(), 5);
    let mut keyword_count = 0;
    for metrics in grouped.values() {
        for metric in metrics.as_array().unwrap() {
            keyword_count += 1;
            assert!(metric["estimated_daily_traffic"].as_u64().is_some());
            assert!(metric["competition_score"].as_u64().unwrap() <= 100);
            assert_eq!(metric["confidence"], "estimated");
        }
    }
    assert!(keyword_count > 0);
    assert_eq!(body["total_keywords"].as_u64().unwrap(), keyword_count);
}

#[tokio::test]
async fn analyze_accepts_comma_separated_specialty() {
    let server = server();

    let payload = json!({
        "business_type": "미용실",
        "location": "부산 해운대구",
        "specialty": "남자 커트, 펌 전문"
    });
    let resp = server.post("/api/analyze").json(&payload).await;
    assert_eq!(resp.status_code(), 200);
    let body: serde_json::Value = resp.json();
    let specialty: Vec<&str> = body["business"]["specialty"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|v| v.as_str())
        .collect();
    assert_eq!(specialty, vec!["남자 커트", "펌 전문"]);
}

#[tokio::test]
async fn analyze_rejects_blank_business_type() {
    let server = server();

    let payload = json!({
        "business_type": "   ",
        "location": "서울 강남구"
    });
    let resp = server.post("/api/analyze").json(&payload).await;
    assert_eq!(resp.status_code(), 400);
    let body: serde_json::Value = resp.json();
    assert!(body["error"].as_str().unwrap().contains("business_type"));
}

#[tokio::test]
async fn analyze_rejects_blank_location() {
    let server = server();

    let payload = json!({
        "business_type": "카페",
        "location": ""
    });
    let resp = server.post("/api/analyze").json(&payload).await;
    assert_eq!(resp.status_code(), 400);
}

#[tokio::test]
async fn analyze_unknown_business_type_still_succeeds() {
    let server = server();

    let payload = json!({
        "business_type": "수족관",
        "location": "서울 송파구",
        "specialty": ["야간 개장"]
    });
    let resp = server.post("/api/analyze").json(&payload).await;
    assert_eq!(resp.status_code(), 200);
    let body: serde_json::Value = resp.json();
    assert!(body["total_keywords"].as_u64().unwrap() > 0);
}

#[tokio::test]
async fn analyze_is_deterministic_offline() {
    let server = server();

    let payload = json!({
        "business_type": "카페",
        "location": "서울 강남구",
        "specialty": ["브런치 전문"],
        "current_daily_visitors": 50,
        "target_daily_visitors": 200
    });
    let first: serde_json::Value = server.post("/api/analyze").json(&payload).await.json();
    let second: serde_json::Value = server.post("/api/analyze").json(&payload).await.json();
    assert_eq!(first, second);
}

#[tokio::test]
async fn guides_are_served_and_unknown_sections_404() {
    let server = server();

    let list = server.get("/api/guides").await;
    assert_eq!(list.status_code(), 200);
    let body: serde_json::Value = list.json();
    assert!(!body["guides"].as_array().unwrap().is_empty());

    let reviews = server.get("/api/guides/reviews").await;
    assert_eq!(reviews.status_code(), 200);
    let guide: serde_json::Value = reviews.json();
    assert_eq!(guide["section"], "reviews");

    let missing = server.get("/api/guides/nonexistent").await;
    assert_eq!(missing.status_code(), 404);
}
