use super::_support::*;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode};
use leadsift::filter::EmailExclusion;
use leadsift::http::{AppState, router};
use leadsift::search::LeadSearch;
use leadsift::store::LeadStore;
use serde_json::{Value, json};
use tower::ServiceExt;

fn filters_query(filters: &str) -> String {
    serde_urlencoded::to_string([("filters", filters)]).unwrap()
}

async fn call<S: LeadStore>(search: LeadSearch<S>, method: Method, uri: &str) -> (StatusCode, Value) {
    let app = router(AppState::new(search));
    let resp = app.oneshot(Request::builder().method(method).uri(uri).body(Body::empty()).unwrap()).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

fn scenario_uri(extra: &str) -> String {
    let filters = serde_json::to_string(&scenario_options()).unwrap();
    format!("/api/search?{}{extra}", filters_query(&filters))
}

#[tokio::test]
async fn search_returns_results_and_counts() {
    let (status, body) = call(memory_search(EmailExclusion::Always), Method::GET, &scenario_uri("")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"].as_array().unwrap().len(), 4);
    assert_eq!(body["results"][0]["login"], "chef");
    assert_eq!(body["phoneCount"], 2);
    assert_eq!(body["emailCount"], 2);
}

#[tokio::test]
async fn array_shape_returns_bare_results() {
    let (status, body) = call(memory_search(EmailExclusion::Always), Method::GET, &scenario_uri("&shape=array")).await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0]["fol_cnt"], 2000);
}

#[tokio::test]
async fn missing_filters_yield_empty_results() {
    let (status, body) = call(memory_search(EmailExclusion::Always), Method::GET, "/api/search").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "results": [], "phoneCount": 0, "emailCount": 0 }));
}

#[tokio::test]
async fn non_get_is_405() {
    for m in [Method::POST, Method::PUT, Method::DELETE, Method::PATCH] {
        let (status, body) = call(memory_search(EmailExclusion::Always), m.clone(), "/api/search").await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{m}");
        assert_eq!(body, json!({ "error": "Method Not Allowed" }));
    }
}

#[tokio::test]
async fn malformed_filters_are_400() {
    let uri = format!("/api/search?{}", filters_query("{\"minFollowers\":"));
    let (status, body) = call(memory_search(EmailExclusion::Always), Method::GET, &uri).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid filters"));
}

#[tokio::test]
async fn unreadable_query_string_is_json_400() {
    let (status, body) =
        call(memory_search(EmailExclusion::Always), Method::GET, "/api/search?filters=%7B%7D&filters=%7B%7D").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid filters"), "{body}");
}

#[tokio::test]
async fn fractional_bounds_are_accepted() {
    let filters = r#"{"minFollowers":1e3,"maxFollowers":5000.5,"minPosts":9.5,"positiveKeywords":["food"],"negativeKeywords":["porn"]}"#;
    let uri = format!("/api/search?{}", filters_query(filters));
    let (status, body) = call(memory_search(EmailExclusion::Always), Method::GET, &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn store_failure_is_opaque_500() {
    let (status, body) =
        call(LeadSearch::new(FailingStore, EmailExclusion::Always), Method::GET, &scenario_uri("")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Internal Server Error" }));
}

#[tokio::test]
async fn healthz_lists_features() {
    let (status, body) = call(memory_search(EmailExclusion::Always), Method::GET, "/healthz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["features"].is_array());
    assert!(body["store"].as_str().unwrap().starts_with("memory"));
}

#[tokio::test]
async fn index_serves_search_page() {
    let app = router(AppState::new(memory_search(EmailExclusion::Always)));
    let resp = app.oneshot(Request::get("/").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let html = String::from_utf8(to_bytes(resp.into_body(), 1024 * 1024).await.unwrap().to_vec()).unwrap();
    assert!(html.contains("/api/search?filters="));
    assert!(html.contains("positiveKeywords"));
}
