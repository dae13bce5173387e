use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;

use crate::modules::customers::adapters::outbound::in_memory::InMemoryDirectory;
use crate::shell::http::router;
use crate::shell::state::AppState;
use crate::tests::fixtures::customers::{page, CustomerRecordBuilder};

fn three_page_app() -> (Arc<InMemoryDirectory>, Router) {
    let directory = Arc::new(InMemoryDirectory::new());
    directory.script_page(
        None,
        None,
        page(
            vec![
                CustomerRecordBuilder::new().id("gid://shopify/Customer/1").build(),
                CustomerRecordBuilder::new().id("gid://shopify/Customer/2").build(),
            ],
            true,
            Some("c1"),
        ),
    );
    directory.script_page(
        Some("c1"),
        None,
        page(
            vec![CustomerRecordBuilder::new().id("gid://shopify/Customer/3").build()],
            true,
            Some("c2"),
        ),
    );
    directory.script_page(
        Some("c2"),
        None,
        page(
            vec![CustomerRecordBuilder::new().id("gid://shopify/Customer/4").build()],
            false,
            None,
        ),
    );
    directory.script_page(
        None,
        Some("smith"),
        page(
            vec![CustomerRecordBuilder::new()
                .id("gid://shopify/Customer/9")
                .last_name("Smith")
                .build()],
            false,
            None,
        ),
    );
    let state = AppState::new(directory.clone(), directory.clone());
    (directory.clone(), router(state))
}

async fn post_json(app: &Router, uri: &str, body: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(
            Request::post(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

fn ids(json: &serde_json::Value) -> Vec<String> {
    json["customers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["displayId"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn walks_forward_to_the_last_page_and_all_the_way_back() {
    let (directory, app) = three_page_app();

    let (status, first) = post_json(&app, "/customers/session/reset", "{}").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&first), vec!["1", "2"]);

    let (_, second) = post_json(&app, "/customers/session/next", "").await;
    assert_eq!(ids(&second), vec!["3"]);
    let (_, third) = post_json(&app, "/customers/session/next", "").await;
    assert_eq!(ids(&third), vec!["4"]);
    assert_eq!(third["hasNextPage"], false);

    let (_, back) = post_json(&app, "/customers/session/prev", "").await;
    assert_eq!(ids(&back), vec!["3"]);
    let (_, start) = post_json(&app, "/customers/session/prev", "").await;
    assert_eq!(ids(&start), vec!["1", "2"]);
    assert_eq!(start["hasPreviousPage"], false);

    // Forward path then the exact reverse.
    assert_eq!(
        directory.fetch_log(),
        vec![
            (None, None),
            (Some("c1".to_string()), None),
            (Some("c2".to_string()), None),
            (Some("c1".to_string()), None),
            (None, None),
        ]
    );
}

#[tokio::test]
async fn a_new_search_starts_over_from_the_first_page() {
    let (directory, app) = three_page_app();

    post_json(&app, "/customers/session/reset", "{}").await;
    post_json(&app, "/customers/session/next", "").await;

    let (status, found) =
        post_json(&app, "/customers/session/reset", r#"{"query":"smith"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&found), vec!["9"]);
    assert_eq!(found["hasPreviousPage"], false);

    assert_eq!(
        directory.fetch_log().last(),
        Some(&(None, Some("smith".to_string())))
    );
}

#[tokio::test]
async fn a_failed_fetch_keeps_the_session_on_the_current_page() {
    use crate::modules::customers::use_cases::browse_customers::directory_port::FetchError;

    let (directory, app) = three_page_app();
    post_json(&app, "/customers/session/reset", "{}").await;

    directory.fail_next_fetch(FetchError::TransportFailure("boom".into()));
    let (status, _) = post_json(&app, "/customers/session/next", "").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);

    let response = app
        .clone()
        .oneshot(
            Request::get("/customers/session")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let current: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(ids(&current), vec!["1", "2"]);
}
