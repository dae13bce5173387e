use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;

use crate::modules::customers::adapters::outbound::in_memory::InMemoryDirectory;
use crate::modules::customers::core::customer::{NAVISION_ACCOUNT_KEY, SHIP_TO_CODE_KEY};
use crate::modules::customers::use_cases::edit_attributes::writer_port::WriteError;
use crate::shell::http::router;
use crate::shell::state::AppState;
use crate::tests::fixtures::customers::{page, CustomerRecordBuilder};

const CUSTOMER_ID: &str = "gid://shopify/Customer/1";

fn app_with_one_customer() -> (Arc<InMemoryDirectory>, Router) {
    let directory = Arc::new(InMemoryDirectory::new());
    directory.script_page(
        None,
        None,
        page(
            vec![CustomerRecordBuilder::new()
                .id(CUSTOMER_ID)
                .with_metafield(SHIP_TO_CODE_KEY, "SHIP-1")
                .build()],
            false,
            None,
        ),
    );
    let state = AppState::new(directory.clone(), directory.clone());
    (directory.clone(), router(state))
}

async fn post_json(app: &Router, uri: &str, body: &str) -> StatusCode {
    app.clone()
        .oneshot(
            Request::post(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
        .status()
}

async fn current_metafields(app: &Router) -> serde_json::Value {
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
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    json["customers"][0]["metafields"].clone()
}

fn value_of(metafields: &serde_json::Value, key: &str) -> Option<String> {
    metafields
        .as_array()
        .unwrap()
        .iter()
        .find(|m| m["key"] == key)
        .map(|m| m["value"].as_str().unwrap().to_string())
}

#[tokio::test]
async fn a_saved_edit_is_visible_on_the_cached_page_without_a_refetch() {
    let (directory, app) = app_with_one_customer();
    post_json(&app, "/customers/session/reset", "{}").await;
    let fetches_before = directory.fetch_log().len();

    let status = post_json(
        &app,
        "/customers/save-edit",
        &format!(
            r#"{{"customerId":"{CUSTOMER_ID}","shipToCode":"SHIP-9","navisionAccount":"NAV-3"}}"#
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let metafields = current_metafields(&app).await;
    assert_eq!(value_of(&metafields, SHIP_TO_CODE_KEY).as_deref(), Some("SHIP-9"));
    assert_eq!(
        value_of(&metafields, NAVISION_ACCOUNT_KEY).as_deref(),
        Some("NAV-3")
    );
    assert_eq!(
        directory.fetch_log().len(),
        fetches_before,
        "the patch must not trigger a refetch"
    );

    let writes = directory.writes();
    assert_eq!(writes.len(), 2);
    assert!(writes.iter().all(|w| w.customer_id == CUSTOMER_ID));
    assert!(writes.iter().all(|w| w.namespace == "custom"));
}

#[tokio::test]
async fn a_half_failed_save_leaves_the_cached_page_untouched() {
    let (directory, app) = app_with_one_customer();
    post_json(&app, "/customers/session/reset", "{}").await;
    directory.fail_writes_with_key(
        SHIP_TO_CODE_KEY,
        WriteError::RemoteRejected("value too long".into()),
    );

    let status = post_json(
        &app,
        "/customers/save-edit",
        &format!(
            r#"{{"customerId":"{CUSTOMER_ID}","shipToCode":"SHIP-9","navisionAccount":"NAV-3"}}"#
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);

    let metafields = current_metafields(&app).await;
    assert_eq!(value_of(&metafields, SHIP_TO_CODE_KEY).as_deref(), Some("SHIP-1"));
    assert_eq!(value_of(&metafields, NAVISION_ACCOUNT_KEY), None);
}

#[tokio::test]
async fn a_single_field_update_patches_only_that_key() {
    let (_, app) = app_with_one_customer();
    post_json(&app, "/customers/session/reset", "{}").await;

    let status = post_json(
        &app,
        "/customers/update-metafield",
        &format!(
            r#"{{"customerId":"{CUSTOMER_ID}","key":"navision_account","value":"NAV-7","namespace":"custom","type":"single_line_text_field"}}"#
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let metafields = current_metafields(&app).await;
    assert_eq!(value_of(&metafields, SHIP_TO_CODE_KEY).as_deref(), Some("SHIP-1"));
    assert_eq!(value_of(&metafields, NAVISION_ACCOUNT_KEY).as_deref(), Some("NAV-7"));
}
