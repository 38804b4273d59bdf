//! API integration tests against a running server

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Register a visitor and return its id
async fn create_visitor(client: &Client, nationalid: &str) -> i64 {
    let response = client
        .post(format!("{}/visitors", BASE_URL))
        .json(&json!({
            "name": "Integration Visitor",
            "nationalid": nationalid,
            "date": "05-03-2024",
            "duration": 2,
            "durationunit": ""
        }))
        .send()
        .await
        .expect("Failed to send create request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse create response");
    body["id"].as_i64().expect("No visitor ID")
}

async fn delete_visitor(client: &Client, id: i64) {
    let _ = client
        .delete(format!("{}/visitors/{}", BASE_URL, id))
        .send()
        .await;
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_create_normalizes_date_and_unit() {
    let client = Client::new();
    let id = create_visitor(&client, "IT-NORMALIZE-1").await;

    let response = client
        .get(format!("{}/visitors/{}", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");

    assert_eq!(body["date"], "2024-03-05");
    assert!(body["durationunit"].is_null());
    assert_eq!(body["isApproved"], false);
    assert_eq!(body["exit"], false);

    delete_visitor(&client, id).await;
}

#[tokio::test]
#[ignore]
async fn test_status_transitions() {
    let client = Client::new();
    let id = create_visitor(&client, "IT-STATUS-1").await;

    let response = client
        .put(format!("{}/visitors/{}/status", BASE_URL, id))
        .json(&json!({ "status": "approve" }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["isApproved"], true);
    assert_eq!(body["inprogress"], true);

    let response = client
        .put(format!("{}/visitors/{}/status", BASE_URL, id))
        .json(&json!({ "status": "bogus" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);

    delete_visitor(&client, id).await;
}

#[tokio::test]
#[ignore]
async fn test_find_by_national_id() {
    let client = Client::new();
    let id = create_visitor(&client, "IT-NID-1").await;

    let response = client
        .get(format!("{}/visitors/national-id/IT-NID-1", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["id"].as_i64(), Some(id));

    delete_visitor(&client, id).await;
}

#[tokio::test]
#[ignore]
async fn test_delete_unknown_visitor() {
    let client = Client::new();

    let response = client
        .delete(format!("{}/visitors/{}", BASE_URL, i32::MAX))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
}
