//! Notes CRUD over HTTP, scoped to the bearer of the session token

use crate::common::{ApiClient, TestServer};
use otp_notes::Settings;
use reqwest::StatusCode;
use serde_json::{Value, json};

async fn signed_up(server: &TestServer, api: &ApiClient, email: &str) -> String {
    api.send_otp(email).await;
    let code = server.last_code_for(email).await;
    api.register(email, "secret1", &code).await
}

#[tokio::test]
async fn test_note_lifecycle() {
    let server = TestServer::start().await.unwrap();
    let api = ApiClient::new(&server.base_url);
    let token = signed_up(&server, &api, "ivy@example.com").await;

    // Create
    let response = api
        .post(
            "/notes",
            &json!({ "title": "Groceries", "content": "Milk" }),
            Some(token.as_str()),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: Value = response.json().await.unwrap();
    let id = created["_id"].as_str().unwrap().to_string();
    assert_eq!(created["title"], "Groceries");
    assert!(created["createdAt"].is_string());
    assert!(created["updatedAt"].is_string());

    // Partial update keeps the untouched field
    let response = api
        .put(&format!("/notes/{id}"), &json!({ "content": "Oat milk" }), &token)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated: Value = response.json().await.unwrap();
    assert_eq!(updated["title"], "Groceries");
    assert_eq!(updated["content"], "Oat milk");

    // List
    let notes: Vec<Value> = api
        .get("/notes", Some(token.as_str()))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0]["_id"], id.as_str());

    // Delete
    let response = api.delete(&format!("/notes/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Note deleted");

    let response = api.delete(&format!("/notes/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    server.shutdown().await;
}

#[tokio::test]
async fn test_notes_are_listed_newest_first() {
    let server = TestServer::start().await.unwrap();
    let api = ApiClient::new(&server.base_url);
    let token = signed_up(&server, &api, "jon@example.com").await;

    for title in ["first", "second", "third"] {
        let response = api
            .post("/notes", &json!({ "title": title, "content": "c" }), Some(token.as_str()))
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let notes: Vec<Value> = api
        .get("/notes", Some(token.as_str()))
        .await
        .json()
        .await
        .unwrap();
    let titles: Vec<&str> = notes.iter().filter_map(|n| n["title"].as_str()).collect();
    assert_eq!(titles, vec!["third", "second", "first"]);

    server.shutdown().await;
}

#[tokio::test]
async fn test_other_users_notes_are_not_found() {
    // Given a note owned by kim
    let server = TestServer::start().await.unwrap();
    let api = ApiClient::new(&server.base_url);
    let kim = signed_up(&server, &api, "kim@example.com").await;
    let lee = signed_up(&server, &api, "lee@example.com").await;

    let created: Value = api
        .post("/notes", &json!({ "title": "Diary", "content": "x" }), Some(kim.as_str()))
        .await
        .json()
        .await
        .unwrap();
    let id = created["_id"].as_str().unwrap().to_string();

    // When lee lists, updates or deletes it
    let listed: Vec<Value> = api.get("/notes", Some(lee.as_str())).await.json().await.unwrap();
    let updated = api
        .put(&format!("/notes/{id}"), &json!({ "title": "Mine" }), &lee)
        .await;
    let deleted = api.delete(&format!("/notes/{id}"), &lee).await;

    // Then the note does not exist for lee and is untouched for kim
    assert!(listed.is_empty());
    assert_eq!(updated.status(), StatusCode::NOT_FOUND);
    assert_eq!(deleted.status(), StatusCode::NOT_FOUND);
    let body: Value = updated.json().await.unwrap();
    assert_eq!(body["error"], "NotFound");

    let kims: Vec<Value> = api.get("/notes", Some(kim.as_str())).await.json().await.unwrap();
    assert_eq!(kims[0]["title"], "Diary");

    server.shutdown().await;
}

#[tokio::test]
async fn test_note_validation_messages() {
    let server = TestServer::start().await.unwrap();
    let api = ApiClient::new(&server.base_url);
    let token = signed_up(&server, &api, "max@example.com").await;

    let response = api
        .post("/notes", &json!({ "title": "", "content": "" }), Some(token.as_str()))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["errors"][0]["message"], "Title is required");
    assert_eq!(body["errors"][1]["message"], "Content is required");

    server.shutdown().await;
}

#[tokio::test]
async fn test_notes_reject_missing_or_bad_tokens() {
    let server = TestServer::start().await.unwrap();
    let api = ApiClient::new(&server.base_url);

    let missing = api.get("/notes", None).await;
    let bad = api.get("/notes", Some("not.a.token")).await;
    let create = api
        .post("/notes", &json!({ "title": "t", "content": "c" }), None)
        .await;

    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(bad.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(create.status(), StatusCode::UNAUTHORIZED);

    server.shutdown().await;
}

#[tokio::test]
async fn test_route_prefix() {
    let mut settings = Settings::in_memory();
    settings.server.route_prefix = "/api".to_string();
    let server = TestServer::start_with(settings).await.unwrap();
    let api = ApiClient::new(&format!("{}/api", server.base_url));

    assert_eq!(api.send_otp("ned@example.com").await, StatusCode::OK);
    let code = server.last_code_for("ned@example.com").await;
    let token = api.register("ned@example.com", "secret1", &code).await;
    let notes = api.get("/notes", Some(token.as_str())).await;
    assert_eq!(notes.status(), StatusCode::OK);

    let root = ApiClient::new(&server.base_url);
    assert_eq!(root.get("/health", None).await.status(), StatusCode::OK);
    assert_eq!(root.get("/notes", Some(token.as_str())).await.status(), StatusCode::NOT_FOUND);

    server.shutdown().await;
}
