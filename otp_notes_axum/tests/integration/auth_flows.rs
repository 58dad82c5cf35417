//! Sign-in flows over HTTP: email codes, password accounts and Google

use crate::common::{ApiClient, TestServer};
use reqwest::StatusCode;
use serde_json::{Value, json};

#[tokio::test]
async fn test_register_then_login_with_password() {
    // Given a running server and a mailed code
    let server = TestServer::start().await.unwrap();
    let api = ApiClient::new(&server.base_url);

    let response = api
        .post("/auth/send-otp", &json!({ "email": "ann@example.com" }), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "OTP sent");

    let mail = server.mailer.last_to("ann@example.com").await.unwrap();
    assert_eq!(mail.subject, "Your OTP");
    let code = server.last_code_for("ann@example.com").await;

    // When registering with that code
    let response = api
        .post(
            "/auth/register",
            &json!({
                "email": "ann@example.com",
                "password": "hunter22",
                "name": "Ann",
                "otp": code,
            }),
            None,
        )
        .await;

    // Then an account and a session token are returned
    assert_eq!(response.status(), StatusCode::CREATED);
    let registered: Value = response.json().await.unwrap();
    assert!(registered["token"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(registered["user"]["email"], "ann@example.com");
    assert_eq!(registered["user"]["name"], "Ann");
    assert!(registered["user"].get("passwordHash").is_none());

    // And the password signs in to the same account
    let response = api
        .post(
            "/auth/login",
            &json!({ "email": "ann@example.com", "password": "hunter22" }),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let logged_in: Value = response.json().await.unwrap();
    assert_eq!(logged_in["user"]["id"], registered["user"]["id"]);

    server.shutdown().await;
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let server = TestServer::start().await.unwrap();
    let api = ApiClient::new(&server.base_url);

    assert_eq!(api.send_otp("bob@example.com").await, StatusCode::OK);
    let code = server.last_code_for("bob@example.com").await;
    api.register("bob@example.com", "correct-horse", &code).await;

    let wrong_password = api
        .post(
            "/auth/login",
            &json!({ "email": "bob@example.com", "password": "wrong-horse" }),
            None,
        )
        .await;
    let unknown_email = api
        .post(
            "/auth/login",
            &json!({ "email": "nobody@example.com", "password": "whatever" }),
            None,
        )
        .await;

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);
    let a: Value = wrong_password.json().await.unwrap();
    let b: Value = unknown_email.json().await.unwrap();
    assert_eq!(a, b);
    assert_eq!(a["error"], "InvalidCredentials");

    server.shutdown().await;
}

#[tokio::test]
async fn test_code_is_single_use() {
    let server = TestServer::start().await.unwrap();
    let api = ApiClient::new(&server.base_url);

    api.send_otp("cat@example.com").await;
    let code = server.last_code_for("cat@example.com").await;
    let body = json!({ "email": "cat@example.com", "code": code });

    let first = api.post("/auth/verify-otp", &body, None).await;
    assert_eq!(first.status(), StatusCode::OK);
    let first: Value = first.json().await.unwrap();
    assert_eq!(first["message"], "OTP verified");

    let second = api.post("/auth/verify-otp", &body, None).await;
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);
    let second: Value = second.json().await.unwrap();
    assert_eq!(second["error"], "InvalidOTP");

    server.shutdown().await;
}

#[tokio::test]
async fn test_register_with_wrong_code_creates_nothing() {
    let server = TestServer::start().await.unwrap();
    let api = ApiClient::new(&server.base_url);

    api.send_otp("dan@example.com").await;
    let code = server.last_code_for("dan@example.com").await;
    let wrong = if code == "999999" { "100000" } else { "999999" };

    let response = api
        .post(
            "/auth/register",
            &json!({ "email": "dan@example.com", "password": "secret1", "otp": wrong }),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let login = api
        .post(
            "/auth/login",
            &json!({ "email": "dan@example.com", "password": "secret1" }),
            None,
        )
        .await;
    assert_eq!(login.status(), StatusCode::UNAUTHORIZED);

    server.shutdown().await;
}

#[tokio::test]
async fn test_duplicate_registration_conflicts() {
    let server = TestServer::start().await.unwrap();
    let api = ApiClient::new(&server.base_url);

    api.send_otp("eve@example.com").await;
    let code = server.last_code_for("eve@example.com").await;
    api.register("eve@example.com", "secret1", &code).await;

    api.send_otp("eve@example.com").await;
    let code = server.last_code_for("eve@example.com").await;
    let response = api
        .post(
            "/auth/register",
            &json!({ "email": "eve@example.com", "password": "secret2", "otp": code }),
            None,
        )
        .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "DuplicateAccount");

    server.shutdown().await;
}

#[tokio::test]
async fn test_register_reports_every_invalid_field() {
    let server = TestServer::start().await.unwrap();
    let api = ApiClient::new(&server.base_url);

    let response = api
        .post(
            "/auth/register",
            &json!({ "email": "nope", "password": "123", "otp": "12" }),
            None,
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|e| e["field"].as_str())
        .collect();
    assert_eq!(fields, vec!["email", "password", "otp"]);
    assert!(server.mailer.sent().await.is_empty());

    server.shutdown().await;
}

#[tokio::test]
async fn test_google_login_creates_then_reuses_account() {
    let server = TestServer::start().await.unwrap();
    let api = ApiClient::new(&server.base_url);

    let token = json!({ "idToken": "valid:g-123:gus@example.com:Gus" });

    let first = api.post("/auth/google", &token, None).await;
    assert_eq!(first.status(), StatusCode::OK);
    let first: Value = first.json().await.unwrap();
    assert_eq!(first["user"]["email"], "gus@example.com");
    assert_eq!(first["user"]["name"], "Gus");

    let second: Value = api
        .post("/auth/google", &token, None)
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(second["user"]["id"], first["user"]["id"]);

    server.shutdown().await;
}

#[tokio::test]
async fn test_google_login_links_password_account() {
    // Given a password account
    let server = TestServer::start().await.unwrap();
    let api = ApiClient::new(&server.base_url);
    api.send_otp("hal@example.com").await;
    let code = server.last_code_for("hal@example.com").await;
    api.register("hal@example.com", "secret1", &code).await;
    let registered: Value = api
        .post(
            "/auth/login",
            &json!({ "email": "hal@example.com", "password": "secret1" }),
            None,
        )
        .await
        .json()
        .await
        .unwrap();

    // When signing in with Google under the same email
    let google: Value = api
        .post(
            "/auth/google",
            &json!({ "idToken": "valid:g-hal:hal@example.com" }),
            None,
        )
        .await
        .json()
        .await
        .unwrap();

    // Then both methods lead to one account
    assert_eq!(google["user"]["id"], registered["user"]["id"]);
    let again = api
        .post(
            "/auth/login",
            &json!({ "email": "hal@example.com", "password": "secret1" }),
            None,
        )
        .await;
    assert_eq!(again.status(), StatusCode::OK);

    server.shutdown().await;
}

#[tokio::test]
async fn test_google_login_rejects_bad_tokens() {
    let server = TestServer::start().await.unwrap();
    let api = ApiClient::new(&server.base_url);

    let forged = api
        .post("/auth/google", &json!({ "idToken": "forged" }), None)
        .await;
    assert_eq!(forged.status(), StatusCode::BAD_REQUEST);
    let forged: Value = forged.json().await.unwrap();
    assert_eq!(forged["error"], "InvalidExternalToken");

    let missing = api.post("/auth/google", &json!({}), None).await;
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
    let missing: Value = missing.json().await.unwrap();
    assert_eq!(missing["errors"][0]["field"], "idToken");

    server.shutdown().await;
}

#[tokio::test]
async fn test_health() {
    let server = TestServer::start().await.unwrap();
    let api = ApiClient::new(&server.base_url);

    let response = api.get("/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "ok": true }));

    server.shutdown().await;
}
