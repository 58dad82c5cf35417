use reqwest::{Client, Response, StatusCode};
use serde_json::{Value, json};

/// JSON client for the notes API
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.to_string(),
        }
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> Response {
        let mut request = self.client.get(format!("{}{}", self.base_url, path));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        request.send().await.expect("GET failed")
    }

    pub async fn post(&self, path: &str, body: &Value, token: Option<&str>) -> Response {
        let mut request = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .json(body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        request.send().await.expect("POST failed")
    }

    pub async fn put(&self, path: &str, body: &Value, token: &str) -> Response {
        self.client
            .put(format!("{}{}", self.base_url, path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("PUT failed")
    }

    pub async fn delete(&self, path: &str, token: &str) -> Response {
        self.client
            .delete(format!("{}{}", self.base_url, path))
            .bearer_auth(token)
            .send()
            .await
            .expect("DELETE failed")
    }

    /// Request a code for `email` and return the response status
    pub async fn send_otp(&self, email: &str) -> StatusCode {
        self.post("/auth/send-otp", &json!({ "email": email }), None)
            .await
            .status()
    }

    /// Register with a password and return the session token
    pub async fn register(&self, email: &str, password: &str, otp: &str) -> String {
        let response = self
            .post(
                "/auth/register",
                &json!({ "email": email, "password": password, "otp": otp }),
                None,
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body: Value = response.json().await.expect("Invalid JSON");
        body["token"].as_str().expect("No token").to_string()
    }
}
