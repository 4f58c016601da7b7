//! Shared helpers for HTTP tests: an in-memory app and request shortcuts.

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use buttery_api::{build_router, ApiConfig, AppState};
use buttery_db::{Database, DbConfig};
use serde_json::{json, Value};
use tower::ServiceExt;

pub const MAIN_CAMPUS: &str = "6f0c2a9e-6b7d-4c1e-9a2f-1d5e8b7c4a01";
pub const HOSTEL_A: &str = "6f0c2a9e-6b7d-4c1e-9a2f-1d5e8b7c4a02";
pub const BEVERAGES: &str = "8a4d6e2b-1f3c-4b5a-8d7e-2c9f0a1b3e01";
pub const UNKNOWN_ID: &str = "00000000-0000-4000-8000-000000000000";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

pub struct Reply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl Reply {
    /// Token carried by the `Set-Cookie` header, if any.
    pub fn cookie_token(&self) -> Option<String> {
        let cookie = self.headers.get(header::SET_COOKIE)?.to_str().ok()?;
        let pair = cookie.split(';').next()?;
        pair.strip_prefix("auth-token=").map(str::to_string)
    }

    pub fn set_cookie(&self) -> String {
        self.headers
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    }
}

pub async fn spawn_app() -> TestApp {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let state = AppState::new(db, ApiConfig::default());
    TestApp {
        router: build_router(state.clone()),
        state,
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> Reply {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        Reply { status, headers, body }
    }

    pub async fn call(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Reply {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }

    pub async fn get(&self, uri: &str, token: &str) -> Reply {
        self.call(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> Reply {
        self.call(Method::POST, uri, Some(token), Some(body)).await
    }

    /// Registers an account and returns its session token and user JSON.
    pub async fn register(&self, email: &str, role: &str, location_id: Option<&str>) -> (String, Value) {
        let reply = self
            .call(
                Method::POST,
                "/auth/register",
                None,
                Some(json!({
                    "name": "Test User",
                    "email": email,
                    "phone": "08012345678",
                    "password": "password123",
                    "role": role,
                    "location_id": location_id,
                })),
            )
            .await;
        assert_eq!(reply.status, StatusCode::CREATED, "register failed: {}", reply.body);
        let token = reply.cookie_token().unwrap();
        (token, reply.body["user"].clone())
    }

    /// Creates a product at Main Campus as `token` and returns its id.
    pub async fn create_product(&self, token: &str, name: &str, price_cents: i64, stock: i64) -> String {
        let reply = self
            .post(
                "/products",
                token,
                json!({
                    "name": name,
                    "category_id": BEVERAGES,
                    "price_cents": price_cents,
                    "stock_quantity": stock,
                    "low_stock_threshold": 5,
                    "location_id": MAIN_CAMPUS,
                }),
            )
            .await;
        assert_eq!(reply.status, StatusCode::CREATED, "create product failed: {}", reply.body);
        reply.body["product"]["id"].as_str().unwrap().to_string()
    }

    pub async fn stock_of(&self, token: &str, product_id: &str) -> i64 {
        let reply = self.get(&format!("/products/{product_id}"), token).await;
        assert_eq!(reply.status, StatusCode::OK);
        reply.body["product"]["stock_quantity"].as_i64().unwrap()
    }
}
