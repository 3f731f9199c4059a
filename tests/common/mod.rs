//! 통합 테스트 공용 도구: 인메모리 DB로 만든 라우터, 스텁 AI, 요청 헬퍼

#![allow(dead_code)]

use std::str::FromStr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tower::ServiceExt;
use tripplanner::{
    db,
    routes::{self, AppState},
    error::AppError,
    services::{
        ai_client::{AiError, ChatCompletion},
        notifier::ResetNotifier,
    },
};

pub const JWT_SECRET: &str = "integration-test-secret";

/// 고정 응답을 돌려주거나 항상 실패하는 chat-completion 스텁
pub enum StubChat {
    Reply(String),
    Fail,
}

#[async_trait]
impl ChatCompletion for StubChat {
    async fn complete(&self, _system: &str, _user: &str) -> Result<String, AiError> {
        match self {
            StubChat::Reply(text) => Ok(text.clone()),
            StubChat::Fail => Err(AiError::Status {
                status: 500,
                body: "upstream exploded".to_string(),
            }),
        }
    }
}

/// 메일 대신 (이메일, 토큰)을 쌓아두는 재설정 토큰 수신함
#[derive(Default)]
pub struct Outbox {
    sent: Mutex<Vec<(String, String)>>,
}

impl Outbox {
    /// 해당 주소로 마지막에 보낸 토큰
    pub fn last_token_for(&self, email: &str) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(to, _)| to == email)
            .map(|(_, token)| token.clone())
    }

    pub fn len(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl ResetNotifier for Outbox {
    async fn send_reset_token(&self, email: &str, token: &str) -> Result<(), AppError> {
        self.sent
            .lock()
            .unwrap()
            .push((email.to_string(), token.to_string()));
        Ok(())
    }
}

pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
    pub outbox: Arc<Outbox>,
}

/// 인메모리 SQLite는 연결마다 별도 DB이므로 연결을 하나로 고정합니다.
async fn memory_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .unwrap();
    db::migrate(&pool).await.unwrap();
    pool
}

pub async fn app_with_ai(ai: StubChat) -> TestApp {
    let pool = memory_pool().await;
    let outbox = Arc::new(Outbox::default());
    let state = AppState {
        pool: pool.clone(),
        jwt_secret: JWT_SECRET.to_string(),
        ai: Arc::new(ai),
        notifier: outbox.clone(),
    };
    TestApp {
        router: routes::router(state),
        pool,
        outbox,
    }
}

pub async fn app() -> TestApp {
    app_with_ai(StubChat::Fail).await
}

impl TestApp {
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::PATCH, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, token, None).await
    }

    /// 회원가입 후 (액세스 토큰, 사용자 id)
    pub async fn register(&self, email: &str) -> (String, String) {
        let (status, body) = self
            .post(
                "/api/auth/register",
                None,
                json!({ "email": email, "password": "correct-horse", "display_name": "Tester" }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
        (
            body["access_token"].as_str().unwrap().to_string(),
            body["user"]["id"].as_str().unwrap().to_string(),
        )
    }

    pub async fn create_guide(&self, token: &str, title: &str, location: &str, price: f64) -> String {
        let (status, body) = self
            .post(
                "/api/guides",
                Some(token),
                json!({
                    "title": title,
                    "location": location,
                    "price": price,
                    "duration_days": 2,
                    "description": format!("{} highlights", location)
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create guide failed: {}", body);
        body["id"].as_str().unwrap().to_string()
    }

    pub async fn create_attraction(&self, token: &str, name: &str, tags: &[&str]) -> String {
        let (status, body) = self
            .post(
                "/api/attractions",
                Some(token),
                json!({ "name": name, "address": "Main street", "tags": tags }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create attraction failed: {}", body);
        body["id"].as_str().unwrap().to_string()
    }
}
