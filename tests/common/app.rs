//! Test application builder and request helpers
//!
//! Requests are driven straight through the router with
//! `tower::ServiceExt::oneshot`; no socket is opened.

use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::NaiveDateTime;
use serde_json::Value;
use sqlx::SqlitePool;
use tower::ServiceExt;
use xftodo::backend::reminders::{Clock, ReminderScheduler, Reminders};
use xftodo::backend::server::{create_app_with, create_app_with_reminders, ServerConfig};

use super::database::test_pool;
use super::notifier::RecordingNotifier;

pub const TEST_SECRET: &str = "integration-test-secret";
pub const LEAD: Duration = Duration::from_secs(300);

/// Configuration used by every test app
pub fn test_config() -> ServerConfig {
    ServerConfig::builder()
        .database_url("sqlite::memory:")
        .jwt_secret(TEST_SECRET)
        .reminder_lead(LEAD)
        .bcrypt_cost(4)
        .build()
        .expect("Failed to build test config")
}

pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
    pub notifier: Arc<RecordingNotifier>,
    pub reminders: Reminders,
}

impl TestApp {
    /// App with the configured strategy on the system clock
    pub async fn new(config: ServerConfig) -> Self {
        let pool = test_pool().await;
        let notifier = Arc::new(RecordingNotifier::new());
        let app = create_app_with(config, pool.clone(), notifier.clone()).await;
        Self {
            router: app.router,
            pool,
            notifier,
            reminders: app.reminders,
        }
    }

    /// App whose scheduler reads the given fixed clock
    pub async fn at(now: NaiveDateTime) -> Self {
        Self::with_clock(Arc::new(move || now)).await
    }

    pub async fn with_clock(clock: Clock) -> Self {
        let pool = test_pool().await;
        let notifier = Arc::new(RecordingNotifier::new());
        let scheduler = ReminderScheduler::with_clock(pool.clone(), notifier.clone(), LEAD, clock);
        let app = create_app_with_reminders(test_config(), pool.clone(), Reminders::Scheduled(scheduler)).await;
        Self {
            router: app.router,
            pool,
            notifier,
            reminders: app.reminders,
        }
    }

    pub fn scheduler(&self) -> &ReminderScheduler {
        self.reminders
            .scheduler()
            .expect("test app is not running the scheduled strategy")
    }

    /// Send a request and decode the JSON response body
    ///
    /// An empty body decodes to `Value::Null`.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        self.send(request).await
    }

    /// Send a prebuilt request, for cases the helpers do not cover
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, token, body).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, token, None).await
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self.reminders.shutdown();
    }
}
