#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::extract::connect_info::MockConnectInfo;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::Utc;
use http_body_util::BodyExt;
use reqwest::Client;
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use audit_ingest::config::Config;
use audit_ingest::db::{AuditStore, PgAuditStore};
use audit_ingest::models::{AuditRecord, NewAuditRecord};

pub const OBJECT_ID: &str = "123e4567-e89b-12d3-a456-426614174000";
pub const INITIATOR_ID: &str = "123e4567-e89b-12d3-a456-426614174001";

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://test@localhost:19999/test".to_string(),
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        db_max_connections: 2,
        db_acquire_timeout_secs: 1,
        max_body_size: 65_536,
        trusted_proxies: vec![],
        log_level: "warn".to_string(),
    }
}

/// A well-formed event payload.
pub fn valid_event() -> Value {
    json!({
        "module_name": "users",
        "object_id": OBJECT_ID,
        "initiator_id": INITIATOR_ID,
        "message": "User created",
    })
}

// ── In-memory stores ────────────────────────────────────────────

/// Keeps rows in memory and assigns sequential ids, stamping `created_at`
/// with the current time when none was supplied.
#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<Vec<AuditRecord>>,
}

impl MemoryStore {
    pub fn rows(&self) -> Vec<AuditRecord> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuditStore for MemoryStore {
    async fn insert(&self, record: &NewAuditRecord) -> Result<i64, sqlx::Error> {
        let mut rows = self.rows.lock().unwrap();
        let message_id = rows.len() as i64 + 1;
        rows.push(AuditRecord {
            message_id,
            module_name: record.module_name.clone(),
            object_id: record.object_id,
            initiator_id: record.initiator_id,
            created_at: record.created_at.unwrap_or_else(Utc::now),
            message: record.message.clone(),
        });
        Ok(message_id)
    }
}

/// Store whose every insert fails as an unreachable database would.
pub struct UnavailableStore;

#[async_trait]
impl AuditStore for UnavailableStore {
    async fn insert(&self, _record: &NewAuditRecord) -> Result<i64, sqlx::Error> {
        Err(sqlx::Error::PoolTimedOut)
    }
}

/// Store that panics, standing in for an unclassified fault.
pub struct PanickingStore;

#[async_trait]
impl AuditStore for PanickingStore {
    async fn insert(&self, _record: &NewAuditRecord) -> Result<i64, sqlx::Error> {
        panic!("storage driver exploded");
    }
}

// ── In-process router ───────────────────────────────────────────

pub fn router(store: Arc<dyn AuditStore>) -> Router {
    router_with_config(store, test_config())
}

pub fn router_with_config(store: Arc<dyn AuditStore>, config: Config) -> Router {
    audit_ingest::build_app(store, config)
        .layer(MockConnectInfo(SocketAddr::from(([127, 0, 0, 1], 40_000))))
}

/// POST raw bytes to `/v1/create` with an optional content type.
pub async fn post_raw(
    app: &Router,
    content_type: Option<&str>,
    body: impl Into<Body>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method("POST").uri("/v1/create");
    if let Some(ct) = content_type {
        builder = builder.header("content-type", ct);
    }
    let request = builder.body(body.into()).unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap_or(json!(null));
    (status, body)
}

/// POST a JSON payload to `/v1/create`.
pub async fn post_json(app: &Router, payload: &Value) -> (StatusCode, Value) {
    post_raw(app, Some("application/json"), payload.to_string()).await
}

// ── Postgres-backed server ──────────────────────────────────────

/// A running server instance with a dedicated test database.
pub struct TestApp {
    pub addr: SocketAddr,
    pub pool: PgPool,
    pub client: Client,
    pub db_name: String,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn create(&self, payload: &Value) -> (Value, reqwest::StatusCode) {
        let resp = self
            .client
            .post(self.url("/v1/create"))
            .json(payload)
            .send()
            .await
            .expect("create request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn find(&self, message_id: i64) -> Option<AuditRecord> {
        sqlx::query_as::<_, AuditRecord>("SELECT * FROM audit WHERE message_id = $1")
            .bind(message_id)
            .fetch_optional(&self.pool)
            .await
            .expect("select failed")
    }

    pub async fn count(&self) -> i64 {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM audit")
            .fetch_one(&self.pool)
            .await
            .expect("count failed")
    }
}

fn admin_url(base_url: &str) -> String {
    base_url
        .rsplit_once('/')
        .map(|(base, _)| format!("{base}/postgres"))
        .unwrap_or_else(|| base_url.to_string())
}

/// Spawn a server backed by a fresh temporary database.
pub async fn spawn_app() -> TestApp {
    let _ = dotenvy::dotenv();

    let base_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");

    let db_name = format!("audit_test_{}", Uuid::now_v7().simple());

    let admin_pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&admin_url(&base_url))
        .await
        .expect("Failed to connect to postgres for test DB creation");

    sqlx::query(&format!("CREATE DATABASE \"{db_name}\""))
        .execute(&admin_pool)
        .await
        .expect("Failed to create test database");

    admin_pool.close().await;

    let test_url = base_url
        .rsplit_once('/')
        .map(|(base, _)| format!("{base}/{db_name}"))
        .unwrap_or_else(|| base_url.clone());

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&test_url)
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations on test database");

    let config = Config {
        database_url: test_url,
        ..test_config()
    };

    let app = audit_ingest::build_app(Arc::new(PgAuditStore::new(pool.clone())), config);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .expect("Server failed");
    });

    TestApp {
        addr,
        pool,
        client: Client::new(),
        db_name,
    }
}

/// Drop the test database after tests complete.
pub async fn cleanup(app: TestApp) {
    let db_name = app.db_name.clone();
    app.pool.close().await;

    let base_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");

    let admin_pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&admin_url(&base_url))
        .await
        .expect("Failed to connect for cleanup");

    let _ = sqlx::query(&format!("DROP DATABASE IF EXISTS \"{db_name}\" WITH (FORCE)"))
        .execute(&admin_pool)
        .await;

    admin_pool.close().await;
}
