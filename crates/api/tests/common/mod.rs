#![allow(dead_code)]

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use fascicoli_api::auth::jwt::JwtConfig;
use fascicoli_api::auth::password::hash_password;
use fascicoli_api::config::{LoginConfig, ServerConfig, StoreBackend};
use fascicoli_api::router::build_app_router;
use fascicoli_api::sessions::SessionRegistry;
use fascicoli_api::state::AppState;
use fascicoli_core::booking::{BookingService, Stores};
use fascicoli_core::catalog::CatalogItem;
use fascicoli_core::cost_center::CostCenterEntry;
use fascicoli_core::store::{InMemoryStore, StoreSeed};

pub const TEST_USERNAME: &str = "operatore";
pub const TEST_PASSWORD: &str = "fascicoli-test-password";

/// Argon2 is slow in debug builds; hash once per test binary.
fn password_hash() -> String {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| hash_password(TEST_PASSWORD).expect("hashing should succeed"))
        .clone()
}

/// Build a test `ServerConfig` for the in-memory backend.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        store_backend: StoreBackend::Memory,
        database_url: None,
        memory_seed_path: None,
        cache_ttl_secs: 45,
        reasons_file: None,
        portfolio_required: true,
        cost_center_required: true,
        login: LoginConfig {
            username: TEST_USERNAME.to_string(),
            password_hash: password_hash(),
        },
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

pub fn catalog_item(portfolio: &str, customer_id: &str, box_number: &str) -> CatalogItem {
    CatalogItem {
        portfolio: portfolio.to_string(),
        customer_id: customer_id.to_string(),
        header_name: format!("Cliente {customer_id}"),
        box_number: box_number.to_string(),
        creditline_id: format!("CL-{customer_id}-{box_number}"),
        document_type: "mutuo".to_string(),
    }
}

/// Two portfolios, three customers. Customer 3003 has no cost-center row.
pub fn test_seed() -> StoreSeed {
    StoreSeed {
        catalog: vec![
            catalog_item("PORT_A", "1001", "12"),
            catalog_item("PORT_A", "1001", "13"),
            catalog_item("PORT_B", "1001", "40"),
            catalog_item("PORT_A", "2002", "14"),
            catalog_item("PORT_B", "3003", "41"),
        ],
        reservations: Vec::new(),
        cost_centers: vec![
            CostCenterEntry {
                customer_id: "1001".to_string(),
                cost_center: "CC01".to_string(),
                portfolio_cc: "PCC01".to_string(),
                header_name: "ACME SRL".to_string(),
            },
            CostCenterEntry {
                customer_id: "2002".to_string(),
                cost_center: "CC02".to_string(),
                portfolio_cc: "PCC02".to_string(),
                header_name: "BETA SPA".to_string(),
            },
        ],
        managers: vec!["Verdi".to_string(), "Bianchi".to_string(), "Verdi".to_string()],
    }
}

/// A router over a fresh in-memory store, plus a handle on that store.
pub struct TestApp {
    pub app: Router,
    pub store: Arc<InMemoryStore>,
}

/// Build the full application router with all middleware layers over
/// [`test_seed`].
pub fn build_test_app() -> TestApp {
    build_test_app_with(test_config(), test_seed())
}

pub fn build_test_app_with(config: ServerConfig, seed: StoreSeed) -> TestApp {
    let store = Arc::new(InMemoryStore::new(seed));
    let mut stores = Stores::shared(Arc::clone(&store));
    if !config.cost_center_required {
        stores = stores.without_cost_centers();
    }
    let settings = config.booking_settings().expect("settings should load");

    let state = AppState {
        booking: Arc::new(BookingService::new(stores, settings)),
        config: Arc::new(config.clone()),
        sessions: Arc::new(SessionRegistry::new(Duration::from_secs(900))),
    };

    TestApp {
        app: build_app_router(state, &config),
        store,
    }
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::POST, uri, Some(token), None).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

/// Log in with the test credential and return the access token.
pub async fn login(app: Router) -> String {
    let body = serde_json::json!({ "username": TEST_USERNAME, "password": TEST_PASSWORD });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["access_token"]
        .as_str()
        .expect("access_token should be a string")
        .to_string()
}
