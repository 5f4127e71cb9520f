//! Integration tests for Rosa Studio.
//!
//! Both routers are built exactly as the binaries build them, over one set
//! of in-memory adapters, so a test can act as a visitor on the storefront
//! and then check the result through the admin API.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p rosa-studio-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `storefront` - Gallery, cart, checkout and enquiry flows
//! - `admin` - Session gating and catalog management
//! - `shared_stores` - Storefront writes observed by the admin dashboard

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::BTreeMap;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use secrecy::SecretString;
use serde_json::Value;
use tower::ServiceExt;
use tower_sessions::MemoryStore;

use rosa_studio_admin::config::AdminConfig;
use rosa_studio_admin::{AdminPorts, AppState as AdminState};
use rosa_studio_core::defaults::CatalogSeed;
use rosa_studio_core::memory::{
    MemoryBlobStore, MemoryCarts, MemoryCatalog, MemoryInbox, MemoryLedger, MemoryTraffic,
};
use rosa_studio_storefront::config::StorefrontConfig;
use rosa_studio_storefront::{AppState as StorefrontState, StorefrontPorts};

/// Largest response body a test reads.
const MAX_BODY: usize = 1024 * 1024;

/// Email of the admin account every context starts with.
pub const ADMIN_EMAIL: &str = "rosa@example.com";
/// Password of that account.
pub const ADMIN_PASSWORD: &str = "knots-and-loops";

/// The in-memory adapters behind both apps.
#[derive(Clone)]
pub struct SharedStores {
    pub catalog: Arc<MemoryCatalog>,
    pub carts: Arc<MemoryCarts>,
    pub ledger: Arc<MemoryLedger>,
    pub traffic: Arc<MemoryTraffic>,
    pub inbox: Arc<MemoryInbox>,
    pub blobs: Arc<MemoryBlobStore>,
}

impl SharedStores {
    fn new() -> Self {
        Self {
            catalog: Arc::new(MemoryCatalog::seeded(&CatalogSeed::builtin())),
            carts: Arc::new(MemoryCarts::new()),
            ledger: Arc::new(MemoryLedger::new()),
            traffic: Arc::new(MemoryTraffic::new()),
            inbox: Arc::new(MemoryInbox::new()),
            blobs: Arc::new(MemoryBlobStore::default()),
        }
    }
}

/// Both apps wired to the same stores.
pub struct TestContext {
    pub stores: SharedStores,
    pub storefront_state: StorefrontState,
    pub admin_state: AdminState,
    storefront: Router,
    admin: Router,
}

impl TestContext {
    /// Build both routers with memory session stores and one admin account.
    ///
    /// # Panics
    ///
    /// Panics if the seed admin cannot be created.
    pub async fn new() -> Self {
        let stores = SharedStores::new();

        let storefront_ports = StorefrontPorts {
            catalog: stores.catalog.clone(),
            carts: stores.carts.clone(),
            ledger: stores.ledger.clone(),
            traffic: stores.traffic.clone(),
            inbox: stores.inbox.clone(),
        };
        let storefront_config = storefront_config();
        let storefront_state =
            StorefrontState::new(storefront_config.clone(), storefront_ports, None)
                .expect("storefront state");
        let storefront = rosa_studio_storefront::app(
            storefront_state.clone(),
            rosa_studio_storefront::middleware::create_session_layer(
                MemoryStore::default(),
                &storefront_config,
            ),
        );

        let admin_ports = AdminPorts {
            catalog: stores.catalog.clone(),
            carts: stores.carts.clone(),
            ledger: stores.ledger.clone(),
            traffic: stores.traffic.clone(),
            inbox: stores.inbox.clone(),
            blobs: Some(stores.blobs.clone()),
            ..AdminPorts::in_memory()
        };
        let admin_config = admin_config();
        let admin_state = AdminState::new(admin_config.clone(), admin_ports, None);
        admin_state
            .auth()
            .create_admin(ADMIN_EMAIL, Some("Rosa"), ADMIN_PASSWORD)
            .await
            .expect("seed admin");
        let admin = rosa_studio_admin::app(
            admin_state.clone(),
            rosa_studio_admin::middleware::create_session_layer(
                MemoryStore::default(),
                &admin_config,
            ),
        );

        Self {
            stores,
            storefront_state,
            admin_state,
            storefront,
            admin,
        }
    }

    /// A visitor with their own cookie jar.
    #[must_use]
    pub fn visitor(&self) -> Client {
        Client::new(self.storefront.clone())
    }

    /// An admin browser that has not logged in.
    #[must_use]
    pub fn admin_browser(&self) -> Client {
        Client::new(self.admin.clone())
    }

    /// An admin browser logged in as [`ADMIN_EMAIL`].
    ///
    /// # Panics
    ///
    /// Panics if the login is rejected.
    pub async fn logged_in_admin(&self) -> Client {
        let mut client = self.admin_browser();
        let response = client
            .post_json(
                "/api/auth/login",
                &serde_json::json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "login failed: {}", response.body);
        client
    }
}

/// One browser: a router plus the cookies it was last given.
pub struct Client {
    router: Router,
    cookies: BTreeMap<String, String>,
}

/// Status and JSON body of a response (`Null` when the body is empty).
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl Client {
    const fn new(router: Router) -> Self {
        Self {
            router,
            cookies: BTreeMap::new(),
        }
    }

    /// Drop one cookie, as the browser does when it expires.
    pub fn expire_cookie(&mut self, name: &str) {
        self.cookies.remove(name);
    }

    pub async fn get(&mut self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None, Body::empty()).await
    }

    pub async fn delete(&mut self, uri: &str) -> TestResponse {
        self.send(Method::DELETE, uri, None, Body::empty()).await
    }

    pub async fn post_json(&mut self, uri: &str, body: &Value) -> TestResponse {
        self.send(
            Method::POST,
            uri,
            Some("application/json".to_string()),
            Body::from(body.to_string()),
        )
        .await
    }

    /// Send a multipart form built with [`Multipart`].
    pub async fn send_form(&mut self, method: Method, uri: &str, form: Multipart) -> TestResponse {
        let content_type = form.content_type();
        self.send(method, uri, Some(content_type), Body::from(form.finish()))
            .await
    }

    /// # Panics
    ///
    /// Panics if the router fails or the body is not JSON.
    pub async fn send(
        &mut self,
        method: Method,
        uri: &str,
        content_type: Option<String>,
        body: Body,
    ) -> TestResponse {
        // Rate-limited routes key on the client address.
        let mut request = Request::builder()
            .method(method)
            .uri(uri)
            .header("x-real-ip", "203.0.113.7");
        if let Some(content_type) = content_type {
            request = request.header(header::CONTENT_TYPE, content_type);
        }
        if !self.cookies.is_empty() {
            let jar = self
                .cookies
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join("; ");
            request = request.header(header::COOKIE, jar);
        }

        let response = self
            .router
            .clone()
            .oneshot(request.body(body).expect("request"))
            .await
            .expect("router is infallible");

        for set_cookie in response.headers().get_all(header::SET_COOKIE) {
            let pair = set_cookie
                .to_str()
                .expect("ascii cookie")
                .split(';')
                .next()
                .unwrap_or_default();
            if let Some((name, value)) = pair.split_once('=') {
                self.cookies.insert(name.trim().to_owned(), value.trim().to_owned());
            }
        }

        let status = response.status();
        let bytes = to_bytes(response.into_body(), MAX_BODY)
            .await
            .expect("body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        TestResponse { status, body }
    }
}

/// Minimal `multipart/form-data` encoder.
#[derive(Debug, Default)]
pub struct Multipart {
    body: Vec<u8>,
}

impl Multipart {
    const BOUNDARY: &'static str = "rosa-test-boundary";

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n",
                Self::BOUNDARY
            )
            .as_bytes(),
        );
        self
    }

    #[must_use]
    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n",
                Self::BOUNDARY
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", Self::BOUNDARY)
    }

    fn finish(mut self) -> Vec<u8> {
        self.body
            .extend_from_slice(format!("--{}--\r\n", Self::BOUNDARY).as_bytes());
        self.body
    }
}

fn storefront_config() -> StorefrontConfig {
    StorefrontConfig {
        database_url: SecretString::from("postgres://unused".to_string()),
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 3000,
        base_url: "http://localhost:3000".to_string(),
        session_secret: SecretString::from("x".repeat(64)),
        catalog_refresh: Duration::from_secs(300),
        gemini: None,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

fn admin_config() -> AdminConfig {
    AdminConfig {
        database_url: SecretString::from("postgres://unused".to_string()),
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 3001,
        base_url: "http://localhost:3001".to_string(),
        session_secret: SecretString::from("x".repeat(64)),
        storage: None,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
        tls: None,
    }
}
