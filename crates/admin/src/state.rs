//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use rosa_studio_core::catalog::CatalogStore;
use rosa_studio_core::db::{
    PgCartMirror, PgCatalogRepository, PgCustomRequestInbox, PgPurchaseLedger, PgTrafficLog,
};
use rosa_studio_core::defaults::CatalogSeed;
use rosa_studio_core::memory::{
    MemoryBlobStore, MemoryCarts, MemoryCatalog, MemoryInbox, MemoryLedger, MemoryTraffic,
};
use rosa_studio_core::ports::{
    BlobStore, CartMirror, CatalogRepository, CustomRequestInbox, PurchaseLedger, TrafficLog,
};

use crate::config::AdminConfig;
use crate::db::{AdminUserRepository, AdminUserStore, MemoryAdminUsers};
use crate::services::{AdminAuthService, AuthEvents, DashboardAggregator};

/// The storage capabilities the admin API depends on.
#[derive(Clone)]
pub struct AdminPorts {
    pub catalog: Arc<dyn CatalogRepository>,
    pub carts: Arc<dyn CartMirror>,
    pub ledger: Arc<dyn PurchaseLedger>,
    pub traffic: Arc<dyn TrafficLog>,
    pub inbox: Arc<dyn CustomRequestInbox>,
    pub users: Arc<dyn AdminUserStore>,
    /// Image uploads; `None` rejects them.
    pub blobs: Option<Arc<dyn BlobStore>>,
}

impl AdminPorts {
    /// All ports over one `PostgreSQL` pool.
    #[must_use]
    pub fn postgres(pool: &PgPool, blobs: Option<Arc<dyn BlobStore>>) -> Self {
        Self {
            catalog: Arc::new(PgCatalogRepository::new(pool.clone())),
            carts: Arc::new(PgCartMirror::new(pool.clone())),
            ledger: Arc::new(PgPurchaseLedger::new(pool.clone())),
            traffic: Arc::new(PgTrafficLog::new(pool.clone())),
            inbox: Arc::new(PgCustomRequestInbox::new(pool.clone())),
            users: Arc::new(AdminUserRepository::new(pool.clone())),
            blobs,
        }
    }

    /// In-process ports with the catalog seeded from the built-in defaults.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            catalog: Arc::new(MemoryCatalog::seeded(&CatalogSeed::builtin())),
            carts: Arc::new(MemoryCarts::new()),
            ledger: Arc::new(MemoryLedger::new()),
            traffic: Arc::new(MemoryTraffic::new()),
            inbox: Arc::new(MemoryInbox::new()),
            users: Arc::new(MemoryAdminUsers::new()),
            blobs: Some(Arc::new(MemoryBlobStore::default())),
        }
    }
}

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    pool: Option<PgPool>,
    catalog: Arc<CatalogStore>,
    dashboard: DashboardAggregator,
    ledger: Arc<dyn PurchaseLedger>,
    inbox: Arc<dyn CustomRequestInbox>,
    auth: AdminAuthService,
    events: AuthEvents,
}

impl AppState {
    /// Build the service objects. `pool` is only used for the readiness probe.
    #[must_use]
    pub fn new(config: AdminConfig, ports: AdminPorts, pool: Option<PgPool>) -> Self {
        let mut catalog = CatalogStore::new(ports.catalog);
        match ports.blobs {
            Some(blobs) => catalog = catalog.with_blob_store(blobs),
            None => tracing::info!("STORAGE_URL not set; image uploads disabled"),
        }

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                catalog: Arc::new(catalog),
                dashboard: DashboardAggregator::new(
                    ports.carts,
                    ports.traffic,
                    ports.ledger.clone(),
                ),
                ledger: ports.ledger,
                inbox: ports.inbox,
                auth: AdminAuthService::new(ports.users),
                events: AuthEvents::new(),
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Database pool, when running against `PostgreSQL`.
    #[must_use]
    pub fn pool(&self) -> Option<&PgPool> {
        self.inner.pool.as_ref()
    }

    #[must_use]
    pub fn catalog(&self) -> &Arc<CatalogStore> {
        &self.inner.catalog
    }

    #[must_use]
    pub fn dashboard(&self) -> &DashboardAggregator {
        &self.inner.dashboard
    }

    #[must_use]
    pub fn ledger(&self) -> &dyn PurchaseLedger {
        self.inner.ledger.as_ref()
    }

    #[must_use]
    pub fn inbox(&self) -> &dyn CustomRequestInbox {
        self.inner.inbox.as_ref()
    }

    #[must_use]
    pub fn auth(&self) -> &AdminAuthService {
        &self.inner.auth
    }

    /// Session change broadcast.
    #[must_use]
    pub fn events(&self) -> &AuthEvents {
        &self.inner.events
    }
}
