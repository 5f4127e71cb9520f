//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use rosa_studio_core::catalog::CatalogStore;
use rosa_studio_core::db::{
    PgCartMirror, PgCatalogRepository, PgCustomRequestInbox, PgPurchaseLedger, PgTrafficLog,
};
use rosa_studio_core::defaults::CatalogSeed;
use rosa_studio_core::memory::{
    MemoryCarts, MemoryCatalog, MemoryInbox, MemoryLedger, MemoryTraffic,
};
use rosa_studio_core::ports::{
    CartMirror, CatalogRepository, CustomRequestInbox, PurchaseLedger, TrafficLog,
};

use crate::config::StorefrontConfig;
use crate::services::workshop::{GeminiClient, GeminiError};
use crate::services::{MirrorHandle, MirrorWorker, TrafficLogger};

/// The storage capabilities the storefront depends on.
#[derive(Clone)]
pub struct StorefrontPorts {
    pub catalog: Arc<dyn CatalogRepository>,
    pub carts: Arc<dyn CartMirror>,
    pub ledger: Arc<dyn PurchaseLedger>,
    pub traffic: Arc<dyn TrafficLog>,
    pub inbox: Arc<dyn CustomRequestInbox>,
}

impl StorefrontPorts {
    /// All ports over one `PostgreSQL` pool.
    #[must_use]
    pub fn postgres(pool: &PgPool) -> Self {
        Self {
            catalog: Arc::new(PgCatalogRepository::new(pool.clone())),
            carts: Arc::new(PgCartMirror::new(pool.clone())),
            ledger: Arc::new(PgPurchaseLedger::new(pool.clone())),
            traffic: Arc::new(PgTrafficLog::new(pool.clone())),
            inbox: Arc::new(PgCustomRequestInbox::new(pool.clone())),
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
    config: StorefrontConfig,
    pool: Option<PgPool>,
    catalog: Arc<CatalogStore>,
    mirror: MirrorHandle,
    ledger: Arc<dyn PurchaseLedger>,
    inbox: Arc<dyn CustomRequestInbox>,
    traffic: TrafficLogger,
    workshop: Option<GeminiClient>,
}

impl AppState {
    /// Build the service objects and start the cart mirror worker.
    ///
    /// Must be called inside a tokio runtime. `pool` is only used for the
    /// readiness probe.
    ///
    /// # Errors
    ///
    /// Returns an error if the Gemini client cannot be built from the
    /// configured key.
    pub fn new(
        config: StorefrontConfig,
        ports: StorefrontPorts,
        pool: Option<PgPool>,
    ) -> Result<Self, GeminiError> {
        let workshop = config.gemini.as_ref().map(GeminiClient::new).transpose()?;
        if workshop.is_none() {
            tracing::info!("GEMINI_API_KEY not set; workshop disabled");
        }

        let (mirror, _worker) = MirrorWorker::spawn(ports.carts);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                catalog: Arc::new(CatalogStore::new(ports.catalog)),
                mirror,
                ledger: ports.ledger,
                inbox: ports.inbox,
                traffic: TrafficLogger::new(ports.traffic),
                workshop,
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
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

    /// Queue for cart mirror writes.
    #[must_use]
    pub fn mirror(&self) -> &MirrorHandle {
        &self.inner.mirror
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
    pub fn traffic(&self) -> &TrafficLogger {
        &self.inner.traffic
    }

    /// Gemini client, if a key is configured.
    #[must_use]
    pub fn workshop(&self) -> Option<&GeminiClient> {
        self.inner.workshop.as_ref()
    }
}
