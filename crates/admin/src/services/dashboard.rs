//! Dashboard figures computed from the remote stores.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::instrument;

use rosa_studio_core::format_amount;
use rosa_studio_core::ports::{CartMirror, PurchaseLedger, StoreError, TrafficLog};

/// How often the dashboard client should poll.
pub const REFRESH_INTERVAL_SECS: u64 = 60;

/// Headline figures for the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Mirrored carts holding at least one item.
    pub active_carts: u64,
    pub total_traffic: u64,
    pub total_revenue: Decimal,
    pub total_revenue_display: String,
    pub refreshed_at: DateTime<Utc>,
    pub refresh_interval_secs: u64,
}

/// Computes [`DashboardStats`] on demand. Nothing is cached.
#[derive(Clone)]
pub struct DashboardAggregator {
    carts: Arc<dyn CartMirror>,
    traffic: Arc<dyn TrafficLog>,
    ledger: Arc<dyn PurchaseLedger>,
}

impl DashboardAggregator {
    #[must_use]
    pub fn new(
        carts: Arc<dyn CartMirror>,
        traffic: Arc<dyn TrafficLog>,
        ledger: Arc<dyn PurchaseLedger>,
    ) -> Self {
        Self {
            carts,
            traffic,
            ledger,
        }
    }

    /// # Errors
    ///
    /// Returns the store error when the cart mirror cannot be read.
    pub async fn active_cart_count(&self) -> Result<u64, StoreError> {
        self.carts.count_active_carts().await
    }

    /// # Errors
    ///
    /// Returns the store error when the traffic log cannot be read.
    pub async fn total_traffic(&self) -> Result<u64, StoreError> {
        self.traffic.count().await
    }

    /// # Errors
    ///
    /// Returns the store error when the ledger cannot be read.
    pub async fn total_revenue(&self) -> Result<Decimal, StoreError> {
        self.ledger.total_revenue().await
    }

    /// All three figures, queried concurrently.
    ///
    /// # Errors
    ///
    /// Returns the first store error.
    #[instrument(skip(self))]
    pub async fn snapshot(&self) -> Result<DashboardStats, StoreError> {
        let (active_carts, total_traffic, total_revenue) = tokio::try_join!(
            self.active_cart_count(),
            self.total_traffic(),
            self.total_revenue(),
        )?;

        Ok(DashboardStats {
            active_carts,
            total_traffic,
            total_revenue,
            total_revenue_display: format_amount(total_revenue),
            refreshed_at: Utc::now(),
            refresh_interval_secs: REFRESH_INTERVAL_SECS,
        })
    }
}
