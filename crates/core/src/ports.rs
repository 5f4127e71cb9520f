//! Storage ports.
//!
//! Every piece of persistent state sits behind one of these traits so the
//! same logic runs against Postgres in production and against the
//! in-memory adapters in [`crate::memory`] under test.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::defaults::CatalogSeed;
use crate::types::{
    ArtistProfile, CartSnapshot, CustomRequest, GuestId, ItemId, NewCustomRequest,
    NewPortfolioItem, NewPurchase, PortfolioItem, Purchase, TrafficEvent, saturating_sum,
};

/// Errors returned by storage adapters.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[cfg(feature = "postgres")]
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The backing service could not be reached or refused the call.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A stored value could not be decoded.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    #[error("not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Items, categories and the artist profile.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// All items, newest first.
    async fn list_items(&self) -> Result<Vec<PortfolioItem>, StoreError>;

    async fn insert_item(&self, item: NewPortfolioItem) -> Result<PortfolioItem, StoreError>;

    /// Overwrite every field of an existing item.
    ///
    /// Returns [`StoreError::NotFound`] when no item has this id.
    async fn update_item(&self, item: &PortfolioItem) -> Result<(), StoreError>;

    /// Returns whether a row was removed.
    async fn delete_item(&self, id: &ItemId) -> Result<bool, StoreError>;

    /// All category names in creation order.
    async fn list_categories(&self) -> Result<Vec<String>, StoreError>;

    /// Insert a category; inserting an existing name is not an error.
    async fn insert_category(&self, name: &str) -> Result<(), StoreError>;

    /// Returns whether a row was removed. Items keep their category string.
    async fn delete_category(&self, name: &str) -> Result<bool, StoreError>;

    async fn load_profile(&self) -> Result<Option<ArtistProfile>, StoreError>;

    async fn save_profile(&self, profile: &ArtistProfile) -> Result<(), StoreError>;

    /// Replace all catalog content with the seed, atomically where supported.
    async fn reset(&self, seed: &CatalogSeed) -> Result<(), StoreError>;
}

/// Remote copy of each guest's cart.
#[async_trait]
pub trait CartMirror: Send + Sync {
    /// Insert or overwrite the guest's row with the full item list.
    async fn upsert_cart(&self, guest: &GuestId, items: &[PortfolioItem]) -> Result<(), StoreError>;

    async fn load_cart(&self, guest: &GuestId) -> Result<Option<CartSnapshot>, StoreError>;

    async fn list_carts(&self) -> Result<Vec<CartSnapshot>, StoreError>;

    /// Mirrored carts holding at least one item.
    async fn count_active_carts(&self) -> Result<u64, StoreError> {
        let carts = self.list_carts().await?;
        Ok(carts.iter().filter(|cart| cart.is_active()).count() as u64)
    }
}

/// Append-only record of completed checkouts.
#[async_trait]
pub trait PurchaseLedger: Send + Sync {
    async fn record(&self, purchase: NewPurchase) -> Result<Purchase, StoreError>;

    /// All purchases, newest first.
    async fn list_purchases(&self) -> Result<Vec<Purchase>, StoreError>;

    /// Sum of every purchase total.
    async fn total_revenue(&self) -> Result<Decimal, StoreError> {
        let purchases = self.list_purchases().await?;
        Ok(saturating_sum(purchases.iter().map(|p| p.total_amount)))
    }
}

/// Append-only page-view log.
#[async_trait]
pub trait TrafficLog: Send + Sync {
    async fn record(&self, event: &TrafficEvent) -> Result<(), StoreError>;

    async fn count(&self) -> Result<u64, StoreError>;
}

/// Commission enquiries.
#[async_trait]
pub trait CustomRequestInbox: Send + Sync {
    async fn submit(&self, request: NewCustomRequest) -> Result<CustomRequest, StoreError>;

    /// All requests, newest first.
    async fn list_requests(&self) -> Result<Vec<CustomRequest>, StoreError>;
}

/// Public object storage for uploaded images.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store the object and return its public URL.
    async fn upload(
        &self,
        object_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, StoreError>;
}

/// Per-browser key/value storage.
///
/// Any call may fail when the browser's storage is disabled or the session
/// backend is down; callers degrade instead of aborting.
#[async_trait]
pub trait LocalStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError>;

    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}
